//! # AM-02 Trust Gateway
//!
//! HTTP middleware that admits a request only when the authenticated account
//! meets a minimum trust level.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  TRUST GATEWAY (am-02)                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  session layer ──► AuthenticatedIdentity extension       │
//! │        │                                                 │
//! │  ┌─────┴──────────────────────────────┐                  │
//! │  │ TrustGateLayer (required level)    │── 403 / 500 JSON │
//! │  └─────┬──────────────────────────────┘                  │
//! │        │ TrustContext extension                          │
//! │        ▼                                                 │
//! │     handler                                              │
//! └────────┼─────────────────────────────────────────────────┘
//!          │ TrustLevelApi::lookup
//!          ▼
//!   am-01-trust-engine
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use am_02_trust_gateway::TrustGateLayer;
//! use am_01_trust_engine::TrustLevel;
//!
//! let app = Router::new()
//!     .route("/listings", post(create_listing))
//!     .layer(TrustGateLayer::new(engine, TrustLevel::Established));
//! ```

#![warn(clippy::all)]

pub mod admin;
pub mod error;
pub mod identity;
pub mod middleware;

pub use admin::admin_router;
pub use error::GateError;
pub use identity::{AuthenticatedIdentity, TrustContext};
pub use middleware::{TrustGateLayer, TrustGateService};
