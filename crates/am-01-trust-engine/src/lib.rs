//! # AM-01 Trust Engine
//!
//! Trust-level escalation and identity verification for marketplace
//! accounts.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide how much a buyer or artist is trusted and let them prove control of
//! their email:
//! - External identifiers validated before any storage access
//! - Ordinal trust levels derived from stored level, verified flag and
//!   completed-order history
//! - Single-use, expiring verification tokens redeemed atomically
//!
//! ## Security Properties
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Identifier validation | 8-4-4-4-12 hex only, checked before every store call |
//! | Bound parameters | Store statements never interpolate caller data |
//! | 256-bit tokens | OS CSPRNG, never logged, redacted in `Debug` |
//! | Atomic redeem | Check-and-consume is one store operation |
//! | Store deadlines | Every store call is bounded; timeouts are retryable |
//!
//! ## Module Structure
//!
//! ```text
//! am-01-trust-engine/
//! ├── domain/          # AccountId, TrustLevel, tokens, config, errors
//! ├── ports/           # TrustLevelApi, VerificationTokenApi, store ports
//! ├── adapters/        # In-memory, Postgres, clocks, notifiers
//! └── service/         # TrustLevelEngine, VerificationTokenService, flow
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    connect_pool, InMemoryOrderLedger, InMemoryTokenStore, InMemoryTrustStore, LoggingNotifier,
    ManualClock, PgOrderLedger, PgStoreConfig, PgTokenStore, PgTrustStore, RecordingNotifier,
    SystemClock,
};
pub use domain::{
    is_valid_identifier, AccountId, ConfigError, NotifyError, Redemption, StoreError,
    TokenValue, TrustConfig, TrustError, TrustLevel, TrustRecord, VerificationToken,
};
pub use ports::{
    Clock, OrderLedger, TokenStore, TrustLevelApi, TrustStore, VerificationNotifier,
    VerificationTokenApi,
};
pub use service::{
    EmailVerificationFlow, TrustLevelEngine, VerificationOutcome, VerificationTokenService,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
