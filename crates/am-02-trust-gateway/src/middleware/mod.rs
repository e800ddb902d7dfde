//! Middleware for trust-gated routes.
//!
//! Layer order: Request → session layer (sets `AuthenticatedIdentity`) → TrustGate → Handler

pub mod gate;

pub use gate::{TrustGateLayer, TrustGateService};
