//! # Services
//!
//! Inbound port implementations wiring domain rules to the outbound ports.

pub mod engine;
pub mod tokens;
pub mod verification;

pub use engine::TrustLevelEngine;
pub use tokens::VerificationTokenService;
pub use verification::{EmailVerificationFlow, VerificationOutcome};

use crate::domain::{StoreError, TrustError};
use std::future::Future;
use std::time::Duration;

/// Run a store call under `deadline`, attaching operation context to any
/// failure. A missed deadline is reported as `StoreUnavailable`.
pub(crate) async fn bounded<T, F>(
    deadline: Duration,
    operation: &'static str,
    subject: &str,
    call: F,
) -> Result<T, TrustError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(|e| e.into_trust(operation, subject)),
        Err(_) => Err(StoreError::Unavailable(format!("no response within {deadline:?}"))
            .into_trust(operation, subject)),
    }
}
