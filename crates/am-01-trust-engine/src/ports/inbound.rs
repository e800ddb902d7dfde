//! # Inbound Ports
//!
//! API traits defining what the trust subsystem can do.
//!
//! Identifiers arrive as raw strings from outside the process; every method
//! validates them before touching a store.

use crate::domain::{Redemption, TrustError, TrustLevel, VerificationToken};
use async_trait::async_trait;

/// Trust level API - inbound port.
#[async_trait]
pub trait TrustLevelApi: Send + Sync {
    /// Effective trust level. Unknown accounts are NEW.
    async fn get_level(&self, identifier: &str) -> Result<TrustLevel, TrustError>;

    /// Effective trust level, or `None` when the account has no record at all.
    async fn lookup(&self, identifier: &str) -> Result<Option<TrustLevel>, TrustError>;

    /// Overwrite the stored level.
    async fn set_level(&self, identifier: &str, level: TrustLevel) -> Result<(), TrustError>;

    /// Overwrite the stored level from a raw ordinal (1-4).
    async fn set_level_ordinal(&self, identifier: &str, ordinal: i64) -> Result<(), TrustError>;

    /// Record that the account proved control of its contact identity.
    async fn mark_verified(&self, identifier: &str) -> Result<(), TrustError>;

    /// Reset the level from the completed-order count. Returns the level written.
    async fn recompute_after_order(&self, identifier: &str) -> Result<TrustLevel, TrustError>;

    /// Raise the level to `floor` if currently below it. Returns the resulting level.
    async fn ensure_at_least(
        &self,
        identifier: &str,
        floor: TrustLevel,
    ) -> Result<TrustLevel, TrustError>;

    /// `get_level(identifier) >= required`.
    async fn admit(&self, identifier: &str, required: TrustLevel) -> Result<bool, TrustError>;
}

/// Verification token API - inbound port.
#[async_trait]
pub trait VerificationTokenApi: Send + Sync {
    /// Issue a single-use token bound to `account_id`.
    async fn issue(&self, account_id: &str) -> Result<VerificationToken, TrustError>;

    /// Redeem a token. Unknown, consumed and expired tokens all yield
    /// `valid: false`.
    async fn redeem(&self, token: &str) -> Result<Redemption, TrustError>;
}
