//! # Outbound Ports
//!
//! Traits for external collaborators: the durable store, the order ledger,
//! the notification channel and the clock.
//!
//! Store implementations must not cache: every read reflects the latest
//! committed write.

use crate::domain::{
    AccountId, NotifyError, StoreError, TokenValue, TrustLevel, TrustRecord, VerificationToken,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Account trust attributes keyed by external identity - outbound port.
#[async_trait]
pub trait TrustStore: Send + Sync {
    /// Read trust attributes. A missing account yields [`TrustRecord::absent`],
    /// not an error.
    async fn read_trust(&self, account: &AccountId) -> Result<TrustRecord, StoreError>;

    /// Overwrite the stored level. `StoreError::NotFound` if no account row.
    async fn write_trust(&self, account: &AccountId, level: TrustLevel) -> Result<(), StoreError>;

    /// Set the verified flag. `StoreError::NotFound` if no account row.
    async fn mark_verified(&self, account: &AccountId) -> Result<(), StoreError>;

    /// Store `floor` only if the effective level is below it, as one atomic
    /// step. Returns whether a write happened. A level written concurrently
    /// by another caller is never lowered. `StoreError::NotFound` if no
    /// account row.
    async fn raise_trust(&self, account: &AccountId, floor: TrustLevel) -> Result<bool, StoreError>;
}

/// Verification token persistence - outbound port.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a freshly issued token.
    async fn insert(&self, token: &VerificationToken) -> Result<(), StoreError>;

    /// Atomically consume an unconsumed, unexpired token.
    ///
    /// Returns the bound account when the token was consumed by this call,
    /// `None` when it is unknown, already consumed, or expired at `now`.
    /// Expired tokens stay unconsumed. Two concurrent calls for the same
    /// token must never both return `Some`.
    async fn consume_if_valid(
        &self,
        token: &TokenValue,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, StoreError>;
}

/// Completed-order counts - outbound port.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Number of the account's orders in the terminal "completed" state.
    async fn completed_order_count(&self, account: &AccountId) -> Result<u64, StoreError>;
}

/// Delivery of freshly issued tokens (e.g. email) - outbound port.
///
/// Best effort: callers log failures and carry on.
#[async_trait]
pub trait VerificationNotifier: Send + Sync {
    /// Attempt delivery of `token` to the holder of `account`.
    async fn deliver(&self, account: &AccountId, token: &TokenValue) -> Result<(), NotifyError>;
}

/// Source of the current time - outbound port.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
