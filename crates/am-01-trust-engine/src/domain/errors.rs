//! # Domain Errors
//!
//! Error taxonomy for the trust engine.
//!
//! Validation errors are raised at the boundary of each public operation,
//! before any store access. Store errors carry the operation and the account
//! identifier, never a raw verification token.

use super::identifier::AccountId;
use thiserror::Error;

/// Placeholder used in error context where the subject is a token.
pub const TOKEN_SUBJECT: &str = "<verification-token>";

/// Trust engine error types.
#[derive(Debug, Error)]
pub enum TrustError {
    /// Identifier failed format validation. Never retried.
    #[error("Invalid identifier: \"{0}\"")]
    InvalidIdentifier(String),

    /// Ordinal outside the trust level enumeration. Never retried.
    #[error("Invalid trust level: {0} (expected 1-4)")]
    InvalidTrustLevel(i64),

    /// No matching account or token row for a write/redeem target.
    #[error("Not found during {operation}: {subject}")]
    NotFound {
        /// Operation that failed
        operation: &'static str,
        /// Account identifier or token placeholder
        subject: String,
    },

    /// Transient store failure. Safe to retry with backoff.
    #[error("Store unavailable during {operation} for {subject}: {reason}")]
    StoreUnavailable {
        /// Operation that failed
        operation: &'static str,
        /// Account identifier or token placeholder
        subject: String,
        /// Underlying cause
        reason: String,
    },

    /// Authorization gate denial. Terminal for the request.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A verification token was redeemed but the account update failed.
    /// The token is spent; finish with `EmailVerificationFlow::resume`
    /// for `account_id` rather than redeeming again.
    #[error("Verification incomplete for {account_id}: {source}")]
    VerificationIncomplete {
        /// Account the redeemed token was bound to
        account_id: AccountId,
        /// Failure of the account-side step
        source: Box<TrustError>,
    },
}

impl TrustError {
    /// Only store outages are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrustError::StoreUnavailable { .. })
    }

    /// Stable machine-readable code for API responses and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            TrustError::InvalidIdentifier(_) => "invalid_identifier",
            TrustError::InvalidTrustLevel(_) => "invalid_trust_level",
            TrustError::NotFound { .. } => "not_found",
            TrustError::StoreUnavailable { .. } => "store_unavailable",
            TrustError::Forbidden(_) => "forbidden",
            TrustError::VerificationIncomplete { .. } => "verification_incomplete",
        }
    }
}

/// Errors reported by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched.
    #[error("row not found: {0}")]
    NotFound(String),

    /// Backend unreachable, timed out, or rejected the statement.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Row exists but holds a value the domain cannot represent.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Attach operation and subject context, producing the public taxonomy.
    pub fn into_trust(self, operation: &'static str, subject: impl Into<String>) -> TrustError {
        let subject = subject.into();
        match self {
            StoreError::NotFound(_) => TrustError::NotFound { operation, subject },
            StoreError::Unavailable(reason) | StoreError::Corrupt(reason) => {
                TrustError::StoreUnavailable {
                    operation,
                    subject,
                    reason,
                }
            }
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound("no matching row".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(e.to_string())
            }
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

/// Best-effort notification delivery failure.
#[derive(Debug, Error)]
#[error("delivery failed for {account_id}: {reason}")]
pub struct NotifyError {
    /// Recipient account
    pub account_id: String,
    /// Underlying cause
    pub reason: String,
}
