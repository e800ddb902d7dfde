//! Email Verification Flow
//!
//! ```text
//! start(account) ──► issue token ──► notifier.deliver (best effort)
//!
//! complete(token) ──► redeem ──valid──► mark verified ──► trust >= VERIFIED
//!                       │                    │
//!                       │                    └─failed──► VerificationIncomplete
//!                       └─invalid──► Rejected (nothing written)
//!
//! resume(account) ──► mark verified ──► trust >= VERIFIED
//! ```
//!
//! The token is spent as soon as it is redeemed. When the account-side step
//! fails afterwards, `complete` returns [`TrustError::VerificationIncomplete`]
//! naming the account, and `resume` finishes the job. Both account-side
//! writes are idempotent, so `resume` may be retried freely.

use crate::domain::{AccountId, TrustError, TrustLevel, VerificationToken};
use crate::ports::inbound::{TrustLevelApi, VerificationTokenApi};
use crate::ports::outbound::VerificationNotifier;
use market_telemetry::NOTIFY_FAILURES;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of completing a verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Token accepted; the account is verified at `level`.
    Verified {
        /// Verified account
        account_id: AccountId,
        /// Trust level after verification
        level: TrustLevel,
    },
    /// Token unknown, consumed, expired or malformed.
    Rejected,
}

/// Email verification flow over the token service and trust engine.
pub struct EmailVerificationFlow {
    tokens: Arc<dyn VerificationTokenApi>,
    trust: Arc<dyn TrustLevelApi>,
    notifier: Arc<dyn VerificationNotifier>,
}

impl EmailVerificationFlow {
    /// Create a flow.
    pub fn new(
        tokens: Arc<dyn VerificationTokenApi>,
        trust: Arc<dyn TrustLevelApi>,
        notifier: Arc<dyn VerificationNotifier>,
    ) -> Self {
        Self {
            tokens,
            trust,
            notifier,
        }
    }

    /// Issue a token and hand it to the notifier.
    ///
    /// A failed delivery is logged and counted; the token is still returned
    /// so the caller can offer a resend.
    #[instrument(skip_all, fields(operation = "start_verification"))]
    pub async fn start(&self, identifier: &str) -> Result<VerificationToken, TrustError> {
        let token = self.tokens.issue(identifier).await?;

        if let Err(e) = self.notifier.deliver(&token.account_id, &token.value).await {
            NOTIFY_FAILURES.inc();
            warn!(
                account_id = %token.account_id,
                error = %e,
                outcome = "delivery_failed",
                "Verification delivery failed"
            );
        }

        Ok(token)
    }

    /// Redeem `token`, mark the account verified and raise its trust to at
    /// least VERIFIED. Higher levels are kept.
    ///
    /// Failures after redemption come back as
    /// [`TrustError::VerificationIncomplete`]; pass its `account_id` to
    /// [`resume`](Self::resume).
    #[instrument(skip_all, fields(operation = "complete_verification"))]
    pub async fn complete(&self, token: &str) -> Result<VerificationOutcome, TrustError> {
        let redemption = self.tokens.redeem(token).await?;
        let Some(account_id) = redemption.account_id.filter(|_| redemption.valid) else {
            return Ok(VerificationOutcome::Rejected);
        };

        match self.apply(&account_id).await {
            Ok(level) => Ok(VerificationOutcome::Verified { account_id, level }),
            Err(e) => {
                warn!(
                    account_id = %account_id,
                    error = %e,
                    outcome = "incomplete",
                    "Token redeemed but account update failed"
                );
                Err(TrustError::VerificationIncomplete {
                    account_id,
                    source: Box::new(e),
                })
            }
        }
    }

    /// Finish a verification whose token was already redeemed by `complete`.
    #[instrument(skip_all, fields(operation = "resume_verification"))]
    pub async fn resume(&self, account_id: &AccountId) -> Result<VerificationOutcome, TrustError> {
        let level = self.apply(account_id).await?;
        Ok(VerificationOutcome::Verified {
            account_id: account_id.clone(),
            level,
        })
    }

    async fn apply(&self, account_id: &AccountId) -> Result<TrustLevel, TrustError> {
        self.trust.mark_verified(account_id.as_str()).await?;
        let level = self
            .trust
            .ensure_at_least(account_id.as_str(), TrustLevel::Verified)
            .await?;

        info!(
            account_id = %account_id,
            level = %level,
            outcome = "verified",
            "Verification completed"
        );
        Ok(level)
    }
}
