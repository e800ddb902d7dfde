//! Verification Notifier Adapters
//!
//! Delivery of issued tokens to the account holder. Real email transport
//! lives outside this subsystem; these adapters cover local runs and tests.

use crate::domain::{AccountId, NotifyError, TokenValue};
use crate::ports::outbound::VerificationNotifier;
use async_trait::async_trait;
use market_telemetry::log_event;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Notifier that only logs that a delivery happened. The token itself is
/// never written to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl VerificationNotifier for LoggingNotifier {
    async fn deliver(&self, account: &AccountId, _token: &TokenValue) -> Result<(), NotifyError> {
        log_event!(
            info,
            "trust-engine",
            "Verification token ready for delivery",
            operation = "deliver_verification",
            account_id = %account
        );
        Ok(())
    }
}

/// Notifier that keeps every delivery in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<(AccountId, TokenValue)>>,
    should_fail: AtomicBool,
}

impl RecordingNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Deliveries so far, oldest first.
    pub fn delivered(&self) -> Vec<(AccountId, TokenValue)> {
        self.delivered.lock().clone()
    }

    /// Most recent token delivered to `account`.
    pub fn last_token_for(&self, account: &AccountId) -> Option<TokenValue> {
        self.delivered
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == account)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl VerificationNotifier for RecordingNotifier {
    async fn deliver(&self, account: &AccountId, token: &TokenValue) -> Result<(), NotifyError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError {
                account_id: account.to_string(),
                reason: "mail relay rejected message".to_string(),
            });
        }
        self.delivered.lock().push((account.clone(), token.clone()));
        Ok(())
    }
}
