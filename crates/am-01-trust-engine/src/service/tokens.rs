//! Verification Token Service
//!
//! Issues and redeems single-use verification tokens. Token values never
//! appear in logs or error messages.

use crate::domain::{
    generate_token_value, AccountId, Redemption, TokenValue, TrustConfig, TrustError,
    VerificationToken, TOKEN_SUBJECT,
};
use crate::ports::inbound::VerificationTokenApi;
use crate::ports::outbound::{Clock, TokenStore};
use crate::service::bounded;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_telemetry::{TOKENS_ISSUED, TOKEN_REDEMPTIONS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Verification token service.
pub struct VerificationTokenService {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    config: TrustConfig,
}

impl VerificationTokenService {
    /// Create a service over the given token store and clock.
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>, config: TrustConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl VerificationTokenApi for VerificationTokenService {
    #[instrument(skip_all, fields(operation = "issue_token"))]
    async fn issue(&self, account_id: &str) -> Result<VerificationToken, TrustError> {
        let account = AccountId::parse(account_id)?;
        let now = self.clock.now();

        let token = VerificationToken {
            value: generate_token_value(self.config.token_bytes),
            account_id: account,
            created_at: now,
            expires_at: expiry_after(now, self.config.token_ttl),
            consumed: false,
        };

        bounded(
            self.config.store_timeout,
            "issue_token",
            token.account_id.as_str(),
            self.store.insert(&token),
        )
        .await?;

        TOKENS_ISSUED.inc();
        info!(
            account_id = %token.account_id,
            expires_at = %token.expires_at,
            outcome = "issued",
            "Verification token issued"
        );
        Ok(token)
    }

    #[instrument(skip_all, fields(operation = "redeem_token"))]
    async fn redeem(&self, token: &str) -> Result<Redemption, TrustError> {
        let token = TokenValue::new(token);

        // Malformed tokens cannot exist in the store.
        if !token.is_well_formed() {
            TOKEN_REDEMPTIONS.with_label_values(&["invalid"]).inc();
            debug!(outcome = "malformed", "Verification token rejected");
            return Ok(Redemption::invalid());
        }

        let now = self.clock.now();
        let consumed = bounded(
            self.config.store_timeout,
            "redeem_token",
            TOKEN_SUBJECT,
            self.store.consume_if_valid(&token, now),
        )
        .await?;

        match consumed {
            Some(account) => {
                TOKEN_REDEMPTIONS.with_label_values(&["valid"]).inc();
                info!(account_id = %account, outcome = "valid", "Verification token redeemed");
                Ok(Redemption::valid(account))
            }
            None => {
                TOKEN_REDEMPTIONS.with_label_values(&["invalid"]).inc();
                info!(outcome = "invalid", "Verification token rejected");
                Ok(Redemption::invalid())
            }
        }
    }
}
