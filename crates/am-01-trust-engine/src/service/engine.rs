//! Trust Level Engine
//!
//! Derives, stores and recomputes account trust levels.
//!
//! ## Derivation
//!
//! | Stored level | Verified flag | Effective level |
//! |--------------|---------------|-----------------|
//! | set          | any           | stored level    |
//! | unset        | true          | VERIFIED        |
//! | unset        | false         | NEW             |
//! | no account   | -             | NEW             |
//!
//! ## Concurrency
//!
//! Writes are last-writer-wins. Two concurrent `recompute_after_order` calls
//! for one account may interleave their count and write steps; the stored
//! level then reflects whichever write landed last. No per-account lock is
//! taken.
//!
//! `ensure_at_least` is the exception: it uses the store's conditional
//! `raise_trust`, so a higher level written concurrently is never lowered.

use crate::domain::{AccountId, TrustConfig, TrustError, TrustLevel, TrustRecord};
use crate::ports::inbound::TrustLevelApi;
use crate::ports::outbound::{OrderLedger, TrustStore};
use crate::service::bounded;
use async_trait::async_trait;
use market_telemetry::TRUST_LEVEL_WRITES;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Trust level engine.
pub struct TrustLevelEngine {
    store: Arc<dyn TrustStore>,
    ledger: Arc<dyn OrderLedger>,
    config: TrustConfig,
}

impl TrustLevelEngine {
    /// Create an engine over the given store and order ledger.
    pub fn new(
        store: Arc<dyn TrustStore>,
        ledger: Arc<dyn OrderLedger>,
        config: TrustConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    async fn read(&self, account: &AccountId) -> Result<TrustRecord, TrustError> {
        bounded(
            self.config.store_timeout,
            "read_trust",
            account.as_str(),
            self.store.read_trust(account),
        )
        .await
    }

    async fn write(&self, account: &AccountId, level: TrustLevel) -> Result<(), TrustError> {
        bounded(
            self.config.store_timeout,
            "write_trust",
            account.as_str(),
            self.store.write_trust(account, level),
        )
        .await?;

        record_write("write_trust", account, level);
        Ok(())
    }
}

fn record_write(operation: &'static str, account: &AccountId, level: TrustLevel) {
    TRUST_LEVEL_WRITES.with_label_values(&[level.label()]).inc();
    info!(
        operation,
        account_id = %account,
        level = %level,
        outcome = "written",
        "Trust level stored"
    );
}

#[async_trait]
impl TrustLevelApi for TrustLevelEngine {
    #[instrument(skip_all, fields(operation = "get_level"))]
    async fn get_level(&self, identifier: &str) -> Result<TrustLevel, TrustError> {
        let account = AccountId::parse(identifier)?;
        let level = self.read(&account).await?.effective_level();
        debug!(account_id = %account, level = %level, "Trust level resolved");
        Ok(level)
    }

    #[instrument(skip_all, fields(operation = "lookup"))]
    async fn lookup(&self, identifier: &str) -> Result<Option<TrustLevel>, TrustError> {
        let account = AccountId::parse(identifier)?;
        let record = self.read(&account).await?;
        if !record.exists {
            debug!(account_id = %account, "No trust record");
            return Ok(None);
        }
        Ok(Some(record.effective_level()))
    }

    #[instrument(skip_all, fields(operation = "set_level"))]
    async fn set_level(&self, identifier: &str, level: TrustLevel) -> Result<(), TrustError> {
        let account = AccountId::parse(identifier)?;
        self.write(&account, level).await
    }

    #[instrument(skip_all, fields(operation = "set_level"))]
    async fn set_level_ordinal(&self, identifier: &str, ordinal: i64) -> Result<(), TrustError> {
        let account = AccountId::parse(identifier)?;
        let level = TrustLevel::from_ordinal(ordinal)?;
        self.write(&account, level).await
    }

    #[instrument(skip_all, fields(operation = "mark_verified"))]
    async fn mark_verified(&self, identifier: &str) -> Result<(), TrustError> {
        let account = AccountId::parse(identifier)?;
        bounded(
            self.config.store_timeout,
            "mark_verified",
            account.as_str(),
            self.store.mark_verified(&account),
        )
        .await?;
        info!(account_id = %account, outcome = "verified", "Account marked verified");
        Ok(())
    }

    /// Writes the level implied by the completed-order count, even when that
    /// is lower than the stored level (a manually granted TRUSTED drops back
    /// to what the order history supports).
    #[instrument(skip_all, fields(operation = "recompute_after_order"))]
    async fn recompute_after_order(&self, identifier: &str) -> Result<TrustLevel, TrustError> {
        let account = AccountId::parse(identifier)?;

        let completed = bounded(
            self.config.store_timeout,
            "completed_order_count",
            account.as_str(),
            self.ledger.completed_order_count(&account),
        )
        .await?;

        let level = self.config.level_for_completed_orders(completed);
        debug!(account_id = %account, completed, level = %level, "Recomputed trust level");

        self.write(&account, level).await?;
        Ok(level)
    }

    #[instrument(skip_all, fields(operation = "ensure_at_least"))]
    async fn ensure_at_least(
        &self,
        identifier: &str,
        floor: TrustLevel,
    ) -> Result<TrustLevel, TrustError> {
        let account = AccountId::parse(identifier)?;
        let raised = bounded(
            self.config.store_timeout,
            "raise_trust",
            account.as_str(),
            self.store.raise_trust(&account, floor),
        )
        .await?;

        if raised {
            record_write("raise_trust", &account, floor);
            return Ok(floor);
        }

        let current = self.read(&account).await?.effective_level();
        debug!(account_id = %account, level = %current, "Trust level already at floor");
        Ok(current)
    }

    #[instrument(skip_all, fields(operation = "admit"))]
    async fn admit(&self, identifier: &str, required: TrustLevel) -> Result<bool, TrustError> {
        let level = self.get_level(identifier).await?;
        Ok(level.satisfies(required))
    }
}
