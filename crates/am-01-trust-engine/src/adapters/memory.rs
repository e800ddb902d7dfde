//! In-Memory Adapters
//!
//! Implement the store and ledger ports without a database, for tests and
//! local runs. Each adapter serializes access behind a `parking_lot` lock so
//! check-then-mutate sequences are atomic.

use crate::domain::{
    AccountId, StoreError, TokenValue, TrustLevel, TrustRecord, VerificationToken,
};
use crate::ports::outbound::{OrderLedger, TokenStore, TrustStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// Stored account row.
#[derive(Clone, Copy, Debug, Default)]
struct AccountRow {
    level: Option<TrustLevel>,
    verified: bool,
}

/// In-memory account trust store.
#[derive(Default)]
pub struct InMemoryTrustStore {
    accounts: RwLock<HashMap<AccountId, AccountRow>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryTrustStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account row, as the sign-up path would.
    pub fn insert_account(&self, account: &AccountId, level: Option<TrustLevel>, verified: bool) {
        self.accounts
            .write()
            .insert(account.clone(), AccountRow { level, verified });
    }

    /// Number of successful level writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Simulate an outage: every call fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TrustStore for InMemoryTrustStore {
    async fn read_trust(&self, account: &AccountId) -> Result<TrustRecord, StoreError> {
        self.check_available()?;
        let record = match self.accounts.read().get(account) {
            Some(row) => TrustRecord::stored(row.level, row.verified),
            None => TrustRecord::absent(),
        };
        Ok(record)
    }

    async fn write_trust(&self, account: &AccountId, level: TrustLevel) -> Result<(), StoreError> {
        self.check_available()?;
        let mut accounts = self.accounts.write();
        let row = accounts
            .get_mut(account)
            .ok_or_else(|| StoreError::NotFound(format!("account {account}")))?;
        row.level = Some(level);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn mark_verified(&self, account: &AccountId) -> Result<(), StoreError> {
        self.check_available()?;
        let mut accounts = self.accounts.write();
        let row = accounts
            .get_mut(account)
            .ok_or_else(|| StoreError::NotFound(format!("account {account}")))?;
        row.verified = true;
        Ok(())
    }

    async fn raise_trust(
        &self,
        account: &AccountId,
        floor: TrustLevel,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut accounts = self.accounts.write();
        let row = accounts
            .get_mut(account)
            .ok_or_else(|| StoreError::NotFound(format!("account {account}")))?;

        let current = TrustRecord::stored(row.level, row.verified).effective_level();
        if current >= floor {
            return Ok(false);
        }
        row.level = Some(floor);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

/// In-memory verification token store.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<TokenValue, VerificationToken>>,
    unavailable: AtomicBool,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored token, for inspection.
    pub fn get(&self, token: &TokenValue) -> Option<VerificationToken> {
        self.tokens.lock().get(token).cloned()
    }

    /// Number of stored tokens, consumed or not.
    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    /// Whether no tokens are stored.
    pub fn is_empty(&self) -> bool {
        self.tokens.lock().is_empty()
    }

    /// Simulate an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert(&self, token: &VerificationToken) -> Result<(), StoreError> {
        self.check_available()?;
        self.tokens.lock().insert(token.value.clone(), token.clone());
        Ok(())
    }

    async fn consume_if_valid(
        &self,
        token: &TokenValue,
        now: DateTime<Utc>,
    ) -> Result<Option<AccountId>, StoreError> {
        self.check_available()?;

        // Lookup, expiry check and consume happen under one lock.
        let mut tokens = self.tokens.lock();
        let stored = match tokens.get_mut(token) {
            Some(stored) if !stored.consumed => stored,
            _ => return Ok(None),
        };

        if stored.is_expired_at(now) {
            debug!(account_id = %stored.account_id, "Expired verification token presented");
            return Ok(None);
        }

        stored.consumed = true;
        Ok(Some(stored.account_id.clone()))
    }
}

/// In-memory order ledger.
#[derive(Default)]
pub struct InMemoryOrderLedger {
    completed: RwLock<HashMap<AccountId, u64>>,
    unavailable: AtomicBool,
}

impl InMemoryOrderLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an account's completed-order count.
    pub fn set_completed(&self, account: &AccountId, count: u64) {
        self.completed.write().insert(account.clone(), count);
    }

    /// Record one more completed order. Returns the new count.
    pub fn record_completed(&self, account: &AccountId) -> u64 {
        let mut completed = self.completed.write();
        let count = completed.entry(account.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Simulate an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderLedger for InMemoryOrderLedger {
    async fn completed_order_count(&self, account: &AccountId) -> Result<u64, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("order ledger offline".to_string()));
        }
        Ok(self.completed.read().get(account).copied().unwrap_or(0))
    }
}
