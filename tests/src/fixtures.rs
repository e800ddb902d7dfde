//! # Test Fixtures
//!
//! A fully wired in-memory trust stack.

use am_01_trust_engine::{
    AccountId, EmailVerificationFlow, InMemoryOrderLedger, InMemoryTokenStore,
    InMemoryTrustStore, ManualClock, RecordingNotifier, TrustConfig, TrustLevel,
    TrustLevelEngine, VerificationTokenService,
};
use std::sync::Arc;

/// Canonical test account.
pub const ALICE: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Second test account.
pub const BOB: &str = "9F8E7D6C-5B4A-3928-1706-F5E4D3C2B1A0";

/// In-memory stores, engine, token service and flow sharing one clock.
pub struct TrustStack {
    pub store: Arc<InMemoryTrustStore>,
    pub tokens_store: Arc<InMemoryTokenStore>,
    pub ledger: Arc<InMemoryOrderLedger>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub engine: Arc<TrustLevelEngine>,
    pub tokens: Arc<VerificationTokenService>,
    pub flow: EmailVerificationFlow,
}

impl TrustStack {
    pub fn new() -> Self {
        Self::with_config(TrustConfig::default())
    }

    pub fn with_config(config: TrustConfig) -> Self {
        let store = Arc::new(InMemoryTrustStore::new());
        let tokens_store = Arc::new(InMemoryTokenStore::new());
        let ledger = Arc::new(InMemoryOrderLedger::new());
        let clock = Arc::new(ManualClock::starting_now());
        let notifier = Arc::new(RecordingNotifier::new());

        let engine = Arc::new(TrustLevelEngine::new(
            store.clone(),
            ledger.clone(),
            config.clone(),
        ));
        let tokens = Arc::new(VerificationTokenService::new(
            tokens_store.clone(),
            clock.clone(),
            config,
        ));
        let flow = EmailVerificationFlow::new(tokens.clone(), engine.clone(), notifier.clone());

        Self {
            store,
            tokens_store,
            ledger,
            clock,
            notifier,
            engine,
            tokens,
            flow,
        }
    }

    /// Create an account row, as sign-up would.
    pub fn sign_up(&self, id: &str) -> AccountId {
        let account = AccountId::parse(id).unwrap();
        self.store.insert_account(&account, None, false);
        account
    }

    /// Create an account row with an explicit level.
    pub fn seed(&self, id: &str, level: TrustLevel, verified: bool) -> AccountId {
        let account = AccountId::parse(id).unwrap();
        self.store.insert_account(&account, Some(level), verified);
        account
    }
}

impl Default for TrustStack {
    fn default() -> Self {
        Self::new()
    }
}
