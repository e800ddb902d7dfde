//! # Domain Entities
//!
//! Trust attributes of an account as read from storage.

use serde::{Deserialize, Serialize};

use super::trust_level::TrustLevel;

/// Trust attributes stored for one account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRecord {
    /// Explicitly stored level; `None` when the column is unset.
    pub level: Option<TrustLevel>,
    /// Whether the account has proven control of its contact identity.
    pub verified: bool,
    /// Whether any account row exists at all.
    pub exists: bool,
}

impl TrustRecord {
    /// Record for an account the store has never seen: provisionally NEW.
    pub fn absent() -> Self {
        Self {
            level: Some(TrustLevel::New),
            verified: false,
            exists: false,
        }
    }

    /// Record for an existing account row.
    pub fn stored(level: Option<TrustLevel>, verified: bool) -> Self {
        Self {
            level,
            verified,
            exists: true,
        }
    }

    /// Effective level: the stored level if set, otherwise VERIFIED for a
    /// verified account, otherwise NEW.
    ///
    /// Derived on every call; never persisted.
    pub fn effective_level(&self) -> TrustLevel {
        match self.level {
            Some(level) => level,
            None if self.verified => TrustLevel::Verified,
            None => TrustLevel::New,
        }
    }
}
