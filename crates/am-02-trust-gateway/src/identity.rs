//! Request extensions exchanged with the surrounding stack.

use am_01_trust_engine::{AccountId, TrustLevel};
use serde::Serialize;

/// Identity established by the upstream session layer.
///
/// The subject is the identity provider's raw user id. It is not trusted
/// until the gate validates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Provider user id.
    pub subject: String,
}

impl AuthenticatedIdentity {
    /// Wrap a provider user id.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Attached by the gate to every admitted request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrustContext {
    /// Validated account identifier.
    pub account_id: AccountId,
    /// Effective level at admission time.
    pub level: TrustLevel,
}
