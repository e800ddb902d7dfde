//! # Verification Tokens
//!
//! Single-use, time-bounded proof that an account holder controls a contact
//! identity (email). Tokens are random, URL-safe and never logged.
//!
//! ## Lifecycle
//!
//! ```text
//! issue ──► Pending ──redeem (before expiry)──► Consumed
//!              │
//!              └──(expires_at passes)──► inert (never validates, never consumed)
//! ```

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::identifier::AccountId;

/// Random bytes per token in the reference policy (256 bits).
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Minimum accepted entropy.
pub const MIN_TOKEN_BYTES: usize = 32;

/// Upper bound on token entropy. Also bounds the input accepted by
/// [`TokenValue::is_well_formed`].
pub const MAX_TOKEN_BYTES: usize = 128;

/// Opaque token string. Zeroized on drop, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct TokenValue(String);

impl TokenValue {
    /// Wrap a caller-supplied token (e.g. from a verification link).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw token. Use only for storage lookups and delivery.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the value could have been produced by [`generate_token_value`]
    /// under any accepted `token_bytes`: lowercase hex, even length, between
    /// [`MIN_TOKEN_BYTES`] and [`MAX_TOKEN_BYTES`] bytes.
    ///
    /// Independent of the configured size, so tokens issued before a
    /// `token_bytes` change stay redeemable until they expire.
    pub fn is_well_formed(&self) -> bool {
        let len = self.0.len();
        len % 2 == 0
            && (MIN_TOKEN_BYTES * 2..=MAX_TOKEN_BYTES * 2).contains(&len)
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenValue(***)")
    }
}

impl Serialize for TokenValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(TokenValue)
    }
}

/// Generate a token from the OS CSPRNG, hex encoded (URL-safe, `2 * bytes`
/// characters).
pub fn generate_token_value(bytes: usize) -> TokenValue {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    let value = TokenValue(hex::encode(&buf));
    buf.zeroize();
    value
}

/// A stored verification token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Token string.
    pub value: TokenValue,
    /// Account the token proves control for.
    pub account_id: AccountId,
    /// Issue time.
    pub created_at: DateTime<Utc>,
    /// First instant at which the token no longer validates.
    pub expires_at: DateTime<Utc>,
    /// Set irrevocably by a successful redeem.
    pub consumed: bool,
}

impl VerificationToken {
    /// Whether the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether a redeem at `now` may succeed.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired_at(now)
    }
}

/// Result of a redeem attempt.
///
/// "Expired" and "never existed" are deliberately indistinguishable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Redemption {
    /// Whether the token was valid and is now consumed.
    pub valid: bool,
    /// Bound account, present only when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl Redemption {
    /// Successful redemption.
    pub fn valid(account_id: AccountId) -> Self {
        Self {
            valid: true,
            account_id: Some(account_id),
        }
    }

    /// Failed redemption.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            account_id: None,
        }
    }
}
