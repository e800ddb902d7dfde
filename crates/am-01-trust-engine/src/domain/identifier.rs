//! # External Identifier Validation
//!
//! Account identifiers are issued by the external identity provider and
//! reach this subsystem from outside the process. They must be validated
//! before they touch storage or authorization logic.
//!
//! Canonical format: 36 characters, hex digits (either case) grouped
//! 8-4-4-4-12 and separated by hyphens.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TrustError;

/// Total length of a canonical identifier.
pub const IDENTIFIER_LEN: usize = 36;

/// Hyphen positions in the 8-4-4-4-12 grouping.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Longest prefix of a rejected identifier echoed back in errors.
const MAX_ECHO_LEN: usize = 48;

/// Returns true iff `id` is a hyphenated UUID in 8-4-4-4-12 grouping.
///
/// Braced, URN and hyphen-less forms are rejected even though they denote
/// the same UUID.
pub fn is_valid_identifier(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != IDENTIFIER_LEN {
        return false;
    }

    bytes.iter().enumerate().all(|(i, b)| {
        if HYPHEN_POSITIONS.contains(&i) {
            *b == b'-'
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

/// A validated external account identifier.
///
/// Only constructible through [`AccountId::parse`], so holding one proves the
/// value passed [`is_valid_identifier`]. The original casing is preserved
/// because the store keys on the provider's exact string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Validate and wrap an identifier.
    pub fn parse(id: &str) -> Result<Self, TrustError> {
        if is_valid_identifier(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(TrustError::InvalidIdentifier(echo(id)))
        }
    }

    /// Borrow the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Bounded, escaped copy of a rejected value for error messages and logs.
fn echo(id: &str) -> String {
    let truncated: String = id.chars().take(MAX_ECHO_LEN).collect();
    truncated.escape_debug().to_string()
}
