//! # Trust Levels
//!
//! Ordinal classification of an account's standing.
//!
//! `New(1) < Verified(2) < Established(3) < Trusted(4)`. Access checks always
//! compare with `>=` against a required minimum.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TrustError;

/// Account trust level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustLevel {
    /// Freshly seen account, nothing proven.
    #[default]
    New = 1,
    /// Control of the contact identity (email) has been proven.
    Verified = 2,
    /// At least one completed order.
    Established = 3,
    /// Sustained completed-order history.
    Trusted = 4,
}

impl TrustLevel {
    /// All levels in ascending order.
    pub const ALL: [TrustLevel; 4] = [
        TrustLevel::New,
        TrustLevel::Verified,
        TrustLevel::Established,
        TrustLevel::Trusted,
    ];

    /// Storage ordinal (1-4).
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    /// Convert a raw ordinal, failing for anything outside 1-4.
    pub fn from_ordinal(value: i64) -> Result<Self, TrustError> {
        match value {
            1 => Ok(TrustLevel::New),
            2 => Ok(TrustLevel::Verified),
            3 => Ok(TrustLevel::Established),
            4 => Ok(TrustLevel::Trusted),
            other => Err(TrustError::InvalidTrustLevel(other)),
        }
    }

    /// Lowercase label used in metrics.
    pub fn label(self) -> &'static str {
        match self {
            TrustLevel::New => "new",
            TrustLevel::Verified => "verified",
            TrustLevel::Established => "established",
            TrustLevel::Trusted => "trusted",
        }
    }

    /// Whether this level satisfies `required`.
    pub fn satisfies(self, required: TrustLevel) -> bool {
        self >= required
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrustLevel::New => "NEW",
            TrustLevel::Verified => "VERIFIED",
            TrustLevel::Established => "ESTABLISHED",
            TrustLevel::Trusted => "TRUSTED",
        };
        f.write_str(name)
    }
}

impl TryFrom<i64> for TrustLevel {
    type Error = TrustError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_ordinal(value)
    }
}

impl std::str::FromStr for TrustLevel {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NEW" => Ok(TrustLevel::New),
            "VERIFIED" => Ok(TrustLevel::Verified),
            "ESTABLISHED" => Ok(TrustLevel::Established),
            "TRUSTED" => Ok(TrustLevel::Trusted),
            _ => s
                .parse::<i64>()
                .map_err(|_| TrustError::InvalidTrustLevel(0))
                .and_then(TrustLevel::from_ordinal),
        }
    }
}
