//! # Trust Engine Configuration
//!
//! Token policy, order-count thresholds and store deadlines.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::token::{DEFAULT_TOKEN_BYTES, MAX_TOKEN_BYTES, MIN_TOKEN_BYTES};
use super::trust_level::TrustLevel;

/// Trust engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Lifetime of a verification token.
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
    /// Random bytes per token (hex encoded, so the token is twice as long).
    pub token_bytes: usize,
    /// Deadline applied to each store or ledger call.
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
    /// Completed orders needed for ESTABLISHED.
    pub established_threshold: u64,
    /// Completed orders needed for TRUSTED.
    pub trusted_threshold: u64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(24 * 60 * 60),
            token_bytes: DEFAULT_TOKEN_BYTES,
            store_timeout: Duration::from_secs(5),
            established_threshold: 1,
            trusted_threshold: 5,
        }
    }
}

impl TrustConfig {
    /// Defaults overridden by environment variables.
    ///
    /// - `MARKET_TOKEN_TTL_SECS`
    /// - `MARKET_STORE_TIMEOUT_MS`
    /// - `MARKET_ESTABLISHED_ORDERS`
    /// - `MARKET_TRUSTED_ORDERS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(secs) = env_number("MARKET_TOKEN_TTL_SECS")? {
            config.token_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = env_number("MARKET_STORE_TIMEOUT_MS")? {
            config.store_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = env_number("MARKET_ESTABLISHED_ORDERS")? {
            config.established_threshold = n;
        }
        if let Some(n) = env_number("MARKET_TRUSTED_ORDERS")? {
            config.trusted_threshold = n;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "token_ttl cannot be 0".into(),
            ));
        }

        if self.store_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "store_timeout cannot be 0".into(),
            ));
        }

        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(ConfigError::WeakTokens {
                bytes: self.token_bytes,
                min: MIN_TOKEN_BYTES,
            });
        }

        if self.token_bytes > MAX_TOKEN_BYTES {
            return Err(ConfigError::Invalid(format!(
                "token_bytes {} above maximum {MAX_TOKEN_BYTES}",
                self.token_bytes
            )));
        }

        if self.established_threshold == 0
            || self.trusted_threshold <= self.established_threshold
        {
            return Err(ConfigError::InvalidThresholds {
                established: self.established_threshold,
                trusted: self.trusted_threshold,
            });
        }

        Ok(())
    }

    /// Level implied by a completed-order count.
    ///
    /// With the defaults: `0 → VERIFIED`, `1..=4 → ESTABLISHED`, `>=5 → TRUSTED`.
    pub fn level_for_completed_orders(&self, count: u64) -> TrustLevel {
        if count >= self.trusted_threshold {
            TrustLevel::Trusted
        } else if count >= self.established_threshold {
            TrustLevel::Established
        } else {
            TrustLevel::Verified
        }
    }
}

fn env_number(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key}={raw:?} is not a number"))),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Token entropy below the minimum
    #[error("token_bytes {bytes} below minimum {min}")]
    WeakTokens {
        /// Configured bytes
        bytes: usize,
        /// Required minimum
        min: usize,
    },
    /// Order thresholds out of order
    #[error("invalid thresholds: established={established}, trusted={trusted}")]
    InvalidThresholds {
        /// ESTABLISHED threshold
        established: u64,
        /// TRUSTED threshold
        trusted: u64,
    },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
