//! # Domain Module
//!
//! Core domain types for trust escalation and identity verification.

pub mod config;
pub mod entities;
pub mod errors;
pub mod identifier;
pub mod token;
pub mod trust_level;

pub use config::{ConfigError, TrustConfig};
pub use entities::TrustRecord;
pub use errors::{NotifyError, StoreError, TrustError, TOKEN_SUBJECT};
pub use identifier::{is_valid_identifier, AccountId, IDENTIFIER_LEN};
pub use token::{
    generate_token_value, Redemption, TokenValue, VerificationToken, DEFAULT_TOKEN_BYTES,
    MAX_TOKEN_BYTES, MIN_TOKEN_BYTES,
};
pub use trust_level::TrustLevel;
