//! # Exploit Simulations
//!
//! Attacks against verification tokens, identifiers and trust writes.

pub mod identifier_injection;
pub mod redeem_race;
pub mod token_replay;
