//! # Integration Tests
//!
//! Flows across the trust engine, token service and gateway.

pub mod gate_flows;
