//! # Market Telemetry
//!
//! Observability for the Artisan-Market trust subsystems.
//!
//! ## Components
//!
//! - Structured logs via `tracing-subscriber` (JSON or pretty)
//! - Prometheus counters for trust decisions and token lifecycle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MARKET_SERVICE_NAME` | `artisan-market` | Service name in logs |
//! | `MARKET_LOG_LEVEL` | `info` | Log level filter |
//! | `MARKET_JSON_LOGS` | `false` | JSON log output |

#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, GATE_DECISIONS, NOTIFY_FAILURES, TOKENS_ISSUED,
    TOKEN_REDEMPTIONS, TRUST_LEVEL_WRITES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics. Call once at process start.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(&config)
}
