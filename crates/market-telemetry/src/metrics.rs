//! Prometheus metrics for the trust subsystems.
//!
//! All metrics follow the naming convention: `market_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRUST ENGINE METRICS
    // =========================================================================

    /// Trust level writes by resulting level
    pub static ref TRUST_LEVEL_WRITES: CounterVec = CounterVec::new(
        Opts::new("market_trust_level_writes_total", "Trust level writes by resulting level"),
        &["level"]  // level: new/verified/established/trusted
    ).expect("metric creation failed");

    /// Verification tokens issued
    pub static ref TOKENS_ISSUED: Counter = Counter::new(
        "market_trust_tokens_issued_total",
        "Total verification tokens issued"
    ).expect("metric creation failed");

    /// Verification token redemptions by result
    pub static ref TOKEN_REDEMPTIONS: CounterVec = CounterVec::new(
        Opts::new("market_trust_token_redemptions_total", "Token redemption attempts"),
        &["result"]  // result: valid/invalid
    ).expect("metric creation failed");

    /// Best-effort notification delivery failures
    pub static ref NOTIFY_FAILURES: Counter = Counter::new(
        "market_trust_notify_failures_total",
        "Verification token deliveries that failed"
    ).expect("metric creation failed");

    // =========================================================================
    // GATEWAY METRICS
    // =========================================================================

    /// Gate decisions by outcome
    pub static ref GATE_DECISIONS: CounterVec = CounterVec::new(
        Opts::new("market_gateway_gate_decisions_total", "Trust gate decisions"),
        &["outcome"]  // outcome: admitted/forbidden/error
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless; already-registered collectors are
/// skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRUST_LEVEL_WRITES.clone()),
        Box::new(TOKENS_ISSUED.clone()),
        Box::new(TOKEN_REDEMPTIONS.clone()),
        Box::new(NOTIFY_FAILURES.clone()),
        Box::new(GATE_DECISIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
