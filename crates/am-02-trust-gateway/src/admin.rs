//! Operational endpoints: liveness and Prometheus scrape.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use market_telemetry::encode_metrics;
use tracing::error;

/// Router exposing `/health` and `/metrics`.
pub fn admin_router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics() -> impl IntoResponse {
    match encode_metrics() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
