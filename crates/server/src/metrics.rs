//! Prometheus metrics

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use peer_support_core::Degradation;

use crate::state::AppState;

/// Install the global Prometheus recorder
///
/// Returns `None` when a recorder is already installed (e.g. in tests).
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            None
        },
    }
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!("peer_support_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_degradation(degradation: &Degradation) {
    metrics::counter!("peer_support_degradations_total", "kind" => degradation.kind())
        .increment(1);
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics disabled".to_string(),
        ),
    }
}
