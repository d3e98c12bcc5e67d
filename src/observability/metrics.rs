//! Metrics collection and exposition.
//!
//! # Metrics
//! - `zipcode_requests_total` (counter): requests by service and status
//! - `zipcode_request_duration_seconds` (histogram): handler latency by service
//!
//! # Design Decisions
//! - The recorder is installed by the binary only; without it the macros are no-ops
//! - Exposition piggybacks on the service router at `/metrics`

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the process-wide Prometheus recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Record one finished request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "zipcode_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("zipcode_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Middleware recording status and latency of every request.
pub async fn track_requests(
    State(service): State<&'static str>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    record_request(service, response.status().as_u16(), start);
    response
}

/// Handler for `GET /metrics`.
pub async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
