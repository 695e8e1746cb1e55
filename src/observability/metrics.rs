//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): submissions by kind, status
//! - `gateway_request_duration_seconds` (histogram): handler latency by kind
//! - `gateway_rate_limited_total` (counter): rejections by policy
//! - `gateway_deliveries_total` (counter): outbound sends by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to bind is logged, not fatal: the gateway keeps serving
/// without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled submission request.
pub fn record_submission(kind: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

/// Record one rate-limited rejection.
pub fn record_rate_limited(policy: &'static str) {
    counter!("gateway_rate_limited_total", "policy" => policy).increment(1);
}

/// Record one outbound delivery attempt by outcome.
pub fn record_delivery(outcome: &'static str) {
    counter!("gateway_deliveries_total", "outcome" => outcome).increment(1);
}
