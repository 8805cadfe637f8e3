//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by method, status
//! - `site_request_duration_seconds` (histogram): latency distribution
//! - `site_rate_limited_total` (counter): 429s by limiter scope
//! - `site_gate_rejections_total` (counter): gate 403s by reason
//! - `site_contact_submissions_total` (counter): submissions by outcome
//!
//! # Design Decisions
//! - Low-overhead updates through the `metrics` facade (atomic operations)
//! - Prometheus exposition on a separate listener, off by default
//! - Recording is a no-op until an exporter is installed, so library code
//!   can record unconditionally

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "site_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("site_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a rate-limited request.
pub fn record_rate_limited(scope: &'static str) {
    metrics::counter!("site_rate_limited_total", "scope" => scope).increment(1);
}

/// Record a security-gate rejection.
pub fn record_gate_rejection(reason: &'static str) {
    metrics::counter!("site_gate_rejections_total", "reason" => reason).increment(1);
}

/// Record a contact submission outcome.
pub fn record_contact_submission(outcome: &'static str) {
    metrics::counter!("site_contact_submissions_total", "outcome" => outcome).increment(1);
}
