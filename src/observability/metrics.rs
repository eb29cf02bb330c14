//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status, route
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_fragment_fetches_total` (counter): upstream fetches by status
//! - `gateway_fragment_fetch_duration_seconds` (histogram): per-fetch latency
//! - `gateway_multiplex_total` (counter): aggregate calls by outcome
//! - `gateway_multiplex_duration_seconds` (histogram): aggregate latency by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until a
//!   recorder is installed
//! - The Prometheus exporter is only installed by the binary

use std::net::SocketAddr;
use std::time::{Duration, Instant};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let (method, status, route) = (method.to_string(), status.to_string(), route.to_string());
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "route" => route.clone()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "status" => status,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_fragment_fetch(status: u16, duration: Duration) {
    metrics::counter!("gateway_fragment_fetches_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("gateway_fragment_fetch_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_multiplex(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("gateway_multiplex_total", "outcome" => outcome).increment(1);
    metrics::histogram!("gateway_multiplex_duration_seconds", "outcome" => outcome).record(elapsed.as_secs_f64());
}
