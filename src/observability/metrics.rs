//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_rewrites_total` (counter): rewrites by kind (file, route) and
//!   whether a tenant was resolved
//! - `edge_requests_total` (counter): forwarded requests by method, status
//! - `edge_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - `metrics` facade: recording is a no-op until an exporter is installed
//! - Tenant names are not labels (unbounded cardinality)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Rewrite;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one routing decision.
pub fn record_rewrite(rewrite: &Rewrite) {
    let scope = if rewrite.tenant.is_some() { "tenant" } else { "production" };
    counter!(
        "edge_rewrites_total",
        "kind" => rewrite.kind.as_str(),
        "scope" => scope
    )
    .increment(1);
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("edge_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
