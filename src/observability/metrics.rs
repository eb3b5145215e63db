//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rpc_requests_total` (counter): dispatched requests by host, procedure,
//!   status
//! - `rpc_request_duration_seconds` (histogram): dispatch latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Process-wide; hosts call this once before starting modules. Failure to
/// install is logged, not fatal: modules serve without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(
                "rpc_requests_total",
                "Total RPC requests dispatched, by host, procedure and status"
            );
            metrics::describe_histogram!(
                "rpc_request_duration_seconds",
                "RPC dispatch latency in seconds"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Reports traffic volume and latency, tagged with the host identity.
///
/// The dispatcher records through this seam rather than emitting metrics
/// directly, so hosts can attribute traffic per process.
#[derive(Debug, Clone)]
pub struct TrafficReporter {
    host: String,
}

impl TrafficReporter {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Record one dispatched request.
    pub fn record_request(&self, procedure: &str, status: u16, start: Instant) {
        let labels = [
            ("host", self.host.clone()),
            ("procedure", procedure.to_string()),
            ("status", status.to_string()),
        ];
        metrics::counter!("rpc_requests_total", &labels).increment(1);
        metrics::histogram!("rpc_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        // The metrics crate no-ops when no recorder is installed.
        let reporter = TrafficReporter::new("test-host");
        reporter.record_request("echo", 200, Instant::now());
    }
}
