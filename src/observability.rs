//! Prometheus metrics for upstream calls and normalization
//!
//! The recorder is installed once per process; the handle is kept so the
//! server can render the exposition text on `/metrics`. Without an installed
//! recorder every macro below is a no-op, which is what tests rely on.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::{info, warn};

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub const UPSTREAM_REQUESTS_TOTAL: &str = "neo_upstream_requests_total";
pub const UPSTREAM_REQUEST_SECONDS: &str = "neo_upstream_request_seconds";
pub const RECORDS_NORMALIZED_TOTAL: &str = "neo_records_normalized_total";
pub const RECORDS_MALFORMED_TOTAL: &str = "neo_records_malformed_total";

/// Install the Prometheus recorder. Idempotent.
///
/// If another recorder already owns the global slot the handle stays unset
/// and [`render`] keeps returning `None`.
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }
    match HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder()) {
        Ok(_) => info!("Prometheus recorder installed"),
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Render the current exposition text, if metrics were initialized.
pub fn render() -> Option<String> {
    HANDLE.get().map(|h| h.render())
}

pub mod upstream {
    use super::*;

    pub fn request_completed(endpoint: &'static str, outcome: &'static str, elapsed: Duration) {
        metrics::counter!(UPSTREAM_REQUESTS_TOTAL, "endpoint" => endpoint, "outcome" => outcome)
            .increment(1);
        metrics::histogram!(UPSTREAM_REQUEST_SECONDS, "endpoint" => endpoint)
            .record(elapsed.as_secs_f64());
    }
}

pub mod normalize {
    use super::*;

    pub fn records_normalized(count: usize) {
        metrics::counter!(RECORDS_NORMALIZED_TOTAL).increment(count as u64);
    }

    pub fn records_malformed(count: usize) {
        metrics::counter!(RECORDS_MALFORMED_TOTAL).increment(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_none_when_recorder_slot_is_taken() {
        let _ = metrics::set_global_recorder(metrics::NoopRecorder);

        init_metrics();

        assert!(render().is_none());
    }
}
