//! Metrics collection and exposition.
//!
//! # Metrics
//! - `supervisor_transport_starts_total` (counter): launches by transport, kind
//! - `supervisor_transport_exits_total` (counter): completions by transport, outcome
//! - `supervisor_transport_stop_failures_total` (counter): failed stops by transport
//! - `supervisor_admin_requests_total` (counter): admin requests by path, status
//!
//! # Design Decisions
//! - The Prometheus recorder is installed once per process; later calls
//!   reuse the same handle
//! - Admin paths outside the fixed routes collapse into one label value

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// A handle backed by a private recorder that is not installed globally.
///
/// Nothing recorded through the `metrics` macros reaches it, including the
/// supervisor's own counters, so its `/metrics` output stays empty.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

pub fn record_transport_start(transport: &str, kind: &'static str) {
    metrics::counter!(
        "supervisor_transport_starts_total",
        "transport" => transport.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_transport_exit(transport: &str, outcome: &'static str) {
    metrics::counter!(
        "supervisor_transport_exits_total",
        "transport" => transport.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_stop_failure(transport: &str) {
    metrics::counter!(
        "supervisor_transport_stop_failures_total",
        "transport" => transport.to_string()
    )
    .increment(1);
}

pub fn record_admin_request(path: &str, status: u16) {
    let path = match path {
        "/healthz" | "/metrics" => path.to_string(),
        _ => "other".to_string(),
    };
    metrics::counter!(
        "supervisor_admin_requests_total",
        "path" => path,
        "status" => status.to_string()
    )
    .increment(1);
}
