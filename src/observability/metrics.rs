//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_observer_reloads_total` (counter): reconciliations by file, outcome
//! - `config_observer_reload_failures_total` (counter): failures by file, kind
//! - `config_observer_tracked_files` (gauge): registered files
//! - `config_observer_pass_duration_seconds` (histogram): full pass latency

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_reload(file: &str, outcome: &'static str) {
    counter!(
        "config_observer_reloads_total",
        "file" => file.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_reload_failure(file: &str, kind: &'static str) {
    counter!(
        "config_observer_reload_failures_total",
        "file" => file.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn set_tracked_files(count: usize) {
    gauge!("config_observer_tracked_files").set(count as f64);
}

pub fn record_pass_duration(secs: f64) {
    histogram!("config_observer_pass_duration_seconds").record(secs);
}
