//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_relay_cycles_total` (counter): cycles by trigger and outcome
//!   (`success`, `failure`, `expired`)
//! - `health_relay_cycle_duration_seconds` (histogram): cycle latency by trigger
//! - `health_relay_read_failures_total` (counter): reader failures by metric
//! - `health_relay_relay_failures_total` (counter): relay failures by error kind
//! - `health_relay_grants_total` (counter): grant completions seen by the host
//!   (`success`, `failure`, `dropped`)

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::MetricKind;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished cycle and record its duration.
pub fn record_cycle(trigger: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("health_relay_cycles_total", "trigger" => trigger, "outcome" => outcome).increment(1);
    metrics::histogram!("health_relay_cycle_duration_seconds", "trigger" => trigger).record(elapsed.as_secs_f64());
}

/// Count a cycle abandoned at grant expiry.
pub fn record_cycle_expired(trigger: &'static str) {
    metrics::counter!("health_relay_cycles_total", "trigger" => trigger, "outcome" => "expired").increment(1);
}

/// Count a failed metric read.
pub fn record_read_failure(kind: MetricKind) {
    metrics::counter!("health_relay_read_failures_total", "metric" => kind.as_str()).increment(1);
}

/// Count a failed relay, labelled with the error kind.
pub fn record_relay_failure(kind: &'static str) {
    metrics::counter!("health_relay_relay_failures_total", "kind" => kind).increment(1);
}

/// Count a grant outcome seen by the host.
pub fn record_grant(outcome: &'static str) {
    metrics::counter!("health_relay_grants_total", "outcome" => outcome).increment(1);
}
