//! Metrics collection.
//!
//! # Metrics
//! - `client_attempts_total` (counter): attempts by service, outcome
//! - `client_attempt_duration_seconds` (histogram): per-attempt latency
//! - `client_backoffs_total` (counter): backoff waits by service
//! - `client_calls_total` (counter): logical calls by service, result
//! - `client_call_duration_seconds` (histogram): end-to-end call latency
//! - `client_health_probes_total` (counter): probes by service, healthy
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host process picks the exporter
//! - Without an installed recorder every call is a no-op

use std::time::Duration;

pub fn record_attempt(service: &str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "client_attempts_total",
        "service" => service.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("client_attempt_duration_seconds", "service" => service.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_backoff(service: &str) {
    metrics::counter!("client_backoffs_total", "service" => service.to_string()).increment(1);
}

pub fn record_call(service: &str, success: bool, elapsed: Duration) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(
        "client_calls_total",
        "service" => service.to_string(),
        "result" => result
    )
    .increment(1);
    metrics::histogram!("client_call_duration_seconds", "service" => service.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_health_probe(service: &str, healthy: bool) {
    metrics::counter!(
        "client_health_probes_total",
        "service" => service.to_string(),
        "healthy" => if healthy { "true" } else { "false" }
    )
    .increment(1);
}
