//! Metrics collection and exposition.
//!
//! # Metrics
//! - `imageproxy_jobs_total` (counter, by outcome): completed jobs
//! - `imageproxy_cache_hits_total` / `imageproxy_cache_misses_total`
//! - `imageproxy_cache_entries` (gauge): current cache size
//! - `imageproxy_in_flight_keys` (gauge): keys being computed
//! - `imageproxy_stage_duration_seconds` (histogram, by stage)
//! - `imageproxy_persist_failures_total` (counter)
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the macros)
//! - Prometheus exposition on its own listener, separate from traffic

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

pub fn record_job_outcome(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("imageproxy_jobs_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_hit() {
    counter!("imageproxy_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("imageproxy_cache_misses_total").increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("imageproxy_cache_entries").set(entries as f64);
}

pub fn record_in_flight(keys: usize) {
    gauge!("imageproxy_in_flight_keys").set(keys as f64);
}

pub fn record_stage_duration(stage: &'static str, duration: Duration) {
    histogram!("imageproxy_stage_duration_seconds", "stage" => stage).record(duration.as_secs_f64());
}

pub fn record_persist_failure() {
    counter!("imageproxy_persist_failures_total").increment(1);
}
