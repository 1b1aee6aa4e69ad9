//! Metrics collection and exposition.
//!
//! # Metrics
//! - `payload_reports_total` (counter): reports by entry type and outcome
//! - `payload_skipped_total` (counter): exchanges matched by the skip list
//! - `payload_captured_bytes_total` (counter): captured body bytes by side
//! - `payload_oversized_total` (counter): bodies over the capture limit by side
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::reporter::EntryType;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_report(entry_type: EntryType, ok: bool) {
    let outcome = if ok { "success" } else { "failure" };
    counter!("payload_reports_total", "type" => entry_type.as_str(), "outcome" => outcome)
        .increment(1);
}

pub fn record_skipped() {
    counter!("payload_skipped_total").increment(1);
}

pub fn record_captured_bytes(entry_type: EntryType, bytes: usize) {
    counter!("payload_captured_bytes_total", "type" => entry_type.as_str())
        .increment(bytes as u64);
}

pub fn record_oversized(entry_type: EntryType) {
    counter!("payload_oversized_total", "type" => entry_type.as_str()).increment(1);
}
