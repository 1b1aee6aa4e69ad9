//! Payload reporting subsystem.
//!
//! # Data Flow
//! ```text
//! LogEntry (built by the middleware)
//!     → spawn_report (detached tokio task)
//!     → PayloadReporter::send (client.rs: POST {host}/payload)
//!     → ReportResult { ok, status_code, body }
//!     → warn! on failure / info! on success, metrics counter
//! ```
//!
//! # Design Decisions
//! - `send` never fails; callers inspect `ok`
//! - The HTTP exchange never waits on a report task
//! - The reporter is a trait object so tests can swap in recording fakes

pub mod client;
pub mod entry;
pub mod minify;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::observability::metrics;

pub use client::HttpReporter;
pub use entry::{EntryType, LogEntry, PayloadContent};
pub use minify::minify_json;

/// Outcome of delivering one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResult {
    /// Whether the collector accepted the entry (2xx).
    pub ok: bool,
    /// Collector status code, absent when no response was received.
    pub status_code: Option<u16>,
    /// Raw collector response body, or the transport error text.
    pub body: String,
}

impl ReportResult {
    pub fn delivered(status_code: u16, body: String) -> Self {
        Self {
            ok: true,
            status_code: Some(status_code),
            body,
        }
    }

    pub fn rejected(status_code: u16, body: String) -> Self {
        Self {
            ok: false,
            status_code: Some(status_code),
            body,
        }
    }

    pub fn transport_error(error: &dyn std::error::Error) -> Self {
        Self {
            ok: false,
            status_code: None,
            body: error.to_string(),
        }
    }
}

/// Delivers log entries somewhere.
#[async_trait]
pub trait PayloadReporter: Send + Sync + fmt::Debug {
    /// Deliver one entry. Must not panic on unreachable or failing collectors.
    async fn send(&self, entry: &LogEntry) -> ReportResult;
}

/// Deliver `entry` on a background task and log the outcome locally.
///
/// The returned handle resolves to the report result; dropping it detaches
/// the task.
pub fn spawn_report(reporter: Arc<dyn PayloadReporter>, entry: LogEntry) -> JoinHandle<ReportResult> {
    tokio::spawn(async move {
        let result = reporter.send(&entry).await;
        metrics::record_report(entry.entry_type(), result.ok);

        if result.ok {
            tracing::info!(
                correlation_id = %entry.correlation_id(),
                entry_type = %entry.entry_type(),
                "Payload has been logged"
            );
        } else {
            tracing::warn!(
                correlation_id = %entry.correlation_id(),
                entry_type = %entry.entry_type(),
                status = ?result.status_code,
                error = %result.body,
                "Failed to write payload to collector"
            );
        }

        result
    })
}
