//! Payload logging middleware.
//!
//! # Responsibilities
//! - Snapshot request metadata and consult the skip list
//! - Capture and restore the request body, resolve the correlation id
//! - Run the inner handler chain
//! - Capture and restore the response body
//! - Build Request/Response entries and hand them to background report tasks
//!
//! # Design Decisions
//! - Strictly sequential per exchange: request phase, handler, response phase
//! - Report tasks are spawned and never awaited by the exchange
//! - Capture failures fail the exchange; report failures only warn
//! - Bodies over the capture limit are served untouched and not reported

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::capture::{BodyCapture, BufferPool, Captured, CapturedBody};
use crate::config::PayloadLoggingConfig;
use crate::correlation::{self, Clock, CorrelationId, SystemClock};
use crate::error::PayloadResult;
use crate::http::skip::SkipList;
use crate::http::snapshot::RequestSnapshot;
use crate::observability::metrics;
use crate::reporter::{self, EntryType, HttpReporter, LogEntry, PayloadReporter};

/// Shared middleware state.
///
/// Cheap to clone; every clone shares the skip list, reporter and buffer pool.
#[derive(Clone)]
pub struct PayloadLogger {
    skip_list: Arc<SkipList>,
    reporter: Arc<dyn PayloadReporter>,
    capture: BodyCapture,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for PayloadLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadLogger")
            .field("skip_list", &self.skip_list)
            .field("reporter", &self.reporter)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl PayloadLogger {
    /// Build a logger that reports to the configured collector over HTTP.
    pub fn from_config(config: &PayloadLoggingConfig) -> PayloadResult<Self> {
        let reporter = HttpReporter::from_config(config)?;
        tracing::info!(endpoint = %reporter.endpoint(), "Payload reporter configured");
        Ok(Self::new(config, Arc::new(reporter)))
    }

    /// Build a logger around any reporter.
    pub fn new(config: &PayloadLoggingConfig, reporter: Arc<dyn PayloadReporter>) -> Self {
        let skip_list = SkipList::from_config_value(&config.ignore_payload_urls);
        tracing::debug!(paths = ?skip_list.paths(), "Payload skip list loaded");

        Self {
            skip_list: Arc::new(skip_list),
            reporter,
            capture: BodyCapture::new(BufferPool::default(), config.max_body_bytes),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_skip_list(mut self, skip_list: SkipList) -> Self {
        self.skip_list = Arc::new(skip_list);
        self
    }

    pub fn skip_list(&self) -> &SkipList {
        &self.skip_list
    }

    /// Run one exchange through both logging phases.
    pub async fn handle(&self, request: Request, next: Next) -> PayloadResult<Response> {
        let snapshot = RequestSnapshot::capture(&request);

        let (request, correlation_id) = self.log_request(&snapshot, request).await?;
        let response = next.run(request).await;
        self.log_response(&snapshot, correlation_id.as_ref(), response).await
    }

    /// Request phase. Returns the request to forward and, unless the path is
    /// skipped, the correlation id for the response phase.
    pub async fn log_request(
        &self,
        snapshot: &RequestSnapshot,
        request: Request,
    ) -> PayloadResult<(Request, Option<CorrelationId>)> {
        if self.skip_list.contains(&snapshot.path) {
            tracing::trace!(path = %snapshot.path, "Payload logging skipped");
            metrics::record_skipped();
            return Ok((request, None));
        }

        let (request, body) = match self.capture.capture_request(request).await? {
            Captured::Full(request, body) => (request, body),
            Captured::Oversized(request) => {
                self.skip_oversized(snapshot, EntryType::Request);
                return Ok((request, None));
            }
        };

        let content = snapshot.payload(&body.text);
        let correlation_id =
            correlation::resolve(&snapshot.headers, &content.body, self.clock.as_ref());

        let entry = LogEntry::request(snapshot.source(), &content, correlation_id.clone())?;
        self.dispatch(entry, &body, snapshot);

        Ok((request, Some(correlation_id)))
    }

    /// Response phase. Always returns the response to send to the client.
    pub async fn log_response(
        &self,
        snapshot: &RequestSnapshot,
        correlation_id: Option<&CorrelationId>,
        response: Response,
    ) -> PayloadResult<Response> {
        let correlation_id = match correlation_id {
            Some(id) if !self.skip_list.contains(&snapshot.path) => id,
            _ => return Ok(response),
        };

        let (response, body) = match self.capture.capture_response(response).await? {
            Captured::Full(response, body) => (response, body),
            Captured::Oversized(response) => {
                self.skip_oversized(snapshot, EntryType::Response);
                return Ok(response);
            }
        };
        let entry = LogEntry::response(
            snapshot.source(),
            &snapshot.payload(&body.text),
            correlation_id.clone(),
            response.status().as_u16(),
        )?;
        self.dispatch(entry, &body, snapshot);

        Ok(response)
    }

    fn skip_oversized(&self, snapshot: &RequestSnapshot, entry_type: EntryType) {
        tracing::warn!(
            source = %snapshot.source(),
            entry_type = %entry_type,
            limit = self.capture.max_body_bytes(),
            "Body exceeds capture limit, payload not logged"
        );
        metrics::record_oversized(entry_type);
    }

    fn dispatch(&self, entry: LogEntry, body: &CapturedBody, snapshot: &RequestSnapshot) {
        metrics::record_captured_bytes(entry.entry_type(), body.bytes.len());

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                correlation_id = %entry.correlation_id(),
                entry_type = %entry.entry_type(),
                source = %entry.source(),
                headers = ?snapshot.header_map(),
                status = ?entry.response_status_code(),
                body = %body.text,
                "Payload captured"
            );
        }

        reporter::spawn_report(Arc::clone(&self.reporter), entry);
    }
}

/// Axum middleware function; install with
/// `axum::middleware::from_fn_with_state(logger, payload_logging_middleware)`.
pub async fn payload_logging_middleware(
    State(logger): State<PayloadLogger>,
    request: Request,
    next: Next,
) -> PayloadResult<Response> {
    logger.handle(request, next).await
}
