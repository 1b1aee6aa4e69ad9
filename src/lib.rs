//! HTTP payload logging middleware.
//!
//! Captures every inbound request and outbound response body, links the two
//! with a correlation id and ships both to a remote collector, without
//! changing what the handler or the client sees.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ ┌──────────────────────── http::middleware ────────────────────────┐
//!              │  snapshot ─▶ skip list ─▶ capture (request) ─▶ correlation id     │
//!              │                                   │                                │
//!              │                                   ▼                                │
//!              │                          reporter::spawn_report ──────────────────┼──▶ Collector
//!              │                                   │                                │    POST {host}/payload
//!              │                              inner handlers                        │
//!              │                                   │                                │
//!              │                      capture (response) ─▶ spawn_report ──────────┼──▶
//!   Client ◀── └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use axum::{routing::post, middleware::from_fn_with_state, Router};
//! use payload_logging::{payload_logging_middleware, PayloadLogger, PayloadLoggingConfig};
//!
//! # fn build() -> Result<Router, payload_logging::PayloadError> {
//! let config = PayloadLoggingConfig {
//!     payload_logging_host: "http://collector:9000".into(),
//!     ignore_payload_urls: "/metrics".into(),
//!     ..Default::default()
//! };
//! let logger = PayloadLogger::from_config(&config)?;
//! let app = Router::new()
//!     .route("/orders", post(|| async { "created" }))
//!     .layer(from_fn_with_state(logger, payload_logging_middleware));
//! # Ok(app)
//! # }
//! ```

// Core subsystems
pub mod capture;
pub mod correlation;
pub mod http;
pub mod reporter;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::PayloadLoggingConfig;
pub use correlation::{CorrelationId, X_PB_CORRELATION_ID};
pub use error::{PayloadError, PayloadResult};
pub use http::{payload_logging_middleware, HttpServer, PayloadLogger, SkipList};
pub use lifecycle::Shutdown;
pub use reporter::{EntryType, HttpReporter, LogEntry, PayloadReporter, ReportResult};
