//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! capture / middleware / reporter
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Correlation id is attached as a field to every report log line
//! - Collector failures are warnings, never errors returned to callers

pub mod logging;
pub mod metrics;
