//! HTTP interception subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → middleware.rs (snapshot.rs: method/host/path/query/headers)
//!     → skip.rs (exact path match?) ── yes ──→ handler, untouched
//!     → capture request body → correlation id → Request entry → report task
//!     → inner handler chain
//!     → capture response body → Response entry (same id) → report task
//!     → restored response to client
//! ```
//!
//! server.rs hosts an application router behind this middleware.

pub mod middleware;
pub mod server;
pub mod skip;
pub mod snapshot;

pub use middleware::{payload_logging_middleware, PayloadLogger};
pub use server::HttpServer;
pub use skip::{SkipList, DEFAULT_SKIP_PATHS};
pub use snapshot::RequestSnapshot;
