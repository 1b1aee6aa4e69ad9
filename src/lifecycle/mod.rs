//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → init tracing/metrics → HttpServer::run
//!
//! Shutdown (shutdown.rs):
//!     trigger() → ShutdownSignal::recv resolves → server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → caller triggers graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
