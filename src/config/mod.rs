//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PAYLOAD_LOGGING_HOST, IGNORE_PAYLOAD_URLS)
//!     → validation.rs (semantic checks)
//!     → PayloadLoggingConfig (validated, immutable)
//!     → handed to PayloadLogger / HttpServer constructors
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - No process-wide state: every logger instance owns its configuration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, PayloadLoggingConfig, ReporterConfig,
    TimeoutConfig,
};
