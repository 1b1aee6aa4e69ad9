//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the payload
//! logger. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for payload logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayloadLoggingConfig {
    /// Base URL of the remote collector (e.g., "https://payloads.internal").
    pub payload_logging_host: String,

    /// Comma-separated list of paths that are never logged, merged into the
    /// default skip set.
    pub ignore_payload_urls: String,

    /// Largest request or response body that will be logged, in bytes.
    /// Larger bodies are still served in full; only their entry is skipped.
    pub max_body_bytes: usize,

    /// Collector client settings.
    pub reporter: ReporterConfig,

    /// Listener configuration for the hosting server.
    pub listener: ListenerConfig,

    /// Timeout configuration for the hosting server.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for PayloadLoggingConfig {
    fn default() -> Self {
        Self {
            payload_logging_host: String::new(),
            ignore_payload_urls: String::new(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            reporter: ReporterConfig::default(),
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Collector HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Total time allowed for one report call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for served requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format for local logs.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
