//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Collector host must be an absolute http(s) URL
//! - Value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PayloadLoggingConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::PayloadLoggingConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &PayloadLoggingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.payload_logging_host.trim().is_empty() {
        errors.push(ValidationError::new(
            "payload_logging_host",
            "collector host is required",
        ));
    } else {
        match url::Url::parse(&config.payload_logging_host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "payload_logging_host",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "payload_logging_host",
                format!("invalid URL '{}': {}", config.payload_logging_host, e),
            )),
        }
    }

    if config.max_body_bytes == 0 {
        errors.push(ValidationError::new("max_body_bytes", "must be greater than 0"));
    }
    if config.reporter.timeout_secs == 0 {
        errors.push(ValidationError::new("reporter.timeout_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address '{}'", config.listener.bind_address),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PayloadLoggingConfig {
        PayloadLoggingConfig {
            payload_logging_host: "http://collector.local".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let errors = validate_config(&PayloadLoggingConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "payload_logging_host");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.payload_logging_host = "ftp://collector".into();
        config.max_body_bytes = 0;
        config.reporter.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["payload_logging_host", "max_body_bytes", "reporter.timeout_secs"]
        );
        assert!(errors[0].to_string().contains("ftp"));
    }
}
