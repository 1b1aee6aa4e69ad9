//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PayloadLoggingConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `payload_logging_host`.
pub const ENV_PAYLOAD_LOGGING_HOST: &str = "PAYLOAD_LOGGING_HOST";
/// Overrides `ignore_payload_urls`.
pub const ENV_IGNORE_PAYLOAD_URLS: &str = "IGNORE_PAYLOAD_URLS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PayloadLoggingConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse configuration text without validating it.
pub fn parse_config(content: &str) -> Result<PayloadLoggingConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
///
/// Blank values are ignored so an exported-but-empty variable does not wipe
/// out the file setting.
pub fn apply_env_overrides<F>(config: &mut PayloadLoggingConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_PAYLOAD_LOGGING_HOST).filter(|v| !v.trim().is_empty()) {
        tracing::debug!(host = %host, "Collector host overridden from environment");
        config.payload_logging_host = host;
    }
    if let Some(urls) = lookup(ENV_IGNORE_PAYLOAD_URLS).filter(|v| !v.trim().is_empty()) {
        tracing::debug!(urls = %urls, "Ignored payload urls overridden from environment");
        config.ignore_payload_urls = urls;
    }
}
