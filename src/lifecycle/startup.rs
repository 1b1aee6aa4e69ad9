//! Startup orchestration for processes embedding the payload logger.
//!
//! # Responsibilities
//! - Install the tracing subscriber
//! - Start the metrics exporter when enabled
//!
//! # Design Decisions
//! - Fail fast on subscriber errors; a metrics failure is logged and ignored

use std::net::SocketAddr;

use tracing_subscriber::util::TryInitError;

use crate::config::PayloadLoggingConfig;
use crate::observability::{logging, metrics};

/// Initialize process-wide observability from configuration.
pub fn init_observability(config: &PayloadLoggingConfig) -> Result<(), TryInitError> {
    logging::init_tracing(&config.observability)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    tracing::info!(
        collector = %config.payload_logging_host,
        ignore_payload_urls = %config.ignore_payload_urls,
        "Payload logging initialized"
    );
    Ok(())
}
