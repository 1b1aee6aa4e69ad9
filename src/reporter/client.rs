//! HTTP delivery of log entries to the collector.
//!
//! # Responsibilities
//! - POST each entry as JSON to `{host}/payload`
//! - Turn every outcome (success, non-2xx, network error) into a `ReportResult`
//!
//! # Design Decisions
//! - Timeouts live on the `reqwest::Client`, configured once
//! - No retries; a lost entry only costs a warning

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{PayloadLoggingConfig, ReporterConfig};
use crate::error::PayloadResult;
use crate::reporter::{LogEntry, PayloadReporter, ReportResult};

/// Path segment appended to the collector host.
pub const METHOD_NAME: &str = "payload";

/// Collector client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReporter {
    /// Create a reporter posting to `{host}/payload`.
    pub fn new(host: &str, config: &ReporterConfig) -> PayloadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(host),
        })
    }

    pub fn from_config(config: &PayloadLoggingConfig) -> PayloadResult<Self> {
        Self::new(&config.payload_logging_host, &config.reporter)
    }

    /// Full URL entries are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(host: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), METHOD_NAME)
}

#[async_trait]
impl PayloadReporter for HttpReporter {
    async fn send(&self, entry: &LogEntry) -> ReportResult {
        let response = match self.client.post(&self.endpoint).json(entry).send().await {
            Ok(response) => response,
            Err(e) => return ReportResult::transport_error(&e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => e.to_string(),
        };

        if status.is_success() {
            ReportResult::delivered(status.as_u16(), body)
        } else {
            ReportResult::rejected(status.as_u16(), body)
        }
    }
}
