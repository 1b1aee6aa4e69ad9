//! Error definitions for payload capture and entry construction.
//!
//! Collector delivery failures are deliberately absent: they are reported as
//! [`ReportResult`](crate::reporter::ReportResult) values and never abort a
//! request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that can occur while capturing payloads.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Reading the body stream failed.
    #[error("Failed to read {side} body: {source}")]
    BodyRead {
        side: &'static str,
        #[source]
        source: axum::Error,
    },

    /// Captured body is not valid UTF-8 text.
    #[error("{side} body is not valid UTF-8: {source}")]
    Decoding {
        side: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    /// An entry type name other than Request/Response was encountered.
    #[error("Invalid payload type: {0}")]
    InvalidEntryType(String),

    /// A correlation id was blank.
    #[error("Correlation id must not be blank")]
    InvalidCorrelationId,

    /// Payload content could not be serialized.
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collector HTTP client could not be built.
    #[error("Failed to build collector client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for payload operations.
pub type PayloadResult<T> = Result<T, PayloadError>;

impl IntoResponse for PayloadError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        tracing::error!(error = %self, status = %status, "Payload capture failed");
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PayloadError::InvalidCorrelationId;
        assert_eq!(err.to_string(), "Correlation id must not be blank");

        let err = PayloadError::InvalidEntryType("Trace".into());
        assert_eq!(err.to_string(), "Invalid payload type: Trace");
    }

    #[test]
    fn test_status_mapping() {
        let bytes = vec![0xffu8, 0xfe];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let decoding = PayloadError::Decoding {
            side: "request",
            source,
        };
        assert_eq!(
            decoding.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
