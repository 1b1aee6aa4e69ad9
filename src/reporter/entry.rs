//! Log entry model shipped to the collector.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::correlation::CorrelationId;
use crate::error::{PayloadError, PayloadResult};

/// Which side of the exchange an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryType {
    Request,
    Response,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Request => "Request",
            EntryType::Response => "Response",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Request" => Ok(EntryType::Request),
            "Response" => Ok(EntryType::Response),
            other => Err(PayloadError::InvalidEntryType(other.to_string())),
        }
    }
}

/// Headers, query string and body captured for one side of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadContent {
    /// Minified body text.
    pub body: String,
    /// Request headers at capture time.
    pub headers: BTreeMap<String, String>,
    /// Raw query string including its leading `?`, or empty.
    pub query: String,
}

/// One record delivered to the collector.
///
/// Built only through [`LogEntry::request`] and [`LogEntry::response`], so a
/// status code can never appear on a request entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    source: String,
    entry_type: EntryType,
    serialized_payload: String,
    correlation_id: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_status_code: Option<u16>,
}

impl LogEntry {
    pub fn request(
        source: String,
        content: &PayloadContent,
        correlation_id: CorrelationId,
    ) -> PayloadResult<Self> {
        Ok(Self {
            source,
            entry_type: EntryType::Request,
            serialized_payload: serde_json::to_string(content)?,
            correlation_id,
            response_status_code: None,
        })
    }

    pub fn response(
        source: String,
        content: &PayloadContent,
        correlation_id: CorrelationId,
        status_code: u16,
    ) -> PayloadResult<Self> {
        Ok(Self {
            source,
            entry_type: EntryType::Response,
            serialized_payload: serde_json::to_string(content)?,
            correlation_id,
            response_status_code: Some(status_code),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn serialized_payload(&self) -> &str {
        &self.serialized_payload
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn response_status_code(&self) -> Option<u16> {
        self.response_status_code
    }
}
