//! Correlation id resolution.
//!
//! # Data Flow
//! ```text
//! Request phase:
//!     X-PB-CorrelationId header (non-blank) → used verbatim
//!     otherwise → "{UTC yyyyMMddHHmmssfff}-{minified request body length}"
//!
//! Response phase:
//!     id from the request phase, reused as-is
//!     skipped request → no id → response not logged
//! ```
//!
//! # Known Limitations
//! - The synthesized id is not unique: two requests with the same body
//!   length inside the same millisecond get the same id.

pub mod clock;

use std::fmt;

use axum::http::{HeaderMap, HeaderName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PayloadError, PayloadResult};

pub use clock::{Clock, FixedClock, SystemClock};

/// Header that lets callers supply their own correlation id.
pub const X_PB_CORRELATION_ID: &str = "X-PB-CorrelationId";

static CORRELATION_HEADER: HeaderName = HeaderName::from_static("x-pb-correlationid");

/// `chrono` format of the timestamp part of a synthesized id.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Opaque, non-blank id linking a request entry to its response entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap an existing id. Blank values are rejected.
    pub fn new(value: impl Into<String>) -> PayloadResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PayloadError::InvalidCorrelationId);
        }
        Ok(Self(value))
    }

    /// Build the fallback id from a timestamp and the request body length.
    pub fn synthesize(at: DateTime<Utc>, body_len: usize) -> Self {
        Self(format!("{}-{}", at.format(TIMESTAMP_FORMAT), body_len))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CorrelationId {
    type Error = PayloadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}

/// Read a caller-supplied id from the correlation header, if any.
pub fn from_headers(headers: &HeaderMap) -> Option<CorrelationId> {
    headers
        .get(&CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| CorrelationId::new(v).ok())
}

/// Resolve the id for a request entry.
///
/// `logged_body` is the body as it appears in the entry payload (minified).
pub fn resolve(headers: &HeaderMap, logged_body: &str, clock: &dyn Clock) -> CorrelationId {
    from_headers(headers)
        .unwrap_or_else(|| CorrelationId::synthesize(clock.now(), logged_body.chars().count()))
}
