//! Request metadata captured before the handler runs.
//!
//! The snapshot is taken once per exchange and feeds both the request and
//! the response entry, so the response entry reports the *request* headers
//! and query string.

use std::collections::BTreeMap;

use axum::{
    extract::OriginalUri,
    http::{header, HeaderMap, Method, Request, Uri},
};

use crate::reporter::{minify_json, PayloadContent};

/// Owned copy of the request line and headers.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub host: String,
    pub path: String,
    /// Raw query including its leading `?`, or empty.
    pub query: String,
    pub headers: HeaderMap,
}

impl RequestSnapshot {
    pub fn capture<B>(request: &Request<B>) -> Self {
        // Nested routers rewrite the URI; log what the client sent.
        let uri: &Uri = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or_else(|| request.uri());

        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        Self {
            method: request.method().clone(),
            host,
            path: uri.path().to_owned(),
            query: uri.query().map(|q| format!("?{q}")).unwrap_or_default(),
            headers: request.headers().clone(),
        }
    }

    /// `"{METHOD}: {host}{path}{query}"`.
    pub fn source(&self) -> String {
        format!("{}: {}{}{}", self.method, self.host, self.path, self.query)
    }

    /// Headers flattened to one string per name; repeated values are joined.
    pub fn header_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in &self.headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            match map.get_mut(name.as_str()) {
                Some(existing) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => {
                    map.insert(name.as_str().to_owned(), value.into_owned());
                }
            }
        }
        map
    }

    /// Payload content for one side of the exchange.
    pub fn payload(&self, body_text: &str) -> PayloadContent {
        PayloadContent {
            body: minify_json(body_text),
            headers: self.header_map(),
            query: self.query.clone(),
        }
    }
}
