//! Body capture and replay.
//!
//! # Responsibilities
//! - Drain a request or response body into a pooled buffer
//! - Decode the captured bytes as UTF-8 text
//! - Rebuild the message with an identical body for its real consumer
//!
//! # Design Decisions
//! - Message parts (method, URI, headers, extensions, status) are never touched
//! - Decoding failures are errors; there is no lossy fallback
//! - The capture limit bounds logging only: an oversized body is handed back
//!   whole, as the bytes already read followed by the unread rest of the stream

use axum::{
    body::Body,
    http::{Request, Response},
};
use bytes::Bytes;
use futures_util::{future, stream, StreamExt};

use crate::capture::pool::BufferPool;
use crate::error::{PayloadError, PayloadResult};

/// A materialized copy of one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedBody {
    /// Exact bytes read from the stream.
    pub bytes: Bytes,
    /// The same bytes decoded as UTF-8.
    pub text: String,
}

impl CapturedBody {
    fn decode(raw: &[u8], side: &'static str) -> PayloadResult<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|source| PayloadError::Decoding { side, source })?
            .to_owned();

        Ok(Self {
            bytes: Bytes::copy_from_slice(raw),
            text,
        })
    }

    /// Whether the body was empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of capturing one message.
#[derive(Debug)]
pub enum Captured<M> {
    /// The whole body was read; the message carries an identical copy.
    Full(M, CapturedBody),
    /// The body exceeded the capture limit and was not materialized.
    Oversized(M),
}

enum Drained {
    Full(CapturedBody),
    Oversized(Body),
}

/// Captures bodies through a shared [`BufferPool`].
#[derive(Debug, Clone)]
pub struct BodyCapture {
    pool: BufferPool,
    max_body_bytes: usize,
}

impl BodyCapture {
    pub fn new(pool: BufferPool, max_body_bytes: usize) -> Self {
        Self {
            pool,
            max_body_bytes,
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Capture a request body and hand back a request that still carries it.
    pub async fn capture_request(
        &self,
        request: Request<Body>,
    ) -> PayloadResult<Captured<Request<Body>>> {
        let (parts, body) = request.into_parts();
        Ok(match self.drain(body, "request").await? {
            Drained::Full(captured) => {
                let restored = Request::from_parts(parts, Body::from(captured.bytes.clone()));
                Captured::Full(restored, captured)
            }
            Drained::Oversized(body) => Captured::Oversized(Request::from_parts(parts, body)),
        })
    }

    /// Capture a response body and hand back a response that still carries it.
    pub async fn capture_response(
        &self,
        response: Response<Body>,
    ) -> PayloadResult<Captured<Response<Body>>> {
        let (parts, body) = response.into_parts();
        Ok(match self.drain(body, "response").await? {
            Drained::Full(captured) => {
                let restored = Response::from_parts(parts, Body::from(captured.bytes.clone()));
                Captured::Full(restored, captured)
            }
            Drained::Oversized(body) => Captured::Oversized(Response::from_parts(parts, body)),
        })
    }

    async fn drain(&self, body: Body, side: &'static str) -> PayloadResult<Drained> {
        // Released back to the pool on every exit path.
        let mut buffer = self.pool.acquire();
        let mut rest = body.into_data_stream();

        while let Some(chunk) = rest.next().await {
            let chunk = chunk.map_err(|source| PayloadError::BodyRead { side, source })?;
            buffer.extend_from_slice(&chunk);

            if buffer.len() > self.max_body_bytes {
                let head = Bytes::copy_from_slice(&buffer);
                let replay = stream::once(future::ready(Ok::<_, axum::Error>(head))).chain(rest);
                return Ok(Drained::Oversized(Body::from_stream(replay)));
            }
        }

        CapturedBody::decode(&buffer, side).map(Drained::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use futures_util::stream;

    fn capture() -> BodyCapture {
        BodyCapture::new(BufferPool::default(), 1024)
    }

    fn full<M>(captured: Captured<M>) -> (M, CapturedBody) {
        match captured {
            Captured::Full(message, body) => (message, body),
            Captured::Oversized(_) => panic!("body unexpectedly over the limit"),
        }
    }

    fn oversized<M>(captured: Captured<M>) -> M {
        match captured {
            Captured::Oversized(message) => message,
            Captured::Full(..) => panic!("body unexpectedly captured"),
        }
    }

    #[tokio::test]
    async fn test_request_body_restored() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders?id=5")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"a\": 1}"))
            .unwrap();

        let (restored, captured) = full(capture().capture_request(request).await.unwrap());
        assert_eq!(captured.text, "{\"a\": 1}");
        assert_eq!(restored.method(), Method::POST);
        assert_eq!(restored.uri().query(), Some("id=5"));
        assert_eq!(restored.headers()[header::CONTENT_TYPE], "application/json");

        let replayed = axum::body::to_bytes(restored.into_body(), usize::MAX).await.unwrap();
        assert_eq!(replayed, captured.bytes);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (restored, captured) = full(capture().capture_request(request).await.unwrap());

        assert!(captured.is_empty());
        assert_eq!(captured.text, "");
        let replayed = axum::body::to_bytes(restored.into_body(), usize::MAX).await.unwrap();
        assert!(replayed.is_empty());
    }

    #[tokio::test]
    async fn test_streamed_response_restored() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"{\"ok\":")),
            Ok(Bytes::from_static(b"true}")),
        ];
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let (restored, captured) = full(capture().capture_response(response).await.unwrap());
        assert_eq!(captured.text, "{\"ok\":true}");
        assert_eq!(restored.status(), StatusCode::CREATED);

        let replayed = axum::body::to_bytes(restored.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&replayed[..], b"{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let request = Request::builder()
            .uri("/upload")
            .body(Body::from(vec![0xc3u8, 0x28]))
            .unwrap();

        let err = capture().capture_request(request).await.unwrap_err();
        assert!(matches!(err, PayloadError::Decoding { side: "request", .. }));
    }

    #[tokio::test]
    async fn test_oversized_request_replayed_whole() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"abc")),
            Ok(Bytes::from_static(b"defg")),
            Ok(Bytes::from_static(b"hij")),
        ];
        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let pool = BufferPool::default();
        let small = BodyCapture::new(pool.clone(), 4);
        let restored = oversized(small.capture_request(request).await.unwrap());
        assert_eq!(restored.method(), Method::POST);
        assert_eq!(pool.idle_count(), 1);

        let replayed = axum::body::to_bytes(restored.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&replayed[..], b"abcdefghij");
    }

    #[tokio::test]
    async fn test_oversized_response_replayed_whole() {
        let big = "x".repeat(64);
        let response = Response::builder()
            .status(StatusCode::OK)
            .body(Body::from(big.clone()))
            .unwrap();

        let small = BodyCapture::new(BufferPool::default(), 16);
        let restored = oversized(small.capture_response(response).await.unwrap());
        assert_eq!(restored.status(), StatusCode::OK);

        let replayed = axum::body::to_bytes(restored.into_body(), usize::MAX).await.unwrap();
        assert_eq!(replayed, big.as_bytes());
    }

    #[tokio::test]
    async fn test_body_at_limit_is_captured() {
        let exact = BodyCapture::new(BufferPool::default(), 4);
        let request = Request::builder().uri("/").body(Body::from("four")).unwrap();

        let (_, captured) = full(exact.capture_request(request).await.unwrap());
        assert_eq!(captured.text, "four");
    }

    #[tokio::test]
    async fn test_stream_error_propagated() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let request = Request::builder()
            .uri("/")
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let pool = BufferPool::default();
        let capture = BodyCapture::new(pool.clone(), 1024);
        let err = capture.capture_request(request).await.unwrap_err();
        assert!(matches!(err, PayloadError::BodyRead { side: "request", .. }));
        // The buffer still went back to the pool.
        assert_eq!(pool.idle_count(), 1);
    }
}
