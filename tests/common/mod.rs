//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use payload_logging::lifecycle::Shutdown;
use payload_logging::{HttpServer, PayloadLoggingConfig};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A collector that answers every POST /payload with `status` and forwards
/// the received entry to the returned channel.
pub async fn start_mock_collector(status: u16) -> (SocketAddr, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let status = StatusCode::from_u16(status).unwrap();

    let app = Router::new()
        .route(
            "/payload",
            post(
                move |State(tx): State<mpsc::UnboundedSender<Value>>, Json(entry): Json<Value>| async move {
                    let _ = tx.send(entry);
                    (status, "collector says hi")
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, rx)
}

/// Application routes used behind the payload logger.
pub fn demo_app() -> Router {
    Router::new()
        .route(
            "/orders",
            post(|_body: Bytes| async { (StatusCode::CREATED, "{\"ok\":true}") }),
        )
        .route("/echo", post(|body: Bytes| async move { body }))
        .route("/health/live", get(|| async { "live" }))
        .route("/health/ready", get(|| async { "ready" }))
        .layer(DefaultBodyLimit::disable())
}

pub fn config_for(collector: SocketAddr) -> PayloadLoggingConfig {
    PayloadLoggingConfig {
        payload_logging_host: format!("http://{}", collector),
        ignore_payload_urls: "/metrics".into(),
        ..Default::default()
    }
}

/// Start `server` on an ephemeral port and return its address.
pub async fn spawn_server(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });
    addr
}

pub async fn recv_entry(rx: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("collector did not receive an entry in time")
        .expect("collector channel closed")
}

/// Receive the two entries of one exchange, ordered (request, response).
pub async fn recv_exchange(rx: &mut mpsc::UnboundedReceiver<Value>) -> (Value, Value) {
    let first = recv_entry(rx).await;
    let second = recv_entry(rx).await;
    if first["entryType"] == "Request" {
        (first, second)
    } else {
        (second, first)
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
