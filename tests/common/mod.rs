//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use futures_util::{stream, StreamExt};
use keypool_proxy::config::ProxyConfig;
use keypool_proxy::{HttpServer, Shutdown};
use serde::Deserialize;
use tokio::net::TcpListener;

/// What the mock upstream saw, echoed back as JSON.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl Echo {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// SSE chunks served by `/v1/stream`.
#[allow(dead_code)]
pub const SSE_CHUNKS: [&str; 3] = [
    "event: message_start\ndata: {\"type\":\"message_start\"}\n\n",
    "event: content_block_delta\ndata: {\"delta\":{\"text\":\"Hi\"}}\n\n",
    "event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n",
];

async fn echo(request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in parts.headers.iter() {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        "access-control-allow-origin",
        "https://upstream.example".parse().unwrap(),
    );
    response_headers.insert("x-upstream", "mock".parse().unwrap());

    (
        response_headers,
        Json(serde_json::json!({
            "method": parts.method.as_str(),
            "uri": parts.uri.to_string(),
            "headers": headers,
            "body": String::from_utf8_lossy(&body),
        })),
    )
        .into_response()
}

async fn sse() -> Response {
    let chunks = stream::iter(SSE_CHUNKS).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, std::io::Error>(Bytes::from_static(chunk.as_bytes()))
    });
    (
        [("content-type", "text/event-stream")],
        Body::from_stream(chunks),
    )
        .into_response()
}

async fn overloaded() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [("access-control-allow-origin", "https://upstream.example")],
        r#"{"type":"error","error":{"type":"overloaded_error"}}"#,
    )
        .into_response()
}

async fn redirect() -> Response {
    (StatusCode::FOUND, [("location", "/v1/models")]).into_response()
}

/// Start the mock upstream on an ephemeral port.
pub async fn start_mock_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/v1/stream", any(sse))
        .route("/v1/overloaded", any(overloaded))
        .route("/v1/redirect", any(redirect))
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start an upstream that answers every request with a redirect to
/// `/v1/models` on `target`.
#[allow(dead_code)]
pub async fn start_redirecting_upstream(target: SocketAddr) -> SocketAddr {
    let location = format!("http://{target}/v1/models");
    let app = Router::new().fallback(move || {
        let location = location.clone();
        async move { (StatusCode::FOUND, [("location", location)]).into_response() }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Config pointing the proxy at a plain-HTTP upstream.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.host = upstream.to_string();
    config.upstream.scheme = "http".to_string();
    config
}

/// Start the proxy on an ephemeral port. Keep the returned [`Shutdown`]
/// alive for the duration of the test.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
