//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response: status, reason phrase, every header
//! - Force `Access-Control-Allow-Origin: *` over whatever upstream sent
//! - Render transport failures as a `proxy_error` JSON body
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body (SSE passes through as-is)
//! - Upstream 4xx/5xx are relayed, not reinterpreted

use axum::body::Body;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::ext::ReasonPhrase;
use serde::Serialize;

use crate::http::cors::ALLOW_ANY_ORIGIN;

/// Build the client-facing response from an upstream response.
pub fn rewrite_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let mut headers = upstream.headers().clone();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ANY_ORIGIN);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    response
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
}

/// `500` with `{"error":{"type":"proxy_error","message":...}}`.
pub fn proxy_error_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            kind: "proxy_error",
            message,
        },
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ANY_ORIGIN)],
        Json(body),
    )
        .into_response()
}
