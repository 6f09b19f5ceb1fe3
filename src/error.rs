//! Error types.
//!
//! [`ForwardError`] is the only failure a request can hit; it is rendered
//! once at the pipeline boundary as a `proxy_error` JSON response.
//! [`Error`] covers startup: configuration, client construction, sockets
//! and the metrics exporter.

use axum::http::header::{InvalidHeaderName, InvalidHeaderValue};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::response::proxy_error_response;

/// Startup and serving errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid header in configuration: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("invalid header value in configuration: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("invalid upstream target: {0}")]
    Target(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to deliver a request to the upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream url: {0}")]
    InvalidTarget(#[from] url::ParseError),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ForwardError {
    /// Human-readable message including the underlying causes.
    pub fn message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        proxy_error_response(&self.message())
    }
}
