//! Cross-origin handling.
//!
//! Every response leaves the proxy with `Access-Control-Allow-Origin: *`.
//! Preflight requests are answered locally and never reach the upstream.

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::Response;

use crate::config::CorsConfig;
use crate::error::Error;

pub const ALLOW_ANY_ORIGIN: HeaderValue = HeaderValue::from_static("*");

/// Resolved preflight response headers.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, Error> {
        Ok(Self {
            allow_methods: HeaderValue::from_str(&config.allow_methods)?,
            allow_headers: HeaderValue::from_str(&config.allow_headers)?,
            max_age: HeaderValue::from(config.max_age_secs),
        })
    }

    /// Any OPTIONS request is treated as a preflight, whatever its path.
    pub fn is_preflight(method: &Method) -> bool {
        method == Method::OPTIONS
    }

    /// `204 No Content` granting every origin and header.
    pub fn preflight_response(&self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ANY_ORIGIN);
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        response
    }
}
