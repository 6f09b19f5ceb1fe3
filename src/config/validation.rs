//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the upstream authority and every configured header
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::uri::Authority;
use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.host: {value:?} is not a valid host")]
    InvalidHost { value: String },

    #[error("upstream.scheme: unsupported scheme {value:?} (expected \"https\" or \"http\")")]
    UnsupportedScheme { value: String },

    #[error("{field}: {value:?} is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a valid header value")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("observability.log_level: {value:?} is not a valid log level")]
    InvalidLogLevel { value: String },
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    let upstream = &config.upstream;
    if upstream.host.is_empty() || upstream.host.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidHost {
            value: upstream.host.clone(),
        });
    }
    if upstream.scheme != "https" && upstream.scheme != "http" {
        errors.push(ValidationError::UnsupportedScheme {
            value: upstream.scheme.clone(),
        });
    }

    check_header_name(&mut errors, "upstream.key_header", &upstream.key_header);
    check_header_name(&mut errors, "upstream.version_header", &upstream.version_header);
    check_header_value(&mut errors, "upstream.default_version", &upstream.default_version);
    if let Some(content_type) = &upstream.default_content_type {
        check_header_value(&mut errors, "upstream.default_content_type", content_type);
    }

    check_header_value(&mut errors, "cors.allow_methods", &config.cors.allow_methods);
    check_header_value(&mut errors, "cors.allow_headers", &config.cors.allow_headers);

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel {
            value: config.observability.log_level.clone(),
        });
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header_name(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderName::from_bytes(value.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header_value(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        });
    }
}
