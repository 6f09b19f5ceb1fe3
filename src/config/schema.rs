//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the key-rotating proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream host and the headers it requires.
    pub upstream: UpstreamConfig,

    /// Cross-origin response settings.
    pub cors: CorsConfig,

    /// Static liveness response on `/`.
    pub liveness: LivenessConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream target and header rewrite settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (host, optionally with port).
    pub host: String,

    /// URL scheme used to reach the upstream. Only "https" and "http" are accepted.
    pub scheme: String,

    /// Header holding the comma-delimited key pool.
    pub key_header: String,

    /// Header identifying the upstream API version.
    pub version_header: String,

    /// Value sent in `version_header` when the client does not supply one.
    pub default_version: String,

    /// Content type injected when the client omits one.
    pub default_content_type: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: "api.anthropic.com".to_string(),
            scheme: "https".to_string(),
            key_header: "x-api-key".to_string(),
            version_header: "anthropic-version".to_string(),
            default_version: "2023-06-01".to_string(),
            default_content_type: None,
        }
    }
}

/// Cross-origin settings for preflight responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Methods`.
    pub allow_methods: String,

    /// Value of `Access-Control-Allow-Headers`.
    pub allow_headers: String,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allow_headers: "*".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Liveness response settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Answer `GET /` locally instead of forwarding it.
    pub enabled: bool,

    /// Plain-text body of the liveness response.
    pub message: String,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            message: "Key balancer is running.".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
