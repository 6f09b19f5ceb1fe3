//! Header sanitization for outbound requests.
//!
//! # Responsibilities
//! - Strip headers that describe the client-facing hop (forwarding chain,
//!   edge-platform client IP, hop-by-hop headers)
//! - Drop the inbound `host`; the client derives it from each request URL,
//!   so redirects to another authority are addressed correctly
//! - Supplement the API version header without overriding the client's
//!
//! # Design Decisions
//! - Never trust existing X-Forwarded-* from the inbound side; they are removed
//! - Header values are resolved once at startup, never re-parsed per request

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::UpstreamConfig;
use crate::error::Error;

/// Headers injected by the front-line network that would look like routing
/// artifacts to the upstream.
pub const STRIPPED_HEADERS: &[&str] = &[
    "host",
    "x-forwarded-host",
    "cf-connecting-ip",
    "cf-ipcountry",
    "x-real-ip",
    "x-forwarded-for",
    "x-forwarded-proto",
];

/// Connection-scoped headers that only apply to the inbound hop.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Resolved header rewrite rules for the configured upstream.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    key_header: HeaderName,
    version_header: HeaderName,
    default_version: HeaderValue,
    default_content_type: Option<HeaderValue>,
}

impl HeaderPolicy {
    /// Resolve header names and values from a validated upstream config.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, Error> {
        Ok(Self {
            key_header: HeaderName::from_bytes(config.key_header.as_bytes())?,
            version_header: HeaderName::from_bytes(config.version_header.as_bytes())?,
            default_version: HeaderValue::from_str(&config.default_version)?,
            default_content_type: config
                .default_content_type
                .as_deref()
                .map(HeaderValue::from_str)
                .transpose()?,
        })
    }

    /// The header carrying the credential pool.
    pub fn key_header(&self) -> &HeaderName {
        &self.key_header
    }

    /// Rewrite inbound headers in place so they can be sent upstream.
    pub fn sanitize(&self, headers: &mut HeaderMap) {
        for name in STRIPPED_HEADERS.iter().chain(HOP_BY_HOP_HEADERS) {
            headers.remove(*name);
        }

        if !headers.contains_key(&self.version_header) {
            headers.insert(self.version_header.clone(), self.default_version.clone());
        }

        if let Some(content_type) = &self.default_content_type {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, content_type.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HeaderPolicy {
        HeaderPolicy::from_config(&UpstreamConfig::default()).unwrap()
    }

    fn inbound(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn strips_forwarding_and_edge_headers() {
        let mut headers = inbound(&[
            ("x-forwarded-for", "203.0.113.9"),
            ("x-forwarded-for", "10.0.0.1"),
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "proxy.example"),
            ("x-real-ip", "203.0.113.9"),
            ("cf-connecting-ip", "203.0.113.9"),
            ("cf-ipcountry", "NL"),
            ("accept", "application/json"),
        ]);

        policy().sanitize(&mut headers);

        for name in STRIPPED_HEADERS {
            assert!(!headers.contains_key(*name), "{name} should be stripped");
        }
        assert_eq!(headers.get("accept").unwrap(), "application/json");
    }

    #[test]
    fn drops_hop_by_hop_headers() {
        let mut headers = inbound(&[
            ("connection", "keep-alive"),
            ("keep-alive", "timeout=5"),
            ("transfer-encoding", "chunked"),
            ("upgrade", "websocket"),
            ("content-length", "12"),
        ]);

        policy().sanitize(&mut headers);

        for name in HOP_BY_HOP_HEADERS {
            assert!(!headers.contains_key(*name), "{name} should be dropped");
        }
        assert_eq!(headers.get("content-length").unwrap(), "12");
    }

    #[test]
    fn inbound_host_is_not_forwarded() {
        let mut headers = inbound(&[("host", "proxy.example:8080")]);
        policy().sanitize(&mut headers);
        assert!(!headers.contains_key(axum::http::header::HOST));
    }

    #[test]
    fn version_defaulted_only_when_absent() {
        let mut headers = HeaderMap::new();
        policy().sanitize(&mut headers);
        assert_eq!(headers.get("anthropic-version").unwrap(), "2023-06-01");

        let mut headers = inbound(&[("Anthropic-Version", "2024-10-22")]);
        policy().sanitize(&mut headers);
        assert_eq!(headers.get("anthropic-version").unwrap(), "2024-10-22");
    }

    #[test]
    fn content_type_default_is_opt_in() {
        let mut headers = HeaderMap::new();
        policy().sanitize(&mut headers);
        assert!(!headers.contains_key(CONTENT_TYPE));

        let policy = HeaderPolicy::from_config(&UpstreamConfig {
            default_content_type: Some("application/json".into()),
            ..UpstreamConfig::default()
        })
        .unwrap();

        let mut headers = HeaderMap::new();
        policy.sanitize(&mut headers);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let mut headers = inbound(&[("content-type", "text/plain")]);
        policy.sanitize(&mut headers);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn credential_header_is_left_for_the_key_selector() {
        let mut headers = inbound(&[("x-api-key", "sk-1,sk-2")]);
        policy().sanitize(&mut headers);
        assert_eq!(headers.get(policy().key_header()).unwrap(), "sk-1,sk-2");
    }
}
