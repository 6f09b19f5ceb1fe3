//! HTTP client for the fixed upstream.

use axum::body::{Body, HttpBody};
use axum::http::uri::{Authority, Scheme};
use axum::http::{HeaderMap, Method, Uri};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{Error, ForwardError};

/// Scheme and authority every request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub scheme: Scheme,
    pub authority: Authority,
}

impl UpstreamTarget {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, Error> {
        Ok(Self {
            scheme: config.scheme.parse()?,
            authority: config.host.parse()?,
        })
    }

    /// Upstream URL for an inbound URI, keeping its path and query verbatim.
    pub fn url_for(&self, uri: &Uri) -> Result<Url, ForwardError> {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        let url = Url::parse(&format!(
            "{}://{}{}",
            self.scheme, self.authority, path_and_query
        ))?;
        Ok(url)
    }
}

/// Sends sanitized requests to the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    target: UpstreamTarget,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client. Redirects are followed with reqwest's default policy;
    /// environment proxy settings are ignored.
    pub fn new(target: UpstreamTarget) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::default())
            .no_proxy()
            .build()?;
        Ok(Self { target, http })
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Forward one request. The body is passed through as a stream.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        body: Body,
    ) -> Result<reqwest::Response, ForwardError> {
        let url = self.target.url_for(uri)?;

        tracing::debug!(method = %method, url = %url, "Forwarding request upstream");

        let mut request = self.http.request(method, url).headers(headers);
        if !body.is_end_stream() {
            request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> UpstreamTarget {
        UpstreamTarget::from_config(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn keeps_path_and_query_verbatim() {
        let uri: Uri = "/v1/messages?x=1&beta=true".parse().unwrap();
        let url = target().url_for(&uri).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.anthropic.com/v1/messages?x=1&beta=true"
        );
    }

    #[test]
    fn replaces_inbound_authority() {
        let uri: Uri = "http://proxy.example:8080/v1/models".parse().unwrap();
        let url = target().url_for(&uri).unwrap();
        assert_eq!(url.as_str(), "https://api.anthropic.com/v1/models");
    }

    #[test]
    fn bare_root_maps_to_slash() {
        let url = target().url_for(&Uri::from_static("/")).unwrap();
        assert_eq!(url.path(), "/");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn honours_configured_scheme_and_port() {
        let target = UpstreamTarget::from_config(&UpstreamConfig {
            host: "127.0.0.1:9000".into(),
            scheme: "http".into(),
            ..UpstreamConfig::default()
        })
        .unwrap();
        let url = target.url_for(&Uri::from_static("/v1/complete?stream=1")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1/complete?stream=1");
    }
}
