//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the pipeline handler
//! - Wire up middleware (tracing, forced allow-origin)
//! - Bind server to listener and shut down gracefully
//! - Run each request through: preflight → liveness → sanitize → key
//!   rotation → forward → rewrite

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, LivenessConfig, ProxyConfig};
use crate::error::Error;
use crate::http::cors::{CorsPolicy, ALLOW_ANY_ORIGIN};
use crate::http::response::rewrite_response;
use crate::observability::metrics;
use crate::security::headers::HeaderPolicy;
use crate::security::keys::rotate_key;
use crate::upstream::{UpstreamClient, UpstreamTarget};

/// Application state injected into handlers. Immutable for the process
/// lifetime; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub headers: Arc<HeaderPolicy>,
    pub cors: Arc<CorsPolicy>,
    pub liveness: Arc<LivenessConfig>,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Resolve a validated configuration into request-ready policies.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, Error> {
        let target = UpstreamTarget::from_config(&config.upstream)?;
        Ok(Self {
            headers: Arc::new(HeaderPolicy::from_config(&config.upstream)?),
            cors: Arc::new(CorsPolicy::from_config(&config.cors)?),
            liveness: Arc::new(config.liveness.clone()),
            upstream: UpstreamClient::new(target)?,
        })
    }
}

/// HTTP server for the key-rotating proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, Error> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let state = AppState::from_config(&config)?;

        tracing::info!(
            upstream = %state.upstream.target().authority,
            scheme = %state.upstream.target().scheme,
            key_header = %state.headers.key_header(),
            "Upstream configured"
        );

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                ALLOW_ANY_ORIGIN,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();

    if CorsPolicy::is_preflight(&method) {
        tracing::debug!(path = %request.uri().path(), "Answering preflight");
        metrics::record_preflight();
        return state.cors.preflight_response();
    }

    if state.liveness.enabled
        && request.uri().path() == "/"
        && (method == Method::GET || method == Method::HEAD)
    {
        tracing::debug!("Liveness probe");
        return state.liveness.message.clone().into_response();
    }

    let (parts, body) = request.into_parts();
    let mut headers = parts.headers;
    state.headers.sanitize(&mut headers);
    if let Some(selection) = rotate_key(&mut headers, state.headers.key_header()) {
        metrics::record_key_pool(selection.pool_size);
    }

    match state
        .upstream
        .forward(method.clone(), &parts.uri, headers, body)
        .await
    {
        Ok(upstream) => {
            metrics::record_request(method.as_str(), upstream.status().as_u16(), start_time);
            rewrite_response(upstream)
        }
        Err(e) => {
            tracing::error!(method = %method, path = %parts.uri.path(), error = %e.message(), "Upstream error");
            metrics::record_upstream_error();
            metrics::record_request(method.as_str(), 500, start_time);
            e.into_response()
        }
    }
}
