//! Key-rotating reverse proxy for a single upstream API host.
//!
//! Each request carries a pool of credentials in one header; the proxy picks
//! one at random, rewrites the headers the upstream cares about, streams the
//! request through and relays the response with permissive CORS headers.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{Error, ForwardError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
