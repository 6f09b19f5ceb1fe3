//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, pipeline handler)
//!     → cors.rs (preflight short-circuit)
//!     → security (header sanitizer, key rotation)
//!     → upstream (forward to the fixed host)
//!     → response.rs (relay, force allow-origin, or proxy_error)
//!     → Send to client
//! ```

pub mod cors;
pub mod response;
pub mod server;

pub use cors::CorsPolicy;
pub use server::{AppState, HttpServer};
