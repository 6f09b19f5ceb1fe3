//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! sanitized parts (method, uri, headers) + inbound body
//!     → client.rs (build upstream URL, stream body, send)
//!     → reqwest::Response handed to the response rewriter
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream, fixed at startup
//! - No retries and no timeout beyond the client's defaults
//! - Bodies are streamed in both directions, never buffered

pub mod client;

pub use client::{UpstreamClient, UpstreamTarget};
