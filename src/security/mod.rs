//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request headers:
//!     → headers.rs (strip forwarding/edge headers, set host, default version)
//!     → keys.rs (split key pool, pick one key at random)
//!     → Pass to upstream
//! ```
//!
//! # Design Decisions
//! - No trust in client-supplied forwarding headers
//! - Credentials are never logged in full
//! - Malformed or empty key pools degrade to pass-through, never to an error

pub mod headers;
pub mod keys;
