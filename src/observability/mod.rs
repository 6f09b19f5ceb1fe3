//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages produce:
//!     → logging.rs (structured log events, per-request TraceLayer spans)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Credentials appear only as a masked suffix
//! - Metrics are process-wide aggregates; nothing is tracked per key

pub mod logging;
pub mod metrics;
