//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http middleware / handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (rewrite and request counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the edge to the origin and back
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
