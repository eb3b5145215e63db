//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event; the request ID flows through dispatch
//! - Traffic metrics are tagged with the host identity
//! - Metric updates are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use metrics::TrafficReporter;
