//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and clients produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counters and latency histograms)
//!     → crate::trace (spans, exported over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Trace collector (OTLP/HTTP)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Trace id is logged with every classified failure
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod span_names;
