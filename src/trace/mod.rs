//! Distributed tracing on OpenTelemetry.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → propagation.rs (W3C extract, or an empty context for a new trace)
//!     → tracer.rs (open spans as children of the active context)
//!     → span.rs (SpanGuard; ends on drop)
//!     → provider.rs (batch OTLP/HTTP export to the collector)
//!
//! outbound call:
//!     span context → propagation.rs (inject) → request headers
//! ```
//!
//! # Design Decisions
//! - The tracer is an explicit value handed to every handler and client; nothing
//!   is registered with `opentelemetry::global`
//! - Parent-based sampling: unsampled callers still get ids propagated
//! - The provider is flushed once the server has drained

pub mod propagation;
pub mod provider;
pub mod span;
pub mod tracer;

pub use opentelemetry::trace::SpanKind;
pub use opentelemetry::Context;
pub use propagation::{extract, inject, HeaderExtractor, HeaderInjector, TRACEPARENT};
pub use provider::{otlp_provider, simple_provider};
pub use span::SpanGuard;
pub use tracer::Tracer;
