//! Request handlers of the two services.
//!
//! # Data Flow
//! ```text
//! client ──POST /zipcode──▶ entry.rs ──GET /zipcode?zipcode=──▶ resolution.rs
//!                                                                 → location provider
//!                                                                 → weather provider
//!                                                                 → unit conversion
//! client ◀── relayed result ── entry.rs ◀── composed result ──────┘
//! ```
//!
//! # Design Decisions
//! - Each handler owns its span chain; nothing trace-related is shared between requests
//! - Every request gets one deadline; all outbound calls run under it
//! - Failures are classified where they occur and passed up unchanged

pub mod entry;
pub mod resolution;

use axum::http::HeaderMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::error::PipelineError;
use crate::observability::span_names;
use crate::trace::{self, HeaderExtractor, SpanGuard, SpanKind, Tracer};

pub use entry::{EntryState, ResolutionClient};
pub use resolution::ResolutionState;

/// Failure while wiring a service from its configuration.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Tracing pieces every handler needs.
#[derive(Debug, Clone)]
pub struct Instrumentation {
    pub tracer: Tracer,
    pub request_label: Arc<str>,
    pub request_budget: Duration,
}

impl Instrumentation {
    pub fn new(config: &ServiceConfig, tracer: Tracer) -> Self {
        Self {
            tracer,
            request_label: Arc::from(config.telemetry.request_label.as_str()),
            request_budget: Duration::from_secs(config.timeouts.request_secs),
        }
    }

    /// Re-anchor the caller's trace in this process.
    ///
    /// Opens the handler span as a child of the inbound context (or as the
    /// root of a new trace) and records the receipt marker under it.
    pub fn accept(&self, headers: &HeaderMap, handler: &'static str) -> SpanGuard {
        let inbound = trace::extract(&HeaderExtractor(headers));
        let server = self.tracer.start_span(&inbound, handler, SpanKind::Server);
        self.tracer
            .start_span(
                server.context(),
                span_names::receipt(&self.request_label),
                SpanKind::Internal,
            )
            .end();
        server
    }

    /// Record the outcome of a request on its handler span and in the logs.
    pub fn conclude<T>(&self, server: &mut SpanGuard, result: &Result<T, PipelineError>) {
        let trace_id = server.span_context().trace_id();
        match result {
            Ok(_) => server.set_ok(),
            Err(e) => {
                server.record_error(e);
                server.set_attribute("error.kind", format!("{:?}", e.kind()));
                if e.status_code().is_server_error() {
                    tracing::error!(%trace_id, error = %e, "Request failed upstream");
                } else {
                    tracing::warn!(%trace_id, error = %e, "Request rejected");
                }
            }
        }
    }
}
