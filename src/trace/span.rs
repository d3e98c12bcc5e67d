//! The guard that guarantees a span is ended.

use std::borrow::Cow;
use std::fmt;

use opentelemetry::trace::{SpanContext, SpanKind, Status, TraceContextExt, Tracer as _};
use opentelemetry::{Context, KeyValue, Value};
use opentelemetry_sdk::trace::Tracer as SdkTracer;

/// Status description of a span dropped before it recorded an outcome.
pub const CANCELLED: &str = "cancelled";

/// Handle on an open span.
///
/// The span ends when the guard is dropped or [`SpanGuard::end`] is called,
/// so early returns and cancelled futures still close it. A guard dropped
/// without an outcome marks its span `Error("cancelled")`.
pub struct SpanGuard {
    cx: Context,
    outcome_recorded: bool,
    ended: bool,
}

impl SpanGuard {
    pub(crate) fn start(
        tracer: &SdkTracer,
        parent: &Context,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
    ) -> Self {
        let span = tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(tracer, parent);
        Self {
            cx: parent.with_span(span),
            outcome_recorded: false,
            ended: false,
        }
    }

    /// Context with this span active. Start children from it and inject it
    /// into outbound calls made on behalf of this span.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn span_context(&self) -> SpanContext {
        self.cx.span().span_context().clone()
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    pub fn set_ok(&mut self) {
        self.outcome_recorded = true;
        self.cx.span().set_status(Status::Ok);
    }

    pub fn record_error(&mut self, error: &dyn fmt::Display) {
        self.outcome_recorded = true;
        self.cx.span().set_status(Status::error(error.to_string()));
    }

    /// End the span now.
    pub fn end(mut self) {
        self.ended = true;
        self.cx.span().end();
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if self.ended {
            return;
        }
        let span = self.cx.span();
        if !self.outcome_recorded {
            span.set_status(Status::error(CANCELLED));
        }
        span.end();
    }
}

impl fmt::Debug for SpanGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span_context = self.span_context();
        f.debug_struct("SpanGuard")
            .field("trace_id", &span_context.trace_id())
            .field("span_id", &span_context.span_id())
            .field("ended", &self.ended)
            .finish()
    }
}
