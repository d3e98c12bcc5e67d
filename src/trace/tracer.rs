//! The per-process tracer.

use std::borrow::Cow;
use std::fmt;

use opentelemetry::trace::{SpanKind, TracerProvider as _};
use opentelemetry::Context;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer as SdkTracer};

use crate::trace::span::SpanGuard;

const INSTRUMENTATION_SCOPE: &str = "zipcode-weather";

/// Opens spans for one service.
///
/// Built once at startup from the process provider and cloned into every
/// handler and client; nothing is installed globally.
#[derive(Clone)]
pub struct Tracer {
    inner: SdkTracer,
}

impl Tracer {
    pub fn from_provider(provider: &SdkTracerProvider) -> Self {
        Self {
            inner: provider.tracer(INSTRUMENTATION_SCOPE),
        }
    }

    /// Open a span as a child of the span active in `parent`, or as the root
    /// of a new trace when `parent` carries none.
    ///
    /// Unsampled parents still yield fresh span ids so propagation keeps
    /// working, but their spans are never exported.
    pub fn start_span(
        &self,
        parent: &Context,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
    ) -> SpanGuard {
        SpanGuard::start(&self.inner, parent, name, kind)
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("scope", &INSTRUMENTATION_SCOPE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;
    use crate::trace::provider::simple_provider;
    use crate::trace::span::CANCELLED;
    use opentelemetry::trace::{
        SpanContext, SpanId, Status, TraceContextExt, TraceFlags, TraceId, TraceState,
    };
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SpanData};
    use std::time::Duration;

    struct Harness {
        tracer: Tracer,
        exporter: InMemorySpanExporter,
        _provider: SdkTracerProvider,
    }

    impl Harness {
        fn new() -> Self {
            let exporter = InMemorySpanExporter::default();
            let provider = simple_provider(&TelemetryConfig::default(), exporter.clone());
            Self {
                tracer: Tracer::from_provider(&provider),
                exporter,
                _provider: provider,
            }
        }

        fn spans(&self) -> Vec<SpanData> {
            self.exporter.get_finished_spans().unwrap()
        }

        fn named(&self, name: &str) -> Vec<SpanData> {
            self.spans().into_iter().filter(|s| s.name == name).collect()
        }
    }

    fn remote(flags: TraceFlags) -> Context {
        Context::new().with_remote_span_context(SpanContext::new(
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap(),
            flags,
            true,
            TraceState::default(),
        ))
    }

    #[test]
    fn test_child_spans_share_trace() {
        let harness = Harness::new();

        let parent = harness.tracer.start_span(&Context::new(), "parent", SpanKind::Server);
        let child = harness
            .tracer
            .start_span(parent.context(), "child", SpanKind::Client);
        let parent_context = parent.span_context();
        child.end();
        parent.end();

        let spans = harness.spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name, "child");
        assert_eq!(spans[0].parent_span_id, parent_context.span_id());
        assert_eq!(spans[0].span_kind, SpanKind::Client);
        assert_eq!(spans[1].name, "parent");
        assert_eq!(spans[1].parent_span_id, SpanId::INVALID);
        assert!(spans
            .iter()
            .all(|s| s.span_context.trace_id() == parent_context.trace_id()));
    }

    #[test]
    fn test_recorded_outcome_survives_drop() {
        let harness = Harness::new();

        fn early_return(tracer: &Tracer) -> Result<(), &'static str> {
            let mut span = tracer.start_span(&Context::new(), "guarded", SpanKind::Internal);
            span.record_error(&"validation failed");
            Err("validation failed")
        }

        assert!(early_return(&harness.tracer).is_err());

        let spans = harness.named("guarded");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].status, Status::error("validation failed"));
        assert!(spans[0].end_time >= spans[0].start_time);
    }

    #[test]
    fn test_dropped_without_outcome_is_cancelled() {
        let harness = Harness::new();

        drop(harness.tracer.start_span(&Context::new(), "abandoned", SpanKind::Client));
        harness
            .tracer
            .start_span(&Context::new(), "marker", SpanKind::Internal)
            .end();

        assert_eq!(harness.named("abandoned")[0].status, Status::error(CANCELLED));
        assert_eq!(harness.named("marker")[0].status, Status::Unset);
    }

    #[test]
    fn test_remote_parent_recorded() {
        let harness = Harness::new();

        let mut span = harness
            .tracer
            .start_span(&remote(TraceFlags::SAMPLED), "server", SpanKind::Server);
        span.set_ok();
        drop(span);

        let span = &harness.spans()[0];
        assert_eq!(
            span.span_context.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        assert_eq!(span.parent_span_id, SpanId::from_hex("00f067aa0ba902b7").unwrap());
        assert_eq!(span.status, Status::Ok);
    }

    #[test]
    fn test_unsampled_spans_not_exported() {
        let harness = Harness::new();

        let span = harness
            .tracer
            .start_span(&remote(TraceFlags::default()), "quiet", SpanKind::Server);
        let span_context = span.span_context();
        assert!(span_context.is_valid());
        assert!(!span_context.is_sampled());
        assert_eq!(
            span_context.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        span.end();

        assert!(harness.spans().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_future_ends_span() {
        let harness = Harness::new();

        let work = {
            let tracer = harness.tracer.clone();
            async move {
                let _span = tracer.start_span(&Context::new(), "slow call", SpanKind::Client);
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        };
        let outcome = tokio::time::timeout(Duration::from_millis(20), work).await;
        assert!(outcome.is_err());

        let spans = harness.named("slow call");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].status, Status::error(CANCELLED));
    }
}
