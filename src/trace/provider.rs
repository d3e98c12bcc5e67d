//! Tracer provider construction.
//!
//! # Responsibilities
//! - Describe the process with a `service.name` resource
//! - Ship finished spans to the collector over OTLP/HTTP in batches
//!
//! # Design Decisions
//! - The collector endpoint may be given as `host:port`; scheme and the
//!   `/v1/traces` path are filled in
//! - The provider is returned to the caller, which owns its shutdown

use opentelemetry::KeyValue;
use opentelemetry_otlp::{ExporterBuildError, Protocol, WithExportConfig};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider, SpanExporter};
use opentelemetry_sdk::Resource;

use crate::config::TelemetryConfig;

const TRACES_PATH: &str = "/v1/traces";

/// Follow the caller's sampling decision; sample new traces.
fn sampler() -> Sampler {
    Sampler::ParentBased(Box::new(Sampler::AlwaysOn))
}

/// Resource attributes shared by every span of this process.
pub fn resource(telemetry: &TelemetryConfig) -> Resource {
    let mut attrs = vec![KeyValue::new(
        "service.name",
        telemetry.service_name.clone(),
    )];
    if !telemetry.request_label.trim().is_empty() {
        attrs.push(KeyValue::new(
            "request.label",
            telemetry.request_label.trim().to_string(),
        ));
    }
    Resource::builder_empty().with_attributes(attrs).build()
}

/// Full OTLP/HTTP traces URL for a collector endpoint.
pub fn traces_endpoint(collector: &str) -> String {
    let collector = collector.trim().trim_end_matches('/');
    let base = if collector.contains("://") {
        collector.to_string()
    } else {
        format!("http://{collector}")
    };
    if base.ends_with(TRACES_PATH) {
        base
    } else {
        format!("{base}{TRACES_PATH}")
    }
}

/// Provider exporting to the configured collector through a batch processor.
pub fn otlp_provider(
    telemetry: &TelemetryConfig,
) -> Result<SdkTracerProvider, ExporterBuildError> {
    let endpoint = traces_endpoint(&telemetry.collector_endpoint);
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint.clone())
        .build()?;

    tracing::info!(%endpoint, service_name = %telemetry.service_name, "OTLP span exporter ready");

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(sampler())
        .with_resource(resource(telemetry))
        .build())
}

/// Provider handing each span to `exporter` as soon as it ends.
pub fn simple_provider<E>(telemetry: &TelemetryConfig, exporter: E) -> SdkTracerProvider
where
    E: SpanExporter + 'static,
{
    SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .with_sampler(sampler())
        .with_resource(resource(telemetry))
        .build()
}
