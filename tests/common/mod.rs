//! Shared harness for integration tests.
//!
//! Starts both services on ephemeral ports with httpmock doubles standing in
//! for the location and weather providers. Each service exports into its own
//! in-memory span sink so a whole trace can be inspected after a request and
//! every span can be traced back to the service that produced it.

#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use zipcode_weather::config::{ServiceConfig, ServiceRole};
use zipcode_weather::http::HttpServer;
use zipcode_weather::lifecycle::Shutdown;
use zipcode_weather::trace::{simple_provider, Tracer};

pub const API_KEY: &str = "test-key";
pub const REQUEST_LABEL: &str = "zipcode-lookup";

/// Both services plus their provider doubles.
pub struct Pipeline {
    pub entry_addr: SocketAddr,
    pub resolution_addr: SocketAddr,
    pub location: MockServer,
    pub weather: MockServer,
    pub entry_spans: InMemorySpanExporter,
    pub resolution_spans: InMemorySpanExporter,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    // Shutting a provider down clears its exporter.
    _providers: [SdkTracerProvider; 2],
}

impl Pipeline {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with a hook to adjust the resolution service's configuration.
    pub async fn start_with(adjust_resolution: impl FnOnce(&mut ServiceConfig)) -> Self {
        let location = MockServer::start_async().await;
        let weather = MockServer::start_async().await;
        let entry_spans = InMemorySpanExporter::default();
        let resolution_spans = InMemorySpanExporter::default();
        let shutdown = Shutdown::new();

        let mut resolution_config = ServiceConfig::for_role(ServiceRole::Resolution);
        resolution_config.telemetry.request_label = REQUEST_LABEL.to_string();
        resolution_config.upstreams.location_url = location.url("/ws");
        resolution_config.upstreams.weather_url = weather.url("/v1/current.json");
        resolution_config.upstreams.weather_api_key = Some(API_KEY.to_string());
        resolution_config.timeouts.request_secs = 5;
        adjust_resolution(&mut resolution_config);
        let resolution_provider =
            simple_provider(&resolution_config.telemetry, resolution_spans.clone());
        let resolution_addr = start_service(
            ServiceRole::Resolution,
            &resolution_config,
            &resolution_provider,
            &shutdown,
        )
        .await;

        let mut entry_config = ServiceConfig::for_role(ServiceRole::Entry);
        entry_config.telemetry.request_label = REQUEST_LABEL.to_string();
        entry_config.upstreams.resolution_url = format!("http://{}", resolution_addr);
        entry_config.timeouts.request_secs = 10;
        let entry_provider = simple_provider(&entry_config.telemetry, entry_spans.clone());
        let entry_addr =
            start_service(ServiceRole::Entry, &entry_config, &entry_provider, &shutdown).await;

        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        Self {
            entry_addr,
            resolution_addr,
            location,
            weather,
            entry_spans,
            resolution_spans,
            client,
            shutdown,
            _providers: [entry_provider, resolution_provider],
        }
    }

    pub fn entry_url(&self) -> String {
        format!("http://{}/zipcode", self.entry_addr)
    }

    pub fn resolution_url(&self) -> String {
        format!("http://{}/zipcode", self.resolution_addr)
    }

    /// `POST /zipcode` on the entry service with `{"cep": cep}`.
    pub async fn post_cep(&self, cep: &str) -> reqwest::Response {
        self.client
            .post(self.entry_url())
            .json(&json!({ "cep": cep }))
            .send()
            .await
            .expect("entry service unreachable")
    }

    /// Location provider answers `body` for `code`.
    pub async fn mock_location<'a>(&'a self, code: &str, body: Value) -> Mock<'a> {
        let path = format!("/ws/{}/json/", code);
        self.location
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await
    }

    /// Weather provider answers `temp_c` for any locality.
    pub async fn mock_weather(&self, temp_c: f64) -> Mock<'_> {
        self.weather
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/current.json")
                    .query_param("key", API_KEY)
                    .query_param_exists("q");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "current": { "temp_c": temp_c } }));
            })
            .await
    }

    /// Every span exported by either service.
    pub fn spans(&self) -> Vec<SpanData> {
        let mut spans = self.entry_spans.get_finished_spans().unwrap();
        spans.extend(self.resolution_spans.get_finished_spans().unwrap());
        spans
    }

    pub fn spans_named(&self, name: &str) -> Vec<SpanData> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    /// The only exported span named `name`.
    pub fn span(&self, name: &str) -> SpanData {
        let mut spans = self.spans_named(name);
        assert_eq!(spans.len(), 1, "expected exactly one span named {name:?}");
        spans.remove(0)
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `role` on an ephemeral port until `shutdown` fires.
pub async fn start_service(
    role: ServiceRole,
    config: &ServiceConfig,
    provider: &SdkTracerProvider,
    shutdown: &Shutdown,
) -> SocketAddr {
    let tracer = Tracer::from_provider(provider);
    let server = HttpServer::new(role, config, tracer, None).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    addr
}

/// Attribute `key` of `span`, rendered as a string.
pub fn attribute(span: &SpanData, key: &str) -> Option<String> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.to_string())
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
