//! Entry service: `POST /zipcode`.
//!
//! # Responsibilities
//! - Re-anchor the inbound trace and record receipt
//! - Decode and validate the body before any remote call
//! - Forward to the resolution service and relay its classification

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{Boundary, ErrorBody, PipelineError};
use crate::http::client::OutboundClient;
use crate::model::{ComposedResponse, PostalCodeRequest};
use crate::observability::span_names;
use crate::resilience::Deadline;
use crate::services::{Instrumentation, ServiceError};
use crate::trace::{Context, SpanGuard, SpanKind, Tracer};
use crate::zipcode::ZipCode;

/// State of the entry service.
#[derive(Debug, Clone)]
pub struct EntryState {
    pub instrumentation: Instrumentation,
    pub resolution: ResolutionClient,
}

impl EntryState {
    pub fn from_config(config: &ServiceConfig, tracer: Tracer) -> Result<Self, ServiceError> {
        let instrumentation = Instrumentation::new(config, tracer.clone());
        let http = OutboundClient::new(&config.timeouts)?;
        let base_url = Url::parse(&config.upstreams.resolution_url)?;
        Ok(Self {
            resolution: ResolutionClient::new(base_url, http, tracer),
            instrumentation,
        })
    }
}

/// Routes served by the entry service.
pub fn routes(state: EntryState) -> Router {
    Router::new()
        .route("/zipcode", post(zipcode_handler))
        .with_state(state)
}

/// `POST /zipcode` with body `{"cep": "<8 digits>"}`.
pub async fn zipcode_handler(
    State(state): State<EntryState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ComposedResponse>, PipelineError> {
    let deadline = Deadline::after(state.instrumentation.request_budget);
    let mut server = state
        .instrumentation
        .accept(&headers, span_names::ENTRY_HANDLER);

    let result = forward(&state, &server, &deadline, &body).await;
    state.instrumentation.conclude(&mut server, &result);
    result.map(Json)
}

async fn forward(
    state: &EntryState,
    server: &SpanGuard,
    deadline: &Deadline,
    body: &[u8],
) -> Result<ComposedResponse, PipelineError> {
    let request: PostalCodeRequest = serde_json::from_slice(body)
        .map_err(|e| PipelineError::MalformedBody(e.to_string()))?;
    server.set_attribute("zipcode", request.cep.clone());

    let zipcode = ZipCode::parse(&request.cep)?;
    state
        .resolution
        .resolve(server.context(), deadline, &zipcode)
        .await
}

/// Client for the resolution service's `GET /zipcode`.
#[derive(Debug, Clone)]
pub struct ResolutionClient {
    base_url: Url,
    http: OutboundClient,
    tracer: Tracer,
}

impl ResolutionClient {
    pub fn new(base_url: Url, http: OutboundClient, tracer: Tracer) -> Self {
        Self {
            base_url,
            http,
            tracer,
        }
    }

    /// Ask the resolution service about `zipcode`, keeping its classification.
    pub async fn resolve(
        &self,
        cx: &Context,
        deadline: &Deadline,
        zipcode: &ZipCode,
    ) -> Result<ComposedResponse, PipelineError> {
        let mut span = self
            .tracer
            .start_span(cx, span_names::GET_TEMPERATURE, SpanKind::Client);
        span.set_attribute("zipcode", zipcode.as_str().to_string());

        let result = self.call(&span, deadline, zipcode).await;
        match &result {
            Ok(_) => span.set_ok(),
            Err(e) => span.record_error(e),
        }
        result
    }

    async fn call(
        &self,
        span: &SpanGuard,
        deadline: &Deadline,
        zipcode: &ZipCode,
    ) -> Result<ComposedResponse, PipelineError> {
        let upstream = |e: String| PipelineError::upstream(Boundary::ResolutionService, e);

        let url = self.lookup_url(zipcode).ok_or_else(|| {
            upstream(format!("cannot build request url from '{}'", self.base_url))
        })?;
        let response = self
            .http
            .get(span, deadline, url)
            .await
            .map_err(|e| upstream(e.to_string()))?;

        if response.status.is_success() {
            return response
                .json::<ComposedResponse>()
                .map_err(|e| upstream(e.to_string()));
        }

        match response.json::<ErrorBody>() {
            Ok(body) => Err(PipelineError::relayed(body)),
            Err(_) => Err(upstream(format!("unexpected status {}", response.status))),
        }
    }

    fn lookup_url(&self, zipcode: &ZipCode) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut().ok()?.pop_if_empty().push("zipcode");
        url.query_pairs_mut().append_pair("zipcode", zipcode.as_str());
        Some(url)
    }
}
