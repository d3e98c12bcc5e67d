//! Resolution service: `GET /zipcode?zipcode=`.
//!
//! Received → Validated → LocationResolved → WeatherResolved → Composed,
//! or Failed at the first step that cannot complete.

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use url::Url;

use crate::config::ServiceConfig;
use crate::convert::Temperatures;
use crate::error::{Boundary, PipelineError};
use crate::http::client::OutboundClient;
use crate::model::{ComposedResponse, ZipcodeQuery};
use crate::observability::span_names;
use crate::providers::{LocationClient, WeatherClient};
use crate::resilience::Deadline;
use crate::services::{Instrumentation, ServiceError};
use crate::trace::{SpanGuard, Tracer};
use crate::zipcode::ZipCode;

/// State of the resolution service.
#[derive(Debug, Clone)]
pub struct ResolutionState {
    pub instrumentation: Instrumentation,
    pub location: LocationClient,
    pub weather: WeatherClient,
}

impl ResolutionState {
    pub fn from_config(config: &ServiceConfig, tracer: Tracer) -> Result<Self, ServiceError> {
        let instrumentation = Instrumentation::new(config, tracer.clone());
        let http = OutboundClient::new(&config.timeouts)?;
        let upstreams = &config.upstreams;

        Ok(Self {
            location: LocationClient::new(
                Url::parse(&upstreams.location_url)?,
                http.clone(),
                tracer.clone(),
            ),
            weather: WeatherClient::new(
                Url::parse(&upstreams.weather_url)?,
                upstreams.weather_api_key.clone(),
                http,
                tracer,
            ),
            instrumentation,
        })
    }
}

/// Routes served by the resolution service.
pub fn routes(state: ResolutionState) -> Router {
    Router::new()
        .route("/zipcode", get(temperature_handler))
        .with_state(state)
}

/// `GET /zipcode?zipcode=<8 digits>`.
pub async fn temperature_handler(
    State(state): State<ResolutionState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Json<ComposedResponse>, PipelineError> {
    let query = ZipcodeQuery::from_query(raw.as_deref());
    let deadline = Deadline::after(state.instrumentation.request_budget);
    let mut server = state
        .instrumentation
        .accept(&headers, span_names::RESOLUTION_HANDLER);

    let result = resolve(&state, &server, &deadline, &query.zipcode).await;
    state.instrumentation.conclude(&mut server, &result);
    result.map(Json)
}

async fn resolve(
    state: &ResolutionState,
    server: &SpanGuard,
    deadline: &Deadline,
    raw_zipcode: &str,
) -> Result<ComposedResponse, PipelineError> {
    server.set_attribute("zipcode", raw_zipcode.to_string());
    let zipcode = ZipCode::parse(raw_zipcode)?;
    let cx = server.context();

    let locality = state
        .location
        .resolve(cx, deadline, &zipcode)
        .await
        .map_err(|e| PipelineError::upstream(Boundary::LocationProvider, e))?;
    if locality.is_empty() {
        return Err(PipelineError::NotFound);
    }

    let temp_c = state
        .weather
        .resolve(cx, deadline, &locality)
        .await
        .map_err(|e| PipelineError::upstream(Boundary::WeatherProvider, e))?;

    Ok(ComposedResponse::new(locality, Temperatures::from_celsius(temp_c)))
}
