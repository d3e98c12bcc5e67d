//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that upstream endpoints are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;
use crate::trace::provider::traces_endpoint;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("telemetry.service_name must not be empty")]
    EmptyServiceName,

    #[error("telemetry.collector_endpoint '{0}' is not a host:port or http(s) URL")]
    CollectorEndpoint(String),

    #[error("upstreams.{field} '{value}' is not an absolute http(s) URL")]
    UpstreamUrl { field: &'static str, value: String },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.connect_secs ({connect}) exceeds timeouts.request_secs ({request})")]
    ConnectExceedsRequest { connect: u64, request: u64 },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    let collector = &config.telemetry.collector_endpoint;
    if collector.trim().is_empty() || !is_http_url(&traces_endpoint(collector)) {
        errors.push(ValidationError::CollectorEndpoint(collector.clone()));
    }

    let upstreams = [
        ("resolution_url", &config.upstreams.resolution_url),
        ("location_url", &config.upstreams.location_url),
        ("weather_url", &config.upstreams.weather_url),
    ];
    for (field, value) in upstreams {
        if !is_http_url(value) {
            errors.push(ValidationError::UpstreamUrl {
                field,
                value: value.clone(),
            });
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if timeouts.connect_secs > timeouts.request_secs {
        errors.push(ValidationError::ConnectExceedsRequest {
            connect: timeouts.connect_secs,
            request: timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
