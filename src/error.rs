//! Failure taxonomy shared by both services.
//!
//! # Design Decisions
//! - Every failure is classified once, where it happens, into one of three kinds
//! - Callers see a short classification and a fixed message; provider error
//!   text goes to logs and spans only
//! - Messages relayed from the resolution service are capped

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest message relayed from another service.
pub const MAX_RELAYED_MESSAGE: usize = 200;

/// Coarse classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed body or postal code; detected before any remote call.
    InvalidInput,
    /// The postal code has no known locality.
    NotFound,
    /// Transport, timeout or decoding failure at a remote boundary.
    UpstreamError,
}

/// The remote boundary an upstream failure happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    ResolutionService,
    LocationProvider,
    WeatherProvider,
}

impl Boundary {
    /// Message shown to callers for failures at this boundary.
    pub fn public_message(self) -> &'static str {
        match self {
            Boundary::ResolutionService => "failed to get temperature info",
            Boundary::LocationProvider => "failed to get location info",
            Boundary::WeatherProvider => "failed to get weather info",
        }
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::ResolutionService => write!(f, "resolution service"),
            Boundary::LocationProvider => write!(f, "location provider"),
            Boundary::WeatherProvider => write!(f, "weather provider"),
        }
    }
}

/// A terminal failure of one request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request body is not `{"cep": "<string>"}`.
    #[error("invalid request body: {0}")]
    MalformedBody(String),

    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    NotFound,

    #[error("{boundary} failed: {detail}")]
    Upstream { boundary: Boundary, detail: String },

    /// Failure classified by the resolution service, passed through as is.
    #[error("{message}")]
    Relayed { kind: ErrorKind, message: String },
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: ErrorKind,
    pub message: String,
}

impl PipelineError {
    pub fn upstream(boundary: Boundary, detail: impl std::fmt::Display) -> Self {
        PipelineError::Upstream {
            boundary,
            detail: detail.to_string(),
        }
    }

    /// Rebuild the error a downstream service reported.
    pub fn relayed(body: ErrorBody) -> Self {
        match body.status {
            ErrorKind::NotFound => PipelineError::NotFound,
            kind => PipelineError::Relayed {
                kind,
                message: cap_message(&body.message),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MalformedBody(_) | PipelineError::InvalidZipcode => {
                ErrorKind::InvalidInput
            }
            PipelineError::NotFound => ErrorKind::NotFound,
            PipelineError::Upstream { .. } => ErrorKind::UpstreamError,
            PipelineError::Relayed { kind, .. } => *kind,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            PipelineError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::NotFound => StatusCode::NOT_FOUND,
            PipelineError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Relayed { kind, .. } => match kind {
                ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::UpstreamError => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Text shown to the caller.
    pub fn public_message(&self) -> String {
        match self {
            PipelineError::MalformedBody(detail) => {
                cap_message(&format!("invalid request body: {detail}"))
            }
            PipelineError::Upstream { boundary, .. } => boundary.public_message().to_string(),
            other => other.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self.kind(),
            message: self.public_message(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Truncate to [`MAX_RELAYED_MESSAGE`] characters.
pub fn cap_message(message: &str) -> String {
    message.chars().take(MAX_RELAYED_MESSAGE).collect()
}
