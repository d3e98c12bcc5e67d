//! Outbound HTTP calls with trace propagation.
//!
//! # Responsibilities
//! - Inject the calling span's context into every outbound request
//! - Bound send and body read by the inbound request's deadline
//! - Classify failures as transport, timeout, status or decode errors
//!
//! # Design Decisions
//! - One shared `reqwest::Client` per process (connection pooling)
//! - Standard certificate validation; no per-call TLS overrides
//! - Response bodies are owned by the call and released on every exit path

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;
use crate::resilience::{Deadline, DeadlineExceeded};
use crate::trace::{self, HeaderInjector, SpanGuard};

/// Failure of one outbound call.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error(transparent)]
    Timeout(#[from] DeadlineExceeded),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("cannot build request url from '{0}'")]
    Url(String),
}

/// Raw response of an outbound call.
#[derive(Debug)]
pub struct CallResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl CallResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CallError> {
        serde_json::from_slice(&self.body).map_err(CallError::Decode)
    }
}

/// HTTP client shared by the resolvers and the entry orchestrator.
#[derive(Debug, Clone)]
pub struct OutboundClient {
    http: reqwest::Client,
}

impl OutboundClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(concat!("zipcode-weather/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// `GET url` on behalf of `span`, returning whatever status came back.
    pub async fn get(
        &self,
        span: &SpanGuard,
        deadline: &Deadline,
        url: Url,
    ) -> Result<CallResponse, CallError> {
        let mut headers = HeaderMap::new();
        trace::inject(span.context(), &mut HeaderInjector(&mut headers));

        span.set_attribute("http.method", "GET");
        span.set_attribute("http.url", redacted(&url));

        let request = self.http.get(url).headers(headers);
        let response = deadline
            .run(async move {
                let response = request.send().await?;
                let status = response.status();
                let body = response.bytes().await?;
                Ok::<_, reqwest::Error>(CallResponse { status, body })
            })
            .await?
            .map_err(CallError::Transport)?;

        span.set_attribute("http.status_code", i64::from(response.status.as_u16()));
        Ok(response)
    }

    /// `GET url` and decode a 2xx JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        span: &SpanGuard,
        deadline: &Deadline,
        url: Url,
    ) -> Result<T, CallError> {
        let response = self.get(span, deadline, url).await?;
        if !response.status.is_success() {
            return Err(CallError::Status(response.status));
        }
        response.json()
    }
}

/// URL without query string or credentials, safe to put on spans.
fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    let _ = clean.set_password(None);
    let _ = clean.set_username("");
    clean.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_drops_query_and_credentials() {
        let url = Url::parse("https://user:pw@api.example/v1/current.json?key=secret&q=Rio").unwrap();
        assert_eq!(redacted(&url), "https://api.example/v1/current.json");
    }
}
