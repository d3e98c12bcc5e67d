//! Configuration schema definitions.
//!
//! This module defines the configuration structure shared by both services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Which of the two services a process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Accepts `POST /zipcode` and forwards to the resolution service.
    Entry,
    /// Accepts `GET /zipcode?zipcode=` and calls the providers.
    Resolution,
}

impl ServiceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceRole::Entry => "entry",
            ServiceRole::Resolution => "resolution",
        }
    }

    /// Default bind address for the role.
    pub fn default_bind_address(self) -> &'static str {
        match self {
            ServiceRole::Entry => "0.0.0.0:8080",
            ServiceRole::Resolution => "0.0.0.0:8081",
        }
    }

    /// Default service name reported on spans.
    pub fn default_service_name(self) -> &'static str {
        match self {
            ServiceRole::Entry => "service-a",
            ServiceRole::Resolution => "service-b",
        }
    }
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration for one service process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Span/resource attributes.
    pub telemetry: TelemetryConfig,

    /// Downstream service and provider endpoints.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Defaults for the given role.
    pub fn for_role(role: ServiceRole) -> Self {
        Self {
            listener: ListenerConfig {
                bind_address: role.default_bind_address().to_string(),
            },
            telemetry: TelemetryConfig {
                service_name: role.default_service_name().to_string(),
                ..TelemetryConfig::default()
            },
            upstreams: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::for_role(ServiceRole::Entry)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ServiceRole::Entry.default_bind_address().to_string(),
        }
    }
}

/// Values attached to every span this process emits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `service.name` resource attribute.
    pub service_name: String,

    /// OTLP/HTTP trace collector, `host:port` or a full URL.
    pub collector_endpoint: String,

    /// Human-readable label appended to the request-received span name.
    pub request_label: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: ServiceRole::Entry.default_service_name().to_string(),
            collector_endpoint: "otel-collector:4318".to_string(),
            request_label: String::new(),
        }
    }
}

/// Remote endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the resolution service (used by the entry service).
    pub resolution_url: String,

    /// Base URL of the locality lookup provider.
    pub location_url: String,

    /// Current-weather endpoint of the weather provider.
    pub weather_url: String,

    /// API key sent as the `key` query parameter, if any.
    pub weather_api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            resolution_url: "http://service-b:8081".to_string(),
            location_url: "https://viacep.com.br/ws".to_string(),
            weather_url: "https://api.weatherapi.com/v1/current.json".to_string(),
            weather_api_key: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for outbound calls, in seconds.
    pub connect_secs: u64,

    /// Total budget for handling one inbound request, in seconds.
    /// Every outbound call made on behalf of the request shares it.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,

    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_json: false,
            metrics_enabled: true,
        }
    }
}
