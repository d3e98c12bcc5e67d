//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ServiceConfig, ServiceRole};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration for `role`: role defaults, then the optional TOML file,
/// then environment overrides. The result is validated.
pub fn load_config(role: ServiceRole, path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(role, &content)?
        }
        None => ServiceConfig::for_role(role),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document on top of the role defaults.
///
/// Sections missing from the document keep the role's values, so a
/// resolution config file does not need to restate its bind address.
pub fn parse_config(role: ServiceRole, content: &str) -> Result<ServiceConfig, ConfigError> {
    let document: toml::Table = content.parse()?;
    let is_set = |section: &str, key: &str| {
        document
            .get(section)
            .and_then(|table| table.get(key))
            .is_some()
    };
    let bind_address_set = is_set("listener", "bind_address");
    let service_name_set = is_set("telemetry", "service_name");

    let mut config: ServiceConfig = toml::Value::Table(document).try_into()?;
    let defaults = ServiceConfig::for_role(role);
    if !bind_address_set {
        config.listener.bind_address = defaults.listener.bind_address;
    }
    if !service_name_set {
        config.telemetry.service_name = defaults.telemetry.service_name;
    }
    Ok(config)
}

/// Apply the environment overrides understood by both services.
///
/// `lookup` returns the value of a variable, if set. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("OTEL_SERVICE_NAME") {
        config.telemetry.service_name = v;
    }
    if let Some(v) = get("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.collector_endpoint = v;
    }
    if let Some(v) = get("REQUEST_NAME_OTEL") {
        config.telemetry.request_label = v;
    }
    if let Some(v) = get("BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = get("RESOLUTION_SERVICE_URL") {
        config.upstreams.resolution_url = v;
    }
    if let Some(v) = get("LOCATION_PROVIDER_URL") {
        config.upstreams.location_url = v;
    }
    if let Some(v) = get("WEATHER_PROVIDER_URL") {
        config.upstreams.weather_url = v;
    }
    if let Some(v) = get("WEATHER_API_KEY") {
        config.upstreams.weather_api_key = Some(v);
    }
    if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
        config.timeouts.request_secs = v.trim().parse().map_err(|_| ConfigError::Env {
            var: "REQUEST_TIMEOUT_SECS",
            value: v.clone(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("OTEL_SERVICE_NAME", "zip-entry"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "collector:4318"),
            ("REQUEST_NAME_OTEL", "zipcode-lookup"),
            ("WEATHER_API_KEY", "secret"),
            ("REQUEST_TIMEOUT_SECS", "12"),
            ("BIND_ADDRESS", ""),
        ]);
        let mut config = ServiceConfig::for_role(ServiceRole::Entry);
        apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.telemetry.service_name, "zip-entry");
        assert_eq!(config.telemetry.collector_endpoint, "collector:4318");
        assert_eq!(config.telemetry.request_label, "zipcode-lookup");
        assert_eq!(config.upstreams.weather_api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeouts.request_secs, 12);
        // Empty values do not clobber defaults.
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_bad_timeout_override() {
        let vars = env(&[("REQUEST_TIMEOUT_SECS", "soon")]);
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "REQUEST_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_parse_keeps_role_defaults() {
        let config = parse_config(
            ServiceRole::Resolution,
            r#"
            [upstreams]
            weather_api_key = "k"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(config.telemetry.service_name, "service-b");
        assert_eq!(config.upstreams.weather_api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(matches!(
            parse_config(ServiceRole::Entry, "listener = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
