//! Current temperature by locality name.

use url::Url;

use crate::http::client::{CallError, OutboundClient};
use crate::model::WeatherReading;
use crate::observability::span_names;
use crate::resilience::Deadline;
use crate::trace::{Context, SpanKind, Tracer};

/// Calls `GET <endpoint>?q=<locality>[&key=<api key>]`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoint: Url,
    api_key: Option<String>,
    http: OutboundClient,
    tracer: Tracer,
}

impl WeatherClient {
    pub fn new(endpoint: Url, api_key: Option<String>, http: OutboundClient, tracer: Tracer) -> Self {
        Self {
            endpoint,
            api_key,
            http,
            tracer,
        }
    }

    /// Current Celsius temperature at `locality`. No retries.
    pub async fn resolve(
        &self,
        cx: &Context,
        deadline: &Deadline,
        locality: &str,
    ) -> Result<f64, CallError> {
        let mut span = self
            .tracer
            .start_span(cx, span_names::GET_WEATHER, SpanKind::Client);
        span.set_attribute("city", locality.to_string());

        let url = self.lookup_url(locality);
        let result = self
            .http
            .get_json::<WeatherReading>(&span, deadline, url)
            .await
            .map(|reading| reading.current.temp_c);

        match &result {
            Ok(temp_c) => {
                span.set_attribute("temp_c", *temp_c);
                span.set_ok();
            }
            Err(e) => span.record_error(e),
        }
        result
    }

    fn lookup_url(&self, locality: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
            query.append_pair("q", locality);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;
    use opentelemetry_sdk::trace::SdkTracerProvider;

    fn client(api_key: Option<&str>) -> WeatherClient {
        let http = OutboundClient::new(&TimeoutConfig::default()).unwrap();
        let tracer = Tracer::from_provider(&SdkTracerProvider::builder().build());
        WeatherClient::new(
            Url::parse("https://api.weatherapi.com/v1/current.json").unwrap(),
            api_key.map(str::to_string),
            http,
            tracer,
        )
    }

    #[test]
    fn test_locality_is_escaped() {
        let url = client(None).lookup_url("São Paulo");
        assert_eq!(
            url.as_str(),
            "https://api.weatherapi.com/v1/current.json?q=S%C3%A3o+Paulo"
        );
        let q: Vec<_> = url.query_pairs().collect();
        assert_eq!(q[0].1, "São Paulo");
    }

    #[test]
    fn test_api_key_appended() {
        let url = client(Some("k3y")).lookup_url("Rio & Co");
        assert_eq!(
            url.as_str(),
            "https://api.weatherapi.com/v1/current.json?key=k3y&q=Rio+%26+Co"
        );
    }
}
