//! Locality lookup by postal code.

use url::Url;

use crate::http::client::{CallError, OutboundClient};
use crate::model::LocalityInfo;
use crate::observability::span_names;
use crate::resilience::Deadline;
use crate::trace::{Context, SpanKind, Tracer};
use crate::zipcode::ZipCode;

/// Calls `GET <base>/<code>/json/` and reads `localidade`.
#[derive(Debug, Clone)]
pub struct LocationClient {
    base_url: Url,
    http: OutboundClient,
    tracer: Tracer,
}

impl LocationClient {
    pub fn new(base_url: Url, http: OutboundClient, tracer: Tracer) -> Self {
        Self {
            base_url,
            http,
            tracer,
        }
    }

    /// Locality for `zipcode`. An empty string means the provider knows no
    /// locality for it; only transport and decoding problems are errors.
    pub async fn resolve(
        &self,
        cx: &Context,
        deadline: &Deadline,
        zipcode: &ZipCode,
    ) -> Result<String, CallError> {
        let mut span = self
            .tracer
            .start_span(cx, span_names::GET_LOCATION, SpanKind::Client);
        span.set_attribute("zipcode", zipcode.as_str().to_string());

        let result = async {
            let url = self.lookup_url(zipcode)?;
            let info: LocalityInfo = self.http.get_json(&span, deadline, url).await?;
            Ok::<_, CallError>(info.localidade)
        }
        .await;

        match &result {
            Ok(locality) => {
                span.set_attribute("city", locality.clone());
                span.set_ok();
            }
            Err(e) => span.record_error(e),
        }
        result
    }

    fn lookup_url(&self, zipcode: &ZipCode) -> Result<Url, CallError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CallError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .push(zipcode.as_str())
            .push("json")
            .push("");
        Ok(url)
    }
}
