//! Wire types for the two services and the providers they call.

use serde::{Deserialize, Serialize};

use crate::convert::Temperatures;

/// Body of `POST /zipcode` on the entry service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostalCodeRequest {
    pub cep: String,
}

/// Query of `GET /zipcode` on the resolution service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZipcodeQuery {
    pub zipcode: String,
}

impl ZipcodeQuery {
    /// Read `zipcode` from a raw query string.
    ///
    /// Never fails: a missing, repeated or undecodable parameter yields an
    /// empty code, which validation then rejects like any other bad input.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut values = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
            .filter(|(key, _)| key == "zipcode")
            .map(|(_, value)| value.into_owned());
        let zipcode = match (values.next(), values.next()) {
            (Some(only), None) => only,
            _ => String::new(),
        };
        Self { zipcode }
    }
}

/// Locality provider response. An empty `localidade` means the code is unknown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalityInfo {
    #[serde(default)]
    pub localidade: String,
}

/// Weather provider response.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReading {
    pub current: CurrentWeather,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temp_c: f64,
}

/// Locality plus temperature in three scales. Returned by both services.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComposedResponse {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl ComposedResponse {
    pub fn new(city: impl Into<String>, temperatures: Temperatures) -> Self {
        Self {
            city: city.into(),
            temp_c: temperatures.celsius,
            temp_f: temperatures.fahrenheit,
            temp_k: temperatures.kelvin,
        }
    }
}
