//! Span names shared by the handlers and clients.

/// Server span of the entry service handler.
pub const ENTRY_HANDLER: &str = "ZipCodeHandler";

/// Server span of the resolution service handler.
pub const RESOLUTION_HANDLER: &str = "TemperatureHandler";

/// Call from the entry service to the resolution service.
pub const GET_TEMPERATURE: &str = "external call: getTemperatureByZipCode";

pub const GET_LOCATION: &str = "external call: getLocation";

pub const GET_WEATHER: &str = "external call: getWeather";

const RECEIPT_PREFIX: &str = "request received";

/// Name of the marker span recorded when a request arrives.
pub fn receipt(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        RECEIPT_PREFIX.to_string()
    } else {
        format!("{RECEIPT_PREFIX} {label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_name() {
        assert_eq!(receipt(""), "request received");
        assert_eq!(receipt(" zipcode-lookup "), "request received zipcode-lookup");
    }
}
