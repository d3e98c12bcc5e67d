//! Clients for the external locality and weather providers.
//!
//! # Data Flow
//! ```text
//! resolution handler
//!     → location.rs  (postal code → locality name, span "external call: getLocation")
//!     → weather.rs   (locality name → Celsius reading, span "external call: getWeather")
//! ```
//!
//! # Design Decisions
//! - Each call opens its own span and injects it into the outbound headers
//! - "Locality unknown" is a normal empty result, not an error
//! - Transport, timeout, status and decode failures surface as `CallError`

pub mod location;
pub mod weather;

pub use location::LocationClient;
pub use weather::WeatherClient;
