//! Celsius to Fahrenheit/Kelvin conversion.

use serde::Serialize;

/// One reading in the three scales reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Temperatures {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

impl Temperatures {
    /// `F = C * 1.8 + 32` and `K = C + 273`. The Kelvin offset is the whole
    /// number 273, matching what existing clients expect.
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + 273.0,
        }
    }
}
