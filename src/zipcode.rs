//! Postal code shape validation.

use std::fmt;

use crate::error::PipelineError;

/// Required number of digits.
pub const ZIPCODE_LEN: usize = 8;

/// True iff `code` is exactly eight ASCII digits. No separators are stripped.
pub fn is_valid(code: &str) -> bool {
    code.len() == ZIPCODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// A postal code that passed [`is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(code: &str) -> Result<Self, PipelineError> {
        if is_valid(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(PipelineError::InvalidZipcode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
