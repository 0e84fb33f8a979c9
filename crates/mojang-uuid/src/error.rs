//! Error type for identifier decoding

use std::fmt;

/// An identifier string that is not 32 hex digits (or the dashed UUID form
/// where that is accepted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedIdentifier {
    pub input: String,
}

impl MalformedIdentifier {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl fmt::Display for MalformedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed player identifier: {:?}", self.input)
    }
}

impl std::error::Error for MalformedIdentifier {}

pub type Result<T> = std::result::Result<T, MalformedIdentifier>;
