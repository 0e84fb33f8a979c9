//! Error types for the lookup CLI

use std::fmt;

#[derive(Debug)]
pub enum LookupError {
    Resolve(mojang_client::ResolveError),
    Json(serde_json::Error),
    Config(String),
    NoUsernames,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Resolve(err) => write!(f, "Resolve error: {}", err),
            LookupError::Json(err) => write!(f, "JSON error: {}", err),
            LookupError::Config(msg) => write!(f, "Configuration error: {}", msg),
            LookupError::NoUsernames => write!(f, "No valid usernames to look up"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Resolve(err) => Some(err),
            LookupError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<mojang_client::ResolveError> for LookupError {
    fn from(err: mojang_client::ResolveError) -> Self {
        LookupError::Resolve(err)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Json(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for LookupError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        LookupError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
