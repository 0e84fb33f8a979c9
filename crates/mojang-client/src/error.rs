//! Error types for the Mojang resolver

use std::fmt;

use mojang_uuid::MalformedIdentifier;

/// Failure to exchange a request with the upstream service
#[derive(Debug)]
pub enum TransportError {
    Http(Box<reqwest::Error>),
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Http(err) => write!(f, "HTTP error: {}", err),
            TransportError::Other(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Http(err) => Some(err.as_ref()),
            TransportError::Other(_) => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(Box::new(err))
    }
}

/// Hard failures of a resolve call
///
/// Not-found, rate limiting and other upstream refusals are not errors; they
/// show up as absent entries plus a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug)]
pub enum ResolveError {
    /// Upstream returned an id that is not 32 hex digits
    MalformedIdentifier(MalformedIdentifier),
    /// Single lookup answered for a different username than requested
    ResponseMismatch { requested: String, returned: String },
    /// A success body did not have the expected JSON shape
    MalformedResponse(String),
    /// The HTTP transport could not be constructed
    Transport(TransportError),
    /// A batch task panicked or was aborted
    Task(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MalformedIdentifier(err) => write!(f, "{}", err),
            ResolveError::ResponseMismatch {
                requested,
                returned,
            } => write!(
                f,
                "Response mismatch: requested {:?}, API answered for {:?}",
                requested, returned
            ),
            ResolveError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            ResolveError::Transport(err) => write!(f, "{}", err),
            ResolveError::Task(msg) => write!(f, "Batch task failed: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::MalformedIdentifier(err) => Some(err),
            ResolveError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MalformedIdentifier> for ResolveError {
    fn from(err: MalformedIdentifier) -> Self {
        ResolveError::MalformedIdentifier(err)
    }
}

impl From<TransportError> for ResolveError {
    fn from(err: TransportError) -> Self {
        ResolveError::Transport(err)
    }
}

impl From<tokio::task::JoinError> for ResolveError {
    fn from(err: tokio::task::JoinError) -> Self {
        ResolveError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
