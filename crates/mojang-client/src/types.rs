use std::fmt;

use mojang_uuid::PlayerId;
use serde::{Deserialize, Serialize};

/// Profile entry as returned by both lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProfileResponse {
    pub(crate) id: String,
    pub(crate) name: String,
}

/// Soft failure observed while resolving; the affected entries are absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Upstream answered 429
    RateLimited { usernames: Vec<String> },
    /// Upstream answered with another non-success status
    Upstream {
        status: u16,
        body: String,
        usernames: Vec<String>,
    },
    /// The request never got a response
    Transport {
        message: String,
        usernames: Vec<String>,
    },
    /// Cancelled or past the deadline before the lookup completed
    Cancelled { usernames: Vec<String> },
    /// A concurrent resolve call was fetching this username and gave up
    SharedLookupIncomplete { username: String },
}

impl Diagnostic {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Diagnostic::RateLimited { .. })
    }

    /// Usernames whose entries this diagnostic explains
    pub fn usernames(&self) -> &[String] {
        match self {
            Diagnostic::RateLimited { usernames }
            | Diagnostic::Upstream { usernames, .. }
            | Diagnostic::Transport { usernames, .. }
            | Diagnostic::Cancelled { usernames } => usernames,
            Diagnostic::SharedLookupIncomplete { username } => std::slice::from_ref(username),
        }
    }

    /// The same failure, covering only `username`
    pub(crate) fn narrowed_to(&self, username: &str) -> Diagnostic {
        let usernames = vec![username.to_string()];
        match self {
            Diagnostic::RateLimited { .. } => Diagnostic::RateLimited { usernames },
            Diagnostic::Upstream { status, body, .. } => Diagnostic::Upstream {
                status: *status,
                body: body.clone(),
                usernames,
            },
            Diagnostic::Transport { message, .. } => Diagnostic::Transport {
                message: message.clone(),
                usernames,
            },
            Diagnostic::Cancelled { .. } => Diagnostic::Cancelled { usernames },
            Diagnostic::SharedLookupIncomplete { .. } => Diagnostic::SharedLookupIncomplete {
                username: username.to_string(),
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RateLimited { usernames } => {
                write!(f, "rate limited ({} usernames)", usernames.len())
            }
            Diagnostic::Upstream {
                status,
                body,
                usernames,
            } => write!(
                f,
                "upstream status {} ({} usernames): {}",
                status,
                usernames.len(),
                body
            ),
            Diagnostic::Transport { message, usernames } => {
                write!(f, "transport failure ({} usernames): {}", usernames.len(), message)
            }
            Diagnostic::Cancelled { usernames } => {
                write!(f, "cancelled ({} usernames)", usernames.len())
            }
            Diagnostic::SharedLookupIncomplete { username } => {
                write!(f, "shared lookup for {} did not complete", username)
            }
        }
    }
}

/// Outcome of a resolve call: one entry per requested username, in request
/// order, plus the soft failures that left entries absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub ids: Vec<Option<PlayerId>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub(crate) fn absent(len: usize) -> Self {
        Self {
            ids: vec![None; len],
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub(crate) fn append(&mut self, other: Resolution) {
        self.ids.extend(other.ids);
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_rate_limited(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_rate_limited)
    }
}
