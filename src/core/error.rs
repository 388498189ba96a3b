//! Error taxonomy shared by the remote client and the entity manager

use miette::Diagnostic;
use thiserror::Error;

/// Coarse error class the entity manager dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before or by the backend because the payload is invalid
    Validation,
    /// Target id does not exist
    NotFound,
    /// Backend failure (5xx) or the request never completed
    Server,
    /// Backend reported a uniqueness conflict
    Duplicate,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Errors raised by portal operations
#[derive(Debug, Error, Diagnostic)]
pub enum PortalError {
    /// Client-side validation failure; never reaches the network
    #[error("{0}")]
    #[diagnostic(code(portal::validation))]
    Validation(String),

    #[error("{resource} {id} not found")]
    #[diagnostic(code(portal::remote::not_found))]
    NotFound { resource: &'static str, id: i64 },

    /// Backend refused the payload with a 4xx status
    #[error("Request rejected ({status}): {message}")]
    #[diagnostic(code(portal::remote::rejected))]
    Rejected { status: u16, message: String },

    #[error("Duplicate entry: {message}")]
    #[diagnostic(
        code(portal::remote::duplicate),
        help("Use a unique value for the record's identifying fields")
    )]
    Duplicate { message: String },

    #[error("Server error ({status}): {message}")]
    #[diagnostic(code(portal::remote::server))]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    #[diagnostic(
        code(portal::remote::transport),
        help("Check that the backend is running and `base_url` is correct")
    )]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    #[diagnostic(code(portal::remote::decode))]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(portal::config),
        help("Run `portal config show` to inspect the effective settings")
    )]
    Config(String),
}

impl PortalError {
    /// The class used to pick the user-facing message
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Validation(_) | PortalError::Rejected { .. } => ErrorKind::Validation,
            PortalError::NotFound { .. } => ErrorKind::NotFound,
            PortalError::Duplicate { .. } => ErrorKind::Duplicate,
            PortalError::Server { .. }
            | PortalError::Transport(_)
            | PortalError::Decode(_)
            | PortalError::Config(_) => ErrorKind::Server,
        }
    }

    /// Classify a non-success HTTP response
    ///
    /// A 409 or any body mentioning "duplicate" is a uniqueness conflict;
    /// the payload text is inspected here once so callers only see the kind.
    pub fn from_status(status: u16, body: &str, resource: &'static str, id: Option<i64>) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.trim().to_string()
        };

        if status == 409 || message.to_lowercase().contains("duplicate") {
            return PortalError::Duplicate { message };
        }

        match status {
            404 => PortalError::NotFound {
                resource,
                id: id.unwrap_or_default(),
            },
            400..=499 => PortalError::Rejected { status, message },
            _ => PortalError::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PortalError::Decode(err.to_string())
        } else {
            PortalError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
