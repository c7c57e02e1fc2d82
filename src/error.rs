//! Error types for prflow

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that prflow operations can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file is missing required values or cannot be parsed
    #[error("config: {0}")]
    Config(String),

    /// Credential missing or rejected by GitHub
    #[error("authentication: {0}")]
    Auth(String),

    /// The local remote configuration is missing, malformed, or ambiguous
    #[error("cannot resolve repository: {0}")]
    RepoResolution(String),

    /// Transient GitHub API failure (network, rate limiting, 5xx).
    /// Not retried internally; callers may retry with backoff.
    #[error("GitHub API: {0}")]
    Api(String),

    /// A git invocation failed
    #[error("git: {0}")]
    Git(String),

    /// A workflow precondition was not met (e.g. running from the
    /// main branch)
    #[error("{0}")]
    Precondition(String),

    /// Failed to parse output from an external tool or service
    #[error("parse error: {0}")]
    Parse(String),

    /// Internal error that shouldn't happen in normal operation
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. }
                if matches!(source.status_code.as_u16(), 401 | 403) =>
            {
                Self::Auth(source.message)
            }
            other => Self::Api(other.to_string()),
        }
    }
}
