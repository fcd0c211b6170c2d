//! Error types for label-tide

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by configuration loading, the forge API, and the gate
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete policy configuration (fatal at load time)
    #[error("configuration error: {0}")]
    Config(String),

    /// No policy configured for the given repository
    #[error("no policy configured for repository: {0}")]
    RepoNotConfigured(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error (used by alternate forge implementations and tests)
    #[error("platform error: {0}")]
    Platform(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}
