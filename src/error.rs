//! Error types for prbuilder

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a pull request
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, raised before any VCS or network work
    #[error("configuration error: {0}")]
    Config(String),

    /// Credentials could not be resolved
    #[error("authentication error: {0}")]
    Auth(String),

    /// The workspace is not a readable git repository
    #[error("failed to open repository at {}: {source}", path.display())]
    OpenRepository {
        /// Path that was opened
        path: PathBuf,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// A git operation failed
    #[error("git {operation} failed for '{target}': {source}")]
    Git {
        /// Operation that failed (e.g. "stage", "commit")
        operation: &'static str,
        /// Path, branch or remote the operation acted on
        target: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// The commit branch already exists and overwriting was not requested
    #[error("branch '{0}' already exists (use --on-collision overwrite to replace it)")]
    BranchExists(String),

    /// The remote refused the pushed ref
    #[error("push of '{branch}' to '{remote}' was rejected: {message}")]
    PushRejected {
        /// Remote name
        remote: String,
        /// Branch name
        branch: String,
        /// Rejection message from the server
        message: String,
    },

    /// The target repository does not exist (or is not visible)
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// GitHub API error, message preserved from the provider
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a git error with the operation and the thing it acted on
    pub fn git(operation: &'static str, target: impl Into<String>, source: git2::Error) -> Self {
        Self::Git {
            operation,
            target: target.into(),
            source,
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(format!(
                "{} (HTTP {})",
                source.message,
                source.status_code.as_u16()
            )),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}
