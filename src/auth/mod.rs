//! Credentials and local identity
//!
//! The builder never reads ambient configuration directly; it asks a
//! [`CredentialProvider`], which tests replace with fixed values.

mod github;

pub use github::{AmbientCredentials, GitHubAuth};

use crate::error::Result;
use crate::types::LocalIdentity;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the `gh` CLI
    Cli,
    /// Token from git config `github.token`
    GitConfig,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar => write!(f, "environment"),
            Self::Cli => write!(f, "gh CLI"),
            Self::GitConfig => write!(f, "git config"),
        }
    }
}

/// Supplies the GitHub token and the locally configured author identity
pub trait CredentialProvider: Send + Sync {
    /// GitHub access token, used for the API and as the push password
    fn github_token(&self) -> Result<GitHubAuth>;

    /// Author name and email from local configuration
    fn local_identity(&self) -> Result<LocalIdentity>;
}
