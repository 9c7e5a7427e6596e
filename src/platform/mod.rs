//! Code-hosting platform services
//!
//! Provides the pull request operations the builder needs, behind a trait so
//! runs can be exercised against a mock.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PlatformConfig, PrPage, PullRequest, PullRequestSpec};
use async_trait::async_trait;

/// Number of pull requests requested per page
pub const PAGE_SIZE: u8 = 100;

/// Platform service trait for PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List one page of open PRs targeting `base`.
    ///
    /// Pages are numbered from 1. Returns [`Error::RepositoryNotFound`] when
    /// the repository does not exist, so callers can tell it apart from
    /// other failures.
    ///
    /// [`Error::RepositoryNotFound`]: crate::error::Error::RepositoryNotFound
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<PrPage>;

    /// Close a PR by number
    async fn close_pr(&self, number: u64) -> Result<()>;

    /// Open a PR
    async fn create_pr(&self, spec: &PullRequestSpec) -> Result<PullRequest>;

    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
