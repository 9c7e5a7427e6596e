//! Core types for prbuilder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of change reported for a path by the working tree status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// New file (untracked or newly added to the index)
    Added,
    /// Content changed
    Modified,
    /// File removed
    Deleted,
    /// File renamed
    Renamed,
    /// File type changed (e.g. file to symlink)
    TypeChange,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "A"),
            Self::Modified => write!(f, "M"),
            Self::Deleted => write!(f, "D"),
            Self::Renamed => write!(f, "R"),
            Self::TypeChange => write!(f, "T"),
        }
    }
}

/// Paths changed in the working tree, keyed by repo-relative path
pub type ChangeSet = BTreeMap<String, ChangeKind>;

/// Author identity attached to every commit of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
    /// Commit timestamp
    pub when: DateTime<Utc>,
}

impl Identity {
    /// Create an identity stamped with the current time
    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when: Utc::now(),
        }
    }

    /// `Signed-off-by` trailer for this identity
    pub fn signoff_trailer(&self) -> String {
        format!("Signed-off-by: {} <{}>", self.name, self.email)
    }
}

/// Author name and email as configured locally (e.g. git config)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdentity {
    /// `user.name`, if set
    pub name: Option<String>,
    /// `user.email`, if set
    pub email: Option<String>,
}

/// Basic-auth credentials used for pushing
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username (the acting user)
    pub username: String,
    /// Password or access token
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A pull request as listed by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePullRequest {
    /// PR number
    pub number: u64,
    /// PR body (None when the PR has no description)
    pub body: Option<String>,
    /// Current state
    pub state: PrState,
}

/// A created pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head reference (`owner:branch`)
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// One page of open pull requests
#[derive(Debug, Clone, Default)]
pub struct PrPage {
    /// PRs on this page
    pub items: Vec<RemotePullRequest>,
    /// Next page number, None when this is the last page
    pub next_page: Option<u32>,
}

/// Everything needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSpec {
    /// PR title
    pub title: String,
    /// PR body, already signed
    pub body: String,
    /// Branch the PR targets
    pub base: String,
    /// Source reference, `fork-owner:branch-name`
    pub head: String,
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Branch pushed by the publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBranch {
    /// Branch name (local and remote)
    pub branch: String,
    /// Commit the branch points at
    pub commit: String,
    /// Remote the branch was pushed to
    pub remote: String,
}

/// Terminal state of a run
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Working tree was clean
    NoChanges,
    /// Only ignorable files changed
    IgnoredOnly {
        /// The changed (ignorable) paths
        paths: Vec<String>,
    },
    /// Dry run: nothing was committed, pushed or created
    DryRun {
        /// Branch that would have been created
        branch: String,
        /// Paths that would have been committed
        paths: Vec<String>,
    },
    /// A pull request was opened
    Created(PullRequest),
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Stale PRs closed (or, in dry run, that would be closed)
    pub closed_prs: Vec<u64>,
    /// How the run ended
    pub outcome: Outcome,
}
