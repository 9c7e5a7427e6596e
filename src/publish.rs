//! Commit and branch publishing
//!
//! Switches to a fresh branch, stages the change set, commits it with the run
//! identity and pushes that branch (only) to the acting user's fork. A name
//! collision is detected before anything is staged.

use crate::error::{Error, Result};
use crate::repo::Workspace;
use crate::types::{BasicAuth, ChangeSet, Identity, PublishedBranch};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// What to do when the commit branch already exists locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail with [`Error::BranchExists`]
    #[default]
    Fail,
    /// Move the existing branch to the new commit and force-push it
    Overwrite,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fail" => Ok(Self::Fail),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(Error::Config(format!(
                "unknown collision policy '{other}' (expected 'fail' or 'overwrite')"
            ))),
        }
    }
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Where the branch is pushed
#[derive(Debug, Clone)]
pub struct PushTarget {
    /// Remote name (the acting user's login)
    pub remote: String,
    /// Fork URL
    pub url: String,
    /// Credentials for the push
    pub auth: BasicAuth,
}

impl PushTarget {
    /// Target the acting user's fork of `repo` on `host` (github.com by default)
    pub fn fork(host: Option<&str>, repo: &str, auth: BasicAuth) -> Self {
        let url = fork_url(host, &auth.username, repo);
        Self {
            remote: auth.username.clone(),
            url,
            auth,
        }
    }
}

/// HTTPS clone URL of `user`'s fork of `repo`
pub fn fork_url(host: Option<&str>, user: &str, repo: &str) -> String {
    let host = host.unwrap_or("github.com");
    format!("https://{host}/{user}/{repo}.git")
}

/// Commit message: title, blank line, body, and an optional sign-off trailer
pub fn commit_message(title: &str, body: &str, signoff: Option<&Identity>) -> String {
    let mut message = format!("{title}\n\n{body}");
    if let Some(identity) = signoff {
        if !message.ends_with('\n') {
            message.push('\n');
        }
        message.push('\n');
        message.push_str(&identity.signoff_trailer());
        message.push('\n');
    }
    message
}

/// Branches, stages, commits and pushes through a [`Workspace`]
pub struct Publisher<'a> {
    workspace: &'a mut dyn Workspace,
    on_collision: CollisionPolicy,
}

impl<'a> Publisher<'a> {
    /// Create a publisher over `workspace`
    pub fn new(workspace: &'a mut dyn Workspace, on_collision: CollisionPolicy) -> Self {
        Self {
            workspace,
            on_collision,
        }
    }

    /// Publish `changes` on a new branch named `branch`
    pub fn publish(
        &mut self,
        changes: &ChangeSet,
        identity: &Identity,
        message: &str,
        branch: &str,
        target: &PushTarget,
    ) -> Result<PublishedBranch> {
        // Branch off before committing so the commit never lands on the
        // branch that was checked out.
        let force = self.check_collision(branch)?;
        self.workspace.create_branch(branch, force)?;
        info!(branch, "created branch");

        for path in changes.keys() {
            self.workspace.stage(path)?;
        }
        debug!(count = changes.len(), "staged changes");

        let commit = self.workspace.commit(identity, message)?;
        info!(commit = %commit, "committed changes");

        self.workspace.ensure_remote(&target.remote, &target.url)?;
        self.workspace
            .push_branch(&target.remote, branch, &target.auth, force)?;
        info!(branch, remote = %target.remote, "pushed branch");

        Ok(PublishedBranch {
            branch: branch.to_string(),
            commit,
            remote: target.remote.clone(),
        })
    }

    /// Returns whether the branch must be force-created
    fn check_collision(&self, branch: &str) -> Result<bool> {
        if !self.workspace.branch_exists(branch)? {
            return Ok(false);
        }
        match self.on_collision {
            CollisionPolicy::Fail => Err(Error::BranchExists(branch.to_string())),
            CollisionPolicy::Overwrite => {
                warn!(branch, "branch exists, overwriting");
                Ok(true)
            }
        }
    }
}
