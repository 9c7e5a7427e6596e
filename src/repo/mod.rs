//! Local repository access
//!
//! The [`Workspace`] trait is everything the publisher needs from a working
//! copy. [`GitWorkspace`] implements it on top of libgit2.

mod git;

pub use git::GitWorkspace;

use crate::error::Result;
use crate::types::{BasicAuth, ChangeSet, Identity};

/// Operations on a local working copy
///
/// All calls block. Errors carry the operation and the path, branch or
/// remote they acted on.
pub trait Workspace {
    /// Working tree status as a map from changed path to change kind
    fn status(&self) -> Result<ChangeSet>;

    /// Stage a path (removes it from the index if it was deleted)
    fn stage(&mut self, path: &str) -> Result<()>;

    /// Commit the index on top of HEAD; returns the new commit id
    fn commit(&mut self, identity: &Identity, message: &str) -> Result<String>;

    /// Whether a local branch with this name exists
    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// Create `name` at HEAD and switch to it, keeping the index and working
    /// tree as they are. Later commits land on `name` only.
    ///
    /// With `force`, an existing branch of the same name is moved to HEAD.
    /// No other branch is touched.
    fn create_branch(&mut self, name: &str, force: bool) -> Result<()>;

    /// Make sure remote `name` exists and points at `url`
    fn ensure_remote(&mut self, name: &str, url: &str) -> Result<()>;

    /// Push `refs/heads/<branch>` (and nothing else) to `remote`
    fn push_branch(
        &mut self,
        remote: &str,
        branch: &str,
        auth: &BasicAuth,
        force: bool,
    ) -> Result<()>;
}
