//! Change detection - decides whether the working tree is worth a PR
//!
//! `classify` is pure; `detect` only reads status through the
//! [`Workspace`] collaborator.

use crate::error::Result;
use crate::repo::Workspace;
use crate::types::ChangeSet;
use std::collections::BTreeSet;
use std::path::Path;

/// Lockfile ignored by default
pub const DEFAULT_IGNORED_FILE: &str = "Gopkg.lock";

/// Base file names whose changes alone do not justify a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePolicy {
    file_names: BTreeSet<String>,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::new([DEFAULT_IGNORED_FILE])
    }
}

impl IgnorePolicy {
    /// Build a policy from base file names
    pub fn new<I, S>(file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_names: file_names.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that ignores nothing
    pub fn none() -> Self {
        Self {
            file_names: BTreeSet::new(),
        }
    }

    /// Whether `path` is ignorable (matched on its base file name)
    pub fn ignores(&self, path: &str) -> bool {
        Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.file_names.contains(name))
    }

    /// Configured base file names
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.file_names.iter().map(String::as_str)
    }
}

/// Classification of a working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Nothing changed
    NoChanges,
    /// Only ignorable files changed
    IgnoredOnly(ChangeSet),
    /// At least one substantive change; holds the full set, ignorable files included
    Substantive(ChangeSet),
}

impl Detection {
    /// Whether the run should stop here
    pub const fn is_noop(&self) -> bool {
        !matches!(self, Self::Substantive(_))
    }
}

/// Classify a change set against an ignore policy
pub fn classify(changes: ChangeSet, policy: &IgnorePolicy) -> Detection {
    if changes.is_empty() {
        return Detection::NoChanges;
    }
    if changes.keys().all(|path| policy.ignores(path)) {
        return Detection::IgnoredOnly(changes);
    }
    Detection::Substantive(changes)
}

/// Read the working tree status and classify it
pub fn detect(workspace: &dyn Workspace, policy: &IgnorePolicy) -> Result<Detection> {
    let changes = workspace.status()?;
    tracing::debug!(count = changes.len(), "read working tree status");
    for (path, kind) in &changes {
        tracing::debug!(%kind, path, "changed");
    }
    Ok(classify(changes, policy))
}
