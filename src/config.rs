//! Run configuration
//!
//! [`BuilderConfig`] is built once by the entry point and handed to the
//! builder. [`FileConfig`] holds defaults read from an optional TOML file.

use crate::branch::BranchNaming;
use crate::detect::{DEFAULT_IGNORED_FILE, IgnorePolicy};
use crate::error::{Error, Result};
use crate::publish::CollisionPolicy;
use crate::signature::Signature;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user config dir
const CONFIG_DIR: &str = "prbuilder";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// `owner/repo` pair identifying the target repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoSlug {
    /// Parse `owner/repo`
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
            }),
            _ => Err(Error::Config(format!(
                "expected repository as <owner>/<repo>, got '{value}'"
            ))),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Author override from the command line; unset fields fall back to the
/// locally configured identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorConfig {
    /// Author name
    pub name: Option<String>,
    /// Author email
    pub email: Option<String>,
}

/// Everything a run needs, resolved before any VCS or network work
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Working tree to turn into a PR
    pub workspace: PathBuf,
    /// Target repository
    pub repo: RepoSlug,
    /// Branch the PR targets
    pub base_branch: String,
    /// How to name the commit branch
    pub branch: BranchNaming,
    /// PR title (also the commit subject)
    pub title: String,
    /// PR body (also the commit body), before signing
    pub body: String,
    /// Caller-supplied provenance token
    pub token: Option<Signature>,
    /// Author override
    pub author: AuthorConfig,
    /// Append a `Signed-off-by` trailer to the commit
    pub signoff: bool,
    /// Owner of the fork to push to; defaults to the authenticated user
    pub fork_owner: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Explicit push URL, overriding the fork URL derived from the host
    pub push_url: Option<String>,
    /// Files whose changes alone are not worth a PR
    pub ignore: IgnorePolicy,
    /// Branch collision policy
    pub on_collision: CollisionPolicy,
    /// Report what would happen without changing anything remote or local
    pub dry_run: bool,
}

impl BuilderConfig {
    /// Minimal configuration; optional settings take their defaults
    pub fn new(
        workspace: impl Into<PathBuf>,
        repo: RepoSlug,
        base_branch: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            repo,
            base_branch: base_branch.into(),
            branch: BranchNaming::RunId,
            title: title.into(),
            body: body.into(),
            token: None,
            author: AuthorConfig::default(),
            signoff: false,
            fork_owner: None,
            host: None,
            push_url: None,
            ignore: IgnorePolicy::default(),
            on_collision: CollisionPolicy::default(),
            dry_run: false,
        }
    }

    /// Signature used to find PRs from earlier runs: the caller token when
    /// given, otherwise the title-derived one
    pub fn cleanup_signature(&self) -> Signature {
        self.token
            .clone()
            .unwrap_or_else(|| Signature::from_title(&self.title))
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Config("PR title must not be empty".to_string()));
        }
        if self.base_branch.trim().is_empty() {
            return Err(Error::Config("target branch must not be empty".to_string()));
        }
        if let Some(owner) = &self.fork_owner
            && owner.trim().is_empty()
        {
            return Err(Error::Config("fork owner must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Defaults read from the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Base file names to ignore (replaces the default list)
    pub ignore_files: Option<Vec<String>>,
    /// Branch collision policy
    pub on_collision: Option<CollisionPolicy>,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Fork owner
    pub fork_owner: Option<String>,
}

impl FileConfig {
    /// Ignore policy from the file, or the default policy
    pub fn ignore_policy(&self) -> IgnorePolicy {
        self.ignore_files.as_ref().map_or_else(
            || IgnorePolicy::new([DEFAULT_IGNORED_FILE]),
            |files| IgnorePolicy::new(files.iter().cloned()),
        )
    }
}

/// Default config file location (`<config dir>/prbuilder/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config file.
///
/// An explicit `path` must exist. Without one, the default location is used
/// if present, and an empty config otherwise.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}
