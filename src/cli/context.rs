//! Shared command context
//!
//! Opens the collaborators a run needs from a resolved configuration.

use pr_builder::auth::{AmbientCredentials, CredentialProvider};
use pr_builder::config::BuilderConfig;
use pr_builder::error::Result;
use pr_builder::platform::{GitHubService, PlatformService};
use pr_builder::repo::GitWorkspace;
use tracing::debug;

/// Collaborators for one run
pub struct CommandContext {
    /// The git workspace
    pub workspace: GitWorkspace,
    /// Token and identity lookup
    pub credentials: AmbientCredentials,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Open the workspace, resolve the token and create the GitHub client.
    ///
    /// The workspace is opened first so a bad path fails before any
    /// credential lookup or network access.
    pub fn new(config: &BuilderConfig) -> Result<Self> {
        let workspace = GitWorkspace::open(&config.workspace)?;
        let credentials = AmbientCredentials::new(Some(workspace.root()));

        let auth = credentials.github_token()?;
        debug!(source = %auth.source, "resolved GitHub token");

        let platform = GitHubService::new(
            &auth.token,
            config.repo.owner.clone(),
            config.repo.repo.clone(),
            config.host.clone(),
        )?;

        Ok(Self {
            workspace,
            credentials,
            platform: Box::new(platform),
        })
    }
}
