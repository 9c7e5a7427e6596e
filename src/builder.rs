//! The PR builder - runs one pass from stale-PR cleanup to PR creation
//!
//! `Start -> CleanStale -> DetectChanges -> {NoOp | Publish -> CreatePR}`.
//! Every step is fatal on error except the no-op outcomes, which end the run
//! successfully.

use crate::auth::CredentialProvider;
use crate::cleanup::close_stale_prs;
use crate::config::BuilderConfig;
use crate::detect::{Detection, detect};
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::publish::{Publisher, PushTarget, commit_message};
use crate::repo::Workspace;
use crate::signature::Signature;
use crate::types::{BasicAuth, Identity, LocalIdentity, Outcome, PullRequestSpec, RunReport};
use tracing::{debug, info};

/// Values resolved once before the run touches anything
struct RunContext {
    branch: String,
    identity: Identity,
    fork_owner: String,
    push: PushTarget,
}

/// Turns workspace changes into a pull request
pub struct PrBuilder<'a> {
    config: BuilderConfig,
    workspace: &'a mut dyn Workspace,
    platform: &'a dyn PlatformService,
    credentials: &'a dyn CredentialProvider,
}

impl<'a> PrBuilder<'a> {
    /// Create a builder over its collaborators
    pub fn new(
        config: BuilderConfig,
        workspace: &'a mut dyn Workspace,
        platform: &'a dyn PlatformService,
        credentials: &'a dyn CredentialProvider,
    ) -> Self {
        Self {
            config,
            workspace,
            platform,
            credentials,
        }
    }

    /// Run the full sequence
    #[allow(clippy::future_not_send)]
    pub async fn run(mut self) -> Result<RunReport> {
        self.config.validate()?;
        let ctx = self.resolve_context().await?;

        // Clean up first so a run that finds nothing to do still leaves no
        // stale PRs behind.
        let signature = self.config.cleanup_signature();
        info!(base = %self.config.base_branch, %signature, "closing stale PRs");
        let cleanup = close_stale_prs(
            self.platform,
            &self.config.base_branch,
            &signature,
            self.config.dry_run,
        )
        .await?;
        let closed_prs = cleanup.matched;

        let changes = match detect(&*self.workspace, &self.config.ignore)? {
            Detection::NoChanges => {
                info!("no changes");
                return Ok(RunReport {
                    closed_prs,
                    outcome: Outcome::NoChanges,
                });
            }
            Detection::IgnoredOnly(changes) => {
                let paths: Vec<String> = changes.into_keys().collect();
                info!(?paths, "only ignorable files changed, skipping PR");
                return Ok(RunReport {
                    closed_prs,
                    outcome: Outcome::IgnoredOnly { paths },
                });
            }
            Detection::Substantive(changes) => changes,
        };
        info!(count = changes.len(), "found changes");

        if self.config.dry_run {
            info!(branch = %ctx.branch, "dry run, not committing");
            return Ok(RunReport {
                closed_prs,
                outcome: Outcome::DryRun {
                    branch: ctx.branch,
                    paths: changes.into_keys().collect(),
                },
            });
        }

        let message = commit_message(
            &self.config.title,
            &self.config.body,
            self.config.signoff.then_some(&ctx.identity),
        );
        let published = Publisher::new(&mut *self.workspace, self.config.on_collision).publish(
            &changes,
            &ctx.identity,
            &message,
            &ctx.branch,
            &ctx.push,
        )?;

        let spec = self.pull_request_spec(&ctx.fork_owner, &published.branch);
        let pr = self.platform.create_pr(&spec).await?;
        info!(number = pr.number, url = %pr.html_url, "created PR");

        Ok(RunReport {
            closed_prs,
            outcome: Outcome::Created(pr),
        })
    }

    /// Build the PR to submit. The body carries the caller token (if any)
    /// and the title token.
    pub fn pull_request_spec(&self, fork_owner: &str, branch: &str) -> PullRequestSpec {
        let mut body = self.config.body.clone();
        if let Some(token) = &self.config.token {
            body = token.sign(&body);
        }
        let title_signature = Signature::from_title(&self.config.title);
        if self.config.token.as_ref() != Some(&title_signature) {
            body = title_signature.sign(&body);
        }

        PullRequestSpec {
            title: self.config.title.clone(),
            body,
            base: self.config.base_branch.clone(),
            head: format!("{fork_owner}:{branch}"),
        }
    }

    async fn resolve_context(&self) -> Result<RunContext> {
        let branch = self.config.branch.resolve()?;
        let identity = self.resolve_identity()?;

        let fork_owner = match &self.config.fork_owner {
            Some(owner) => owner.clone(),
            None => self.platform.current_user().await?,
        };
        let token = self.credentials.github_token()?;
        debug!(source = %token.source, fork_owner, "resolved push credentials");

        let auth = BasicAuth {
            username: fork_owner.clone(),
            password: token.token,
        };
        let mut push = PushTarget::fork(self.config.host.as_deref(), &self.config.repo.repo, auth);
        if let Some(url) = &self.config.push_url {
            push.url.clone_from(url);
        }

        Ok(RunContext {
            branch,
            identity,
            fork_owner,
            push,
        })
    }

    fn resolve_identity(&self) -> Result<Identity> {
        let author = &self.config.author;
        let local = if author.name.is_none() || author.email.is_none() {
            self.credentials.local_identity()?
        } else {
            LocalIdentity::default()
        };

        let name = author.name.clone().or(local.name).ok_or_else(|| {
            Error::Config("no author name: pass --name or set git config user.name".to_string())
        })?;
        let email = author.email.clone().or(local.email).ok_or_else(|| {
            Error::Config("no author email: pass --email or set git config user.email".to_string())
        })?;
        Ok(Identity::now(name, email))
    }
}
