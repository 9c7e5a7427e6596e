//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{PAGE_SIZE, PlatformService};
use crate::types::{PlatformConfig, PrPage, PrState, PullRequest, PullRequestSpec, RemotePullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use std::sync::Once;
use tracing::debug;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring provider before any TLS configuration is built; rustls
/// panics without a process-level provider.
fn init_crypto() {
    CRYPTO_INIT.call_once(|| {
        // Err means another provider is already installed
        rustls::crypto::ring::default_provider()
            .install_default()
            .ok();
    });
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service.
    ///
    /// `host` selects a GitHub Enterprise instance (`https://<host>/api/v3`).
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let base_uri = host.as_ref().map(|h| format!("https://{h}/api/v3"));
        Self::build(token, base_uri.as_deref(), PlatformConfig { owner, repo, host })
    }

    /// Create a service against an explicit API base URI
    pub fn with_base_uri(token: &str, base_uri: &str, owner: String, repo: String) -> Result<Self> {
        Self::build(
            token,
            Some(base_uri),
            PlatformConfig {
                owner,
                repo,
                host: None,
            },
        )
    }

    fn build(token: &str, base_uri: Option<&str>, config: PlatformConfig) -> Result<Self> {
        init_crypto();
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn slug(&self) -> String {
        format!("{}/{}", self.config.owner, self.config.repo)
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. }
        if source.status_code.as_u16() == 404 || source.message == "Not Found")
}

/// Helper to convert octocrab PR to our `RemotePullRequest` type
fn remote_pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> RemotePullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        // IssueState is non-exhaustive
        Some(_) | None => PrState::Closed,
    };
    RemotePullRequest {
        number: pr.number,
        body: pr.body.clone(),
        state,
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.label.clone().unwrap_or_else(|| pr.head.ref_field.clone()),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<PrPage> {
        debug!(base, page, "listing open PRs");
        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .base(base)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await;

        let listed = match result {
            Ok(listed) => listed,
            Err(e) if is_not_found(&e) => return Err(Error::RepositoryNotFound(self.slug())),
            Err(e) => return Err(e.into()),
        };

        let items: Vec<RemotePullRequest> =
            listed.items.iter().map(remote_pr_from_octocrab).collect();
        let next_page = listed.next.is_some().then_some(page + 1);
        debug!(page, count = items.len(), ?next_page, "listed open PRs");
        Ok(PrPage { items, next_page })
    }

    async fn close_pr(&self, number: u64) -> Result<()> {
        debug!(number, "closing PR");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .update(number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await?;
        debug!(number, "closed PR");
        Ok(())
    }

    async fn create_pr(&self, spec: &PullRequestSpec) -> Result<PullRequest> {
        debug!(head = %spec.head, base = %spec.base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(&spec.title, &spec.head, &spec.base)
            .body(&spec.body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        debug!(login = %user.login, "resolved authenticated user");
        Ok(user.login)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
