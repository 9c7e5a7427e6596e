//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_platform;
pub mod mock_workspace;
pub mod temp_repo;

pub use mock_platform::MockPlatformService;
pub use mock_workspace::MockWorkspace;
pub use temp_repo::TempGitRepo;

use pr_builder::auth::{AuthSource, CredentialProvider, GitHubAuth};
use pr_builder::config::{AuthorConfig, BuilderConfig, RepoSlug};
use pr_builder::branch::BranchNaming;
use pr_builder::error::Result;
use pr_builder::signature::Signature;
use pr_builder::types::{LocalIdentity, PlatformConfig, PrState, RemotePullRequest};

/// Credentials with fixed values
pub struct StaticCredentials {
    pub token: String,
    pub identity: LocalIdentity,
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self {
            token: "test-token".to_string(),
            identity: LocalIdentity {
                name: Some("Config Person".to_string()),
                email: Some("config@example.com".to_string()),
            },
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn github_token(&self) -> Result<GitHubAuth> {
        Ok(GitHubAuth {
            token: self.token.clone(),
            source: AuthSource::EnvVar,
        })
    }

    fn local_identity(&self) -> Result<LocalIdentity> {
        Ok(self.identity.clone())
    }
}

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "knative".to_string(),
        repo: "serving".to_string(),
        host: None,
    }
}

/// Config for "Fix typo" / "auto-fix" with token abc123, pushing as `bot`
pub fn test_config() -> BuilderConfig {
    let mut config = BuilderConfig::new(
        "/unused",
        RepoSlug::parse("knative/serving").unwrap(),
        "main",
        "Fix typo",
        "auto-fix",
    );
    config.branch = BranchNaming::Explicit("prbuilder-run-1".to_string());
    config.token = Some(Signature::new("abc123").unwrap());
    config.fork_owner = Some("bot".to_string());
    config.author = AuthorConfig {
        name: Some("Demo Person".to_string()),
        email: Some("demo@example.com".to_string()),
    };
    config
}

pub fn make_pr(number: u64, body: Option<&str>) -> RemotePullRequest {
    RemotePullRequest {
        number,
        body: body.map(ToString::to_string),
        state: PrState::Open,
    }
}

/// An open PR whose body is signed with `token`
pub fn signed_pr(number: u64, token: &str) -> RemotePullRequest {
    let body = Signature::new(token).unwrap().sign("Earlier automated change");
    make_pr(number, Some(&body))
}
