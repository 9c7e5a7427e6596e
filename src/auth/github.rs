//! GitHub token and identity lookup from the environment, `gh` and git config

use super::{AuthSource, CredentialProvider};
use crate::error::{Error, Result};
use crate::types::LocalIdentity;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::debug;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// git config key holding a GitHub token
pub const TOKEN_GIT_CONFIG_KEY: &str = "github.token";

/// A resolved GitHub token
#[derive(Clone)]
pub struct GitHubAuth {
    /// The token
    pub token: String,
    /// Where it came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuth")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Credentials read from the process environment, the `gh` CLI and git config
///
/// The token is looked up once and reused for the life of the value.
pub struct AmbientCredentials {
    workspace: Option<PathBuf>,
    env: EnvLookup,
    use_gh_cli: bool,
    token: OnceLock<GitHubAuth>,
}

impl AmbientCredentials {
    /// Read credentials for `workspace` (its repository config layers over
    /// the global git config)
    pub fn new(workspace: Option<&Path>) -> Self {
        Self {
            workspace: workspace.map(Path::to_path_buf),
            env: Box::new(|key| std::env::var(key).ok()),
            use_gh_cli: true,
            token: OnceLock::new(),
        }
    }

    /// Replace the environment lookup
    #[must_use]
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Enable or disable asking `gh auth token`
    #[must_use]
    pub const fn with_gh_cli(mut self, enabled: bool) -> Self {
        self.use_gh_cli = enabled;
        self
    }

    fn git_config(&self) -> Result<git2::Config> {
        if let Some(path) = &self.workspace
            && let Ok(repo) = git2::Repository::open(path)
        {
            return repo
                .config()
                .map_err(|e| Error::Auth(format!("failed to read git config: {e}")));
        }
        git2::Config::open_default()
            .map_err(|e| Error::Auth(format!("failed to read git config: {e}")))
    }

    fn config_string(&self, key: &str) -> Result<Option<String>> {
        let config = self.git_config()?;
        match config.get_string(key) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(Error::Auth(format!("failed to read git config {key}: {e}"))),
        }
    }

    fn token_from_gh_cli() -> Option<String> {
        let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
        if !output.status.success() {
            debug!("gh auth token failed");
            return None;
        }
        let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
        (!token.is_empty()).then_some(token)
    }
}

impl CredentialProvider for AmbientCredentials {
    fn github_token(&self) -> Result<GitHubAuth> {
        if let Some(auth) = self.token.get() {
            return Ok(auth.clone());
        }
        let auth = self.lookup_token()?;
        Ok(self.token.get_or_init(|| auth).clone())
    }

    fn local_identity(&self) -> Result<LocalIdentity> {
        Ok(LocalIdentity {
            name: self.config_string("user.name")?,
            email: self.config_string("user.email")?,
        })
    }
}

impl AmbientCredentials {
    fn lookup_token(&self) -> Result<GitHubAuth> {
        for var in TOKEN_ENV_VARS {
            if let Some(token) = (self.env)(var).filter(|t| !t.trim().is_empty()) {
                debug!(var, "using GitHub token from environment");
                return Ok(GitHubAuth {
                    token: token.trim().to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }

        if self.use_gh_cli
            && let Some(token) = Self::token_from_gh_cli()
        {
            debug!("using GitHub token from gh CLI");
            return Ok(GitHubAuth {
                token,
                source: AuthSource::Cli,
            });
        }

        if let Some(token) = self.config_string(TOKEN_GIT_CONFIG_KEY)? {
            debug!("using GitHub token from git config");
            return Ok(GitHubAuth {
                token,
                source: AuthSource::GitConfig,
            });
        }

        Err(Error::Auth(format!(
            "no GitHub token found: set {} or {}, run 'gh auth login', or set git config {TOKEN_GIT_CONFIG_KEY}",
            TOKEN_ENV_VARS[0], TOKEN_ENV_VARS[1]
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with_config(entries: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        let mut config = repo.config().unwrap();
        for (key, value) in entries {
            config.set_str(key, value).unwrap();
        }
        temp
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_token_wins() {
        let temp = repo_with_config(&[(TOKEN_GIT_CONFIG_KEY, "from-config")]);
        let creds = AmbientCredentials::new(Some(temp.path()))
            .with_gh_cli(false)
            .with_env(|key| (key == "GH_TOKEN").then(|| "from-env".to_string()));

        let auth = creds.github_token().unwrap();
        assert_eq!(auth.token, "from-env");
        assert_eq!(auth.source, AuthSource::EnvVar);
    }

    #[test]
    fn test_git_config_token_fallback() {
        let temp = repo_with_config(&[(TOKEN_GIT_CONFIG_KEY, "from-config")]);
        let creds = AmbientCredentials::new(Some(temp.path()))
            .with_gh_cli(false)
            .with_env(no_env);

        let auth = creds.github_token().unwrap();
        assert_eq!(auth.token, "from-config");
        assert_eq!(auth.source, AuthSource::GitConfig);
    }

    #[test]
    fn test_local_identity_from_repo_config() {
        let temp = repo_with_config(&[
            ("user.name", "Config Person"),
            ("user.email", "config@example.com"),
        ]);
        let creds = AmbientCredentials::new(Some(temp.path())).with_env(no_env);

        let identity = creds.local_identity().unwrap();
        assert_eq!(identity.name.as_deref(), Some("Config Person"));
        assert_eq!(identity.email.as_deref(), Some("config@example.com"));
    }

    #[test]
    fn test_token_looked_up_once() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lookups);
        let creds = AmbientCredentials::new(None)
            .with_env(move |key| {
                counter.fetch_add(1, Ordering::SeqCst);
                (key == "GITHUB_TOKEN").then(|| "from-env".to_string())
            })
            .with_gh_cli(false);

        assert_eq!(creds.github_token().unwrap().token, "from-env");
        assert_eq!(creds.github_token().unwrap().token, "from-env");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_redacts_token() {
        let auth = GitHubAuth {
            token: "ghp_secret".to_string(),
            source: AuthSource::EnvVar,
        };
        assert!(!format!("{auth:?}").contains("ghp_secret"));
    }
}
