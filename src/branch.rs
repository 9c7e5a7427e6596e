//! Commit branch naming

use crate::error::{Error, Result};

/// Value of `--commit-branch` that requests a generated name
pub const RANDOM_SENTINEL: &str = "random";

/// Environment variable holding the run identifier (the pod name when run
/// as a Kubernetes job), used as the default branch name
pub const RUN_ID_ENV: &str = "POD_NAME";

/// How the commit branch name is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchNaming {
    /// Use this exact name
    Explicit(String),
    /// Generate a fresh UUID
    Random,
    /// Read the run identifier from [`RUN_ID_ENV`]
    RunId,
}

impl BranchNaming {
    /// Interpret the optional `--commit-branch` value
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::RunId,
            Some(RANDOM_SENTINEL) => Self::Random,
            Some(name) => Self::Explicit(name.to_string()),
        }
    }

    /// Resolve the branch name from the process environment
    pub fn resolve(&self) -> Result<String> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve the branch name, looking variables up with `lookup`
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let name = match self {
            Self::Explicit(name) => name.clone(),
            Self::Random => uuid::Uuid::new_v4().to_string(),
            Self::RunId => lookup(RUN_ID_ENV)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config(format!(
                        "no commit branch given and {RUN_ID_ENV} is not set"
                    ))
                })?,
        };
        validate_branch_name(&name)?;
        Ok(name)
    }
}

/// Reject names git would not accept under `refs/heads/`
pub fn validate_branch_name(name: &str) -> Result<()> {
    if git2::Reference::is_valid_name(&format!("refs/heads/{name}")) {
        Ok(())
    } else {
        Err(Error::Config(format!("'{name}' is not a valid branch name")))
    }
}
