//! In-memory workspace recording every call

use pr_builder::error::{Error, Result};
use pr_builder::repo::Workspace;
use pr_builder::types::{BasicAuth, ChangeKind, ChangeSet, Identity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitCall {
    pub author: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCall {
    pub name: String,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub remote: String,
    pub branch: String,
    pub username: String,
    pub force: bool,
}

/// Workspace double with a fixed status
#[derive(Debug, Default)]
pub struct MockWorkspace {
    pub status: ChangeSet,
    pub existing_branches: Vec<String>,
    pub fail_stage_path: Option<String>,
    pub fail_push: bool,
    // Call tracking
    pub staged: Vec<String>,
    pub commits: Vec<CommitCall>,
    pub branches: Vec<BranchCall>,
    pub remotes: Vec<(String, String)>,
    pub pushes: Vec<PushCall>,
    /// Mutating calls in order, e.g. `["branch b", "stage a.go", "commit"]`
    pub events: Vec<String>,
}

impl MockWorkspace {
    /// Workspace whose status lists `paths` as modified
    pub fn with_changes(paths: &[&str]) -> Self {
        Self {
            status: paths
                .iter()
                .map(|p| ((*p).to_string(), ChangeKind::Modified))
                .collect(),
            ..Self::default()
        }
    }

    pub fn clean() -> Self {
        Self::default()
    }

    fn head(&self) -> String {
        format!("{:040x}", self.commits.len())
    }

    /// Nothing was staged, committed, branched or pushed
    pub fn assert_untouched(&self) {
        assert!(self.staged.is_empty(), "staged: {:?}", self.staged);
        assert!(self.commits.is_empty(), "commits: {:?}", self.commits);
        assert!(self.branches.is_empty(), "branches: {:?}", self.branches);
        assert!(self.pushes.is_empty(), "pushes: {:?}", self.pushes);
    }
}

impl Workspace for MockWorkspace {
    fn status(&self) -> Result<ChangeSet> {
        Ok(self.status.clone())
    }

    fn stage(&mut self, path: &str) -> Result<()> {
        if self.fail_stage_path.as_deref() == Some(path) {
            return Err(Error::git(
                "stage",
                path,
                git2::Error::from_str("permission denied"),
            ));
        }
        self.staged.push(path.to_string());
        self.events.push(format!("stage {path}"));
        Ok(())
    }

    fn commit(&mut self, identity: &Identity, message: &str) -> Result<String> {
        self.commits.push(CommitCall {
            author: identity.name.clone(),
            email: identity.email.clone(),
            message: message.to_string(),
        });
        self.events.push("commit".to_string());
        Ok(self.head())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.existing_branches.iter().any(|b| b == name))
    }

    fn create_branch(&mut self, name: &str, force: bool) -> Result<()> {
        if !force && self.existing_branches.iter().any(|b| b == name) {
            return Err(Error::BranchExists(name.to_string()));
        }
        self.branches.push(BranchCall {
            name: name.to_string(),
            force,
        });
        self.events.push(format!("branch {name}"));
        Ok(())
    }

    fn ensure_remote(&mut self, name: &str, url: &str) -> Result<()> {
        self.remotes.push((name.to_string(), url.to_string()));
        Ok(())
    }

    fn push_branch(
        &mut self,
        remote: &str,
        branch: &str,
        auth: &BasicAuth,
        force: bool,
    ) -> Result<()> {
        if self.fail_push {
            return Err(Error::PushRejected {
                remote: remote.to_string(),
                branch: branch.to_string(),
                message: "refs/heads/x: permission denied".to_string(),
            });
        }
        self.events.push(format!("push {remote}/{branch}"));
        self.pushes.push(PushCall {
            remote: remote.to_string(),
            branch: branch.to_string(),
            username: auth.username.clone(),
            force,
        });
        Ok(())
    }
}
