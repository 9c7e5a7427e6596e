//! libgit2-backed workspace

use crate::error::{Error, Result};
use crate::repo::Workspace;
use crate::types::{BasicAuth, ChangeKind, ChangeSet, Identity};
use git2::{
    BranchType, Cred, ErrorCode, Oid, PushOptions, RemoteCallbacks, Repository, Status,
    StatusOptions,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A git working copy opened with libgit2
pub struct GitWorkspace {
    repo: Repository,
    root: PathBuf,
}

impl std::fmt::Debug for GitWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitWorkspace")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitWorkspace {
    /// Open the repository whose working tree is at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|source| Error::OpenRepository {
            path: path.to_path_buf(),
            source,
        })?;
        let root = repo
            .workdir()
            .ok_or_else(|| {
                Error::Config(format!("{} is a bare repository", path.display()))
            })?
            .to_path_buf();
        debug!(root = %root.display(), "opened workspace");
        Ok(Self { repo, root })
    }

    /// Root of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Underlying libgit2 handle
    pub const fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Commit id HEAD points at
    pub fn head_commit(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| Error::git("resolve HEAD", "HEAD", e))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| Error::git("resolve HEAD", "HEAD", e))?;
        Ok(commit.id().to_string())
    }

    fn head_tree_id(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => {
                let commit = head
                    .peel_to_commit()
                    .map_err(|e| Error::git("resolve HEAD", "HEAD", e))?;
                Ok(Some(commit.tree_id()))
            }
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(Error::git("resolve HEAD", "HEAD", e)),
        }
    }
}

fn is_unborn(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

fn change_kind(status: Status) -> Option<ChangeKind> {
    if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        Some(ChangeKind::Deleted)
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        Some(ChangeKind::Renamed)
    } else if status.intersects(Status::INDEX_NEW | Status::WT_NEW) {
        Some(ChangeKind::Added)
    } else if status.intersects(Status::INDEX_TYPECHANGE | Status::WT_TYPECHANGE) {
        Some(ChangeKind::TypeChange)
    } else if status.intersects(Status::INDEX_MODIFIED | Status::WT_MODIFIED | Status::CONFLICTED)
    {
        Some(ChangeKind::Modified)
    } else {
        None
    }
}

impl Workspace for GitWorkspace {
    fn status(&self) -> Result<ChangeSet> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| Error::git("status", self.root.display().to_string(), e))?;

        let mut changes = ChangeSet::new();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                debug!("skipping non-UTF-8 path in status");
                continue;
            };
            if let Some(kind) = change_kind(entry.status()) {
                changes.insert(path.to_string(), kind);
            }
        }
        Ok(changes)
    }

    fn stage(&mut self, path: &str) -> Result<()> {
        let mut index = self.repo.index().map_err(|e| Error::git("stage", path, e))?;
        let rel = Path::new(path);
        if self.root.join(rel).symlink_metadata().is_ok() {
            index.add_path(rel)
        } else {
            index.remove_path(rel)
        }
        .map_err(|e| Error::git("stage", path, e))?;
        index.write().map_err(|e| Error::git("stage", path, e))?;
        debug!(path, "staged");
        Ok(())
    }

    fn commit(&mut self, identity: &Identity, message: &str) -> Result<String> {
        let time = git2::Time::new(identity.when.timestamp(), 0);
        let signature = git2::Signature::new(&identity.name, &identity.email, &time)
            .map_err(|e| Error::git("commit", &identity.email, e))?;

        let mut index = self.repo.index().map_err(|e| Error::git("commit", "index", e))?;
        let tree_id = index
            .write_tree()
            .map_err(|e| Error::git("commit", "index", e))?;

        if self.head_tree_id()? == Some(tree_id) {
            return Err(Error::Internal(
                "refusing to create an empty commit: nothing is staged".to_string(),
            ));
        }

        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| Error::git("commit", tree_id.to_string(), e))?;

        let parent = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(|e| Error::git("commit", "HEAD", e))?,
            ),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(Error::git("commit", "HEAD", e)),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| Error::git("commit", "HEAD", e))?;
        debug!(commit = %oid, "committed");
        Ok(oid.to_string())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(Error::git("find branch", name, e)),
        }
    }

    fn create_branch(&mut self, name: &str, force: bool) -> Result<()> {
        let refname = format!("refs/heads/{name}");
        let head = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(|e| Error::git("create branch", name, e))?,
            ),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(Error::git("create branch", name, e)),
        };

        if let Some(target) = head {
            // libgit2 will not force-move the branch HEAD is on; detach first.
            let on_branch = self
                .repo
                .head()
                .ok()
                .is_some_and(|head| head.name() == Some(refname.as_str()));
            if force && on_branch {
                self.repo
                    .set_head_detached(target.id())
                    .map_err(|e| Error::git("create branch", name, e))?;
            }

            match self.repo.branch(name, &target, force) {
                Ok(_) => {}
                Err(e) if e.code() == ErrorCode::Exists => {
                    return Err(Error::BranchExists(name.to_string()));
                }
                Err(e) => return Err(Error::git("create branch", name, e)),
            }
        } else if self.branch_exists(name)? && !force {
            return Err(Error::BranchExists(name.to_string()));
        }

        // The new branch points at the old HEAD commit, so the index and
        // working tree already match it and no checkout is needed.
        self.repo
            .set_head(&refname)
            .map_err(|e| Error::git("switch branch", name, e))?;
        debug!(branch = name, "created and switched to branch");
        Ok(())
    }

    fn ensure_remote(&mut self, name: &str, url: &str) -> Result<()> {
        match self.repo.find_remote(name) {
            Ok(remote) if remote.url() == Some(url) => {
                debug!(remote = name, "remote already configured");
            }
            Ok(_) => {
                self.repo
                    .remote_set_url(name, url)
                    .map_err(|e| Error::git("set remote url", name, e))?;
                debug!(remote = name, url, "updated remote url");
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                self.repo
                    .remote(name, url)
                    .map_err(|e| Error::git("add remote", name, e))?;
                debug!(remote = name, url, "added remote");
            }
            Err(e) => return Err(Error::git("find remote", name, e)),
        }
        Ok(())
    }

    fn push_branch(
        &mut self,
        remote_name: &str,
        branch: &str,
        auth: &BasicAuth,
        force: bool,
    ) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| Error::git("push", remote_name, e))?;

        let prefix = if force { "+" } else { "" };
        let refspec = format!("{prefix}refs/heads/{branch}:refs/heads/{branch}");

        let tried_credentials = Cell::new(false);
        let rejection: RefCell<Option<String>> = RefCell::new(None);

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, _username, _allowed| {
            // libgit2 keeps asking on auth failure; answer once.
            if tried_credentials.replace(true) {
                return Err(git2::Error::from_str("authentication rejected"));
            }
            Cred::userpass_plaintext(&auth.username, &auth.password)
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                *rejection.borrow_mut() = Some(format!("{refname}: {message}"));
            }
            Ok(())
        });

        let mut opts = PushOptions::new();
        opts.remote_callbacks(callbacks);

        debug!(remote = remote_name, branch, force, "pushing");
        remote
            .push(&[refspec.as_str()], Some(&mut opts))
            .map_err(|e| Error::git("push", format!("{remote_name}/{branch}"), e))?;
        drop(opts);

        if let Some(message) = rejection.into_inner() {
            return Err(Error::PushRejected {
                remote: remote_name.to_string(),
                branch: branch.to_string(),
                message,
            });
        }
        debug!(remote = remote_name, branch, "pushed");
        Ok(())
    }
}
