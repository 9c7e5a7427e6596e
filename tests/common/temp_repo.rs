//! Real git repositories in temporary directories

use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A working repository on `main` with one commit, plus a bare repository
/// standing in for the fork
pub struct TempGitRepo {
    pub dir: TempDir,
    pub fork: TempDir,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let repo = Repository::init(dir.path()).expect("init repo");
        repo.set_head("refs/heads/main").expect("set HEAD");

        let mut config = repo.config().expect("config");
        config.set_str("user.name", "Config Person").expect("user.name");
        config
            .set_str("user.email", "config@example.com")
            .expect("user.email");

        fs::write(dir.path().join("README.md"), "# Demo\n\nSome typo here.\n").expect("write");
        fs::write(dir.path().join("Gopkg.lock"), "# lock v1\n").expect("write");
        let mut index = repo.index().expect("index");
        index.add_path(Path::new("README.md")).expect("add");
        index.add_path(Path::new("Gopkg.lock")).expect("add");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("tree");
        let sig = Signature::now("Setup", "setup@example.com").expect("sig");
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .expect("commit");

        let fork = TempDir::new().expect("temp dir");
        Repository::init_bare(fork.path()).expect("init bare");

        Self { dir, fork }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn fork_url(&self) -> String {
        self.fork.path().to_str().expect("utf-8 path").to_string()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, content).expect("write file");
    }

    pub fn repo(&self) -> Repository {
        Repository::open(self.dir.path()).expect("open repo")
    }

    pub fn fork_repo(&self) -> Repository {
        Repository::open_bare(self.fork.path()).expect("open fork")
    }

    /// Number of commits reachable from HEAD
    pub fn commit_count(&self) -> usize {
        let repo = self.repo();
        let mut walk = repo.revwalk().expect("revwalk");
        walk.push_head().expect("push head");
        walk.count()
    }
}
