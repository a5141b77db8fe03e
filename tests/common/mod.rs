//! Black-box test harness: spawns real `git` processes against temp
//! directories via [`TestRepo`], matching the teacher's own
//! `tests/common/mod.rs` isolation approach (scoped env vars, deterministic
//! author/committer dates) but driving `wsm`'s library API directly instead
//! of shelling out to a CLI binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// An isolated git repository in a temp directory, with one initial commit
/// on `main`.
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
}

fn configure_git_cmd(cmd: &mut Command) {
    cmd.env("GIT_CONFIG_GLOBAL", "")
        .env("GIT_CONFIG_SYSTEM", "")
        .env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_AUTHOR_DATE", "2026-01-01T00:00:00Z")
        .env("GIT_COMMITTER_DATE", "2026-01-01T00:00:00Z")
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C")
        .env("LANG", "C");
}

impl TestRepo {
    /// Create a repo named `name` under `parent`, with an initial commit and
    /// any `marker_files` (e.g. `go.mod`) written before that commit so
    /// discovery classification has something to find.
    pub fn init(parent: &Path, name: &str, marker_files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().expect("tempdir");
        let root = parent.join(name);
        std::fs::create_dir_all(&root).expect("mkdir repo root");

        let repo = Self {
            _temp_dir: temp_dir,
            root,
        };

        repo.run_git(&["init", "-q", "-b", "main"]);
        for (file, contents) in marker_files {
            std::fs::write(repo.root.join(file), contents).expect("write marker file");
        }
        std::fs::write(repo.root.join("README.md"), "hello\n").expect("write readme");
        repo.run_git(&["add", "-A"]);
        repo.run_git(&["commit", "-q", "-m", "initial commit"]);
        repo
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_git(&self, args: &[&str]) {
        let mut cmd = Command::new("git");
        configure_git_cmd(&mut cmd);
        cmd.current_dir(&self.root).args(args);
        let output = cmd.output().expect("spawn git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// A scratch directory standing in for `$HOME`/the user config root, so
/// tests never touch the real user's `~/.config`.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_root(&self) -> PathBuf {
        self.dir.path().join("config").join("workspace-manager")
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.dir.path().join("workspaces")
    }
}
