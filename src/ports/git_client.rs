//! The `GitClient` capability contract (§6 of the specification).
//!
//! This is the abstract surface the orchestration core talks to; the concrete
//! git command invocation lives in [`crate::adapters::process_git`] and is
//! explicitly out of scope for the core's own logic.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A single worktree as reported by `git worktree list`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub branch: Option<String>,
    pub head: String,
    pub detached: bool,
}

/// Options controlling `WorktreeAdd`.
#[derive(Debug, Clone, Default)]
pub struct WorktreeAddOptions {
    pub force: bool,
    /// Track an existing remote branch (`origin/<branch>`) as a new local branch.
    pub track_remote: bool,
    /// Create the branch fresh, optionally from `base`.
    pub new_branch: Option<NewBranchSpec>,
    /// No branch was requested (§4.3.1 row 1): worktree the repository's
    /// current HEAD directly with `git worktree add --detach`, rather than
    /// letting git's own convenience behavior create and check out a new
    /// branch named after the target directory.
    pub detached: bool,
}

#[derive(Debug, Clone)]
pub struct NewBranchSpec {
    pub base: Option<String>,
}

/// Working-tree status as reported by `git status --porcelain`.
#[derive(Debug, Clone, Default)]
pub struct GitStatus {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub conflicts: Vec<String>,
}

impl GitStatus {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.modified.is_empty()
            && self.untracked.is_empty()
            && self.conflicts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AheadBehind {
    pub ahead: u32,
    pub behind: u32,
}

/// Abstract capability for every git operation the core needs.
///
/// Implementations must surface the raw process output on failure (wrapped in
/// [`crate::error::Error::Git`]) so that callers can match on the text
/// patterns named in §4.4.7 ("no upstream branch") and §4.4.8 ("conflict").
pub trait GitClient {
    // --- Worktree ---
    fn worktree_add(
        &self,
        repo_path: &Path,
        branch: &str,
        target: &Path,
        opts: &WorktreeAddOptions,
    ) -> Result<()>;
    fn worktree_remove(&self, repo_path: &Path, target: &Path, force: bool) -> Result<()>;
    fn worktree_list(&self, repo_path: &Path) -> Result<Vec<WorktreeInfo>>;

    // --- Branch ---
    fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool>;
    fn remote_branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool>;
    fn current_branch(&self, repo_path: &Path) -> Result<Option<String>>;
    fn create_branch(&self, repo_path: &Path, branch: &str, from: Option<&str>) -> Result<()>;
    fn switch_branch(&self, repo_path: &Path, branch: &str) -> Result<()>;
    fn reset_branch_to(&self, repo_path: &Path, branch: &str, target: &str) -> Result<()>;
    fn delete_branch(&self, repo_path: &Path, branch: &str) -> Result<()>;

    // --- State ---
    fn status(&self, repo_path: &Path) -> Result<GitStatus>;
    fn ahead_behind(&self, repo_path: &Path, base: &str) -> Result<AheadBehind>;
    fn untracked_files(&self, repo_path: &Path) -> Result<Vec<String>>;
    fn has_changes(&self, repo_path: &Path) -> Result<bool>;

    // --- Ops ---
    fn add_all(&self, repo_path: &Path) -> Result<()>;
    fn commit(&self, repo_path: &Path, message: &str) -> Result<()>;
    fn push(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn push_set_upstream(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn pull(&self, repo_path: &Path, rebase: bool) -> Result<()>;
    fn fetch(&self, repo_path: &Path, remote: &str) -> Result<()>;
    fn fetch_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn checkout(&self, repo_path: &Path, reference: &str) -> Result<()>;
    fn merge(&self, repo_path: &Path, branch: &str) -> Result<()>;
    fn reset_hard(&self, repo_path: &Path, reference: &str) -> Result<()>;
    fn rebase(&self, repo_path: &Path, onto: &str, interactive: bool) -> Result<()>;
    fn commits_ahead(&self, repo_path: &Path, target: &str) -> Result<u32>;
    fn has_rebase_conflicts(&self, repo_path: &Path) -> Result<bool>;

    // --- Meta ---
    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>>;
    fn branches(&self, repo_path: &Path) -> Result<Vec<String>>;
    fn tags(&self, repo_path: &Path) -> Result<Vec<String>>;
    fn last_commit(&self, repo_path: &Path) -> Result<Option<String>>;
    fn is_repository(&self, path: &Path) -> bool;
    fn default_branch(&self, repo_path: &Path) -> Result<String>;
}
