//! `SyncService` (§4.4.7): fan-out pull/push across a workspace's member
//! worktrees. Never halts on a per-repository failure — every member is
//! attempted and the full list of `SyncResult`s is returned.

use crate::model::{SyncResult, Workspace};
use crate::ports::GitClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub pull: bool,
    pub push: bool,
    pub rebase: bool,
    pub dry_run: bool,
}

pub struct SyncService<'a> {
    git: &'a dyn GitClient,
}

impl<'a> SyncService<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    pub fn sync(&self, workspace: &Workspace, options: &SyncOptions) -> Vec<SyncResult> {
        workspace
            .repositories
            .iter()
            .map(|repo| self.sync_one(&workspace.worktree_path(repo), &repo.name, options))
            .collect()
    }

    fn sync_one(&self, worktree_path: &std::path::Path, name: &str, options: &SyncOptions) -> SyncResult {
        let (ahead_before, behind_before) = self
            .git
            .ahead_behind(worktree_path, "origin/HEAD")
            .map(|ab| (ab.ahead, ab.behind))
            .unwrap_or((0, 0));

        if options.dry_run {
            return SyncResult {
                repository: name.to_string(),
                pulled: false,
                pushed: false,
                conflicts: false,
                ahead_before,
                behind_before,
                ahead_after: ahead_before,
                behind_after: behind_before,
                error: None,
                dry_run: true,
            };
        }

        let mut pulled = false;
        let mut pushed = false;
        let mut conflicts = false;
        let mut error = None;

        if options.pull {
            match self.git.pull(worktree_path, options.rebase) {
                Ok(()) => pulled = true,
                Err(e) => {
                    let has_conflicts = self
                        .git
                        .status(worktree_path)
                        .map(|s| !s.conflicts.is_empty())
                        .unwrap_or(false);
                    conflicts = has_conflicts;
                    error = Some(e.to_string());
                }
            }
        }

        if options.push && error.is_none() {
            match self.push_with_upstream_retry(worktree_path) {
                Ok(()) => pushed = true,
                Err(e) => error = Some(e.to_string()),
            }
        }

        let (ahead_after, behind_after) = self
            .git
            .ahead_behind(worktree_path, "origin/HEAD")
            .map(|ab| (ab.ahead, ab.behind))
            .unwrap_or((ahead_before, behind_before));

        SyncResult {
            repository: name.to_string(),
            pulled,
            pushed,
            conflicts,
            ahead_before,
            behind_before,
            ahead_after,
            behind_after,
            error,
            dry_run: false,
        }
    }

    /// `Push` must auto-set-upstream when the remote branch doesn't exist
    /// yet (§4.4.7 step 4): detect by the error string pattern and retry
    /// with `--set-upstream origin <current-branch>`.
    fn push_with_upstream_retry(&self, worktree_path: &std::path::Path) -> crate::error::Result<()> {
        match self.git.push(worktree_path, "origin", "HEAD") {
            Ok(()) => Ok(()),
            Err(e) if e.is_upstream_missing() => {
                let branch = self
                    .git
                    .current_branch(worktree_path)?
                    .ok_or_else(|| crate::error::Error::validation("detached HEAD has no branch to push"))?;
                self.git.push_set_upstream(worktree_path, "origin", &branch)
            }
            Err(e) => Err(e),
        }
    }
}
