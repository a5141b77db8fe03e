//! `MergeOrchestrator` (§4.4.8): the per-repository merge-back protocol and
//! its best-effort local rollback.

use crate::error::{Error, Result};
use crate::model::Workspace;
use crate::ports::GitClient;

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub force: bool,
    pub keep_workspace: bool,
}

pub struct MergeOrchestrator<'a> {
    git: &'a dyn GitClient,
}

impl<'a> MergeOrchestrator<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    /// Run the merge-back protocol for every member. Stops at the first
    /// per-repository failure and attempts the documented local rollback
    /// for repositories already merged in this call.
    pub fn merge(&self, workspace: &Workspace, options: &MergeOptions) -> Result<()> {
        let base_branch = workspace
            .base_branch
            .as_deref()
            .ok_or_else(|| Error::validation("workspace has no base_branch; not a fork"))?;

        if !options.force {
            self.assert_clean_and_on_branch(workspace, &workspace.branch)?;
        }

        let mut merged = Vec::new();
        for repo in &workspace.repositories {
            let worktree_path = workspace.worktree_path(repo);
            match self.merge_one(&repo.name, &worktree_path, base_branch, &workspace.branch) {
                Ok(()) => merged.push(worktree_path),
                Err(cause) => {
                    let rollback_summary = self.rollback(&merged, base_branch);
                    return Err(Error::MergeFailed {
                        cause: Box::new(cause),
                        rollback_summary,
                        remote_unreverted: !merged.is_empty(),
                    });
                }
            }
        }
        Ok(())
    }

    fn assert_clean_and_on_branch(&self, workspace: &Workspace, branch: &str) -> Result<()> {
        let mut offenders = Vec::new();
        for repo in &workspace.repositories {
            let worktree_path = workspace.worktree_path(repo);
            let on_branch = self
                .git
                .current_branch(&worktree_path)
                .ok()
                .flatten()
                .as_deref()
                == Some(branch);
            let clean = self
                .git
                .has_changes(&worktree_path)
                .map(|dirty| !dirty)
                .unwrap_or(false);
            if !on_branch || !clean {
                offenders.push(repo.name.clone());
            }
        }
        if offenders.is_empty() {
            Ok(())
        } else {
            Err(Error::UncleanRepositories { names: offenders })
        }
    }

    /// Per-repository protocol (§4.4.8): fetch, checkout base, pull base,
    /// merge the working branch, push base. Conflicts abort immediately.
    fn merge_one(&self, name: &str, worktree_path: &std::path::Path, base_branch: &str, branch: &str) -> Result<()> {
        self.git.fetch(worktree_path, "origin")?;
        self.git.checkout(worktree_path, base_branch)?;
        self.git.pull(worktree_path, false)?;
        match self.git.merge(worktree_path, branch) {
            Ok(()) => {}
            Err(e) if e.is_merge_conflict() => {
                return Err(Error::MergeConflict {
                    repository: name.to_string(),
                })
            }
            Err(e) => return Err(e),
        }
        self.git.push(worktree_path, "origin", base_branch)
    }

    /// Best-effort local rollback: checkout base, hard-reset to the remote
    /// tip. The merge commit has already been pushed upstream in each of
    /// these repositories and cannot be un-pushed by this tool.
    fn rollback(&self, merged: &[std::path::PathBuf], base_branch: &str) -> String {
        let mut undone = 0;
        for worktree_path in merged {
            if self.git.checkout(worktree_path, base_branch).is_ok()
                && self
                    .git
                    .reset_hard(worktree_path, &format!("origin/{base_branch}"))
                    .is_ok()
            {
                undone += 1;
            }
        }
        format!(
            "reset {undone} of {} already-merged repositories to origin/{base_branch} locally",
            merged.len()
        )
    }
}
