//! `StatusService` (§4.5): per-repository status plus the rolled-up overall.

use crate::error::Result;
use crate::model::{OverallStatus, RepoStatus, Workspace, WorkspaceStatus};
use crate::ports::GitClient;

pub struct StatusService<'a> {
    git: &'a dyn GitClient,
}

impl<'a> StatusService<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    pub fn status(&self, workspace: &Workspace) -> Result<WorkspaceStatus> {
        if workspace.repositories.is_empty() {
            return Ok(WorkspaceStatus {
                repositories: Vec::new(),
                overall: OverallStatus::Empty,
            });
        }

        let mut repositories = Vec::with_capacity(workspace.repositories.len());
        for repo in &workspace.repositories {
            let worktree_path = workspace.worktree_path(repo);
            repositories.push(self.repo_status(&worktree_path, &repo.name)?);
        }

        let overall = aggregate(&repositories);
        Ok(WorkspaceStatus {
            repositories,
            overall,
        })
    }

    fn repo_status(&self, worktree_path: &std::path::Path, name: &str) -> Result<RepoStatus> {
        let current_branch = self.git.current_branch(worktree_path)?;
        let status = self.git.status(worktree_path)?;
        let default_branch = self
            .git
            .default_branch(worktree_path)
            .unwrap_or_else(|_| "main".to_string());
        let upstream = format!("origin/{default_branch}");
        let ahead_behind = self.git.ahead_behind(worktree_path, &upstream)?;

        let is_on_default = current_branch.as_deref() == Some(default_branch.as_str());
        let needs_rebase = if is_on_default {
            false
        } else {
            self.git.commits_ahead(worktree_path, &upstream).unwrap_or(0) > 0
        };
        let is_merged = !is_on_default && ahead_behind.ahead == 0;

        Ok(RepoStatus {
            name: name.to_string(),
            current_branch,
            ahead: ahead_behind.ahead,
            behind: ahead_behind.behind,
            staged: status.staged,
            modified: status.modified,
            untracked: status.untracked,
            has_conflicts: !status.conflicts.is_empty(),
            is_merged,
            needs_rebase,
        })
    }
}

/// Roll per-repo statuses up into one `OverallStatus` by the §4.5
/// precedence: `conflicts > staged > dirty > diverged > ahead > behind >
/// clean`.
pub fn aggregate(repositories: &[RepoStatus]) -> OverallStatus {
    if repositories.is_empty() {
        return OverallStatus::Empty;
    }
    if repositories.iter().any(|r| r.has_conflicts) {
        return OverallStatus::Conflicts;
    }
    if repositories.iter().any(|r| !r.staged.is_empty()) {
        return OverallStatus::Staged;
    }
    if repositories
        .iter()
        .any(|r| !r.modified.is_empty() || !r.untracked.is_empty())
    {
        return OverallStatus::Dirty;
    }
    if repositories.iter().any(|r| r.ahead > 0 && r.behind > 0) {
        return OverallStatus::Diverged;
    }
    if repositories.iter().any(|r| r.ahead > 0) {
        return OverallStatus::Ahead;
    }
    if repositories.iter().any(|r| r.behind > 0) {
        return OverallStatus::Behind;
    }
    OverallStatus::Clean
}
