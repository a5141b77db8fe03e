//! `WorktreeManager`: turns a resolved branch decision (§4.3.1) into actual
//! `GitClient` calls, and owns worktree removal and listing (§4.3.2).

use std::path::Path;

use crate::error::{Error, Result};
use crate::ports::{FileSystem, GitClient, NewBranchSpec, Prompter, WorktreeAddOptions, WorktreeInfo};

use super::resolution::{self, Resolution, ResolutionInputs};

/// Options accepted by [`WorktreeManager::create`]. `remote_exists_hint`
/// lets a caller that already queried the remote (e.g. during discovery)
/// skip a redundant round trip.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub force: bool,
    pub base_branch: Option<String>,
    pub remote_exists_hint: Option<bool>,
}

pub struct WorktreeManager<'a> {
    git: &'a dyn GitClient,
    fs: &'a dyn FileSystem,
    prompter: &'a dyn Prompter,
}

impl<'a> WorktreeManager<'a> {
    pub fn new(git: &'a dyn GitClient, fs: &'a dyn FileSystem, prompter: &'a dyn Prompter) -> Self {
        Self { git, fs, prompter }
    }

    /// Execute the §4.3.1 decision table against `repo_path`, then create
    /// the worktree at `target_path` accordingly.
    pub fn create(
        &self,
        repo_path: &Path,
        target_path: &Path,
        branch: Option<&str>,
        opts: &CreateOptions,
    ) -> Result<()> {
        if self.fs.is_nonempty_dir(target_path) {
            return Err(Error::already_exists(target_path.display().to_string()));
        }

        let local_exists = match branch {
            Some(b) => self.git.branch_exists(repo_path, b)?,
            None => false,
        };
        let remote_exists = match (branch, opts.remote_exists_hint) {
            (_, Some(hint)) => hint,
            (Some(b), None) => self.git.remote_branch_exists(repo_path, b)?,
            (None, None) => false,
        };

        let inputs = ResolutionInputs {
            branch: branch.map(str::to_string),
            base_branch: opts.base_branch.clone(),
            local_exists,
            remote_exists,
            force: opts.force,
        };

        match resolution::resolve(&inputs, self.prompter)? {
            Resolution::DetachedHead => self.git.worktree_add(
                repo_path,
                "",
                target_path,
                &WorktreeAddOptions {
                    detached: true,
                    ..Default::default()
                },
            ),
            Resolution::TrackRemote { branch } => self.git.worktree_add(
                repo_path,
                &branch,
                target_path,
                &WorktreeAddOptions {
                    track_remote: true,
                    ..Default::default()
                },
            ),
            Resolution::NewBranch { branch, base } => self.git.worktree_add(
                repo_path,
                &branch,
                target_path,
                &WorktreeAddOptions {
                    new_branch: Some(NewBranchSpec { base }),
                    ..Default::default()
                },
            ),
            Resolution::ResetToRemote { branch } => {
                self.git
                    .reset_branch_to(repo_path, &branch, &format!("origin/{branch}"))?;
                self.git
                    .worktree_add(repo_path, &branch, target_path, &WorktreeAddOptions::default())
            }
            Resolution::RecreateFromBase { branch, base } => {
                let from = base.as_deref();
                self.git.create_branch(repo_path, &branch, from)?;
                self.git
                    .worktree_add(repo_path, &branch, target_path, &WorktreeAddOptions::default())
            }
            Resolution::UseExisting { branch } => {
                self.git
                    .worktree_add(repo_path, &branch, target_path, &WorktreeAddOptions::default())
            }
            Resolution::Cancelled => Err(Error::Cancelled {
                reason: format!(
                    "branch {} already exists",
                    branch.unwrap_or_default()
                ),
            }),
        }
    }

    /// Remove the worktree at `target_path`. A no-op (not an error) if the
    /// path does not exist (§4.3.2 idempotence). With `force == false`,
    /// refuses if untracked files are present; with `force == true`,
    /// requires an explicit confirmation unless `already_confirmed`.
    pub fn remove(&self, repo_path: &Path, target_path: &Path, force: bool, already_confirmed: bool) -> Result<()> {
        if !self.fs.exists(target_path) {
            return Ok(());
        }

        if !force {
            let untracked = self.git.untracked_files(target_path)?;
            if !untracked.is_empty() {
                return Err(Error::UntrackedPresent { files: untracked });
            }
        } else if !already_confirmed
            && !self
                .prompter
                .confirm(&format!("remove worktree {}?", target_path.display()))?
        {
            return Err(Error::Cancelled {
                reason: "worktree removal declined".into(),
            });
        }

        self.git.worktree_remove(repo_path, target_path, force)
    }

    pub fn list(&self, repo_path: &Path) -> Result<Vec<WorktreeInfo>> {
        self.git.worktree_list(repo_path)
    }
}
