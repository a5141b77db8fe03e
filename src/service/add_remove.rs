//! `AddRepositories` (§4.4.3) and `RemoveRepositories` (§4.4.4).

use crate::error::{Error, Result};
use crate::goworkspace;
use crate::metadata::MetadataBuilder;
use crate::model::{OperationOutcome, Workspace};
use crate::worktree::{CreateOptions, WorktreeManager};

use super::WorkspaceService;

#[derive(Debug, Clone, Default)]
pub struct AddRepositoriesRequest {
    pub workspace_name: String,
    pub repository_names: Vec<String>,
    pub branch: Option<String>,
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveRepositoriesRequest {
    pub workspace_name: String,
    pub repository_names: Vec<String>,
    pub force: bool,
    pub remove_files: bool,
    pub dry_run: bool,
}

impl<'a> WorkspaceService<'a> {
    pub fn add_repositories(&self, req: &AddRepositoriesRequest) -> Result<Workspace> {
        let mut workspace = self.deps.config_store.load_workspace(&req.workspace_name)?;

        let already_members: Vec<String> = req
            .repository_names
            .iter()
            .filter(|name| workspace.has_member(name))
            .cloned()
            .collect();
        if !already_members.is_empty() {
            return Err(Error::already_exists(already_members.join(", ")));
        }

        let registry = self.deps.config_store.load_registry()?;
        let new_repos = registry.find_repositories(&req.repository_names)?;

        let branch = req.branch.clone().unwrap_or_else(|| workspace.branch.clone());

        if req.dry_run {
            workspace.repositories.extend(new_repos);
            workspace.go_workspace = Workspace::derive_go_workspace(&workspace.repositories);
            return Ok(workspace);
        }

        let manager = WorktreeManager::new(self.deps.git, self.deps.fs, self.deps.prompter);
        let mut created = Vec::new();
        let result = (|| -> Result<()> {
            for repo in &new_repos {
                let target = workspace.worktree_path(repo);
                manager.create(
                    &repo.path,
                    &target,
                    Some(&branch),
                    &CreateOptions {
                        force: req.force,
                        base_branch: workspace.base_branch.clone(),
                        ..Default::default()
                    },
                )?;
                created.push((repo.path.clone(), target));
            }
            Ok(())
        })();

        if let Err(cause) = result {
            let mut removed = 0;
            for (repo_path, target) in created.iter().rev() {
                if manager.remove(repo_path, target, true, true).is_ok() {
                    removed += 1;
                }
            }
            return Err(Error::AddFailed {
                cause: Box::new(cause),
                rollback_summary: format!("removed {removed} of {} newly created worktrees", created.len()),
            });
        }

        workspace.repositories.extend(new_repos);
        workspace.go_workspace = Workspace::derive_go_workspace(&workspace.repositories);
        self.rewrite_go_workspace(&workspace)?;
        self.persist(&workspace)?;
        Ok(workspace)
    }

    pub fn remove_repositories(&self, req: &RemoveRepositoriesRequest) -> Result<(Workspace, Vec<OperationOutcome>)> {
        let mut workspace = self.deps.config_store.load_workspace(&req.workspace_name)?;

        let missing: Vec<String> = req
            .repository_names
            .iter()
            .filter(|name| !workspace.has_member(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Error::RepositoriesNotFound { missing });
        }

        if req.dry_run {
            let outcomes = req
                .repository_names
                .iter()
                .map(|name| OperationOutcome::ok(name.clone()))
                .collect();
            return Ok((workspace, outcomes));
        }

        let manager = WorktreeManager::new(self.deps.git, self.deps.fs, self.deps.prompter);
        let mut outcomes = Vec::new();
        for name in &req.repository_names {
            let Some(repo) = workspace.repositories.iter().find(|r| &r.name == name).cloned() else {
                continue;
            };
            let target = workspace.worktree_path(&repo);
            let outcome = manager
                .remove(&repo.path, &target, req.force, false)
                .and_then(|()| {
                    if req.remove_files {
                        self.deps.fs.remove_all(&target)
                    } else {
                        Ok(())
                    }
                });
            match outcome {
                Ok(()) => outcomes.push(OperationOutcome::ok(name.clone())),
                Err(e) => outcomes.push(OperationOutcome::failed(name.clone(), e.to_string())),
            }
        }

        let removed: std::collections::HashSet<&String> = outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| &o.repository)
            .collect();
        workspace.repositories.retain(|r| !removed.contains(&r.name));
        workspace.go_workspace = Workspace::derive_go_workspace(&workspace.repositories);

        self.rewrite_go_workspace(&workspace)?;
        self.persist(&workspace)?;
        Ok((workspace, outcomes))
    }

    /// Rewrite `go.work` if the workspace still carries `go` members;
    /// delete it otherwise (§4.4.4 step 3).
    pub(super) fn rewrite_go_workspace(&self, workspace: &Workspace) -> Result<()> {
        if !workspace.go_workspace {
            return if self.deps.fs.exists(&workspace.go_work_path()) {
                self.deps.fs.remove_file(&workspace.go_work_path())
            } else {
                Ok(())
            };
        }
        match goworkspace::render(workspace, &self.detect_go_version()) {
            Some(contents) => self.deps.fs.write(&workspace.go_work_path(), &contents),
            None => Ok(()),
        }
    }

    pub(super) fn persist(&self, workspace: &Workspace) -> Result<()> {
        let metadata_json = MetadataBuilder::new(self.deps.clock).to_json(workspace)?;
        self.deps.config_store.save_workspace(workspace, &metadata_json)
    }
}
