//! `Create(req)` (§4.4.1): the workspace-creation protocol, including the
//! reverse-order rollback on any failure in steps 6-10.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::goworkspace;
use crate::metadata::MetadataBuilder;
use crate::model::Workspace;
use crate::worktree::{CreateOptions, WorktreeManager};

use super::WorkspaceService;

#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub name: String,
    pub repository_names: Vec<String>,
    /// Empty ⇒ auto-generated as `<prefix>/<name>`, default prefix `task`.
    pub branch: String,
    pub base_branch: Option<String>,
    pub agent_md: Option<String>,
    pub dry_run: bool,
}

const DEFAULT_BRANCH_PREFIX: &str = "task";

impl<'a> WorkspaceService<'a> {
    pub fn create(&self, req: &CreateRequest) -> Result<Workspace> {
        if req.name.trim().is_empty() {
            return Err(Error::validation("workspace name must not be empty"));
        }

        let registry = self.deps.config_store.load_registry()?;
        let repositories = registry.find_repositories(&req.repository_names)?;

        let config = self.deps.config_store.load_config()?;
        // Sanitize before using the name as a path segment: it comes straight
        // from the CLI/API caller and must not smuggle `/` or `..` into the
        // workspace directory layout.
        let dir_name = sanitize_filename::sanitize(&req.name);
        let workspace_path = config.workspace_dir.join(&dir_name);
        if self.deps.fs.is_nonempty_dir(&workspace_path) {
            return Err(Error::already_exists(workspace_path.display().to_string()));
        }

        let branch = if req.branch.trim().is_empty() {
            format!("{DEFAULT_BRANCH_PREFIX}/{}", req.name)
        } else {
            req.branch.clone()
        };

        let go_workspace = Workspace::derive_go_workspace(&repositories);
        let workspace = Workspace {
            name: req.name.clone(),
            path: workspace_path.clone(),
            repositories,
            branch,
            base_branch: req.base_branch.clone(),
            go_workspace,
            agent_md: req.agent_md.clone(),
            created: self.deps.clock.now(),
            extra: Default::default(),
        };

        if req.dry_run {
            return Ok(workspace);
        }

        self.materialize(&workspace)?;
        Ok(workspace)
    }

    /// Steps 6-11 of §4.4.1: create the directory, every member worktree,
    /// the auxiliary artifacts, and the two metadata documents, rolling
    /// back everything created so far if any step fails.
    fn materialize(&self, workspace: &Workspace) -> Result<()> {
        let manager = WorktreeManager::new(self.deps.git, self.deps.fs, self.deps.prompter);
        let mut created: Vec<(PathBuf, PathBuf)> = Vec::new();

        let result = (|| -> Result<()> {
            self.deps.fs.create_dir_all(&workspace.path)?;

            for repo in &workspace.repositories {
                let target = workspace.worktree_path(repo);
                manager.create(&repo.path, &target, Some(&workspace.branch), &CreateOptions {
                    base_branch: workspace.base_branch.clone(),
                    ..Default::default()
                })?;
                created.push((repo.path.clone(), target));
            }

            if workspace.go_workspace {
                let go_version = self.detect_go_version();
                if let Some(contents) = goworkspace::render(workspace, &go_version) {
                    self.deps.fs.write(&workspace.go_work_path(), &contents)?;
                }
            }

            if let Some(agent_md) = &workspace.agent_md {
                self.deps.fs.write(&workspace.agent_md_path(), agent_md)?;
            }

            let metadata_json = MetadataBuilder::new(self.deps.clock).to_json(workspace)?;
            self.deps
                .config_store
                .save_workspace(workspace, &metadata_json)?;
            Ok(())
        })();

        if let Err(cause) = result {
            let rollback_summary = self.rollback_created(&manager, &created, &workspace.path);
            return Err(Error::CreateFailed {
                cause: Box::new(cause),
                rollback_summary,
            });
        }
        Ok(())
    }

    /// Reverse-order worktree removal, then the workspace directory itself
    /// if it contains nothing but artifacts this call produced (§4.4.1 step
    /// 11, §5's cancellation semantics).
    pub(super) fn rollback_created(
        &self,
        manager: &WorktreeManager<'_>,
        created: &[(PathBuf, PathBuf)],
        workspace_path: &std::path::Path,
    ) -> String {
        let mut removed = 0;
        for (repo_path, target) in created.iter().rev() {
            if manager.remove(repo_path, target, true, true).is_ok() {
                removed += 1;
            }
        }
        let directory_removed = self.deps.fs.remove_all(workspace_path).is_ok();
        format!(
            "removed {removed} of {} worktrees; workspace directory {}",
            created.len(),
            if directory_removed { "removed" } else { "left in place" }
        )
    }
}
