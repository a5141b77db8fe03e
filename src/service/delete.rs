//! `Delete(name, remove_files, force_worktrees)` (§4.4.5).

use crate::error::Result;
use crate::worktree::WorktreeManager;

use super::WorkspaceService;

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub name: String,
    pub remove_files: bool,
    pub force_worktrees: bool,
}

impl<'a> WorkspaceService<'a> {
    pub fn delete(&self, req: &DeleteRequest) -> Result<()> {
        let workspace = self.deps.config_store.load_workspace(&req.name)?;

        let manager = WorktreeManager::new(self.deps.git, self.deps.fs, self.deps.prompter);
        for repo in &workspace.repositories {
            let target = workspace.worktree_path(repo);
            manager.remove(&repo.path, &target, req.force_worktrees, false)?;
        }

        if req.remove_files {
            self.deps.fs.remove_all(&workspace.path)?;
        } else {
            for path in [
                workspace.go_work_path(),
                workspace.path.join("go.work.sum"),
                workspace.agent_md_path(),
            ] {
                if self.deps.fs.exists(&path) {
                    self.deps.fs.remove_file(&path)?;
                }
            }
        }

        self.deps.config_store.delete_workspace_document(&req.name)
    }
}
