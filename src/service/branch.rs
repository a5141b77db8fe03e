//! `CreateBranch` / `SwitchBranch` / `ListBranches` (§4.4.6): fan-out
//! per-member branch operations. Never halts on a per-repository failure
//! and never rolls back — branch moves are the user's mental model.

use crate::error::Result;
use crate::model::{BranchResult, Workspace};

use super::WorkspaceService;

#[derive(Debug, Clone)]
pub struct BranchFanOutRequest {
    pub workspace_name: String,
    pub branch: String,
}

pub enum BranchOp {
    Create { from: Option<String> },
    Switch,
    List,
}

impl<'a> WorkspaceService<'a> {
    pub fn create_branch(&self, req: &BranchFanOutRequest, from: Option<&str>) -> Result<Vec<BranchResult>> {
        let workspace = self.deps.config_store.load_workspace(&req.workspace_name)?;
        Ok(self.fan_out_branch_op(&workspace, &req.branch, BranchOp::Create { from: from.map(str::to_string) }))
    }

    pub fn switch_branch(&self, req: &BranchFanOutRequest) -> Result<Vec<BranchResult>> {
        let workspace = self.deps.config_store.load_workspace(&req.workspace_name)?;
        Ok(self.fan_out_branch_op(&workspace, &req.branch, BranchOp::Switch))
    }

    pub fn list_branches(&self, workspace_name: &str) -> Result<Vec<BranchResult>> {
        let workspace = self.deps.config_store.load_workspace(workspace_name)?;
        Ok(self.fan_out_branch_op(&workspace, "", BranchOp::List))
    }

    fn fan_out_branch_op(&self, workspace: &Workspace, branch: &str, op: BranchOp) -> Vec<BranchResult> {
        workspace
            .repositories
            .iter()
            .map(|repo| {
                let worktree_path = workspace.worktree_path(repo);
                let outcome = match &op {
                    BranchOp::Create { from } => self
                        .deps
                        .git
                        .create_branch(&worktree_path, branch, from.as_deref())
                        .map(|()| branch.to_string()),
                    BranchOp::Switch => self
                        .deps
                        .git
                        .switch_branch(&worktree_path, branch)
                        .map(|()| branch.to_string()),
                    BranchOp::List => self
                        .deps
                        .git
                        .current_branch(&worktree_path)
                        .map(|b| b.unwrap_or_default()),
                };
                match outcome {
                    Ok(branch) => BranchResult {
                        repository: repo.name.clone(),
                        success: true,
                        error: None,
                        branch,
                    },
                    Err(e) => BranchResult {
                        repository: repo.name.clone(),
                        success: false,
                        error: Some(e.to_string()),
                        branch: branch.to_string(),
                    },
                }
            })
            .collect()
    }
}
