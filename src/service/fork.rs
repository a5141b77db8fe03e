//! `Fork(req)` (§4.4.2): create a workspace whose branch forks off a source
//! workspace's current branch.

use crate::error::{Error, Result};
use crate::model::Workspace;

use super::create::CreateRequest;
use super::WorkspaceService;

#[derive(Debug, Clone, Default)]
pub struct ForkRequest {
    pub source_workspace: Option<String>,
    pub cwd: Option<std::path::PathBuf>,
    pub new_name: String,
    pub branch: String,
    pub agent_md_override: Option<String>,
    pub dry_run: bool,
}

const DEFAULT_BRANCH_PREFIX: &str = "task";

impl<'a> WorkspaceService<'a> {
    pub fn fork(&self, req: &ForkRequest) -> Result<Workspace> {
        let source_name = match (&req.source_workspace, &req.cwd) {
            (Some(name), _) => name.clone(),
            (None, Some(cwd)) => self.detect_workspace(cwd)?,
            (None, None) => {
                return Err(Error::validation(
                    "fork requires either an explicit source workspace or a cwd to detect one from",
                ))
            }
        };

        let source = self.deps.config_store.load_workspace(&source_name)?;
        let status = self.status(&source)?;

        let mut offenders = Vec::new();
        for repo_status in &status.repositories {
            if repo_status.current_branch.as_deref() != Some(source.branch.as_str()) {
                offenders.push(repo_status.name.clone());
            }
        }
        if !offenders.is_empty() {
            return Err(Error::BranchDrift {
                repo: offenders.join(", "),
                expected: source.branch.clone(),
                actual: "varies".to_string(),
            });
        }

        let branch = if req.branch.trim().is_empty() {
            format!("{DEFAULT_BRANCH_PREFIX}/{}", req.new_name)
        } else {
            req.branch.clone()
        };

        self.create(&CreateRequest {
            name: req.new_name.clone(),
            repository_names: source.member_names(),
            branch,
            base_branch: Some(source.branch.clone()),
            agent_md: req
                .agent_md_override
                .clone()
                .or_else(|| source.agent_md.clone()),
            dry_run: req.dry_run,
        })
    }
}
