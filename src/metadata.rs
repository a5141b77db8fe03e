//! `MetadataBuilder` (§4.6): canonical JSON for the in-tree `.wsm/wsm.json`
//! document, plus the environment variable map downstream tooling reads.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Workspace;
use crate::ports::Clock;

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub path: std::path::PathBuf,
    pub categories: std::collections::BTreeSet<String>,
    pub worktree_path: std::path::PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub name: String,
    pub path: std::path::PathBuf,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    pub go_workspace: bool,
    pub agent_md: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub repositories: Vec<RepositoryRecord>,
    pub environment: BTreeMap<String, String>,
}

pub struct MetadataBuilder<'a> {
    clock: &'a dyn Clock,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Build the metadata document for `workspace`. `created_at` is taken
    /// from the workspace itself (set once at creation); `updated_at` is
    /// the clock's current time.
    pub fn build(&self, workspace: &Workspace) -> Metadata {
        let repositories: Vec<RepositoryRecord> = workspace
            .repositories
            .iter()
            .map(|repo| RepositoryRecord {
                name: repo.name.clone(),
                path: repo.path.clone(),
                categories: repo.categories.clone(),
                worktree_path: workspace.worktree_path(repo),
            })
            .collect();

        Metadata {
            name: workspace.name.clone(),
            path: workspace.path.clone(),
            branch: workspace.branch.clone(),
            base_branch: workspace.base_branch.clone(),
            go_workspace: workspace.go_workspace,
            agent_md: workspace.agent_md.is_some(),
            created_at: workspace.created,
            updated_at: self.clock.now(),
            environment: environment_map(workspace),
            repositories,
        }
    }

    pub fn to_json(&self, workspace: &Workspace) -> crate::error::Result<String> {
        serde_json::to_string_pretty(&self.build(workspace)).map_err(|e| crate::error::Error::Parse {
            path: workspace.metadata_path(),
            underlying: e.to_string(),
        })
    }
}

/// `WSM_WORKSPACE_NAME`, `WSM_WORKSPACE_PATH`, `WSM_WORKSPACE_BRANCH`,
/// `WSM_WORKSPACE_BASE_BRANCH` (only when set), `WSM_WORKSPACE_REPOS`.
pub fn environment_map(workspace: &Workspace) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("WSM_WORKSPACE_NAME".to_string(), workspace.name.clone());
    env.insert(
        "WSM_WORKSPACE_PATH".to_string(),
        workspace.path.display().to_string(),
    );
    env.insert("WSM_WORKSPACE_BRANCH".to_string(), workspace.branch.clone());
    if let Some(base) = &workspace.base_branch {
        env.insert("WSM_WORKSPACE_BASE_BRANCH".to_string(), base.clone());
    }
    env.insert(
        "WSM_WORKSPACE_REPOS".to_string(),
        workspace.member_names().join(","),
    );
    env
}
