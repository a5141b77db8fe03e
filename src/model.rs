//! The data model: [`Repository`], [`RepositoryRegistry`], [`Workspace`], and
//! [`WorkspaceStatus`], exactly as specified. Field naming is `snake_case` so
//! the derived `Serialize`/`Deserialize` impls match the on-disk JSON shape.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A project category, derived from marker files during discovery.
pub type Category = String;

/// A registry entry referencing an on-disk git repository.
///
/// `path` is the primary merge key: adding a repository with the same `path`
/// replaces the previous entry (see [`RepositoryRegistry::upsert`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub current_branch: Option<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub last_commit: Option<String>,
    #[serde(default)]
    pub last_scan: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    /// Unknown fields from a newer document version, preserved on round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Repository {
    pub fn is_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn is_go_project(&self) -> bool {
        self.is_category("go")
    }
}

/// A mapping from `path -> Repository`, plus a `last_scan` timestamp.
///
/// Persisted as one JSON document (`registry.json`) under the user config
/// directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryRegistry {
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub last_scan: Option<chrono::DateTime<chrono::Utc>>,
}

impl RepositoryRegistry {
    /// Insert or replace an entry by `path` (the primary merge key).
    pub fn upsert(&mut self, repo: Repository) {
        match self.repositories.iter_mut().find(|r| r.path == repo.path) {
            Some(existing) => *existing = repo,
            None => self.repositories.push(repo),
        }
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.path == path)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Resolve every name in `names`, failing with the full list of any that
    /// do not resolve (never a partial list). Order of the returned vector
    /// matches `names`.
    pub fn find_repositories(&self, names: &[String]) -> crate::error::Result<Vec<Repository>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.find_by_name(name) {
                Some(repo) => found.push(repo.clone()),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(crate::error::Error::RepositoriesNotFound { missing });
        }
        Ok(found)
    }
}

/// A materialized composite of member repositories, each as a sibling git
/// worktree pinned to a shared working branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub path: PathBuf,
    pub repositories: Vec<Repository>,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    pub go_workspace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_md: Option<String>,
    pub created: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Workspace {
    /// `derive go_workspace from repositories` — invariant 3 of §3.
    pub fn derive_go_workspace(repositories: &[Repository]) -> bool {
        repositories.iter().any(Repository::is_go_project)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(".wsm").join("wsm.json")
    }

    pub fn go_work_path(&self) -> PathBuf {
        self.path.join("go.work")
    }

    pub fn agent_md_path(&self) -> PathBuf {
        self.path.join("AGENT.md")
    }

    pub fn worktree_path(&self, repo: &Repository) -> PathBuf {
        self.path.join(&repo.name)
    }

    pub fn member_names(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.name.clone()).collect()
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.repositories.iter().any(|r| r.name == name)
    }
}

/// Overall workspace status: a closed enumeration (sum type), not a string
/// constant, per the redesign note in §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverallStatus {
    Clean,
    Dirty,
    Staged,
    Conflicts,
    Ahead,
    Behind,
    Diverged,
    Empty,
}

/// Per-repository status, recomputed on demand (never persisted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoStatus {
    pub name: String,
    pub current_branch: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub has_conflicts: bool,
    pub is_merged: bool,
    pub needs_rebase: bool,
}

impl RepoStatus {
    /// Single-repo status precedence, used to roll per-repo facts up into one
    /// [`OverallStatus`] alongside the rest of the workspace's members.
    pub fn overall(&self) -> OverallStatus {
        if self.has_conflicts {
            OverallStatus::Conflicts
        } else if !self.staged.is_empty() {
            OverallStatus::Staged
        } else if !self.modified.is_empty() || !self.untracked.is_empty() {
            OverallStatus::Dirty
        } else if self.ahead > 0 && self.behind > 0 {
            OverallStatus::Diverged
        } else if self.ahead > 0 {
            OverallStatus::Ahead
        } else if self.behind > 0 {
            OverallStatus::Behind
        } else {
            OverallStatus::Clean
        }
    }
}

/// Workspace-level status: one entry per member plus the rolled-up overall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceStatus {
    pub repositories: Vec<RepoStatus>,
    pub overall: OverallStatus,
}

/// Outcome of one repository's participation in a fan-out operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub repository: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationOutcome {
    pub fn ok(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            success: true,
            message: None,
        }
    }

    pub fn failed(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn warning(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Result of a branch fan-out (`CreateBranch`/`SwitchBranch`/`ListBranches`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchResult {
    pub repository: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub branch: String,
}

/// Result of one repository's participation in `Sync`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub repository: String,
    pub pulled: bool,
    pub pushed: bool,
    pub conflicts: bool,
    pub ahead_before: u32,
    pub behind_before: u32,
    pub ahead_after: u32,
    pub behind_after: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub dry_run: bool,
}

/// Global configuration document (`config.json`), self-documenting via its
/// derived JSON schema (see [`crate::config_store::ConfigStore::schema`]).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    pub workspace_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub registry_path: PathBuf,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, categories: &[&str]) -> Repository {
        Repository {
            name: name.to_string(),
            path: PathBuf::from(format!("/repos/{name}")),
            remote_url: None,
            current_branch: None,
            branches: vec![],
            tags: vec![],
            last_commit: None,
            last_scan: None,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            extra: Default::default(),
        }
    }

    #[test]
    fn registry_upsert_replaces_by_path() {
        let mut registry = RepositoryRegistry::default();
        registry.upsert(repo("a", &["go"]));
        registry.upsert(Repository {
            current_branch: Some("main".into()),
            ..repo("a", &["go", "docker"])
        });
        assert_eq!(registry.repositories.len(), 1);
        assert_eq!(registry.repositories[0].categories.len(), 2);
        assert_eq!(
            registry.repositories[0].current_branch,
            Some("main".to_string())
        );
    }

    #[test]
    fn find_repositories_fails_with_full_missing_list() {
        let mut registry = RepositoryRegistry::default();
        registry.upsert(repo("a", &[]));
        let err = registry
            .find_repositories(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap_err();
        match err {
            crate::error::Error::RepositoriesNotFound { missing } => {
                assert_eq!(missing, vec!["b".to_string(), "c".to_string()]);
            }
            _ => panic!("expected RepositoriesNotFound"),
        }
    }

    #[test]
    fn derive_go_workspace_true_if_any_repo_is_go() {
        let repos = vec![repo("a", &["nodejs"]), repo("b", &["go"])];
        assert!(Workspace::derive_go_workspace(&repos));
    }

    #[test]
    fn derive_go_workspace_false_if_none() {
        let repos = vec![repo("a", &["nodejs"]), repo("b", &["rust"])];
        assert!(!Workspace::derive_go_workspace(&repos));
    }

    #[test]
    fn overall_status_precedence_conflicts_first() {
        let status = RepoStatus {
            name: "a".into(),
            current_branch: Some("main".into()),
            ahead: 1,
            behind: 1,
            staged: vec!["x".into()],
            modified: vec![],
            untracked: vec![],
            has_conflicts: true,
            is_merged: false,
            needs_rebase: false,
        };
        assert_eq!(status.overall(), OverallStatus::Conflicts);
    }

    #[test]
    fn overall_status_diverged_when_ahead_and_behind() {
        let status = RepoStatus {
            name: "a".into(),
            current_branch: Some("main".into()),
            ahead: 2,
            behind: 3,
            staged: vec![],
            modified: vec![],
            untracked: vec![],
            has_conflicts: false,
            is_merged: false,
            needs_rebase: false,
        };
        assert_eq!(status.overall(), OverallStatus::Diverged);
    }
}
