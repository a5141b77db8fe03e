//! `WorkspaceService` (§4.4): the orchestrator. Each public operation lives
//! in its own submodule; this file only defines the shared `Deps` bundle and
//! request/response shapes common to more than one operation.

mod add_remove;
mod branch;
mod create;
mod delete;
mod detect;
mod fork;

pub use add_remove::{AddRepositoriesRequest, RemoveRepositoriesRequest};
pub use branch::BranchFanOutRequest;
pub use create::CreateRequest;
pub use delete::DeleteRequest;
pub use fork::ForkRequest;

use crate::config_store::ConfigStore;
use crate::error::Result;
use crate::merge::{MergeOptions, MergeOrchestrator};
use crate::model::{SyncResult, Workspace, WorkspaceStatus};
use crate::ports::{Clock, FileSystem, GitClient, GoToolchain, Logger, Prompter};
use crate::status::StatusService;
use crate::sync::{SyncOptions, SyncService};

/// Every capability a `WorkspaceService` operation needs, bundled so
/// constructing one doesn't require five separate parameters at every call
/// site. Borrowed, not owned: callers own the concrete adapters and decide
/// their lifetime (typically the CLI's `main`).
pub struct Deps<'a> {
    pub git: &'a dyn GitClient,
    pub fs: &'a dyn FileSystem,
    pub clock: &'a dyn Clock,
    pub logger: &'a dyn Logger,
    pub prompter: &'a dyn Prompter,
    pub go_toolchain: &'a dyn GoToolchain,
    pub config_store: &'a ConfigStore<'a>,
}

pub struct WorkspaceService<'a> {
    pub(crate) deps: Deps<'a>,
}

impl<'a> WorkspaceService<'a> {
    pub fn new(deps: Deps<'a>) -> Self {
        Self { deps }
    }

    /// Exposed so a caller (the CLI binary) can reach the registry and
    /// workspace documents directly for listing/discovery commands that
    /// aren't themselves an orchestration operation.
    pub fn config_store(&self) -> &'a ConfigStore<'a> {
        self.deps.config_store
    }

    /// §4.5. Exposed at the service layer so `Fork` can check branch
    /// uniformity and a CLI can report status without constructing its own
    /// `StatusService`.
    pub fn status(&self, workspace: &Workspace) -> Result<WorkspaceStatus> {
        StatusService::new(self.deps.git).status(workspace)
    }

    /// §4.4.1 step 8: the current toolchain's `major.minor`, falling back to
    /// [`crate::goworkspace::FALLBACK_GO_VERSION`] (and logging a warning)
    /// when detection fails. Shared by `Create` and `AddRepositories`, the
    /// two operations that may need to (re)write `go.work`.
    pub(super) fn detect_go_version(&self) -> String {
        match self.deps.go_toolchain.detect_version() {
            Some(version) => version,
            None => {
                let fallback = crate::goworkspace::FALLBACK_GO_VERSION;
                self.deps
                    .logger
                    .warn("go toolchain version detection failed; falling back", &[("fallback", &fallback)]);
                fallback.to_string()
            }
        }
    }

    /// §4.4.7. Loads the named workspace and fans `Sync` out across its
    /// members; never halts on a per-repository failure.
    pub fn sync(&self, workspace_name: &str, options: &SyncOptions) -> Result<Vec<SyncResult>> {
        let workspace = self.deps.config_store.load_workspace(workspace_name)?;
        Ok(SyncService::new(self.deps.git).sync(&workspace, options))
    }

    /// §4.4.8. On success, deletes the workspace unless `keep_workspace`.
    /// `cwd` is the caller's working directory, used for the
    /// same-branch-checked-out-elsewhere guard; callers resolve it
    /// explicitly (see `crate::adapters`) rather than this core reading
    /// process-wide state itself.
    pub fn merge(&self, workspace_name: &str, cwd: &std::path::Path, options: &MergeOptions) -> Result<()> {
        let workspace = self.deps.config_store.load_workspace(workspace_name)?;
        self.assert_merge_location(&workspace, cwd)?;
        MergeOrchestrator::new(self.deps.git).merge(&workspace, options)?;

        if !options.keep_workspace {
            self.delete(&DeleteRequest {
                name: workspace_name.to_string(),
                remove_files: true,
                force_worktrees: true,
            })?;
        }
        Ok(())
    }

    /// §4.4.8's second pre-condition: if another workspace's working branch
    /// equals this one's `base_branch`, the caller must be running from
    /// inside that other workspace.
    fn assert_merge_location(&self, workspace: &Workspace, cwd: &std::path::Path) -> Result<()> {
        let Some(base_branch) = &workspace.base_branch else {
            return Err(crate::error::Error::validation(
                "workspace has no base_branch; not a fork",
            ));
        };
        let workspaces = self.deps.config_store.list_workspaces()?;
        if let Some(owner) = workspaces
            .iter()
            .find(|w| w.name != workspace.name && &w.branch == base_branch)
        {
            if !cwd.starts_with(&owner.path) {
                return Err(crate::error::Error::WrongWorkspace {
                    required_path: owner.path.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Repository;
    use crate::ports::{NoGoToolchain, NonInteractivePrompter};
    use crate::testutil::{FakeClock, FakeGitClient, InMemoryFileSystem, RecordingLogger};
    use chrono::TimeZone;
    use std::path::{Path, PathBuf};

    fn member(name: &str) -> Repository {
        Repository {
            name: name.to_string(),
            path: PathBuf::from(format!("/src/{name}")),
            remote_url: None,
            current_branch: None,
            branches: vec![],
            tags: vec![],
            last_commit: None,
            last_scan: None,
            categories: Default::default(),
            extra: Default::default(),
        }
    }

    fn fork(name: &str, path: &str, branch: &str, base_branch: &str) -> Workspace {
        Workspace {
            name: name.to_string(),
            path: PathBuf::from(path),
            repositories: vec![member("svc")],
            branch: branch.to_string(),
            base_branch: Some(base_branch.to_string()),
            go_workspace: false,
            agent_md: None,
            created: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            extra: Default::default(),
        }
    }

    #[test]
    fn merge_refuses_when_base_branch_checked_out_elsewhere_and_cwd_is_outside() {
        let git = FakeGitClient::new();
        let fs = InMemoryFileSystem::new();
        let clock = FakeClock::new(chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let logger = RecordingLogger::default();
        let prompter = NonInteractivePrompter;
        let go_toolchain = NoGoToolchain;
        let store = ConfigStore::new(&fs, &clock, PathBuf::from("/config/workspace-manager"));

        let child = fork("child", "/ws/child", "task/child", "main");
        let main_owner = fork("trunk", "/ws/trunk", "main", "");
        store
            .save_workspace(&child, &serde_json::to_string(&child).unwrap())
            .unwrap();
        store
            .save_workspace(&main_owner, &serde_json::to_string(&main_owner).unwrap())
            .unwrap();

        let service = WorkspaceService::new(Deps {
            git: &git,
            fs: &fs,
            clock: &clock,
            logger: &logger,
            prompter: &prompter,
            go_toolchain: &go_toolchain,
            config_store: &store,
        });

        let err = service
            .merge("child", Path::new("/elsewhere"), &MergeOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::WrongWorkspace { .. }));
    }
}
