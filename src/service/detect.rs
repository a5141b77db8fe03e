//! `DetectWorkspace(cwd)` (§4.4.9): identify which workspace, if any, a
//! given working directory belongs to.

use std::path::Path;

use crate::error::{Error, Result};

use super::WorkspaceService;

impl<'a> WorkspaceService<'a> {
    pub fn detect_workspace(&self, cwd: &Path) -> Result<String> {
        let workspaces = self.deps.config_store.list_workspaces()?;
        let cwd = self.deps.fs.canonicalize(cwd);
        let cwd = cwd.as_path();

        // 1. Longest workspace-path prefix match. Canonicalized on both sides
        // so a symlinked cwd still matches the workspace it resolves into.
        let workspace_paths: Vec<(&str, std::path::PathBuf)> = workspaces
            .iter()
            .map(|w| (w.name.as_str(), self.deps.fs.canonicalize(&w.path)))
            .collect();
        if let Some(name) =
            longest_prefix_match(cwd, workspace_paths.iter().map(|(name, path)| (*name, path.as_path())))
        {
            return Ok(name);
        }

        // 2. Longest worktree-path prefix match across every member.
        let worktree_paths: Vec<(&str, std::path::PathBuf)> = workspaces
            .iter()
            .flat_map(|w| {
                w.repositories
                    .iter()
                    .map(move |r| (w.name.as_str(), self.deps.fs.canonicalize(&w.worktree_path(r))))
            })
            .collect();
        if let Some(name) =
            longest_prefix_match(cwd, worktree_paths.iter().map(|(name, path)| (*name, path.as_path())))
        {
            return Ok(name);
        }

        // 3. Heuristic fallback: walk upward counting `.git`-file children.
        let mut dir = Some(cwd);
        while let Some(current) = dir {
            let git_file_children = self.count_worktree_marker_children(current);
            if git_file_children >= 2 {
                if let Some(basename) = current.file_name().and_then(|n| n.to_str()) {
                    if workspaces.iter().any(|w| w.name == basename) {
                        return Ok(basename.to_string());
                    }
                }
            }
            dir = current.parent();
        }

        if let Some(basename) = cwd.file_name().and_then(|n| n.to_str()) {
            if workspaces.iter().any(|w| w.name == basename) {
                return Ok(basename.to_string());
            }
        }

        Err(Error::not_found("workspace containing this directory"))
    }

    fn count_worktree_marker_children(&self, dir: &Path) -> usize {
        let Ok(entries) = self.deps.fs.read_dir(dir) else {
            return 0;
        };
        entries
            .iter()
            .filter(|entry| {
                self.deps.fs.is_dir(entry) && self.deps.fs.exists(&entry.join(".git"))
                    && !self.deps.fs.is_dir(&entry.join(".git"))
            })
            .count()
    }
}

fn longest_prefix_match<'p>(
    cwd: &Path,
    candidates: impl Iterator<Item = (&'p str, &'p Path)>,
) -> Option<String> {
    candidates
        .filter(|(_, path)| cwd.starts_with(path))
        .max_by_key(|(_, path)| path.as_os_str().len())
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_store::ConfigStore;
    use crate::model::{Repository, Workspace};
    use crate::ports::{NoGoToolchain, NonInteractivePrompter};
    use crate::testutil::{FakeClock, FakeGitClient, InMemoryFileSystem, RecordingLogger};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn harness<'a>(
        git: &'a FakeGitClient,
        fs: &'a InMemoryFileSystem,
        clock: &'a FakeClock,
        logger: &'a RecordingLogger,
        prompter: &'a NonInteractivePrompter,
        store: &'a ConfigStore<'a>,
    ) -> WorkspaceService<'a> {
        WorkspaceService::new(super::super::Deps {
            git,
            fs,
            clock,
            logger,
            prompter,
            go_toolchain: &NoGoToolchain,
            config_store: store,
        })
    }

    fn workspace(name: &str, path: &str) -> Workspace {
        Workspace {
            name: name.to_string(),
            path: PathBuf::from(path),
            repositories: vec![Repository {
                name: "svc".into(),
                path: PathBuf::from("/src/svc"),
                remote_url: None,
                current_branch: None,
                branches: vec![],
                tags: vec![],
                last_commit: None,
                last_scan: None,
                categories: Default::default(),
                extra: Default::default(),
            }],
            branch: "task/demo".into(),
            base_branch: None,
            go_workspace: false,
            agent_md: None,
            created: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            extra: Default::default(),
        }
    }

    #[test]
    fn matches_by_workspace_path_prefix() {
        let git = FakeGitClient::new();
        let fs = InMemoryFileSystem::new();
        let clock = FakeClock::new(chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let logger = RecordingLogger::default();
        let prompter = NonInteractivePrompter;
        let store = ConfigStore::new(&fs, &clock, PathBuf::from("/config/workspace-manager"));
        let ws = workspace("demo", "/ws/demo");
        store
            .save_workspace(&ws, &serde_json::to_string(&ws).unwrap())
            .unwrap();

        let service = harness(&git, &fs, &clock, &logger, &prompter, &store);
        let name = service.detect_workspace(Path::new("/ws/demo/svc")).unwrap();
        assert_eq!(name, "demo");
    }

    #[test]
    fn not_found_outside_any_workspace() {
        let git = FakeGitClient::new();
        let fs = InMemoryFileSystem::new();
        let clock = FakeClock::new(chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let logger = RecordingLogger::default();
        let prompter = NonInteractivePrompter;
        let store = ConfigStore::new(&fs, &clock, PathBuf::from("/config/workspace-manager"));

        let service = harness(&git, &fs, &clock, &logger, &prompter, &store);
        let err = service.detect_workspace(Path::new("/elsewhere")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
