//! In-memory fake adapters for unit tests. Not part of the public API —
//! `tests/common/` defines its own equivalents for black-box integration
//! tests, matching the teacher crate's split between inline `#[cfg(test)]`
//! unit tests (using lightweight fakes local to the module) and
//! `tests/integration_tests/*.rs` (exercising the real process boundary).

#![cfg(test)]
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::ports::{
    AheadBehind, BranchConflictChoice, Clock, Field, FileSystem, GitClient, GitStatus, Level,
    Logger, Prompter, WorktreeAddOptions, WorktreeInfo,
};

/// An in-memory filesystem: files are `path -> contents`; directories are
/// tracked implicitly via any path that has been `mkdir`'d or that is a
/// prefix of some file/dir path.
#[derive(Default)]
pub struct InMemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: RefCell<std::collections::BTreeSet<PathBuf>>,
    /// Fake symlinks: `path -> canonical target`, consulted by
    /// `canonicalize`. Lets tests arrange a directory cycle (two distinct
    /// paths resolving to the same canonical one) without real symlinks.
    canonical: RefCell<HashMap<PathBuf, PathBuf>>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.borrow_mut().insert(parent.to_path_buf());
        }
        self.files.borrow_mut().insert(path, contents.into());
    }

    pub fn get_file(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Register `path` as a directory whose canonical form is `target`
    /// instead of itself, simulating a symlink back into an ancestor.
    pub fn put_symlinked_dir(&self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.borrow_mut().insert(parent.to_path_buf());
        }
        self.dirs.borrow_mut().insert(path.clone());
        self.canonical.borrow_mut().insert(path, target.into());
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::not_found(path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.put_file(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.borrow_mut().remove(path);
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        self.files.borrow_mut().retain(|p, _| !p.starts_with(path));
        self.dirs.borrow_mut().retain(|p| !p.starts_with(path));
        self.dirs.borrow_mut().remove(path);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut children = std::collections::BTreeSet::new();
        for file in self.files.borrow().keys() {
            if file.parent() == Some(path) {
                children.insert(file.clone());
            }
        }
        for dir in self.dirs.borrow().iter() {
            if dir.parent() == Some(path) {
                children.insert(dir.clone());
            }
        }
        Ok(children.into_iter().collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn user_config_dir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/config"))
    }

    fn home_dir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/home/user"))
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        self.canonical
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| path.to_path_buf())
    }
}

/// A fake git client whose behavior is entirely table-driven, so tests can
/// arrange exact `(repo, branch)` states and failure injections without a
/// real git process.
#[derive(Default)]
pub struct FakeGitClient {
    pub repositories: RefCell<std::collections::BTreeSet<PathBuf>>,
    pub local_branches: RefCell<HashMap<PathBuf, std::collections::BTreeSet<String>>>,
    pub remote_branches: RefCell<HashMap<PathBuf, std::collections::BTreeSet<String>>>,
    pub current_branch: RefCell<HashMap<PathBuf, String>>,
    pub worktrees: RefCell<HashMap<PathBuf, Vec<WorktreeInfo>>>,
    pub status: RefCell<HashMap<PathBuf, GitStatus>>,
    pub ahead_behind: RefCell<HashMap<PathBuf, AheadBehind>>,
    pub untracked: RefCell<HashMap<PathBuf, Vec<String>>>,
    pub remote_url: RefCell<HashMap<PathBuf, String>>,
    pub tags: RefCell<HashMap<PathBuf, Vec<String>>>,
    pub last_commit: RefCell<HashMap<PathBuf, String>>,
    pub default_branch: RefCell<HashMap<PathBuf, String>>,
    /// (repo, operation) -> error message, injected to simulate failures.
    pub failures: RefCell<HashMap<(PathBuf, &'static str), String>>,
    pub push_calls: RefCell<Vec<(PathBuf, String)>>,
    pub merge_calls: RefCell<Vec<(PathBuf, String)>>,
}

impl FakeGitClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&self, path: impl Into<PathBuf>) {
        self.repositories.borrow_mut().insert(path.into());
    }

    pub fn set_current_branch(&self, path: impl Into<PathBuf>, branch: impl Into<String>) {
        self.current_branch.borrow_mut().insert(path.into(), branch.into());
    }

    pub fn add_local_branch(&self, path: impl Into<PathBuf>, branch: impl Into<String>) {
        self.local_branches
            .borrow_mut()
            .entry(path.into())
            .or_default()
            .insert(branch.into());
    }

    pub fn add_remote_branch(&self, path: impl Into<PathBuf>, branch: impl Into<String>) {
        self.remote_branches
            .borrow_mut()
            .entry(path.into())
            .or_default()
            .insert(branch.into());
    }

    pub fn inject_failure(&self, path: impl Into<PathBuf>, op: &'static str, message: impl Into<String>) {
        self.failures.borrow_mut().insert((path.into(), op), message.into());
    }

    fn check_failure(&self, path: &Path, op: &'static str) -> Result<()> {
        if let Some(msg) = self.failures.borrow().get(&(path.to_path_buf(), op)) {
            return Err(Error::git(op, msg.clone()));
        }
        Ok(())
    }
}

impl GitClient for FakeGitClient {
    fn worktree_add(
        &self,
        repo_path: &Path,
        branch: &str,
        target: &Path,
        opts: &WorktreeAddOptions,
    ) -> Result<()> {
        self.check_failure(repo_path, "worktree_add")?;
        self.worktrees
            .borrow_mut()
            .entry(repo_path.to_path_buf())
            .or_default()
            .push(WorktreeInfo {
                path: target.to_path_buf(),
                branch: if opts.detached { None } else { Some(branch.to_string()) },
                head: "deadbeef".to_string(),
                detached: opts.detached,
            });
        if !opts.detached {
            self.local_branches
                .borrow_mut()
                .entry(repo_path.to_path_buf())
                .or_default()
                .insert(branch.to_string());
        }
        Ok(())
    }

    fn worktree_remove(&self, repo_path: &Path, target: &Path, _force: bool) -> Result<()> {
        self.check_failure(repo_path, "worktree_remove")?;
        if let Some(list) = self.worktrees.borrow_mut().get_mut(repo_path) {
            list.retain(|wt| wt.path != target);
        }
        Ok(())
    }

    fn worktree_list(&self, repo_path: &Path) -> Result<Vec<WorktreeInfo>> {
        Ok(self.worktrees.borrow().get(repo_path).cloned().unwrap_or_default())
    }

    fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        Ok(self
            .local_branches
            .borrow()
            .get(repo_path)
            .map(|b| b.contains(branch))
            .unwrap_or(false))
    }

    fn remote_branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        Ok(self
            .remote_branches
            .borrow()
            .get(repo_path)
            .map(|b| b.contains(branch))
            .unwrap_or(false))
    }

    fn current_branch(&self, repo_path: &Path) -> Result<Option<String>> {
        Ok(self.current_branch.borrow().get(repo_path).cloned())
    }

    fn create_branch(&self, repo_path: &Path, branch: &str, _from: Option<&str>) -> Result<()> {
        self.check_failure(repo_path, "create_branch")?;
        self.local_branches
            .borrow_mut()
            .entry(repo_path.to_path_buf())
            .or_default()
            .insert(branch.to_string());
        Ok(())
    }

    fn switch_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.check_failure(repo_path, "switch_branch")?;
        self.current_branch
            .borrow_mut()
            .insert(repo_path.to_path_buf(), branch.to_string());
        Ok(())
    }

    fn reset_branch_to(&self, repo_path: &Path, _branch: &str, _target: &str) -> Result<()> {
        self.check_failure(repo_path, "reset_branch_to")
    }

    fn delete_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        if let Some(set) = self.local_branches.borrow_mut().get_mut(repo_path) {
            set.remove(branch);
        }
        Ok(())
    }

    fn status(&self, repo_path: &Path) -> Result<GitStatus> {
        Ok(self.status.borrow().get(repo_path).cloned().unwrap_or_default())
    }

    fn ahead_behind(&self, repo_path: &Path, _base: &str) -> Result<AheadBehind> {
        Ok(self.ahead_behind.borrow().get(repo_path).copied().unwrap_or_default())
    }

    fn untracked_files(&self, repo_path: &Path) -> Result<Vec<String>> {
        Ok(self.untracked.borrow().get(repo_path).cloned().unwrap_or_default())
    }

    fn has_changes(&self, repo_path: &Path) -> Result<bool> {
        Ok(!self.status(repo_path)?.is_clean())
    }

    fn add_all(&self, _repo_path: &Path) -> Result<()> {
        Ok(())
    }

    fn commit(&self, _repo_path: &Path, _message: &str) -> Result<()> {
        Ok(())
    }

    fn push(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.check_failure(repo_path, "push")?;
        self.push_calls.borrow_mut().push((repo_path.to_path_buf(), format!("{remote}/{branch}")));
        Ok(())
    }

    fn push_set_upstream(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.push_calls
            .borrow_mut()
            .push((repo_path.to_path_buf(), format!("-u {remote}/{branch}")));
        Ok(())
    }

    fn pull(&self, repo_path: &Path, _rebase: bool) -> Result<()> {
        self.check_failure(repo_path, "pull")
    }

    fn fetch(&self, repo_path: &Path, _remote: &str) -> Result<()> {
        self.check_failure(repo_path, "fetch")
    }

    fn fetch_branch(&self, repo_path: &Path, _remote: &str, _branch: &str) -> Result<()> {
        self.check_failure(repo_path, "fetch_branch")
    }

    fn checkout(&self, repo_path: &Path, reference: &str) -> Result<()> {
        self.check_failure(repo_path, "checkout")?;
        self.current_branch
            .borrow_mut()
            .insert(repo_path.to_path_buf(), reference.to_string());
        Ok(())
    }

    fn merge(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.check_failure(repo_path, "merge")?;
        self.merge_calls.borrow_mut().push((repo_path.to_path_buf(), branch.to_string()));
        Ok(())
    }

    fn reset_hard(&self, repo_path: &Path, _reference: &str) -> Result<()> {
        self.check_failure(repo_path, "reset_hard")
    }

    fn rebase(&self, repo_path: &Path, _onto: &str, _interactive: bool) -> Result<()> {
        self.check_failure(repo_path, "rebase")
    }

    fn commits_ahead(&self, _repo_path: &Path, _target: &str) -> Result<u32> {
        Ok(0)
    }

    fn has_rebase_conflicts(&self, _repo_path: &Path) -> Result<bool> {
        Ok(false)
    }

    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>> {
        Ok(self.remote_url.borrow().get(repo_path).cloned())
    }

    fn branches(&self, repo_path: &Path) -> Result<Vec<String>> {
        Ok(self
            .local_branches
            .borrow()
            .get(repo_path)
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn tags(&self, repo_path: &Path) -> Result<Vec<String>> {
        Ok(self.tags.borrow().get(repo_path).cloned().unwrap_or_default())
    }

    fn last_commit(&self, repo_path: &Path) -> Result<Option<String>> {
        Ok(self.last_commit.borrow().get(repo_path).cloned())
    }

    fn is_repository(&self, path: &Path) -> bool {
        self.repositories.borrow().contains(path)
    }

    fn default_branch(&self, repo_path: &Path) -> Result<String> {
        Ok(self
            .default_branch
            .borrow()
            .get(repo_path)
            .cloned()
            .unwrap_or_else(|| "main".to_string()))
    }
}

pub struct FakeClock {
    pub fixed: DateTime<Utc>,
}

impl FakeClock {
    pub fn new(fixed: DateTime<Utc>) -> Self {
        Self { fixed }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.fixed
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub events: RefCell<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn log(&self, _level: Level, message: &str, _fields: &[Field<'_>]) {
        self.events.borrow_mut().push(message.to_string());
    }
}

/// A scripted prompter: each call pops the next answer from its queue,
/// panicking if the script runs dry. Matches the teacher's preference for
/// fakes that fail loudly on an unexpected call rather than silently
/// defaulting.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub branch_conflict_answers: RefCell<Vec<BranchConflictChoice>>,
    pub confirm_answers: RefCell<Vec<bool>>,
    pub interactive: std::cell::Cell<bool>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self {
            interactive: std::cell::Cell::new(true),
            ..Default::default()
        }
    }

    pub fn with_branch_conflict_answer(self, choice: BranchConflictChoice) -> Self {
        self.branch_conflict_answers.borrow_mut().push(choice);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(self.confirm_answers.borrow_mut().pop().unwrap_or(false))
    }

    fn select(&self, _message: &str, _options: &[String]) -> Result<usize> {
        Ok(0)
    }

    fn multi_select(&self, _message: &str, _options: &[String]) -> Result<Vec<usize>> {
        Ok(Vec::new())
    }

    fn resolve_branch_conflict(&self, branch: &str) -> Result<BranchConflictChoice> {
        self.branch_conflict_answers
            .borrow_mut()
            .pop()
            .ok_or_else(|| Error::validation(format!("no scripted answer for branch {branch}")))
    }

    fn is_interactive(&self) -> bool {
        self.interactive.get()
    }
}
