//! `ProcessGitClient`: the `GitClient` port backed by shelling out to the
//! `git` binary, in the style of the teacher's `Repository::run_command`
//! (buffer stdout/stderr, normalize `\r`, fold both streams into one error
//! message on non-zero exit).

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::ports::{
    AheadBehind, GitClient, GitStatus, NewBranchSpec, WorktreeAddOptions, WorktreeInfo,
};

/// Resolved once per process, in the style of the teacher's `which::which("git")`
/// lookup in its shell-exec layer: a missing `git` binary should fail with a
/// clear message rather than every subsequent command's generic `ENOENT`.
static GIT_ON_PATH: LazyLock<bool> = LazyLock::new(|| which::which("git").is_ok());

pub struct ProcessGitClient;

impl ProcessGitClient {
    fn run(&self, repo_path: &Path, args: &[&str]) -> Result<String> {
        if !*GIT_ON_PATH {
            return Err(Error::validation("git executable not found on PATH"));
        }
        log::debug!("$ git {} [{}]", args.join(" "), repo_path.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .map_err(|e| Error::io(repo_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).replace('\r', "\n");
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(Error::git(format!("git {}", args.join(" ")), message));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_ok(&self, repo_path: &Path, args: &[&str]) -> Result<bool> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .map_err(|e| Error::io(repo_path, e))?;
        Ok(output.status.success())
    }
}

impl GitClient for ProcessGitClient {
    fn worktree_add(
        &self,
        repo_path: &Path,
        branch: &str,
        target: &Path,
        opts: &WorktreeAddOptions,
    ) -> Result<()> {
        let args = worktree_add_args(branch, target, opts);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(repo_path, &arg_refs).map(|_| ())
    }

    fn worktree_remove(&self, repo_path: &Path, target: &Path, force: bool) -> Result<()> {
        let target_str = target.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&target_str);
        self.run(repo_path, &args).map(|_| ())
    }

    fn worktree_list(&self, repo_path: &Path) -> Result<Vec<WorktreeInfo>> {
        let output = self.run(repo_path, &["worktree", "list", "--porcelain"])?;
        Ok(parse_porcelain_worktree_list(&output))
    }

    fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        self.run_ok(repo_path, &["show-ref", "--verify", "--quiet", &format!("refs/heads/{branch}")])
    }

    fn remote_branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        self.run_ok(
            repo_path,
            &["show-ref", "--verify", "--quiet", &format!("refs/remotes/origin/{branch}")],
        )
    }

    fn current_branch(&self, repo_path: &Path) -> Result<Option<String>> {
        let output = self.run(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = output.trim();
        if branch.is_empty() || branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    fn create_branch(&self, repo_path: &Path, branch: &str, from: Option<&str>) -> Result<()> {
        let mut args = vec!["branch", "--force", branch];
        if let Some(from) = from {
            args.push(from);
        }
        self.run(repo_path, &args).map(|_| ())
    }

    fn switch_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.run(repo_path, &["checkout", branch]).map(|_| ())
    }

    fn reset_branch_to(&self, repo_path: &Path, branch: &str, target: &str) -> Result<()> {
        self.run(repo_path, &["branch", "--force", branch, target]).map(|_| ())
    }

    fn delete_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.run(repo_path, &["branch", "-D", branch]).map(|_| ())
    }

    fn status(&self, repo_path: &Path) -> Result<GitStatus> {
        let output = self.run(repo_path, &["status", "--porcelain=v1"])?;
        Ok(parse_porcelain_status(&output))
    }

    fn ahead_behind(&self, repo_path: &Path, base: &str) -> Result<AheadBehind> {
        let output = self.run(
            repo_path,
            &["rev-list", "--left-right", "--count", &format!("{base}...HEAD")],
        )?;
        let mut parts = output.trim().split_whitespace();
        let behind = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let ahead = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok(AheadBehind { ahead, behind })
    }

    fn untracked_files(&self, repo_path: &Path) -> Result<Vec<String>> {
        let output = self.run(repo_path, &["ls-files", "--others", "--exclude-standard"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn has_changes(&self, repo_path: &Path) -> Result<bool> {
        Ok(!self.status(repo_path)?.is_clean())
    }

    fn add_all(&self, repo_path: &Path) -> Result<()> {
        self.run(repo_path, &["add", "-A"]).map(|_| ())
    }

    fn commit(&self, repo_path: &Path, message: &str) -> Result<()> {
        self.run(repo_path, &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(repo_path, &["push", remote, branch]).map(|_| ())
    }

    fn push_set_upstream(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(repo_path, &["push", "--set-upstream", remote, branch])
            .map(|_| ())
    }

    fn pull(&self, repo_path: &Path, rebase: bool) -> Result<()> {
        let mut args = vec!["pull"];
        if rebase {
            args.push("--rebase");
        }
        self.run(repo_path, &args).map(|_| ())
    }

    fn fetch(&self, repo_path: &Path, remote: &str) -> Result<()> {
        self.run(repo_path, &["fetch", remote]).map(|_| ())
    }

    fn fetch_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(repo_path, &["fetch", remote, branch]).map(|_| ())
    }

    fn checkout(&self, repo_path: &Path, reference: &str) -> Result<()> {
        self.run(repo_path, &["checkout", reference]).map(|_| ())
    }

    fn merge(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.run(repo_path, &["merge", "--no-edit", branch]).map(|_| ())
    }

    fn reset_hard(&self, repo_path: &Path, reference: &str) -> Result<()> {
        self.run(repo_path, &["reset", "--hard", reference]).map(|_| ())
    }

    fn rebase(&self, repo_path: &Path, onto: &str, interactive: bool) -> Result<()> {
        let mut args = vec!["rebase"];
        if interactive {
            args.push("-i");
        }
        args.push(onto);
        self.run(repo_path, &args).map(|_| ())
    }

    fn commits_ahead(&self, repo_path: &Path, target: &str) -> Result<u32> {
        let output = self.run(repo_path, &["rev-list", "--count", &format!("HEAD..{target}")])?;
        Ok(output.trim().parse().unwrap_or(0))
    }

    fn has_rebase_conflicts(&self, repo_path: &Path) -> Result<bool> {
        Ok(repo_path.join(".git").join("rebase-merge").exists()
            || repo_path.join(".git").join("rebase-apply").exists())
    }

    fn remote_url(&self, repo_path: &Path) -> Result<Option<String>> {
        match self.run(repo_path, &["remote", "get-url", "origin"]) {
            Ok(output) => {
                let trimmed = output.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(_) => Ok(None),
        }
    }

    fn branches(&self, repo_path: &Path) -> Result<Vec<String>> {
        let output = self.run(repo_path, &["for-each-ref", "--format=%(refname:short)", "refs/heads/"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn tags(&self, repo_path: &Path) -> Result<Vec<String>> {
        let output = self.run(repo_path, &["tag", "--list"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn last_commit(&self, repo_path: &Path) -> Result<Option<String>> {
        match self.run(repo_path, &["log", "-1", "--format=%H"]) {
            Ok(output) => {
                let trimmed = output.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(_) => Ok(None),
        }
    }

    fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    fn default_branch(&self, repo_path: &Path) -> Result<String> {
        match self.run(repo_path, &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"]) {
            Ok(output) => Ok(output
                .trim()
                .strip_prefix("origin/")
                .unwrap_or(output.trim())
                .to_string()),
            Err(_) => Ok("main".to_string()),
        }
    }
}

/// Builds the `git worktree add` argument list for one [`WorktreeAddOptions`]
/// combination. §4.3.1 row 1 (no branch requested) must land on `--detach`
/// rather than bare `git worktree add <target>`, which would have git invent
/// and check out a branch named after the target's basename.
fn worktree_add_args(branch: &str, target: &Path, opts: &WorktreeAddOptions) -> Vec<String> {
    let target_str = target.to_string_lossy().into_owned();
    let mut args: Vec<String> = vec!["worktree".into(), "add".into()];
    if opts.force {
        args.push("--force".into());
    }
    if opts.track_remote {
        args.push("--track".into());
        args.push("-b".into());
        args.push(branch.to_string());
        args.push(target_str);
        args.push(format!("origin/{branch}"));
    } else if let Some(NewBranchSpec { base }) = &opts.new_branch {
        args.push("-b".into());
        args.push(branch.to_string());
        args.push(target_str);
        if let Some(base) = base {
            args.push(base.clone());
        }
    } else if opts.detached {
        args.push("--detach".into());
        args.push(target_str);
    } else {
        args.push(target_str);
        args.push(branch.to_string());
    }
    args
}

/// Mirrors `git worktree list --porcelain`'s blank-line-delimited record
/// format: `worktree`, `HEAD`, `branch` (with `refs/heads/` stripped), and
/// bare `detached`/`bare` flag lines.
fn parse_porcelain_worktree_list(output: &str) -> Vec<WorktreeInfo> {
    let mut worktrees = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut head = String::new();
    let mut branch = None;
    let mut detached = false;

    let flush = |path: &mut Option<PathBuf>, head: &mut String, branch: &mut Option<String>, detached: &mut bool, out: &mut Vec<WorktreeInfo>| {
        if let Some(path) = path.take() {
            out.push(WorktreeInfo {
                path,
                branch: branch.take(),
                head: std::mem::take(head),
                detached: *detached,
            });
        }
        *detached = false;
    };

    for line in output.lines() {
        if line.is_empty() {
            flush(&mut path, &mut head, &mut branch, &mut detached, &mut worktrees);
            continue;
        }
        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        match key {
            "worktree" => path = Some(PathBuf::from(value)),
            "HEAD" => head = value.to_string(),
            "branch" => branch = Some(value.strip_prefix("refs/heads/").unwrap_or(value).to_string()),
            "detached" => detached = true,
            _ => {}
        }
    }
    flush(&mut path, &mut head, &mut branch, &mut detached, &mut worktrees);
    worktrees
}

/// Mirrors `git status --porcelain=v1`'s two-character status-code prefix.
fn parse_porcelain_status(output: &str) -> GitStatus {
    let mut status = GitStatus::default();
    for line in output.lines() {
        if line.len() < 3 {
            continue;
        }
        let (code, path) = line.split_at(2);
        let path = path.trim_start().to_string();
        let (index, worktree) = (code.as_bytes()[0], code.as_bytes()[1]);
        if index == b'U' || worktree == b'U' || code == "AA" || code == "DD" {
            status.conflicts.push(path);
        } else if code == "??" {
            status.untracked.push(path);
        } else if index != b' ' {
            status.staged.push(path);
        } else if worktree != b' ' {
            status.modified.push(path);
        }
    }
    status
}
