//! Error taxonomy for the workspace orchestration engine.
//!
//! Every operation returns a typed [`Error`] value; nothing in this crate calls
//! `panic!`, `unwrap()`, or `expect()` outside of tests. Fan-out operations that
//! legitimately proceed past individual failures return [`Error::PartialFailure`]
//! rather than stopping at the first one; everything else returns the first
//! failure encountered.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::OperationOutcome;

/// The full error taxonomy. Kinds, not names: each variant models one class of
/// failure named in the specification rather than one call site.
#[derive(Debug)]
pub enum Error {
    /// Workspace, repository, registry entry, or config document absent.
    NotFound { what: String },
    /// Workspace name, registry path, or target worktree directory collision.
    AlreadyExists { what: String },
    /// Empty name, missing required fields, or unresolved repository names.
    Validation { message: String },
    /// One or more requested repository names do not resolve in the registry.
    RepositoriesNotFound { missing: Vec<String> },
    /// A confirmation was declined, or input was unavailable (non-interactive).
    Cancelled { reason: String },
    /// `Merge` refused because member repositories are not clean and uniform.
    UncleanRepositories { names: Vec<String> },
    /// `Fork` refused because member repositories are not on the same branch.
    BranchDrift {
        repo: String,
        expected: String,
        actual: String,
    },
    /// `Merge` invoked from outside the workspace that owns the base branch.
    WrongWorkspace { required_path: PathBuf },
    /// Automatic merge failed with conflicts.
    MergeConflict { repository: String },
    /// Worktree removal refused because untracked files are present.
    UntrackedPresent { files: Vec<String> },
    /// A `GitClient` call failed; carries the original process output so that
    /// higher layers can match on the text patterns the specification names.
    Git {
        command: String,
        output: String,
        underlying: Option<Box<Error>>,
    },
    /// A filesystem operation failed.
    Io { path: PathBuf, underlying: String },
    /// A JSON document failed to parse.
    Parse { path: PathBuf, underlying: String },
    /// A fan-out operation completed; some per-repository outcomes failed.
    PartialFailure { results: Vec<OperationOutcome> },
    /// `Create`/`AddRepositories` failed after partial side effects; rollback
    /// was attempted and its outcome is summarized here.
    CreateFailed {
        cause: Box<Error>,
        rollback_summary: String,
    },
    AddFailed {
        cause: Box<Error>,
        rollback_summary: String,
    },
    /// `Merge` failed after at least one repository succeeded; the local
    /// rollback outcome is summarized, but the asymmetry (already-pushed
    /// remotes cannot be un-pushed) is called out explicitly.
    MergeFailed {
        cause: Box<Error>,
        rollback_summary: String,
        remote_unreverted: bool,
    },
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    pub fn already_exists(what: impl Into<String>) -> Self {
        Error::AlreadyExists { what: what.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, underlying: impl fmt::Display) -> Self {
        Error::Io {
            path: path.into(),
            underlying: underlying.to_string(),
        }
    }

    pub fn git(command: impl Into<String>, output: impl Into<String>) -> Self {
        Error::Git {
            command: command.into(),
            output: output.into(),
            underlying: None,
        }
    }

    /// True if the underlying git process output matches one of the "missing
    /// upstream" patterns named by §4.4.7 of the specification.
    pub fn is_upstream_missing(&self) -> bool {
        static UPSTREAM_MISSING: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)\bhas no upstream branch\b").expect("static pattern is valid")
        });
        match self {
            Error::Git { output, .. } => UPSTREAM_MISSING.is_match(output),
            _ => false,
        }
    }

    /// True if the underlying git process output matches one of the "merge
    /// conflict" patterns named by §4.4.8 of the specification.
    pub fn is_merge_conflict(&self) -> bool {
        static MERGE_CONFLICT: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)\b(conflict|automatic merge failed|merge failed)\b")
                .expect("static pattern is valid")
        });
        match self {
            Error::Git { output, .. } => MERGE_CONFLICT.is_match(output),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { what } => write!(f, "not found: {what}"),
            Error::AlreadyExists { what } => write!(f, "already exists: {what}"),
            Error::Validation { message } => write!(f, "validation error: {message}"),
            Error::RepositoriesNotFound { missing } => {
                write!(f, "repositories not found: {}", missing.join(", "))
            }
            Error::Cancelled { reason } => write!(f, "cancelled: {reason}"),
            Error::UncleanRepositories { names } => {
                write!(f, "unclean repositories: {}", names.join(", "))
            }
            Error::BranchDrift {
                repo,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "branch drift: {repo} is on {actual}, expected {expected}"
                )
            }
            Error::WrongWorkspace { required_path } => {
                write!(
                    f,
                    "must be run from within {}",
                    required_path.display()
                )
            }
            Error::MergeConflict { repository } => {
                write!(f, "merge conflict in {repository}")
            }
            Error::UntrackedPresent { files } => {
                write!(f, "untracked files present: {}", files.join(", "))
            }
            Error::Git {
                command, output, ..
            } => write!(f, "git command failed ({command}): {output}"),
            Error::Io { path, underlying } => {
                write!(f, "io error at {}: {underlying}", path.display())
            }
            Error::Parse { path, underlying } => {
                write!(f, "parse error in {}: {underlying}", path.display())
            }
            Error::PartialFailure { results } => {
                let failed = results.iter().filter(|r| !r.success).count();
                write!(f, "{failed} of {} operations failed", results.len())
            }
            Error::CreateFailed {
                cause,
                rollback_summary,
            } => write!(f, "create failed: {cause} (rollback: {rollback_summary})"),
            Error::AddFailed {
                cause,
                rollback_summary,
            } => write!(f, "add failed: {cause} (rollback: {rollback_summary})"),
            Error::MergeFailed {
                cause,
                rollback_summary,
                remote_unreverted,
            } => {
                write!(f, "merge failed: {cause} (rollback: {rollback_summary})")?;
                if *remote_unreverted {
                    write!(
                        f,
                        " — note: a merge commit may already be pushed upstream and was not reverted"
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
