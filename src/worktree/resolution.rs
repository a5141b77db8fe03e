//! The branch-resolution decision table (§4.3.1): given what's known about a
//! requested branch locally and on the remote, decide what `WorktreeManager`
//! should do before it ever calls `GitClient.WorktreeAdd`.
//!
//! Kept as a pure function of its inputs so the eleven-row table reads as a
//! table, not as control flow buried inside `Create`.

use crate::ports::{BranchConflictChoice, Prompter};

/// What `Create` should do once the decision table has been consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No branch requested: worktree the repository's current HEAD in a
    /// detached state, no branch switch.
    DetachedHead,
    /// Track `origin/<branch>` as a new local branch.
    TrackRemote { branch: String },
    /// Create a fresh local branch, optionally from `base`.
    NewBranch {
        branch: String,
        base: Option<String>,
    },
    /// Reset the existing local branch to `origin/<branch>` first.
    ResetToRemote { branch: String },
    /// Recreate the existing local branch from `base` (or current HEAD).
    RecreateFromBase {
        branch: String,
        base: Option<String>,
    },
    /// Worktree the existing local branch as-is.
    UseExisting { branch: String },
    /// The table's row resolved to a user cancellation.
    Cancelled,
}

/// Everything the table needs to know about one branch-creation request.
#[derive(Debug, Clone)]
pub struct ResolutionInputs {
    pub branch: Option<String>,
    pub base_branch: Option<String>,
    pub local_exists: bool,
    pub remote_exists: bool,
    pub force: bool,
}

/// Resolve §4.3.1's table. Row `true | * | false` calls out to `prompter`
/// when a branch exists locally and `force` was not requested; every other
/// row is pure.
pub fn resolve(inputs: &ResolutionInputs, prompter: &dyn Prompter) -> crate::error::Result<Resolution> {
    let ResolutionInputs {
        branch,
        base_branch,
        local_exists,
        remote_exists,
        force,
    } = inputs;

    let Some(branch) = branch.clone() else {
        return Ok(Resolution::DetachedHead);
    };

    if !local_exists && *remote_exists {
        return Ok(Resolution::TrackRemote { branch });
    }

    if !local_exists && !remote_exists {
        return Ok(Resolution::NewBranch {
            branch,
            base: base_branch.clone(),
        });
    }

    // local_exists == true from here on.
    if *remote_exists && *force {
        return Ok(Resolution::ResetToRemote { branch });
    }

    if !remote_exists && *force {
        return Ok(Resolution::RecreateFromBase {
            branch,
            base: base_branch.clone(),
        });
    }

    // local_exists && !force: prompt, honoring the non-interactive default
    // of Cancelled (the Prompter's own contract; we just relay its answer).
    match prompter.resolve_branch_conflict(&branch)? {
        BranchConflictChoice::Overwrite if *remote_exists => Ok(Resolution::ResetToRemote { branch }),
        BranchConflictChoice::Overwrite => Ok(Resolution::RecreateFromBase {
            branch,
            base: base_branch.clone(),
        }),
        BranchConflictChoice::UseExisting => Ok(Resolution::UseExisting { branch }),
        BranchConflictChoice::Cancel => Ok(Resolution::Cancelled),
    }
}
