//! The `Prompter` capability contract (§4.1, §4.3.1).
//!
//! Confirm / select / multi-select. The concrete interactive forms and
//! colored terminal rendering are out of scope for this crate (§1); this
//! trait only describes the shape the orchestration core needs.

use crate::error::Result;

/// The three choices a user is offered when `WorktreeManager::Create`
/// encounters a locally-existing branch without `force` (§4.3.1, decision
/// table row `true | * | false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchConflictChoice {
    Overwrite,
    UseExisting,
    Cancel,
}

pub trait Prompter {
    /// Ask a yes/no question. Non-interactive implementations must return
    /// `Ok(false)` rather than blocking.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Offer a single choice from a fixed set of options.
    fn select(&self, message: &str, options: &[String]) -> Result<usize>;

    /// Offer a subset of a fixed set of options.
    fn multi_select(&self, message: &str, options: &[String]) -> Result<Vec<usize>>;

    /// Ask the user to resolve an existing-branch conflict (§4.3.1). The
    /// default non-interactive behavior is [`BranchConflictChoice::Cancel`].
    fn resolve_branch_conflict(&self, branch: &str) -> Result<BranchConflictChoice>;

    /// True if this prompter can actually interact with a user. Used to
    /// decide whether an ambiguous prompt should surface as `Cancelled`
    /// rather than blocking.
    fn is_interactive(&self) -> bool;
}

/// A prompter that answers every prompt non-interactively: declines
/// confirmations, and resolves branch conflicts as `Cancel` per §4.3.1's
/// "In non-interactive mode the implementation must treat this as
/// Cancelled."
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(false)
    }

    fn select(&self, _message: &str, _options: &[String]) -> Result<usize> {
        Err(crate::error::Error::Cancelled {
            reason: "no interactive prompter available".into(),
        })
    }

    fn multi_select(&self, _message: &str, _options: &[String]) -> Result<Vec<usize>> {
        Err(crate::error::Error::Cancelled {
            reason: "no interactive prompter available".into(),
        })
    }

    fn resolve_branch_conflict(&self, _branch: &str) -> Result<BranchConflictChoice> {
        Ok(BranchConflictChoice::Cancel)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
