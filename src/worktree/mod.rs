//! The worktree subsystem (§4.3): the branch-resolution decision table and
//! the manager that executes it against a `GitClient`.

mod manager;
mod resolution;

pub use manager::{CreateOptions, WorktreeManager};
pub use resolution::{resolve, Resolution, ResolutionInputs};
