//! Git-worktree-backed multi-repository workspace orchestration.
//!
//! A *workspace* is a named, on-disk composite of one or more git
//! repositories, each checked out as a sibling worktree pinned to a shared
//! branch. This crate discovers repositories, classifies them into project
//! categories, and drives the `git worktree` lifecycle (create, sync, merge
//! back, delete) across every member atomically where the operation calls
//! for it and independently where it doesn't.
//!
//! The library API is organized as ports-and-adapters: [`ports`] defines the
//! capability traits ([`ports::GitClient`], [`ports::FileSystem`],
//! [`ports::Prompter`], [`ports::Logger`], [`ports::Clock`]) the
//! orchestration core depends on; [`adapters`] supplies the process- and
//! filesystem-backed implementations the `cli` binary wires up. Tests
//! substitute in-memory fakes from `testutil` instead.

pub mod adapters;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config_store;
pub mod discovery;
pub mod error;
pub mod goworkspace;
pub mod merge;
pub mod metadata;
pub mod model;
pub mod ports;
pub mod service;
pub mod status;
pub mod sync;
pub mod worktree;

#[cfg(test)]
pub(crate) mod testutil;

pub use config_store::ConfigStore;
pub use discovery::{Discovery, DiscoveryOptions};
pub use error::{Error, Result};
pub use merge::{MergeOptions, MergeOrchestrator};
pub use model::{
    Config, OperationOutcome, OverallStatus, Repository, RepositoryRegistry, RepoStatus,
    SyncResult, Workspace, WorkspaceStatus,
};
pub use service::{
    AddRepositoriesRequest, BranchFanOutRequest, CreateRequest, DeleteRequest, Deps, ForkRequest,
    RemoveRepositoriesRequest, WorkspaceService,
};
pub use status::StatusService;
pub use sync::{SyncOptions, SyncService};
