//! The `cli` feature's argument surface: a thin `clap`-derive front door
//! over [`crate::service::WorkspaceService`]. No interactive forms, no
//! colored output, no shell completion — those are named out of scope in
//! the specification (§1) and are not implemented here. This module only
//! parses arguments and maps them onto service calls; every decision lives
//! in the core.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wsm")]
#[command(about = "Multi-repository workspace orchestration on git worktrees")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Show debug-level logging (equivalent to `RUST_LOG=debug`).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk one or more filesystem roots, discover git repositories, and
    /// merge them into the registry (§4.2).
    Discover {
        /// Root directories to scan. Defaults to the current directory.
        #[arg(required = false)]
        roots: Vec<PathBuf>,
        #[arg(long)]
        recursive: bool,
        /// 0 means unlimited when `--recursive` is set.
        #[arg(long, default_value_t = 0)]
        max_depth: u32,
    },
    /// List every repository in the registry.
    ListRepos,
    /// List every known workspace.
    ListWorkspaces,
    /// Create a workspace from a set of registered repositories (§4.4.1).
    Create {
        name: String,
        #[arg(long = "repo", required = true)]
        repositories: Vec<String>,
        #[arg(long, default_value = "")]
        branch: String,
        #[arg(long)]
        base_branch: Option<String>,
        #[arg(long)]
        agent_md: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Fork the current (or a named) workspace into a new one (§4.4.2).
    Fork {
        new_name: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "")]
        branch: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Add repositories to an existing workspace (§4.4.3).
    Add {
        workspace: String,
        #[arg(long = "repo", required = true)]
        repositories: Vec<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove repositories from a workspace (§4.4.4).
    Remove {
        workspace: String,
        #[arg(long = "repo", required = true)]
        repositories: Vec<String>,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        remove_files: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a workspace (§4.4.5).
    Delete {
        workspace: String,
        #[arg(long)]
        remove_files: bool,
        #[arg(long)]
        force_worktrees: bool,
    },
    /// Fan out a branch create/switch/list across every member (§4.4.6).
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },
    /// Report aggregated per-repository status (§4.5).
    Status { workspace: String },
    /// Pull/push/fetch every member repository (§4.4.7).
    Sync {
        workspace: String,
        #[arg(long)]
        pull: bool,
        #[arg(long)]
        push: bool,
        #[arg(long)]
        rebase: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Merge a fork's working branch back into its base branch (§4.4.8).
    Merge {
        workspace: String,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        keep_workspace: bool,
    },
    /// Identify which workspace the current directory belongs to (§4.4.9).
    Detect,
}

#[derive(Subcommand)]
pub enum BranchAction {
    Create {
        workspace: String,
        branch: String,
        #[arg(long)]
        from: Option<String>,
    },
    Switch {
        workspace: String,
        branch: String,
    },
    List {
        workspace: String,
    },
}
