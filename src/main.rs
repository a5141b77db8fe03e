//! The `wsm` binary: argument parsing, adapter wiring, and exit-code mapping
//! (§6's "Exit codes" table). Everything else lives in the library — this
//! file is deliberately thin, mirroring the teacher's own `src/main.rs`
//! split between CLI plumbing and the `worktrunk` library it drives.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use wsm::adapters::{EnvLogger, ProcessGitClient, RealFileSystem, SystemGoToolchain, TermPrompter};
use wsm::cli::{BranchAction, Cli, Commands};
use wsm::ports::{Clock, FileSystem, GitClient, Logger, SystemClock};
use wsm::{ConfigStore, Discovery, DiscoveryOptions, Deps, Error, MergeOptions, SyncOptions, WorkspaceService};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let git = ProcessGitClient;
    let fs = RealFileSystem;
    let clock = SystemClock;
    let logger = EnvLogger;
    let prompter = TermPrompter;
    let go_toolchain = SystemGoToolchain;

    let root = match ConfigStore::default_root(&fs) {
        Ok(root) => root,
        Err(e) => return fail(&e),
    };
    let config_store = ConfigStore::new(&fs, &clock, root);
    let service = WorkspaceService::new(Deps {
        git: &git,
        fs: &fs,
        clock: &clock,
        logger: &logger,
        prompter: &prompter,
        go_toolchain: &go_toolchain,
        config_store: &config_store,
    });

    match run(&service, &git, &fs, &clock, &logger, cli.command) {
        Ok(()) => ExitCode::from(0),
        Err(e) => fail(&e),
    }
}

/// Expand a leading `~` in a CLI-supplied path argument. Only the CLI layer
/// does this: it reads `$HOME`, an ambient OS concern the core's path
/// handling deliberately stays free of so its tests remain hermetic.
fn expand_path(path: PathBuf) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// §6's "Exit codes" table: `0` success, `1` generic failure, `2` usage
/// error, `3` cancelled by user. Mapping typed errors onto exit codes is a
/// CLI concern, not the core's (§6: "The core itself returns typed errors;
/// mapping is a UI concern").
fn fail(err: &Error) -> ExitCode {
    eprintln!("error: {err}");
    let code = match err {
        Error::Cancelled { .. } => 3,
        Error::Validation { .. } | Error::RepositoriesNotFound { .. } => 2,
        _ => 1,
    };
    ExitCode::from(code)
}

#[allow(clippy::too_many_arguments)]
fn run(
    service: &WorkspaceService<'_>,
    git: &dyn GitClient,
    fs: &dyn FileSystem,
    clock: &dyn Clock,
    logger: &dyn Logger,
    command: Commands,
) -> wsm::Result<()> {
    match command {
        Commands::Discover {
            roots,
            recursive,
            max_depth,
        } => {
            let roots = if roots.is_empty() {
                vec![std::env::current_dir().map_err(|e| Error::io(".", e))?]
            } else {
                roots.into_iter().map(expand_path).collect()
            };
            let discovery = Discovery::new(git, fs, clock, logger);
            let mut registry = service.config_store().load_registry()?;
            discovery.discover(
                &DiscoveryOptions {
                    roots,
                    recursive,
                    max_depth,
                },
                &mut registry,
            )?;
            service.config_store().save_registry(&registry)?;
            println!("discovered {} repositories", registry.repositories.len());
            Ok(())
        }
        Commands::ListRepos => {
            let registry = service.config_store().load_registry()?;
            for repo in &registry.repositories {
                let categories: Vec<&str> = repo.categories.iter().map(String::as_str).collect();
                println!("{}\t{}\t[{}]", repo.name, repo.path.display(), categories.join(", "));
            }
            Ok(())
        }
        Commands::ListWorkspaces => {
            for workspace in service.config_store().list_workspaces()? {
                println!("{}\t{}\t{}", workspace.name, workspace.branch, workspace.path.display());
            }
            Ok(())
        }
        Commands::Create {
            name,
            repositories,
            branch,
            base_branch,
            agent_md,
            dry_run,
        } => {
            let agent_md = agent_md
                .map(expand_path)
                .map(|path| fs.read_to_string(&path))
                .transpose()?;
            let workspace = service.create(&wsm::CreateRequest {
                name,
                repository_names: repositories,
                branch,
                base_branch,
                agent_md,
                dry_run,
            })?;
            println!("created workspace {} on branch {}", workspace.name, workspace.branch);
            Ok(())
        }
        Commands::Fork {
            new_name,
            source,
            branch,
            dry_run,
        } => {
            let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
            let workspace = service.fork(&wsm::ForkRequest {
                source_workspace: source,
                cwd: Some(cwd),
                new_name,
                branch,
                agent_md_override: None,
                dry_run,
            })?;
            println!(
                "forked workspace {} on branch {} (base {})",
                workspace.name,
                workspace.branch,
                workspace.base_branch.as_deref().unwrap_or("")
            );
            Ok(())
        }
        Commands::Add {
            workspace,
            repositories,
            branch,
            force,
            dry_run,
        } => {
            let updated = service.add_repositories(&wsm::AddRepositoriesRequest {
                workspace_name: workspace,
                repository_names: repositories,
                branch,
                force,
                dry_run,
            })?;
            println!("workspace {} now has {} members", updated.name, updated.repositories.len());
            Ok(())
        }
        Commands::Remove {
            workspace,
            repositories,
            force,
            remove_files,
            dry_run,
        } => {
            let (updated, outcomes) = service.remove_repositories(&wsm::RemoveRepositoriesRequest {
                workspace_name: workspace,
                repository_names: repositories,
                force,
                remove_files,
                dry_run,
            })?;
            for outcome in &outcomes {
                let status = if outcome.success { "ok" } else { "failed" };
                println!(
                    "{}: {status}{}",
                    outcome.repository,
                    outcome.message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
                );
            }
            println!("workspace {} now has {} members", updated.name, updated.repositories.len());
            Ok(())
        }
        Commands::Delete {
            workspace,
            remove_files,
            force_worktrees,
        } => {
            service.delete(&wsm::DeleteRequest {
                name: workspace.clone(),
                remove_files,
                force_worktrees,
            })?;
            println!("deleted workspace {workspace}");
            Ok(())
        }
        Commands::Branch { action } => {
            let results = match action {
                BranchAction::Create { workspace, branch, from } => {
                    service.create_branch(&wsm::BranchFanOutRequest { workspace_name: workspace, branch }, from.as_deref())?
                }
                BranchAction::Switch { workspace, branch } => {
                    service.switch_branch(&wsm::BranchFanOutRequest { workspace_name: workspace, branch })?
                }
                BranchAction::List { workspace } => service.list_branches(&workspace)?,
            };
            for result in &results {
                let status = if result.success { "ok" } else { "failed" };
                println!(
                    "{}: {status} {}{}",
                    result.repository,
                    result.branch,
                    result.error.as_deref().map(|e| format!(" ({e})")).unwrap_or_default()
                );
            }
            Ok(())
        }
        Commands::Status { workspace } => {
            let ws = service.config_store().load_workspace(&workspace)?;
            let status = service.status(&ws)?;
            println!("overall: {}", status.overall);
            for repo in &status.repositories {
                println!(
                    "  {} [{}] ahead {} behind {}",
                    repo.name,
                    repo.current_branch.as_deref().unwrap_or("-"),
                    repo.ahead,
                    repo.behind
                );
            }
            Ok(())
        }
        Commands::Sync {
            workspace,
            pull,
            push,
            rebase,
            dry_run,
        } => {
            let results = service.sync(
                &workspace,
                &SyncOptions {
                    pull,
                    push,
                    rebase,
                    dry_run,
                },
            )?;
            for result in &results {
                println!(
                    "{}: pulled={} pushed={} conflicts={}{}",
                    result.repository,
                    result.pulled,
                    result.pushed,
                    result.conflicts,
                    result.error.as_deref().map(|e| format!(" ({e})")).unwrap_or_default()
                );
            }
            Ok(())
        }
        Commands::Merge {
            workspace,
            force,
            keep_workspace,
        } => {
            let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
            service.merge(&workspace, &cwd, &MergeOptions { force, keep_workspace })?;
            println!("merged workspace {workspace}");
            Ok(())
        }
        Commands::Detect => {
            let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
            let name = service.detect_workspace(&cwd)?;
            println!("{name}");
            Ok(())
        }
    }
}
