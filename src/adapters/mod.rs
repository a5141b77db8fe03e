//! Concrete port implementations. The orchestration core (`crate::service`
//! and its collaborators) never depends on this module; only the `cli`
//! binary wires these adapters into a `Deps`.

mod go_toolchain;
mod process_git;
mod real_fs;

pub use go_toolchain::SystemGoToolchain;
pub use process_git::ProcessGitClient;
pub use real_fs::RealFileSystem;

#[cfg(feature = "cli")]
mod logging;
#[cfg(feature = "cli")]
mod term_prompter;

#[cfg(feature = "cli")]
pub use logging::EnvLogger;
#[cfg(feature = "cli")]
pub use term_prompter::TermPrompter;
