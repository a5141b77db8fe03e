//! The `FileSystem` capability contract (§4.1, §6).

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Abstract filesystem capability. The core never touches `std::fs` directly
/// so that create/rollback logic can be exercised without real disk I/O.
pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_all(&self, path: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// List the immediate (non-recursive) entries of a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// True if `path` exists, is a directory, and contains at least one entry.
    fn is_nonempty_dir(&self, path: &Path) -> bool {
        self.is_dir(path)
            && self
                .read_dir(path)
                .map(|entries| !entries.is_empty())
                .unwrap_or(false)
    }
    fn join(&self, base: &Path, segment: &str) -> PathBuf {
        base.join(segment)
    }
    /// Resolve the platform's user configuration directory (e.g.
    /// `~/.config` on Linux, `~/Library/Application Support` on macOS).
    fn user_config_dir(&self) -> Result<PathBuf>;
    /// Resolve the user's home directory.
    fn home_dir(&self) -> Result<PathBuf>;

    /// Resolve symlinks and normalize a path for prefix comparison, without
    /// producing a Windows `\\?\` UNC prefix. Default implementation is the
    /// identity function, which is exactly right for in-memory fakes whose
    /// paths never exist on a real filesystem; [`crate::adapters::RealFileSystem`]
    /// overrides this with `dunce::canonicalize`.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}
