//! Filesystem discovery of git repositories and their classification into
//! project categories (§4.2).

mod category;

pub use category::{classify, CATEGORY_MARKERS};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Repository, RepositoryRegistry};
use crate::ports::{Clock, FileSystem, GitClient, Logger};

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub roots: Vec<PathBuf>,
    pub recursive: bool,
    /// 0 means unlimited when `recursive` is true.
    pub max_depth: u32,
}

pub struct Discovery<'a> {
    git: &'a dyn GitClient,
    fs: &'a dyn FileSystem,
    clock: &'a dyn Clock,
    logger: &'a dyn Logger,
}

impl<'a> Discovery<'a> {
    pub fn new(
        git: &'a dyn GitClient,
        fs: &'a dyn FileSystem,
        clock: &'a dyn Clock,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            git,
            fs,
            clock,
            logger,
        }
    }

    /// Walk `options.roots`, identify repositories, classify them, and merge
    /// the result into `registry` by `path` (§4.2, steps 1-5).
    pub fn discover(
        &self,
        options: &DiscoveryOptions,
        registry: &mut RepositoryRegistry,
    ) -> Result<()> {
        for root in &options.roots {
            let found = self.walk(root, options.recursive, options.max_depth)?;
            for repo in found {
                self.logger.debug(
                    "discovered repository",
                    &[("name", &repo.name), ("path", &repo.path.display())],
                );
                registry.upsert(repo);
            }
        }
        registry.last_scan = Some(self.clock.now());
        Ok(())
    }

    fn walk(&self, root: &Path, recursive: bool, max_depth: u32) -> Result<Vec<Repository>> {
        // Non-recursive discovery only looks one level below the root (the
        // root itself, plus its immediate children); recursive discovery
        // descends up to `max_depth` levels (0 = unlimited).
        let effective_depth_limit = if recursive { max_depth } else { 1 };
        let mut found = Vec::new();
        let mut visited = std::collections::HashSet::new();
        self.walk_inner(root, effective_depth_limit, 0, &mut visited, &mut found)?;
        Ok(found)
    }

    fn walk_inner(
        &self,
        dir: &Path,
        depth_limit: u32,
        depth: u32,
        visited: &mut std::collections::HashSet<PathBuf>,
        found: &mut Vec<Repository>,
    ) -> Result<()> {
        // Symlink-loop protection: a directory entry that resolves to a
        // canonical path already seen on this walk is never descended into
        // again, so a cycle of symlinked directories under a discovery root
        // terminates instead of recursing indefinitely.
        if !visited.insert(self.fs.canonicalize(dir)) {
            return Ok(());
        }

        if self.git.is_repository(dir) {
            found.push(self.analyze(dir)?);
            // §4.2 step 2: stop descending into a repository once found.
            return Ok(());
        }

        if depth_limit != 0 && depth >= depth_limit {
            return Ok(());
        }

        let Ok(entries) = self.fs.read_dir(dir) else {
            return Ok(());
        };
        for entry in entries {
            if !self.fs.is_dir(&entry) {
                continue;
            }
            let name = entry
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            // §4.2 step 3: skip dot-directories unless the entry is itself a
            // candidate root (depth 0 entries are always considered).
            if name.starts_with('.') {
                continue;
            }
            self.walk_inner(&entry, depth_limit, depth + 1, visited, found)?;
        }
        Ok(())
    }

    fn analyze(&self, path: &Path) -> Result<Repository> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repository")
            .to_string();

        let remote_url = self.git.remote_url(path).unwrap_or(None);
        let current_branch = self.git.current_branch(path).unwrap_or(None);
        let branches = self.git.branches(path).unwrap_or_default();
        let tags = self.git.tags(path).unwrap_or_default();
        let last_commit = self.git.last_commit(path).unwrap_or(None);
        let categories = classify(path, self.fs);

        Ok(Repository {
            name,
            path: path.to_path_buf(),
            remote_url,
            current_branch,
            branches,
            tags,
            last_commit,
            last_scan: Some(self.clock.now()),
            categories,
            extra: Default::default(),
        })
    }

    /// Partition the registry into `(valid, stale)` by checking each entry's
    /// path still exists on disk.
    pub fn validate_registry(&self, registry: &RepositoryRegistry) -> (Vec<Repository>, Vec<Repository>) {
        let mut valid = Vec::new();
        let mut stale = Vec::new();
        for repo in &registry.repositories {
            if self.fs.exists(&repo.path) {
                valid.push(repo.clone());
            } else {
                stale.push(repo.clone());
            }
        }
        (valid, stale)
    }

    /// Remove the stale partition from `registry`.
    pub fn prune(&self, registry: &mut RepositoryRegistry) -> Vec<Repository> {
        let (valid, stale) = self.validate_registry(registry);
        registry.repositories = valid;
        stale
    }
}
