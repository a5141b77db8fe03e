//! Durable storage for the three document classes named in §4.1 and §6:
//! `config.json`, `registry.json`, and `workspaces/<name>.json`.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Config, RepositoryRegistry, Workspace};
use crate::ports::{Clock, FileSystem};

/// `<user-config>/workspace-manager/`.
pub struct ConfigStore<'a> {
    fs: &'a dyn FileSystem,
    clock: &'a dyn Clock,
    root: PathBuf,
}

impl<'a> ConfigStore<'a> {
    /// `root` is the `workspace-manager` directory itself (already resolved
    /// under the platform config dir by the caller).
    pub fn new(fs: &'a dyn FileSystem, clock: &'a dyn Clock, root: PathBuf) -> Self {
        Self { fs, clock, root }
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join("registry.json")
    }

    fn workspaces_dir(&self) -> PathBuf {
        self.root.join("workspaces")
    }

    fn workspace_doc_path(&self, name: &str) -> PathBuf {
        self.workspaces_dir().join(format!("{name}.json"))
    }

    /// The JSON schema for `config.json`, for documentation and editor
    /// tooling — not consulted by `load_config`/`save_config` themselves.
    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Load the global config, synthesizing defaults if absent. Per §4.1: the
    /// date segment of the default workspace root is resolved from the
    /// injected clock at load time and is never persisted.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        if !self.fs.exists(&path) {
            let home = self.fs.home_dir()?;
            let today = self.clock.today();
            return Ok(Config {
                workspace_dir: home.join("workspaces").join(today.to_string()),
                template_dir: None,
                registry_path: self.registry_path(),
                extra: Default::default(),
            });
        }
        let contents = self.fs.read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| Error::Parse {
            path,
            underlying: e.to_string(),
        })
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        self.fs.create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(config).map_err(|e| Error::Parse {
            path: self.config_path(),
            underlying: e.to_string(),
        })?;
        self.fs.write(&self.config_path(), &json)
    }

    /// Missing file is not an error: returns an empty registry.
    pub fn load_registry(&self) -> Result<RepositoryRegistry> {
        let path = self.registry_path();
        if !self.fs.exists(&path) {
            return Ok(RepositoryRegistry::default());
        }
        let contents = self.fs.read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| Error::Parse {
            path,
            underlying: e.to_string(),
        })
    }

    pub fn save_registry(&self, registry: &RepositoryRegistry) -> Result<()> {
        self.fs.create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(registry).map_err(|e| Error::Parse {
            path: self.registry_path(),
            underlying: e.to_string(),
        })?;
        self.fs.write(&self.registry_path(), &json)
    }

    pub fn load_workspace(&self, name: &str) -> Result<Workspace> {
        let path = self.workspace_doc_path(name);
        if !self.fs.exists(&path) {
            return Err(Error::not_found(format!("workspace {name}")));
        }
        let contents = self.fs.read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|e| Error::Parse {
            path,
            underlying: e.to_string(),
        })
    }

    /// Writes the two documents a workspace's persistence consists of: the
    /// in-tree metadata document and the global registry document. If either
    /// write fails, the call fails; best-effort cleanup of a half-written
    /// pair is the caller's responsibility (§4.1).
    pub fn save_workspace(&self, workspace: &Workspace, metadata_json: &str) -> Result<()> {
        self.fs.create_dir_all(workspace.metadata_path().parent().unwrap_or(&workspace.path))?;
        self.fs.write(&workspace.metadata_path(), metadata_json)?;

        self.fs.create_dir_all(&self.workspaces_dir())?;
        let doc = serde_json::to_string_pretty(workspace).map_err(|e| Error::Parse {
            path: self.workspace_doc_path(&workspace.name),
            underlying: e.to_string(),
        })?;
        self.fs.write(&self.workspace_doc_path(&workspace.name), &doc)
    }

    /// Scans the workspaces directory; malformed documents are skipped, not
    /// fatal (logged by the caller via the `Logger` port).
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let dir = self.workspaces_dir();
        if !self.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in self.fs.read_dir(&dir)? {
            if entry.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(contents) = self.fs.read_to_string(&entry) else {
                continue;
            };
            if let Ok(workspace) = serde_json::from_str::<Workspace>(&contents) {
                out.push(workspace);
            }
        }
        Ok(out)
    }

    pub fn delete_workspace_document(&self, name: &str) -> Result<()> {
        let path = self.workspace_doc_path(name);
        if self.fs.exists(&path) {
            self.fs.remove_file(&path)?;
        }
        Ok(())
    }

    /// Resolve `<user-config>/workspace-manager` via the filesystem port.
    pub fn default_root(fs: &dyn FileSystem) -> Result<PathBuf> {
        Ok(fs.user_config_dir()?.join("workspace-manager"))
    }
}

pub fn workspace_root_for(config: &Config) -> &Path {
    &config.workspace_dir
}
