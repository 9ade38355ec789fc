use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use docstore::{InMemoryStorage, LocalDirStorage, StorageClient};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docstore.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub backend: BackendConfig,
    /// `tracing` filter used when neither `RUST_LOG` nor `--verbose` is set.
    pub log_filter: String,
}

/// Which storage the CLI talks to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// A directory on the local filesystem.
    Local { root: PathBuf },
    /// Process-local storage; everything is gone when the command exits.
    Memory,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Local {
                root: PathBuf::from("docstore-data"),
            },
            log_filter: "warn".into(),
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid docstore configuration")
    }

    /// Load `path`, or `docstore.toml` if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => PathBuf::from(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Point the backend at `root`, replacing whatever was configured.
    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.backend = BackendConfig::Local { root };
        }
        self
    }

    pub fn open_backend(&self) -> anyhow::Result<Arc<dyn StorageClient>> {
        let client: Arc<dyn StorageClient> = match &self.backend {
            BackendConfig::Local { root } => Arc::new(
                LocalDirStorage::open(root)
                    .with_context(|| format!("failed to open storage root {}", root.display()))?,
            ),
            BackendConfig::Memory => Arc::new(InMemoryStorage::new()),
        };
        Ok(client)
    }
}
