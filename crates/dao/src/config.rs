//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::debug;

use crate::{DaoError, Result};

/// Storage engine selected for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Documents are JSON files under the store root (default).
    #[default]
    Filesystem,
    /// Documents live in memory and vanish with the process.
    Memory,
}

/// Configuration for opening a [`crate::Store`].
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory of a filesystem store
    pub root_path:      PathBuf,
    /// Directory of `<collection>.json` validators overriding the built-in ones
    pub validators_dir: Option<PathBuf>,
    /// Storage engine
    pub backend:        BackendKind,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_path:      PathBuf::from("edutask-data"),
            validators_dir: None,
            backend:        BackendKind::Filesystem,
        }
    }
}

impl StoreConfig {
    /// Creates a filesystem configuration rooted at `root_path`.
    pub fn filesystem<P>(root_path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    /// Creates an in-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            ..Self::default()
        }
    }

    /// Reads a configuration from a JSON file.
    pub async fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!("Loading store configuration from {:?}", path);
        let content = tokio_fs::read_to_string(path).await.map_err(|e| {
            DaoError::Config {
                message: format!("cannot read {}: {}", path.display(), e),
            }
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DaoError::Config {
                message: format!("cannot parse {}: {}", path.display(), e),
            }
        })
    }
}
