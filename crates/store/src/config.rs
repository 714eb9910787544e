//! Store configuration.

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "inventory-storage";

const APP_DIR: &str = "kitshelf";
const SQLITE_FILE: &str = "inventory.db";

/// Where and under which key the store keeps its snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub backend: StorageBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backend: StorageBackend::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-lifetime only; nothing survives a restart.
    Memory,
    /// One JSON document per key inside `dir`.
    File {
        #[serde(default)]
        dir: Option<PathBuf>,
    },
    /// Key/value table in a SQLite database at `path`.
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::File { dir: None }
    }
}

impl StorageBackend {
    /// Directory used by the file backend, falling back to the app data directory.
    pub fn resolve_file_dir(dir: Option<&PathBuf>) -> anyhow::Result<PathBuf> {
        match dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Database path used by the SQLite backend, falling back to the app data directory.
    pub fn resolve_sqlite_path(path: Option<&PathBuf>) -> anyhow::Result<PathBuf> {
        match path {
            Some(path) => Ok(path.clone()),
            None => Ok(default_data_dir()?.join(SQLITE_FILE)),
        }
    }
}

/// Resolve the app data directory: `{data_dir}/kitshelf`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join(APP_DIR))
}
