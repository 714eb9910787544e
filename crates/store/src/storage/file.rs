//! One JSON document per key in a directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use super::SnapshotStorage;

/// Directory-backed storage. Writes go to a temp file first and are renamed
/// into place, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read snapshot file {:?}", path)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create storage directory at {:?}", self.dir))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("failed to write temp snapshot file {:?}", tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("failed to move snapshot into place at {:?}", path))?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove snapshot file {:?}", path)),
        }
    }
}
