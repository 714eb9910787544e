use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::SnapshotStorage;

/// In-memory storage for tests/dev.
///
/// Clones share the same map, so a test can hand one clone to a store and
/// inspect (or reuse) the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous peek, for assertions outside an async context.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.inner.read().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        map.remove(key);
        Ok(())
    }
}
