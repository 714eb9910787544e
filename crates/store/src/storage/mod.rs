//! Durable key/value backends for the persisted snapshot.
//!
//! The store only ever touches one key; backends are still keyed so several
//! stores (or tests) can share a directory or database.

use std::sync::Arc;

use async_trait::async_trait;

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// String-valued key/value storage.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> anyhow::Result<()>;

    /// Release held resources (connections, handles). Called once when the
    /// owning worker shuts down.
    async fn close(&self) {}
}

#[async_trait]
impl<S> SnapshotStorage for Arc<S>
where
    S: SnapshotStorage + ?Sized,
{
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove_item(key).await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
