//! Store-level error model.

use thiserror::Error;

/// Failure to bring up the store's persistence.
///
/// Mutations never fail; this only comes out of the constructors that start a
/// persistence worker.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build persistence runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to spawn persistence worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("persistence worker is no longer running")]
    WorkerGone,
}

/// Failure to read or write the persisted snapshot document.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
