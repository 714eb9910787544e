//! `kitshelf-store`
//!
//! **Responsibility:** the on-device inventory store.
//!
//! This crate provides:
//! - `InventoryStore`, the single owner of items, categories and locations
//! - Durable key/value backends (memory, JSON file, SQLite)
//! - A background worker that persists a snapshot after every change
//! - Change subscriptions for UI layers
//!
//! Domain rules live in `kitshelf-inventory`; this crate adds IO around them.

pub mod config;
pub mod error;
pub mod observer;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod worker;

pub use config::{DEFAULT_STORAGE_KEY, StorageBackend, StoreConfig};
pub use error::{SnapshotError, StoreError};
pub use observer::Subscription;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, SqliteStorage};
pub use store::InventoryStore;
pub use worker::PersistWorker;

pub use kitshelf_inventory::{
    Category, InventoryEvent, InventoryState, InventorySummary, Item, ItemDraft, LendRequest, LendingInfo,
    LoanTerms, Location, ScanGate, ScanOutcome, ScanPurpose,
};
