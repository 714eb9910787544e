//! The inventory store: owned state + commit-on-mutation + subscriptions.

use chrono::Utc;

use kitshelf_core::{CategoryId, ItemId, LocationId};
use kitshelf_inventory::{
    Category, InventoryEvent, InventoryState, InventorySummary, Item, LoanTerms, Location, ScanOutcome,
    ScanPurpose, resolve_scan,
};

use crate::config::{StorageBackend, StoreConfig};
use crate::error::StoreError;
use crate::observer::{Subscribers, Subscription};
use crate::snapshot;
use crate::storage::{FileStorage, MemoryStorage, SnapshotStorage, SqliteStorage};
use crate::worker::PersistWorker;

/// Single owner of the inventory state.
///
/// Every mutation updates the in-memory state first, then queues a snapshot
/// write (fire-and-forget) and notifies subscribers. Mutations on an unknown
/// id change nothing, write nothing and notify nobody.
#[derive(Debug)]
pub struct InventoryStore {
    state: InventoryState,
    persist: Option<PersistWorker>,
    subscribers: Subscribers<InventoryEvent>,
}

impl InventoryStore {
    /// A store without persistence, starting from the seeded defaults.
    pub fn in_memory() -> Self {
        Self {
            state: InventoryState::default(),
            persist: None,
            subscribers: Subscribers::default(),
        }
    }

    /// Open the store described by `config` and load its snapshot.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let key = config.storage_key.clone();
        match &config.backend {
            StorageBackend::Memory => Self::with_storage(MemoryStorage::new(), key),
            StorageBackend::File { dir } => match StorageBackend::resolve_file_dir(dir.as_ref()) {
                Ok(dir) => Self::with_storage(FileStorage::new(dir), key),
                Err(err) => {
                    tracing::error!(error = ?err, "no usable data directory; falling back to in-memory storage");
                    Self::with_storage(MemoryStorage::new(), key)
                }
            },
            StorageBackend::Sqlite { path } => match StorageBackend::resolve_sqlite_path(path.as_ref()) {
                Ok(path) => Self::with_storage(SqliteStorage::new(path), key),
                Err(err) => {
                    tracing::error!(error = ?err, "no usable database path; falling back to in-memory storage");
                    Self::with_storage(MemoryStorage::new(), key)
                }
            },
        }
    }

    /// Start persistence on `storage` and load the snapshot stored under `key`.
    ///
    /// A missing, unreadable or undecodable snapshot leaves the seeded defaults
    /// in place; the failure is logged.
    pub fn with_storage<S>(storage: S, key: impl Into<String>) -> Result<Self, StoreError>
    where
        S: SnapshotStorage + 'static,
    {
        let worker = PersistWorker::spawn(storage, key)?;

        let state = match worker.load()? {
            Ok(Some(raw)) => match snapshot::decode(&raw) {
                Ok(state) => {
                    tracing::info!(
                        key = %worker.key(),
                        items = state.items().len(),
                        categories = state.categories().len(),
                        locations = state.locations().len(),
                        "inventory loaded"
                    );
                    state
                }
                Err(err) => {
                    tracing::warn!(key = %worker.key(), error = %err, "stored snapshot unusable; starting from defaults");
                    InventoryState::default()
                }
            },
            Ok(None) => {
                tracing::info!(key = %worker.key(), "no stored snapshot; starting from defaults");
                InventoryState::default()
            }
            Err(err) => {
                tracing::warn!(key = %worker.key(), error = ?err, "failed to read stored snapshot; starting from defaults");
                InventoryState::default()
            }
        };

        Ok(Self {
            state,
            persist: Some(worker),
            subscribers: Subscribers::default(),
        })
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        self.state.items()
    }

    pub fn categories(&self) -> &[Category] {
        self.state.categories()
    }

    pub fn locations(&self) -> &[Location] {
        self.state.locations()
    }

    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.subscribers.subscribe()
    }

    pub fn add_item(&mut self, item: Item) {
        let event = self.state.add_item(item);
        self.commit(event);
    }

    pub fn update_item(&mut self, item: Item) {
        let event = self.state.update_item(item);
        self.commit(event);
    }

    pub fn remove_item(&mut self, id: &ItemId) {
        let event = self.state.remove_item(id);
        self.commit(event);
    }

    /// Lend an item; `date_lent` is the current time.
    pub fn lend_item(
        &mut self,
        id: &ItemId,
        borrower: impl Into<String>,
        location: impl Into<String>,
        expected_return: Option<String>,
        notes: Option<String>,
    ) {
        let terms = LoanTerms {
            borrower: borrower.into(),
            location: location.into(),
            expected_return,
            notes,
        };
        self.lend_item_with(id, terms);
    }

    /// Lend an item with pre-validated terms (see `LendRequest::validate`).
    pub fn lend_item_with(&mut self, id: &ItemId, terms: LoanTerms) {
        let event = self.state.lend_item(id, terms, Utc::now());
        self.commit(event);
    }

    pub fn return_item(&mut self, id: &ItemId) {
        let event = self.state.return_item(id);
        self.commit(event);
    }

    pub fn add_category(&mut self, category: Category) {
        let event = self.state.add_category(category);
        self.commit(event);
    }

    pub fn remove_category(&mut self, id: &CategoryId) {
        let event = self.state.remove_category(id);
        self.commit(event);
    }

    pub fn add_location(&mut self, location: Location) {
        let event = self.state.add_location(location);
        self.commit(event);
    }

    pub fn remove_location(&mut self, id: &LocationId) {
        let event = self.state.remove_location(id);
        self.commit(event);
    }

    pub fn get_item_by_barcode(&self, barcode: &str) -> Option<&Item> {
        self.state.get_item_by_barcode(barcode)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.state.item(id)
    }

    pub fn search_items(&self, query: &str) -> Vec<&Item> {
        self.state.search_items(query)
    }

    pub fn available_items(&self, query: &str) -> Vec<&Item> {
        self.state.available_items(query)
    }

    pub fn lent_items(&self) -> Vec<&Item> {
        self.state.lent_items()
    }

    pub fn summary(&self) -> InventorySummary {
        self.state.summary()
    }

    pub fn resolve_scan(&self, barcode: &str, purpose: ScanPurpose) -> ScanOutcome {
        resolve_scan(&self.state, barcode, purpose)
    }

    /// Throw away everything and go back to the seeded defaults.
    pub fn reset(&mut self) {
        self.state = InventoryState::default();
        self.commit(Some(InventoryEvent::Reset));
    }

    /// Delete the persisted snapshot. The in-memory state is kept, and the
    /// next mutation writes it again.
    pub fn clear_persisted(&self) {
        match &self.persist {
            Some(worker) => {
                tracing::info!(key = %worker.key(), "clearing persisted inventory");
                worker.clear();
            }
            None => tracing::debug!("no persistence configured; nothing to clear"),
        }
    }

    /// Block until queued snapshot writes have reached storage.
    ///
    /// Failures are logged, not returned.
    pub fn flush(&self) {
        if let Some(worker) = &self.persist {
            if let Err(err) = worker.flush() {
                tracing::error!(error = %err, "failed to flush inventory snapshot");
            }
        }
    }

    fn commit(&mut self, event: Option<InventoryEvent>) {
        let Some(event) = event else {
            return;
        };

        tracing::debug!(event_type = event.event_type(), "inventory changed");

        if let Some(worker) = &self.persist {
            worker.save(self.state.clone());
        }
        self.subscribers.publish(&event);
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
