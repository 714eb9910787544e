//! Background persistence worker.
//!
//! The worker owns the storage backend and a current-thread tokio runtime on a
//! dedicated thread. The store hands it snapshots over an unbounded channel and
//! never waits for a write. Saves queued back-to-back are coalesced: only the
//! newest state is written. Dropping the worker drains the queue, closes the
//! backend and joins the thread.

use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use kitshelf_inventory::InventoryState;

use crate::error::StoreError;
use crate::snapshot;
use crate::storage::SnapshotStorage;

enum Command {
    Load(std_mpsc::Sender<anyhow::Result<Option<String>>>),
    Save(Box<InventoryState>),
    Clear,
    Flush(std_mpsc::Sender<()>),
    Shutdown,
}

/// Handle to the persistence thread.
#[derive(Debug)]
pub struct PersistWorker {
    tx: mpsc::UnboundedSender<Command>,
    handle: Option<JoinHandle<()>>,
    key: String,
}

impl PersistWorker {
    /// Start a worker writing to `storage` under `key`.
    pub fn spawn<S>(storage: S, key: impl Into<String>) -> Result<Self, StoreError>
    where
        S: SnapshotStorage + 'static,
    {
        let key = key.into();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let worker_key = key.clone();

        let handle = std::thread::Builder::new()
            .name("kitshelf-persist".to_string())
            .spawn(move || {
                tracing::debug!(key = %worker_key, "persistence worker started");
                runtime.block_on(run(storage, worker_key, rx));
                tracing::debug!("persistence worker stopped");
            })
            .map_err(StoreError::WorkerSpawn)?;

        Ok(Self {
            tx,
            handle: Some(handle),
            key,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the raw snapshot document. Blocks until the worker answers.
    pub fn load(&self) -> Result<anyhow::Result<Option<String>>, StoreError> {
        let (reply_tx, reply_rx) = std_mpsc::channel();
        self.tx
            .send(Command::Load(reply_tx))
            .map_err(|_| StoreError::WorkerGone)?;
        reply_rx.recv().map_err(|_| StoreError::WorkerGone)
    }

    /// Queue a write of `state`. Returns immediately.
    pub fn save(&self, state: InventoryState) {
        if self.tx.send(Command::Save(Box::new(state))).is_err() {
            tracing::error!(key = %self.key, "persistence worker gone; snapshot not saved");
        }
    }

    /// Queue removal of the persisted snapshot. Returns immediately.
    pub fn clear(&self) {
        if self.tx.send(Command::Clear).is_err() {
            tracing::error!(key = %self.key, "persistence worker gone; snapshot not cleared");
        }
    }

    /// Block until every command queued so far has been handled.
    pub fn flush(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = std_mpsc::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| StoreError::WorkerGone)?;
        done_rx.recv().map_err(|_| StoreError::WorkerGone)
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(key = %self.key, "persistence worker panicked");
            }
        }
    }
}

async fn run<S>(storage: S, key: String, mut rx: mpsc::UnboundedReceiver<Command>)
where
    S: SnapshotStorage,
{
    let mut next: Option<Command> = None;

    loop {
        let command = match next.take() {
            Some(command) => command,
            None => match rx.recv().await {
                Some(command) => command,
                None => break,
            },
        };

        match command {
            Command::Load(reply) => {
                let result = storage.get_item(&key).await;
                let _ = reply.send(result);
            }
            Command::Save(mut state) => {
                let mut skipped = 0usize;
                loop {
                    match rx.try_recv() {
                        Ok(Command::Save(newer)) => {
                            state = newer;
                            skipped += 1;
                        }
                        Ok(other) => {
                            next = Some(other);
                            break;
                        }
                        Err(_) => break,
                    }
                }
                if skipped > 0 {
                    tracing::debug!(key = %key, skipped, "coalesced queued snapshots");
                }
                write_snapshot(&storage, &key, &state).await;
            }
            Command::Clear => {
                if let Err(err) = storage.remove_item(&key).await {
                    tracing::error!(key = %key, error = ?err, "failed to clear persisted snapshot");
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
            Command::Shutdown => break,
        }
    }

    storage.close().await;
}

async fn write_snapshot<S>(storage: &S, key: &str, state: &InventoryState)
where
    S: SnapshotStorage,
{
    let encoded = match snapshot::encode(state) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::error!(key, error = ?err, "failed to encode snapshot");
            return;
        }
    };

    match storage.set_item(key, &encoded).await {
        Ok(()) => tracing::debug!(key, bytes = encoded.len(), "snapshot persisted"),
        Err(err) => tracing::error!(key, error = ?err, "failed to persist snapshot"),
    }
}
