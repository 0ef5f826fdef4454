//! Height Cache Service
//!
//! Thread-safe handle over [`HeightStore`]. The store sits behind one mutex,
//! which is the only serialization point for cache state. Reads lock it
//! synchronously; every mutation is queued to a single writer task so
//! mutations apply in submission order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cache::{CacheStatistics, HeightStore};
use crate::error::HeightError;

/// Mutations accepted by the writer task.
#[derive(Debug)]
enum Command {
    Set { item_id: String, height: f64 },
    Clear(String),
    ClearAll,
    MemoryPressure,
    Flush(oneshot::Sender<()>),
}

// == Height Cache ==
/// Cloneable handle to one shared height cache.
///
/// Construct once at startup and hand clones to every consumer.
#[derive(Clone, Debug)]
pub struct HeightCache {
    store: Arc<Mutex<HeightStore>>,
    commands: mpsc::UnboundedSender<Command>,
}

impl HeightCache {
    // == Constructor ==
    /// Creates a cache holding at most `max_size` heights and spawns its
    /// writer task on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new(max_size: usize) -> Self {
        let store = Arc::new(Mutex::new(HeightStore::new(max_size)));
        let (commands, receiver) = mpsc::unbounded_channel();

        tokio::spawn(run_writer(store.clone(), receiver));
        debug!(max_size, "height cache writer started");

        Self { store, commands }
    }

    fn lock(&self) -> MutexGuard<'_, HeightStore> {
        lock_store(&self.store)
    }

    fn submit(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!(error = %HeightError::CacheClosed, "dropping cache mutation");
        }
    }

    // == Get Height ==
    /// Returns the cached height for `item_id`, refreshing its recency.
    ///
    /// A write still sitting in the queue is not visible yet.
    pub fn get_height(&self, item_id: &str) -> Option<f64> {
        self.lock().get_height(item_id)
    }

    // == Contains ==
    /// Checks for an entry without refreshing recency.
    pub fn contains(&self, item_id: &str) -> bool {
        self.lock().contains(item_id)
    }

    // == Set Height ==
    /// Queues a height write. Out-of-range heights are dropped and logged
    /// when the writer applies them.
    pub fn set_height(&self, height: f64, item_id: impl Into<String>) {
        self.submit(Command::Set {
            item_id: item_id.into(),
            height,
        });
    }

    // == Clear Height ==
    /// Queues removal of one entry.
    pub fn clear_height(&self, item_id: impl Into<String>) {
        self.submit(Command::Clear(item_id.into()));
    }

    // == Clear Cache ==
    /// Queues removal of every entry.
    pub fn clear_cache(&self) {
        self.submit(Command::ClearAll);
    }

    // == Handle Memory Pressure ==
    /// Queues a trim down to the most recently used half.
    pub fn handle_memory_pressure(&self) {
        self.submit(Command::MemoryPressure);
    }

    // == Flush ==
    /// Waits until every mutation submitted before this call has been applied.
    pub async fn flush(&self) {
        let (done, applied) = oneshot::channel();
        self.submit(Command::Flush(done));
        // A closed writer has nothing left to apply.
        let _ = applied.await;
    }

    // == Statistics ==
    /// Synchronous snapshot of `(count, max_size, usage_ratio)` and counters.
    pub fn statistics(&self) -> CacheStatistics {
        self.lock().statistics()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn lock_store(store: &Mutex<HeightStore>) -> MutexGuard<'_, HeightStore> {
    // Every mutation leaves the store consistent, so a poisoned lock is still usable.
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies queued mutations one at a time until every handle is dropped.
async fn run_writer(store: Arc<Mutex<HeightStore>>, mut receiver: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Set { item_id, height } => {
                if let Err(e) = lock_store(&store).set_height(height, &item_id) {
                    warn!(item_id = %item_id, error = %e, "height write dropped");
                }
            }
            Command::Clear(item_id) => {
                let removed = lock_store(&store).clear_height(&item_id);
                debug!(item_id = %item_id, removed, "height invalidated");
            }
            Command::ClearAll => {
                let removed = lock_store(&store).clear();
                info!(removed, "height cache cleared");
            }
            Command::MemoryPressure => {
                let (dropped, remaining) = {
                    let mut guard = lock_store(&store);
                    let dropped = guard.handle_memory_pressure();
                    (dropped, guard.len())
                };
                info!(dropped, remaining, "height cache trimmed for memory pressure");
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("height cache writer stopped");
}
