//! Height Store Module
//!
//! Single-threaded cache core: HashMap storage, logical access clock,
//! batch LRU eviction and memory-pressure trimming. Thread safety is layered
//! on top by [`HeightCache`](crate::cache::HeightCache).

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::lru::{eviction_batch_size, oldest_keys};
use crate::cache::{validate_height, CacheStatistics, CacheStats, HeightEntry};
use crate::error::Result;

// == Height Store ==
/// Bounded map from item id to measured height.
#[derive(Debug)]
pub struct HeightStore {
    /// Height storage keyed by item id
    entries: HashMap<String, HeightEntry>,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Last issued access stamp
    clock: u64,
}

impl HeightStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_size` heights.
    ///
    /// A zero capacity is raised to one.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    // == Get Height ==
    /// Returns the cached height, refreshing its access stamp on a hit.
    ///
    /// A miss never creates an entry.
    pub fn get_height(&mut self, item_id: &str) -> Option<f64> {
        let stamp = self.tick();
        match self.entries.get_mut(item_id) {
            Some(entry) => {
                entry.touch(stamp);
                self.stats.record_hit();
                Some(entry.height)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Contains ==
    /// Checks for an entry without touching recency or counters.
    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    // == Set Height ==
    /// Stores `height` for `item_id`.
    ///
    /// Out-of-range heights are rejected without touching any entry. When the
    /// store is at capacity a batch of the least recently used entries is
    /// evicted before the write lands.
    pub fn set_height(&mut self, height: f64, item_id: &str) -> Result<()> {
        if let Err(e) = validate_height(height) {
            self.stats.record_rejection();
            return Err(e);
        }

        if self.entries.len() >= self.max_size {
            self.evict_lru();
        }

        let stamp = self.tick();
        match self.entries.get_mut(item_id) {
            Some(entry) => entry.update(height, stamp),
            None => {
                self.entries.insert(
                    item_id.to_string(),
                    HeightEntry::new(item_id.to_string(), height, stamp),
                );
            }
        }

        Ok(())
    }

    // == Evict LRU ==
    /// Removes the oldest quarter of capacity. Returns how many were removed.
    pub fn evict_lru(&mut self) -> usize {
        let victims = oldest_keys(&self.entries, eviction_batch_size(self.max_size));
        for key in &victims {
            self.entries.remove(key);
        }
        self.stats.record_evictions(victims.len());

        if self.entries.is_empty() {
            warn!(
                evicted = victims.len(),
                max_size = self.max_size,
                "LRU eviction emptied the height cache"
            );
        } else {
            debug!(evicted = victims.len(), remaining = self.entries.len(), "LRU eviction");
        }

        victims.len()
    }

    // == Clear Height ==
    /// Removes one entry. Returns whether it existed.
    pub fn clear_height(&mut self, item_id: &str) -> bool {
        self.entries.remove(item_id).is_some()
    }

    // == Clear ==
    /// Removes every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Handle Memory Pressure ==
    /// Keeps the most recently accessed half (rounded down) with their
    /// heights intact and drops the rest. Returns how many were dropped.
    pub fn handle_memory_pressure(&mut self) -> usize {
        let keep = self.entries.len() / 2;
        let drop_count = self.entries.len() - keep;
        let victims = oldest_keys(&self.entries, drop_count);
        for key in &victims {
            self.entries.remove(key);
        }
        self.stats.record_evictions(victims.len());
        victims.len()
    }

    // == Statistics ==
    /// Returns a snapshot of size, capacity and counters.
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics::new(self.entries.len(), self.max_size, &self.stats)
    }

    // == Last Access ==
    /// Access stamp of an entry, without touching it.
    pub fn last_access(&self, item_id: &str) -> Option<u64> {
        self.entries.get(item_id).map(|entry| entry.last_access)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
