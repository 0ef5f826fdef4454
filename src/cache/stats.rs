//! Cache Statistics Module
//!
//! Tracks hit/miss/eviction counters and builds usage snapshots.

use serde::Serialize;

// == Cache Stats ==
/// Running counters kept by the store.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Reads that found a height
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Entries removed by LRU eviction or memory-pressure trimming
    pub evictions: u64,
    /// Writes dropped for an out-of-range height
    pub rejected: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }
}

// == Cache Statistics ==
/// Point-in-time snapshot of cache usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatistics {
    /// Current number of entries
    pub count: usize,
    /// Configured capacity
    pub max_size: usize,
    /// `count / max_size`
    pub usage_ratio: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub rejected: u64,
}

impl CacheStatistics {
    /// Builds a snapshot from the live entry count and counters.
    pub fn new(count: usize, max_size: usize, stats: &CacheStats) -> Self {
        let usage_ratio = if max_size == 0 {
            0.0
        } else {
            count as f64 / max_size as f64
        };
        Self {
            count,
            max_size,
            usage_ratio,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            rejected: stats.rejected,
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
