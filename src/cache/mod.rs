//! Cache Module
//!
//! Bounded item-height cache with access-recency tracking and batch LRU eviction.

mod entry;
mod lru;
mod service;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::HeightEntry;
pub use service::HeightCache;
pub use stats::{CacheStatistics, CacheStats};
pub use store::HeightStore;

use crate::error::{HeightError, Result};

// == Public Constants ==
/// Default maximum number of cached heights
pub const DEFAULT_MAX_CACHE_SIZE: usize = 5000;

/// Exclusive upper bound for a storable height
pub const MAX_STORABLE_HEIGHT: f64 = 5000.0;

// == Validate Height ==
/// Accepts heights strictly inside `(0, MAX_STORABLE_HEIGHT)`.
///
/// NaN fails both comparisons and is rejected.
pub fn validate_height(height: f64) -> Result<f64> {
    if height > 0.0 && height < MAX_STORABLE_HEIGHT {
        Ok(height)
    } else {
        Err(HeightError::RejectedInput(height))
    }
}
