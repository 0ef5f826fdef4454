//! Preload Module
//!
//! Computes heights for upcoming list items ahead of display, bounded by an
//! admission set and chunked with a join barrier between chunks.

mod admission;
mod preloader;

pub use admission::{AdmissionSet, AdmissionSlot};
pub use preloader::{BatchPreloader, PreloadReport};

/// Default bound on concurrently in-flight measurements
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
