//! Height Entry Module
//!
//! Defines a single cached height together with its access stamp.

// == Height Entry ==
/// One memoized item height.
///
/// `last_access` is a logical clock value issued by the owning store: every
/// read hit and every write receives a fresh, strictly larger stamp, so
/// recency order is total.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightEntry {
    /// Stable identifier of the list item
    pub item_id: String,
    /// Measured height in points
    pub height: f64,
    /// Access stamp of the most recent read or write
    pub last_access: u64,
}

impl HeightEntry {
    // == Constructor ==
    pub fn new(item_id: String, height: f64, stamp: u64) -> Self {
        Self {
            item_id,
            height,
            last_access: stamp,
        }
    }

    // == Touch ==
    /// Records an access at `stamp`.
    pub fn touch(&mut self, stamp: u64) {
        self.last_access = stamp;
    }

    // == Update ==
    /// Replaces the height and records the write as an access.
    pub fn update(&mut self, height: f64, stamp: u64) {
        self.height = height;
        self.last_access = stamp;
    }
}
