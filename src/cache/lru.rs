//! LRU Selection Module
//!
//! Picks eviction victims by ascending access stamp.

use std::collections::HashMap;

use crate::cache::HeightEntry;

// == Eviction Batch Size ==
/// Number of entries removed when a write finds the cache full.
///
/// A quarter of capacity, never less than one so tiny caches still make room.
pub fn eviction_batch_size(max_size: usize) -> usize {
    (max_size / 4).max(1)
}

// == Oldest Keys ==
/// Returns up to `count` item ids, least recently accessed first.
pub fn oldest_keys(entries: &HashMap<String, HeightEntry>, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let mut by_age: Vec<(&String, u64)> = entries
        .iter()
        .map(|(key, entry)| (key, entry.last_access))
        .collect();

    if count < by_age.len() {
        // Partition so the `count` oldest sit in front, then order only those.
        by_age.select_nth_unstable_by_key(count - 1, |&(_, stamp)| stamp);
        by_age.truncate(count);
    }
    by_age.sort_unstable_by_key(|&(_, stamp)| stamp);

    by_age.into_iter().map(|(key, _)| key.clone()).collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entries(stamps: &[(&str, u64)]) -> HashMap<String, HeightEntry> {
        stamps
            .iter()
            .map(|&(id, stamp)| (id.to_string(), HeightEntry::new(id.to_string(), 10.0, stamp)))
            .collect()
    }

    #[test]
    fn test_batch_size_is_quarter() {
        assert_eq!(eviction_batch_size(5000), 1250);
        assert_eq!(eviction_batch_size(10), 2);
    }

    #[test]
    fn test_batch_size_never_zero() {
        assert_eq!(eviction_batch_size(3), 1);
        assert_eq!(eviction_batch_size(1), 1);
    }

    #[test]
    fn test_oldest_keys_ordered() {
        let map = entries(&[("c", 30), ("a", 10), ("d", 40), ("b", 20)]);

        assert_eq!(oldest_keys(&map, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_oldest_keys_count_exceeds_len() {
        let map = entries(&[("b", 2), ("a", 1)]);

        assert_eq!(oldest_keys(&map, 10), vec!["a", "b"]);
    }

    #[test]
    fn test_oldest_keys_zero() {
        let map = entries(&[("a", 1)]);
        assert!(oldest_keys(&map, 0).is_empty());
    }

    #[test]
    fn test_oldest_keys_empty_map() {
        let map = HashMap::new();
        assert!(oldest_keys(&map, 3).is_empty());
    }
}
