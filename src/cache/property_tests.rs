//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the height store's validation, capacity and
//! eviction-order guarantees.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::{HeightStore, MAX_STORABLE_HEIGHT};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;

// == Strategies ==
/// Generates item ids
fn item_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,24}"
}

/// Generates heights inside the storable range
fn valid_height_strategy() -> impl Strategy<Value = f64> {
    (1u32..4_999_000u32).prop_map(|milli| milli as f64 / 1000.0)
}

/// Generates heights outside the storable range
fn invalid_height_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-100_000i64..=0i64).prop_map(|h| h as f64),
        (5000i64..1_000_000i64).prop_map(|h| h as f64),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

/// Generates a sequence of cache operations
#[derive(Debug, Clone)]
enum HeightOp {
    Set { item_id: String, height: f64 },
    Get { item_id: String },
    Clear { item_id: String },
}

fn height_op_strategy() -> impl Strategy<Value = HeightOp> {
    prop_oneof![
        (item_id_strategy(), valid_height_strategy())
            .prop_map(|(item_id, height)| HeightOp::Set { item_id, height }),
        item_id_strategy().prop_map(|item_id| HeightOp::Get { item_id }),
        item_id_strategy().prop_map(|item_id| HeightOp::Clear { item_id }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Out-of-range writes leave both the size and the existing entry untouched.
    #[test]
    fn prop_invalid_heights_rejected(
        item_id in item_id_strategy(),
        existing in prop::option::of(valid_height_strategy()),
        bad in invalid_height_strategy()
    ) {
        let mut store = HeightStore::new(TEST_MAX_SIZE);
        if let Some(h) = existing {
            store.set_height(h, &item_id).unwrap();
        }
        let size_before = store.len();

        prop_assert!(store.set_height(bad, &item_id).is_err());

        prop_assert_eq!(store.len(), size_before);
        prop_assert_eq!(store.get_height(&item_id), existing);
    }

    // Any storable height reads back exactly.
    #[test]
    fn prop_valid_height_roundtrip(item_id in item_id_strategy(), height in valid_height_strategy()) {
        let mut store = HeightStore::new(TEST_MAX_SIZE);

        store.set_height(height, &item_id).unwrap();

        prop_assert_eq!(store.get_height(&item_id), Some(height));
    }

    // Reading absent ids never creates entries.
    #[test]
    fn prop_absent_reads_idempotent(
        stored in prop::collection::vec((item_id_strategy(), valid_height_strategy()), 0..20),
        probe in item_id_strategy(),
        repeats in 1usize..10
    ) {
        let mut store = HeightStore::new(TEST_MAX_SIZE);
        for (item_id, height) in &stored {
            store.set_height(*height, item_id).unwrap();
        }
        prop_assume!(!store.contains(&probe));
        let size_before = store.len();

        for _ in 0..repeats {
            prop_assert_eq!(store.get_height(&probe), None);
        }

        prop_assert_eq!(store.len(), size_before);
        prop_assert!(!store.contains(&probe));
    }

    // Size never exceeds capacity, whatever the operation mix.
    #[test]
    fn prop_capacity_enforcement(
        ops in prop::collection::vec(height_op_strategy(), 1..300),
        max_size in 1usize..40
    ) {
        let mut store = HeightStore::new(max_size);

        for op in ops {
            match op {
                HeightOp::Set { item_id, height } => {
                    let _ = store.set_height(height, &item_id);
                }
                HeightOp::Get { item_id } => {
                    let _ = store.get_height(&item_id);
                }
                HeightOp::Clear { item_id } => {
                    store.clear_height(&item_id);
                }
            }
            prop_assert!(
                store.len() <= max_size,
                "Cache size {} exceeds max {}",
                store.len(),
                max_size
            );
        }
    }

    // A write into a full store evicts a quarter of capacity first.
    #[test]
    fn prop_full_store_write_shrinks(
        max_size in 4usize..64,
        new_height in valid_height_strategy()
    ) {
        let mut store = HeightStore::new(max_size);
        for i in 0..max_size {
            store.set_height(10.0, &format!("row-{}", i)).unwrap();
        }
        prop_assert_eq!(store.len(), max_size);

        store.set_height(new_height, "incoming").unwrap();

        prop_assert!(store.len() <= max_size - max_size / 4 + 1);
        prop_assert!(store.contains("incoming"));
    }

    // Eviction removes exactly the oldest quarter, never a newer entry.
    #[test]
    fn prop_lru_eviction_order(
        ids in prop::collection::hash_set(item_id_strategy(), 8..40),
        reads in prop::collection::vec(0usize..1000, 0..30)
    ) {
        let ids: Vec<String> = ids.into_iter().collect();
        let max_size = ids.len();
        let mut store = HeightStore::new(max_size);
        for item_id in &ids {
            store.set_height(25.0, item_id).unwrap();
        }
        for r in reads {
            store.get_height(&ids[r % ids.len()]);
        }
        prop_assume!(!store.contains("incoming"));

        let mut by_age: Vec<(u64, String)> = ids
            .iter()
            .map(|id| (store.last_access(id).unwrap(), id.clone()))
            .collect();
        by_age.sort();
        let batch = max_size / 4;
        let expected_evicted: HashSet<String> =
            by_age.iter().take(batch).map(|(_, id)| id.clone()).collect();

        store.set_height(25.0, "incoming").unwrap();

        for (_, id) in &by_age {
            prop_assert_eq!(
                store.contains(id),
                !expected_evicted.contains(id),
                "unexpected eviction state for '{}'",
                id
            );
        }
    }

    // A full clear leaves every previously stored id absent.
    #[test]
    fn prop_clear_removes_everything(
        stored in prop::collection::vec((item_id_strategy(), valid_height_strategy()), 1..50)
    ) {
        let mut store = HeightStore::new(TEST_MAX_SIZE);
        for (item_id, height) in &stored {
            store.set_height(*height, item_id).unwrap();
        }

        store.clear();

        for (item_id, _) in &stored {
            prop_assert_eq!(store.get_height(item_id), None);
        }
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent writers and readers through the shared handle never observe
    // a height that was not written, and capacity holds at the end.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(height_op_strategy(), 10..80)
    ) {
        use crate::cache::HeightCache;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache = HeightCache::new(TEST_MAX_SIZE / 4);
            let mut handles = vec![];

            for op in operations {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        HeightOp::Set { item_id, height } => {
                            cache.set_height(height, item_id);
                            Ok::<_, String>(())
                        }
                        HeightOp::Get { item_id } => match cache.get_height(&item_id) {
                            Some(h) if !(h > 0.0 && h < MAX_STORABLE_HEIGHT) => {
                                Err(format!("read impossible height {} for '{}'", h, item_id))
                            }
                            _ => Ok(()),
                        },
                        HeightOp::Clear { item_id } => {
                            cache.clear_height(item_id);
                            Ok(())
                        }
                    }
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            cache.flush().await;
            let stats = cache.statistics();
            prop_assert!(stats.count <= TEST_MAX_SIZE / 4);
            prop_assert!(stats.hit_rate() >= 0.0 && stats.hit_rate() <= 1.0);
            Ok(())
        })?;
    }
}
