use std::sync::Arc;

use atrium_core::config::StoreConfig;
use atrium_core::models::CacheKey;
use atrium_core::traits::{IShedTarget, ManualClock};
use atrium_store::CacheStore;
use chrono::Duration;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u64),
    Get(u8),
    Remove(u8),
    Shed,
    Tick(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..12, 1u64..400_000).prop_map(|(k, b)| Op::Put(k, b)),
        3 => (0u8..12).prop_map(Op::Get),
        1 => (0u8..12).prop_map(Op::Remove),
        1 => Just(Op::Shed),
        2 => (1i64..400).prop_map(Op::Tick),
    ]
}

fn key(k: u8) -> CacheKey {
    CacheKey::new(format!("panel-{k}")).unwrap()
}

/// Apply `ops` in order, calling `after_op` once each operation completes.
fn run(
    ops: &[Op],
    config: StoreConfig,
    mut after_op: impl FnMut(&CacheStore<u64>) -> Result<(), TestCaseError>,
) -> Result<CacheStore<u64>, TestCaseError> {
    let clock = Arc::new(ManualClock::default());
    let store = CacheStore::with_clock(config, clock.clone());
    for op in ops {
        match op {
            Op::Put(k, bytes) => {
                let _ = store.put(key(*k), *bytes, *bytes, "panel");
            }
            Op::Get(k) => {
                store.get(&key(*k));
            }
            Op::Remove(k) => {
                store.remove(&key(*k));
            }
            Op::Shed => {
                store.shed_fraction(0.25);
            }
            Op::Tick(secs) => clock.advance(Duration::seconds(*secs)),
        }
        after_op(&store)?;
    }
    Ok(store)
}

fn unchecked(_: &CacheStore<u64>) -> Result<(), TestCaseError> {
    Ok(())
}

fn config() -> StoreConfig {
    StoreConfig {
        max_entries: 6,
        memory_ceiling_mb: 1,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn memory_never_exceeds_ceiling_with_slack(ops in prop::collection::vec(op(), 0..80)) {
        let config = config();
        let limit = config.hard_limit_bytes();
        run(&ops, config, |store| {
            prop_assert!(store.total_memory_bytes() <= limit);
            Ok(())
        })?;
    }

    #[test]
    fn entry_count_never_exceeds_capacity(ops in prop::collection::vec(op(), 0..80)) {
        let config = config();
        let capacity = config.max_entries;
        run(&ops, config, |store| {
            prop_assert!(store.len() <= capacity);
            prop_assert!(store.statistics().entry_count <= capacity);
            Ok(())
        })?;
    }

    #[test]
    fn tracked_bytes_equal_sum_of_entries(ops in prop::collection::vec(op(), 0..80)) {
        let store = run(&ops, config(), unchecked)?;
        let sum: u64 = store
            .keys_lru()
            .iter()
            .filter_map(|k| store.entry_info(k))
            .map(|info| info.estimated_memory_bytes)
            .sum();
        prop_assert_eq!(store.total_memory_bytes(), sum);
        prop_assert_eq!(store.statistics().entry_count, store.len());
    }

    #[test]
    fn last_put_is_always_retrievable(
        ops in prop::collection::vec(op(), 0..60),
        k in 0u8..12,
        bytes in 1u64..400_000,
    ) {
        let store = run(&ops, config(), unchecked)?;
        store.put(key(k), bytes, bytes, "panel").unwrap();
        prop_assert_eq!(store.get(&key(k)), Some(bytes));
    }
}
