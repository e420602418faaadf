use std::collections::HashSet;

use atrium_core::config::PoolConfig;
use atrium_core::traits::IShedTarget;
use atrium_pool::ObjectPool;
use proptest::prelude::*;
use uuid::Uuid;

const TAGS: [&str; 3] = ["grid", "chart", "form"];

#[derive(Debug, Clone)]
enum Op {
    Acquire(usize),
    Release(usize),
    Preload(usize, usize),
    Shed,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..TAGS.len()).prop_map(Op::Acquire),
        4 => any::<usize>().prop_map(Op::Release),
        1 => (0..TAGS.len(), 0usize..4).prop_map(|(t, n)| Op::Preload(t, n)),
        1 => Just(Op::Shed),
    ]
}

proptest! {
    #[test]
    fn ids_live_in_exactly_one_set(ops in prop::collection::vec(op(), 0..120)) {
        let config = PoolConfig { per_type_cap: 3, global_cap: 6, idle_ttl_secs: 600 };
        let pool: ObjectPool<u32> = ObjectPool::new(config.clone());
        let mut held: Vec<(usize, Uuid)> = Vec::new();
        let mut seen: HashSet<(usize, Uuid)> = HashSet::new();

        for op in ops {
            match op {
                Op::Acquire(t) => {
                    let lease = pool.acquire(TAGS[t], || Ok(0)).unwrap();
                    if let Some(id) = lease.id {
                        held.push((t, id));
                        seen.insert((t, id));
                    }
                }
                Op::Release(i) if !held.is_empty() => {
                    let (t, id) = held.swap_remove(i % held.len());
                    pool.release(TAGS[t], id).unwrap();
                }
                Op::Release(_) => {}
                Op::Preload(t, n) => {
                    pool.preload(TAGS[t], n, || Ok(0));
                }
                Op::Shed => {
                    pool.shed_fraction(0.3);
                }
            }

            for &(t, id) in &seen {
                let available = pool.is_available(TAGS[t], id);
                let in_use = pool.is_in_use(TAGS[t], id);
                prop_assert!(!(available && in_use));
                prop_assert_eq!(in_use, held.contains(&(t, id)));
            }
            for tag in TAGS {
                prop_assert!(pool.available_count(tag) + pool.in_use_count(tag) <= config.per_type_cap);
            }
            prop_assert!(pool.tracked_count() <= config.global_cap);
        }
    }
}
