use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use atrium_core::config::StoreConfig;
use atrium_core::errors::AtriumError;
use atrium_core::models::CacheKey;
use atrium_core::traits::{EvictionReason, IShedTarget, IStoreEventHandler, ManualClock};
use atrium_store::CacheStore;
use chrono::Duration;

const MB: u64 = 1024 * 1024;

fn key(s: &str) -> CacheKey {
    CacheKey::new(s).unwrap()
}

fn store_with(config: StoreConfig) -> (CacheStore<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    (CacheStore::with_clock(config, clock.clone()), clock)
}

fn capacity(max_entries: usize) -> StoreConfig {
    StoreConfig {
        max_entries,
        ..Default::default()
    }
}

// ── Scenario A: capacity 2, third insert evicts the oldest ───────────────

#[test]
fn third_insert_evicts_oldest_at_capacity_two() {
    let (store, clock) = store_with(capacity(2));
    store.put(key("A"), "a".into(), 1, "panel").unwrap();
    clock.advance(Duration::seconds(1));
    store.put(key("B"), "b".into(), 1, "panel").unwrap();
    clock.advance(Duration::seconds(1));
    let outcome = store.put(key("C"), "c".into(), 1, "panel").unwrap();

    assert_eq!(outcome.evicted, vec![key("A")]);
    assert!(store.get(&key("A")).is_none());
    assert_eq!(store.get(&key("B")).as_deref(), Some("b"));
    assert_eq!(store.get(&key("C")).as_deref(), Some("c"));
}

// ── LRU law ──────────────────────────────────────────────────────────────

#[test]
fn over_capacity_put_evicts_least_recently_accessed() {
    let (store, clock) = store_with(capacity(3));
    for k in ["x", "y", "z"] {
        store.put(key(k), k.into(), 1, "panel").unwrap();
        clock.advance(Duration::seconds(1));
    }
    // Touch in the order z, x, y so that z is now the least recently used.
    for k in ["z", "x", "y"] {
        store.get(&key(k));
        clock.advance(Duration::seconds(1));
    }

    let outcome = store.put(key("w"), "w".into(), 1, "panel").unwrap();
    assert_eq!(outcome.evicted, vec![key("z")]);

    clock.advance(Duration::seconds(1));
    let outcome = store.put(key("v"), "v".into(), 1, "panel").unwrap();
    assert_eq!(outcome.evicted, vec![key("x")]);
}

#[test]
fn equal_access_times_evict_fewer_accesses_first() {
    let (store, _clock) = store_with(capacity(2));
    store.put(key("busy"), "b".into(), 1, "panel").unwrap();
    store.put(key("idle"), "i".into(), 1, "panel").unwrap();
    store.get(&key("busy"));
    store.get(&key("busy"));

    let outcome = store.put(key("new"), "n".into(), 1, "panel").unwrap();
    assert_eq!(outcome.evicted, vec![key("idle")]);
}

// ── Idempotent lookups ───────────────────────────────────────────────────

#[test]
fn two_gets_return_same_payload_and_count_two_accesses() {
    let (store, _clock) = store_with(capacity(4));
    store.put(key("orders"), "orders-panel".into(), 10, "list").unwrap();
    let before = store.entry_info(&key("orders")).unwrap().access_count;

    let first = store.get(&key("orders"));
    let second = store.get(&key("orders"));

    assert_eq!(first, second);
    let after = store.entry_info(&key("orders")).unwrap();
    assert_eq!(after.access_count, before + 2);
    assert!(after.last_accessed_at >= after.created_at);
}

#[test]
fn peek_does_not_touch_metadata_or_statistics() {
    let (store, _clock) = store_with(capacity(4));
    store.put(key("a"), "a".into(), 1, "panel").unwrap();
    store.peek(&key("a"));
    assert_eq!(store.entry_info(&key("a")).unwrap().access_count, 1);
    let stats = store.statistics();
    assert_eq!(stats.hits + stats.misses, 0);
}

// ── Memory ceiling ───────────────────────────────────────────────────────

#[test]
fn memory_ceiling_evicts_before_insert() {
    let (store, clock) = store_with(StoreConfig {
        max_entries: 100,
        memory_ceiling_mb: 1,
        ..Default::default()
    });
    store.put(key("a"), "a".into(), 400 * 1024, "panel").unwrap();
    clock.advance(Duration::seconds(1));
    store.put(key("b"), "b".into(), 400 * 1024, "panel").unwrap();
    clock.advance(Duration::seconds(1));
    let outcome = store.put(key("c"), "c".into(), 400 * 1024, "panel").unwrap();

    assert_eq!(outcome.evicted, vec![key("a")]);
    assert!(store.total_memory_bytes() <= MB);
}

#[test]
fn oversized_payload_is_rejected_without_disturbing_cache() {
    let (store, _clock) = store_with(StoreConfig {
        max_entries: 10,
        memory_ceiling_mb: 1,
        memory_slack: 1.1,
        ..Default::default()
    });
    store.put(key("keep"), "k".into(), 1024, "panel").unwrap();

    let err = store
        .put(key("huge"), "h".into(), 2 * MB, "panel")
        .unwrap_err();
    assert!(matches!(err, AtriumError::CapacityExceeded { .. }));
    assert!(store.contains(&key("keep")));
    assert!(!store.contains(&key("huge")));
}

#[test]
fn payload_within_slack_is_accepted_alone() {
    let (store, _clock) = store_with(StoreConfig {
        max_entries: 10,
        memory_ceiling_mb: 1,
        memory_slack: 1.1,
        ..Default::default()
    });
    store.put(key("a"), "a".into(), 1024, "panel").unwrap();
    let big = MB + MB / 20;
    store.put(key("big"), "b".into(), big, "panel").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.total_memory_bytes(), big);
}

// ── Explicit invalidation ────────────────────────────────────────────────

#[test]
fn remove_and_clear_release_entries() {
    let (store, _clock) = store_with(capacity(4));
    store.put(key("a"), "a".into(), 5, "panel").unwrap();
    store.put(key("b"), "b".into(), 5, "panel").unwrap();

    assert!(store.remove(&key("a")));
    assert!(!store.remove(&key("a")));
    assert_eq!(store.total_memory_bytes(), 5);

    let gen = store.generation();
    assert_eq!(store.clear(), 1);
    assert!(store.is_empty());
    assert_eq!(store.total_memory_bytes(), 0);
    assert!(store.generation() > gen);
}

#[test]
fn dropping_entries_releases_payload_resources() {
    let store: CacheStore<Arc<()>> = CacheStore::new(capacity(1));
    let payload = Arc::new(());
    store.put(key("a"), payload.clone(), 1, "panel").unwrap();
    assert_eq!(Arc::strong_count(&payload), 2);
    store.put(key("b"), Arc::new(()), 1, "panel").unwrap();
    assert_eq!(Arc::strong_count(&payload), 1);
}

// ── TTL ──────────────────────────────────────────────────────────────────

#[test]
fn expired_entries_are_swept_before_lru_victims() {
    let (store, clock) = store_with(capacity(2));
    store.put(key("stale"), "s".into(), 1, "panel").unwrap();
    clock.advance(Duration::minutes(11));
    store.put(key("fresh"), "f".into(), 1, "panel").unwrap();
    clock.advance(Duration::minutes(11));
    store.get(&key("stale"));
    let outcome = store.put(key("third"), "t".into(), 1, "panel").unwrap();
    assert_eq!(outcome.evicted, vec![key("fresh")]);
}

// ── Scenario D: warning sheds a quarter, oldest first ───────────────────

#[test]
fn shed_quarter_of_eight_removes_two_oldest() {
    let (store, clock) = store_with(capacity(20));
    for i in 0..8 {
        store.put(key(&format!("p{i}")), format!("{i}"), 1, "panel").unwrap();
        clock.advance(Duration::seconds(1));
    }
    let gen = store.generation();
    assert_eq!(store.shed_fraction(0.25), 2);
    assert_eq!(store.len(), 6);
    assert!(!store.contains(&key("p0")));
    assert!(!store.contains(&key("p1")));
    assert!(store.contains(&key("p2")));
    assert!(store.generation() > gen);
    assert_eq!(store.statistics().evictions, 2);
}

#[test]
fn shed_on_tiny_cache_removes_at_least_one() {
    let (store, _clock) = store_with(capacity(20));
    store.put(key("only"), "o".into(), 1, "panel").unwrap();
    assert_eq!(store.shed_fraction(0.25), 1);
    assert_eq!(store.shed_fraction(0.25), 0);
}

// ── Statistics ───────────────────────────────────────────────────────────

#[test]
fn statistics_track_hits_misses_and_evictions() {
    let (store, clock) = store_with(capacity(1));
    store.put(key("a"), "a".into(), 3, "panel").unwrap();
    store.get(&key("a"));
    store.get(&key("missing"));
    clock.advance(Duration::seconds(1));
    store.put(key("b"), "b".into(), 4, "panel").unwrap();

    let stats = store.statistics();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.entry_count, 1);
    assert_eq!(stats.total_memory_bytes, 4);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

// ── Event handlers ───────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    evicted: Mutex<Vec<(String, EvictionReason)>>,
    inserted: AtomicUsize,
}

impl IStoreEventHandler for Recorder {
    fn on_inserted(&self, _key: &CacheKey, _bytes: u64, _speculative: bool) {
        self.inserted.fetch_add(1, Ordering::SeqCst);
    }

    fn on_evicted(&self, key: &CacheKey, _bytes: u64, reason: EvictionReason) {
        self.evicted
            .lock()
            .unwrap()
            .push((key.to_string(), reason));
    }
}

struct Panicker;

impl IStoreEventHandler for Panicker {
    fn on_evicted(&self, _key: &CacheKey, _bytes: u64, _reason: EvictionReason) {
        panic!("handler failure");
    }
}

#[test]
fn handlers_see_every_eviction_with_reason() {
    let (store, clock) = store_with(capacity(1));
    let recorder = Arc::new(Recorder::default());
    store.register_handler(Arc::new(Panicker));
    store.register_handler(recorder.clone());

    store.put(key("a"), "a".into(), 1, "panel").unwrap();
    clock.advance(Duration::seconds(1));
    store.put(key("b"), "b".into(), 1, "panel").unwrap();
    store.put(key("b"), "b2".into(), 1, "panel").unwrap();
    store.remove(&key("b"));

    let evicted = recorder.evicted.lock().unwrap().clone();
    assert_eq!(
        evicted,
        vec![
            ("a".to_string(), EvictionReason::Capacity),
            ("b".to_string(), EvictionReason::Replaced),
            ("b".to_string(), EvictionReason::Explicit),
        ]
    );
    assert_eq!(recorder.inserted.load(Ordering::SeqCst), 3);
}

// ── Concurrency ──────────────────────────────────────────────────────────

#[test]
fn concurrent_puts_on_same_key_leave_one_entry() {
    let store = Arc::new(CacheStore::<String>::new(capacity(8)));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for j in 0..50 {
                    store
                        .put(key("shared"), format!("{i}-{j}"), 1, "panel")
                        .unwrap();
                    store.get(&key("shared"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 1);
    assert_eq!(store.total_memory_bytes(), 1);
}
