//! CacheStore: keyed panel cache guarded by a single mutex.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;

use atrium_core::config::StoreConfig;
use atrium_core::errors::{AtriumError, AtriumResult};
use atrium_core::models::{CacheKey, CacheStatistics};
use atrium_core::traits::{
    shed_count, EvictionReason, IClock, IShedTarget, IStoreEventHandler, SystemClock,
};

use crate::entry::{CacheEntry, EntryInfo};
use crate::events::StoreEventDispatcher;
use crate::eviction::{self, Budget};

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct Lookup<P> {
    pub payload: P,
    /// The entry had been inserted by prefetch and this is its first real use.
    pub prefetch_hit: bool,
    pub access_count: u64,
}

/// What a `put` displaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOutcome {
    /// An entry with the same key was overwritten.
    pub replaced: bool,
    /// Keys evicted to make room.
    pub evicted: Vec<CacheKey>,
}

/// Result of a speculative insertion.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeculativeOutcome {
    Stored(PutOutcome),
    /// A clear or pressure shed happened after the prefetch was scheduled.
    StaleGeneration,
    /// The slot was filled while the prefetch ran.
    AlreadyPresent,
    /// The payload can never fit.
    Rejected,
}

#[derive(Debug)]
struct StoreState<P> {
    entries: HashMap<CacheKey, CacheEntry<P>>,
    total_bytes: u64,
    next_sequence: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    preloads: u64,
}

impl<P> StoreState<P> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            total_bytes: 0,
            next_sequence: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            preloads: 0,
        }
    }

    fn take(&mut self, key: &CacheKey) -> Option<CacheEntry<P>> {
        let entry = self.entries.remove(key)?;
        self.total_bytes = self.total_bytes.saturating_sub(entry.estimated_memory_bytes);
        Some(entry)
    }
}

/// Removed entries waiting to be reported and dropped outside the lock.
type Evicted<P> = Vec<(CacheEntry<P>, EvictionReason)>;

/// Keyed cache of constructed panels.
///
/// Exclusively owns cached payloads: every removal path drops the payload
/// before returning. Handlers are notified after the lock is released.
pub struct CacheStore<P> {
    state: Mutex<StoreState<P>>,
    config: StoreConfig,
    clock: Arc<dyn IClock>,
    generation: AtomicU64,
    events: StoreEventDispatcher,
}

impl<P: Clone + Send + Sync + 'static> CacheStore<P> {
    /// Create a store using the wall clock.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store with an injected clock.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn IClock>) -> Self {
        Self {
            state: Mutex::new(StoreState::new()),
            config,
            clock,
            generation: AtomicU64::new(0),
            events: StoreEventDispatcher::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Register a lifecycle observer.
    pub fn register_handler(&self, handler: Arc<dyn IStoreEventHandler>) {
        self.events.register(handler);
    }

    /// Current generation. Bumped by `clear` and pressure sheds so in-flight
    /// prefetches can tell their results are stale.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, StoreState<P>> {
        self.state.lock().unwrap_or_else(|e| {
            tracing::warn!("cache store lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn budget(&self) -> Budget {
        Budget {
            max_entries: self.config.max_entries,
            ceiling_bytes: self.config.memory_ceiling_bytes(),
        }
    }

    fn idle_ttl(&self) -> Duration {
        self.config.idle_ttl()
    }

    /// Look up a panel, updating its access metadata on a hit.
    pub fn lookup(&self, key: &CacheKey) -> Option<Lookup<P>> {
        let now = self.clock.now();
        let mut state = self.state();
        let found = match state.entries.get_mut(key) {
            Some(entry) => {
                let prefetch_hit = entry.speculative;
                entry.touch(now);
                Some(Lookup {
                    payload: entry.payload.clone(),
                    prefetch_hit,
                    access_count: entry.access_count,
                })
            }
            None => None,
        };
        if found.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        found
    }

    /// Look up a panel. Hit updates `last_accessed_at` and `access_count`.
    pub fn get(&self, key: &CacheKey) -> Option<P> {
        self.lookup(key).map(|l| l.payload)
    }

    /// Read a payload without touching metadata or statistics.
    pub fn peek(&self, key: &CacheKey) -> Option<P> {
        self.state().entries.get(key).map(|e| e.payload.clone())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.state().entries.contains_key(key)
    }

    /// Metadata snapshot for one entry.
    pub fn entry_info(&self, key: &CacheKey) -> Option<EntryInfo> {
        self.state().entries.get(key).map(CacheEntry::info)
    }

    /// Keys currently cached, least recently used first.
    pub fn keys_lru(&self) -> Vec<CacheKey> {
        let state = self.state();
        eviction::lru_keys(state.entries.values(), state.entries.len())
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_memory_bytes(&self) -> u64 {
        self.state().total_bytes
    }

    /// Insert or replace a panel, evicting first if it would not fit.
    ///
    /// Returns `CapacityExceeded` when the payload alone is larger than
    /// `ceiling × slack`; the cache is left untouched in that case.
    pub fn put(
        &self,
        key: CacheKey,
        payload: P,
        estimated_memory_bytes: u64,
        type_tag: &str,
    ) -> AtriumResult<PutOutcome> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| AtriumError::poisoned("cache store", e))?;
        let (outcome, evicted) = self.insert_locked(
            &mut state,
            key.clone(),
            payload,
            estimated_memory_bytes,
            type_tag,
            false,
        )?;
        drop(state);
        self.finish_evictions(evicted);
        self.events.emit_inserted(&key, estimated_memory_bytes, false);
        Ok(outcome)
    }

    /// Insert a prefetched panel scheduled at `generation`.
    ///
    /// Discarded when the generation moved on or the slot is already filled.
    pub fn put_speculative(
        &self,
        key: CacheKey,
        payload: P,
        estimated_memory_bytes: u64,
        type_tag: &str,
        generation: u64,
    ) -> SpeculativeOutcome {
        let mut state = self.state();
        if self.generation() != generation {
            return SpeculativeOutcome::StaleGeneration;
        }
        if state.entries.contains_key(&key) {
            return SpeculativeOutcome::AlreadyPresent;
        }
        match self.insert_locked(
            &mut state,
            key.clone(),
            payload,
            estimated_memory_bytes,
            type_tag,
            true,
        ) {
            Ok((outcome, evicted)) => {
                state.preloads += 1;
                drop(state);
                self.finish_evictions(evicted);
                self.events.emit_inserted(&key, estimated_memory_bytes, true);
                SpeculativeOutcome::Stored(outcome)
            }
            Err(_) => SpeculativeOutcome::Rejected,
        }
    }

    fn insert_locked(
        &self,
        state: &mut StoreState<P>,
        key: CacheKey,
        payload: P,
        bytes: u64,
        type_tag: &str,
        speculative: bool,
    ) -> AtriumResult<(PutOutcome, Evicted<P>)> {
        let hard_limit = self.config.hard_limit_bytes();
        if bytes > hard_limit {
            tracing::warn!(
                key = %key,
                bytes,
                ceiling = hard_limit,
                "panel larger than memory ceiling, not cached"
            );
            return Err(AtriumError::CapacityExceeded {
                key: key.to_string(),
                needed_bytes: bytes,
                ceiling_bytes: hard_limit,
            });
        }

        let mut evicted: Evicted<P> = Vec::new();
        let mut outcome = PutOutcome::default();

        if let Some(old) = state.take(&key) {
            outcome.replaced = true;
            evicted.push((old, EvictionReason::Replaced));
        }

        let now = self.clock.now();
        let plan = eviction::plan_eviction(
            state.entries.values(),
            bytes,
            self.budget(),
            self.idle_ttl(),
            now,
        );
        for (victim, reason) in plan {
            if let Some(entry) = state.take(&victim) {
                state.evictions += 1;
                outcome.evicted.push(victim);
                evicted.push((entry, reason));
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        let mut entry = CacheEntry::new(key.clone(), payload, bytes, type_tag, now, sequence);
        entry.speculative = speculative;
        state.total_bytes += bytes;
        state.entries.insert(key, entry);

        Ok((outcome, evicted))
    }

    /// Remove one panel. Returns whether it was cached.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let removed = self.state().take(key);
        match removed {
            Some(entry) => {
                self.finish_evictions(vec![(entry, EvictionReason::Explicit)]);
                true
            }
            None => false,
        }
    }

    /// Remove every panel and bump the generation. Returns the count removed.
    pub fn clear(&self) -> usize {
        self.drain_all(EvictionReason::Cleared)
    }

    fn drain_all(&self, reason: EvictionReason) -> usize {
        let drained: Evicted<P> = {
            let mut state = self.state();
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.total_bytes = 0;
            let drained: Evicted<P> = state.entries.drain().map(|(_, e)| (e, reason)).collect();
            if reason != EvictionReason::Cleared {
                state.evictions += drained.len() as u64;
            }
            drained
        };
        let count = drained.len();
        self.finish_evictions(drained);
        count
    }

    /// Drop every entry idle longer than the configured TTL.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_with(self.idle_ttl())
    }

    /// Drop every entry idle longer than `idle_ttl`.
    pub fn sweep_expired_with(&self, idle_ttl: Duration) -> usize {
        let now = self.clock.now();
        let removed: Evicted<P> = {
            let mut state = self.state();
            let keys = eviction::expired_keys(state.entries.values(), idle_ttl, now);
            let removed: Evicted<P> = keys
                .iter()
                .filter_map(|k| state.take(k))
                .map(|e| (e, EvictionReason::Expired))
                .collect();
            state.evictions += removed.len() as u64;
            removed
        };
        let count = removed.len();
        if count > 0 {
            tracing::debug!(count, "expired panels swept");
        }
        self.finish_evictions(removed);
        count
    }

    /// Read-only statistics snapshot.
    pub fn statistics(&self) -> CacheStatistics {
        let state = self.state();
        CacheStatistics {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            total_memory_bytes: state.total_bytes,
            entry_count: state.entries.len(),
            preload_count: state.preloads,
        }
    }

    /// Report and drop removed entries. Runs without the lock held.
    fn finish_evictions(&self, evicted: Evicted<P>) {
        for (entry, reason) in evicted {
            tracing::debug!(
                key = %entry.key,
                bytes = entry.estimated_memory_bytes,
                reason = ?reason,
                "panel evicted"
            );
            let bytes = entry.estimated_memory_bytes;
            self.events.emit_evicted(&entry.key, bytes, reason);
            drop(entry);
        }
    }
}

impl<P: Clone + Send + Sync + 'static> IShedTarget for CacheStore<P> {
    fn name(&self) -> &str {
        "cache"
    }

    fn shed_fraction(&self, fraction: f64) -> usize {
        let shed: Evicted<P> = {
            let mut state = self.state();
            let count = shed_count(state.entries.len(), fraction);
            if count == 0 {
                return 0;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            let keys = eviction::lru_keys(state.entries.values(), count);
            let shed: Evicted<P> = keys
                .iter()
                .filter_map(|k| state.take(k))
                .map(|e| (e, EvictionReason::Pressure))
                .collect();
            state.evictions += shed.len() as u64;
            shed
        };
        let count = shed.len();
        self.finish_evictions(shed);
        count
    }

    fn shed_all(&self) -> usize {
        self.drain_all(EvictionReason::Pressure)
    }
}

impl<P> std::fmt::Debug for CacheStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("config", &self.config)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}
