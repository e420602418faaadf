//! ObjectPool: available / in-use sets per type tag behind one mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use uuid::Uuid;

use atrium_core::config::PoolConfig;
use atrium_core::errors::{AtriumError, AtriumResult};
use atrium_core::models::PoolStatistics;
use atrium_core::traits::{shed_count, FactoryResult, IClock, IShedTarget, SystemClock};

use crate::entry::{Lease, PoolEntry};

#[derive(Debug)]
struct TypeSlot<P> {
    /// Most recently returned last.
    available: Vec<PoolEntry<P>>,
    in_use: HashMap<Uuid, PoolEntry<P>>,
}

impl<P> Default for TypeSlot<P> {
    fn default() -> Self {
        Self {
            available: Vec::new(),
            in_use: HashMap::new(),
        }
    }
}

impl<P> TypeSlot<P> {
    fn total(&self) -> usize {
        self.available.len() + self.in_use.len()
    }
}

#[derive(Debug)]
struct PoolState<P> {
    types: HashMap<String, TypeSlot<P>>,
    acquires: u64,
    reuses: u64,
    evictions: u64,
}

impl<P> PoolState<P> {
    fn new() -> Self {
        Self {
            types: HashMap::new(),
            acquires: 0,
            reuses: 0,
            evictions: 0,
        }
    }

    fn tracked(&self) -> usize {
        self.types.values().map(TypeSlot::total).sum()
    }

    fn type_total(&self, type_tag: &str) -> usize {
        self.types.get(type_tag).map(TypeSlot::total).unwrap_or(0)
    }

    /// How many more instances of `type_tag` may be tracked.
    fn room_for(&self, type_tag: &str, config: &PoolConfig) -> usize {
        let per_type = config
            .per_type_cap
            .saturating_sub(self.type_total(type_tag));
        let global = config.global_cap.saturating_sub(self.tracked());
        per_type.min(global)
    }

    fn remove_empty_slots(&mut self) {
        self.types.retain(|_, slot| slot.total() > 0);
    }
}

/// Per-type pool of reusable panel instances.
///
/// Exclusively owns tracked payloads. Factories are never called while the
/// pool lock is held.
pub struct ObjectPool<P> {
    state: Mutex<PoolState<P>>,
    config: PoolConfig,
    clock: Arc<dyn IClock>,
}

impl<P: Clone + Send + Sync + 'static> ObjectPool<P> {
    pub fn new(config: PoolConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: PoolConfig, clock: Arc<dyn IClock>) -> Self {
        Self {
            state: Mutex::new(PoolState::new()),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn lock(&self) -> AtriumResult<MutexGuard<'_, PoolState<P>>> {
        self.state
            .lock()
            .map_err(|e| AtriumError::poisoned("object pool", e))
    }

    fn state(&self) -> MutexGuard<'_, PoolState<P>> {
        self.state.lock().unwrap_or_else(|e| {
            tracing::warn!("object pool lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Hand out an instance of `type_tag`, reusing the most recently
    /// returned one when available, otherwise constructing with `factory`.
    pub fn acquire<F>(&self, type_tag: &str, factory: F) -> AtriumResult<Lease<P>>
    where
        F: FnOnce() -> FactoryResult<P>,
    {
        {
            let mut state = self.lock()?;
            state.acquires += 1;
            let reused = state
                .types
                .get_mut(type_tag)
                .and_then(|slot| slot.available.pop());
            if let Some(entry) = reused {
                state.reuses += 1;
                let lease = Lease {
                    id: Some(entry.id),
                    type_tag: type_tag.to_string(),
                    payload: entry.payload.clone(),
                    reused: true,
                };
                if let Some(slot) = state.types.get_mut(type_tag) {
                    slot.in_use.insert(entry.id, entry);
                }
                return Ok(lease);
            }
        }

        let payload = factory().map_err(|e| AtriumError::construction(type_tag, e))?;

        let mut state = self.lock()?;
        if state.room_for(type_tag, &self.config) == 0 {
            tracing::debug!(type_tag, "pool at capacity, handing out untracked instance");
            return Ok(Lease {
                id: None,
                type_tag: type_tag.to_string(),
                payload,
                reused: false,
            });
        }

        let entry = PoolEntry::new(type_tag, payload.clone(), self.clock.now());
        let id = entry.id;
        state
            .types
            .entry(type_tag.to_string())
            .or_default()
            .in_use
            .insert(id, entry);
        Ok(Lease {
            id: Some(id),
            type_tag: type_tag.to_string(),
            payload,
            reused: false,
        })
    }

    /// Return an in-use instance to the available set.
    pub fn release(&self, type_tag: &str, id: Uuid) -> AtriumResult<()> {
        let now = self.clock.now();
        let mut state = self.lock()?;
        let slot = state
            .types
            .get_mut(type_tag)
            .ok_or_else(|| not_found(type_tag, id))?;
        let mut entry = slot
            .in_use
            .remove(&id)
            .ok_or_else(|| not_found(type_tag, id))?;
        entry.last_returned_at = now.max(entry.last_returned_at);
        entry.reuse_count += 1;
        slot.available.push(entry);
        Ok(())
    }

    /// Release a lease. Untracked leases are simply dropped.
    pub fn release_lease(&self, lease: Lease<P>) -> AtriumResult<()> {
        match lease.id {
            Some(id) => self.release(&lease.type_tag, id),
            None => Ok(()),
        }
    }

    /// Construct up to `count` instances straight into the available set.
    ///
    /// Truncated at the per-type and global caps. A factory failure stops
    /// the preload; instances built before it are kept.
    pub fn preload<F>(&self, type_tag: &str, count: usize, factory: F) -> usize
    where
        F: Fn() -> FactoryResult<P>,
    {
        let room = self.state().room_for(type_tag, &self.config).min(count);
        let mut built = Vec::with_capacity(room);
        for _ in 0..room {
            match factory() {
                Ok(payload) => built.push(payload),
                Err(e) => {
                    tracing::warn!(type_tag, error = %e, "preload factory failed, stopping");
                    break;
                }
            }
        }

        let now = self.clock.now();
        let mut state = self.state();
        // Other callers may have filled the slot while we were constructing.
        let fits = state.room_for(type_tag, &self.config).min(built.len());
        let slot = state.types.entry(type_tag.to_string()).or_default();
        for payload in built.into_iter().take(fits) {
            slot.available.push(PoolEntry::new(type_tag, payload, now));
        }
        if fits < count {
            tracing::debug!(type_tag, requested = count, preloaded = fits, "preload truncated");
        }
        fits
    }

    /// Drop available instances idle longer than `idle_ttl`. In-use
    /// instances are never touched.
    pub fn cleanup(&self, idle_ttl: Duration) -> usize {
        let now = self.clock.now();
        let dropped: Vec<PoolEntry<P>> = {
            let mut state = self.state();
            let mut dropped = Vec::new();
            for slot in state.types.values_mut() {
                let (stale, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut slot.available)
                    .into_iter()
                    .partition(|e| e.idle_for(now) > idle_ttl);
                slot.available = keep;
                dropped.extend(stale);
            }
            state.evictions += dropped.len() as u64;
            state.remove_empty_slots();
            dropped
        };
        let count = dropped.len();
        if count > 0 {
            tracing::debug!(count, "idle pool entries dropped");
        }
        count
    }

    /// Cleanup with the configured idle TTL.
    pub fn cleanup_idle(&self) -> usize {
        self.cleanup(self.config.idle_ttl())
    }

    pub fn available_count(&self, type_tag: &str) -> usize {
        self.state()
            .types
            .get(type_tag)
            .map(|s| s.available.len())
            .unwrap_or(0)
    }

    pub fn in_use_count(&self, type_tag: &str) -> usize {
        self.state()
            .types
            .get(type_tag)
            .map(|s| s.in_use.len())
            .unwrap_or(0)
    }

    pub fn is_available(&self, type_tag: &str, id: Uuid) -> bool {
        self.state()
            .types
            .get(type_tag)
            .is_some_and(|s| s.available.iter().any(|e| e.id == id))
    }

    pub fn is_in_use(&self, type_tag: &str, id: Uuid) -> bool {
        self.state()
            .types
            .get(type_tag)
            .is_some_and(|s| s.in_use.contains_key(&id))
    }

    /// Total tracked instances across all type tags.
    pub fn tracked_count(&self) -> usize {
        self.state().tracked()
    }

    pub fn statistics(&self) -> PoolStatistics {
        let state = self.state();
        PoolStatistics {
            acquires: state.acquires,
            reuses: state.reuses,
            available: state.types.values().map(|s| s.available.len()).sum(),
            in_use: state.types.values().map(|s| s.in_use.len()).sum(),
            evictions: state.evictions,
        }
    }
}

fn not_found(type_tag: &str, id: Uuid) -> AtriumError {
    AtriumError::PoolEntryNotFound {
        type_tag: type_tag.to_string(),
        id: id.to_string(),
    }
}

impl<P: Clone + Send + Sync + 'static> IShedTarget for ObjectPool<P> {
    fn name(&self) -> &str {
        "pool"
    }

    fn shed_fraction(&self, fraction: f64) -> usize {
        let mut state = self.state();
        let available: usize = state.types.values().map(|s| s.available.len()).sum();
        let count = shed_count(available, fraction);
        if count == 0 {
            return 0;
        }

        let mut candidates: Vec<(chrono::DateTime<chrono::Utc>, String, Uuid)> = state
            .types
            .iter()
            .flat_map(|(tag, slot)| {
                slot.available
                    .iter()
                    .map(move |e| (e.last_returned_at, tag.clone(), e.id))
            })
            .collect();
        candidates.sort();

        let mut dropped = Vec::with_capacity(count);
        for (_, tag, id) in candidates.into_iter().take(count) {
            if let Some(slot) = state.types.get_mut(&tag) {
                if let Some(pos) = slot.available.iter().position(|e| e.id == id) {
                    dropped.push(slot.available.remove(pos));
                }
            }
        }
        state.evictions += dropped.len() as u64;
        state.remove_empty_slots();
        drop(state);
        dropped.len()
    }

    fn shed_all(&self) -> usize {
        let mut state = self.state();
        let available: usize = state.types.values().map(|s| s.available.len()).sum();
        let types = std::mem::take(&mut state.types);
        state.evictions += available as u64;
        drop(state);
        drop(types);
        available
    }
}

impl<P> std::fmt::Debug for ObjectPool<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("config", &self.config)
            .finish()
    }
}
