//! NavigationController: cache-or-construct with background prefetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atrium_core::config::PredictionConfig;
use atrium_core::errors::{AtriumError, AtriumResult};
use atrium_core::models::{AccessContext, AccessEvent, CacheKey, StatisticsSnapshot};
use atrium_core::traits::{FactoryResult, IClock, SystemClock};
use atrium_observability::tracing_setup::events;
use atrium_observability::{navigate_span, prefetch_span};
use atrium_pool::ObjectPool;
use atrium_prediction::{AccessRecorder, Prediction, Predictor};
use atrium_store::{CacheStore, SpeculativeOutcome};

use crate::registry::{FactoryRegistry, PanelMeta, Registration};
use crate::scheduler::{PrefetchOutcome, PrefetchScheduler};

/// State shared with background tasks.
struct Shared<P> {
    store: Arc<CacheStore<P>>,
    pool: Arc<ObjectPool<P>>,
    recorder: Arc<AccessRecorder>,
    predictor: Arc<Predictor>,
    registry: FactoryRegistry<P>,
    scheduler: Arc<PrefetchScheduler>,
    config: PredictionConfig,
    clock: Arc<dyn IClock>,
    /// `total_recorded` the predictor last learned from.
    learned_at: AtomicU64,
}

/// Facade for hosts: navigate to panels, register factories, inspect.
///
/// Cheap to clone; clones share all state.
pub struct NavigationController<P> {
    shared: Arc<Shared<P>>,
}

impl<P> Clone for NavigationController<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Clone + Send + Sync + 'static> NavigationController<P> {
    pub fn new(
        store: Arc<CacheStore<P>>,
        pool: Arc<ObjectPool<P>>,
        recorder: Arc<AccessRecorder>,
        predictor: Arc<Predictor>,
        scheduler: Arc<PrefetchScheduler>,
        config: PredictionConfig,
    ) -> Self {
        Self::with_clock(
            store,
            pool,
            recorder,
            predictor,
            scheduler,
            config,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        store: Arc<CacheStore<P>>,
        pool: Arc<ObjectPool<P>>,
        recorder: Arc<AccessRecorder>,
        predictor: Arc<Predictor>,
        scheduler: Arc<PrefetchScheduler>,
        config: PredictionConfig,
        clock: Arc<dyn IClock>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                pool,
                recorder,
                predictor,
                registry: FactoryRegistry::new(),
                scheduler,
                config,
                clock,
                learned_at: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &Arc<CacheStore<P>> {
        &self.shared.store
    }

    pub fn pool(&self) -> &Arc<ObjectPool<P>> {
        &self.shared.pool
    }

    pub fn recorder(&self) -> &Arc<AccessRecorder> {
        &self.shared.recorder
    }

    pub fn scheduler(&self) -> &Arc<PrefetchScheduler> {
        &self.shared.scheduler
    }

    /// Serve `key` from the cache or build it with `factory`.
    ///
    /// Uses the registered size estimate for `key` when there is one.
    pub fn navigate<F>(&self, key: &str, factory: F, context: AccessContext) -> AtriumResult<P>
    where
        F: FnOnce() -> FactoryResult<P>,
    {
        let key = CacheKey::new(key)?;
        let meta = self.shared.registry.meta(&key).unwrap_or_default();
        self.navigate_key(key, factory, context, meta)
    }

    /// `navigate` with an explicit size estimate and type tag.
    pub fn navigate_with<F>(
        &self,
        key: &str,
        factory: F,
        context: AccessContext,
        meta: PanelMeta,
    ) -> AtriumResult<P>
    where
        F: FnOnce() -> FactoryResult<P>,
    {
        let key = CacheKey::new(key)?;
        self.navigate_key(key, factory, context, meta)
    }

    /// Navigate using the factory registered for `key`.
    pub fn navigate_registered(&self, key: &str, context: AccessContext) -> AtriumResult<P> {
        let key = CacheKey::new(key)?;
        let Some(Registration { factory, meta }) = self.shared.registry.get(&key) else {
            return Err(AtriumError::FactoryNotRegistered {
                key: key.to_string(),
            });
        };
        self.navigate_key(key, || factory(), context, meta)
    }

    fn navigate_key<F>(
        &self,
        key: CacheKey,
        factory: F,
        context: AccessContext,
        meta: PanelMeta,
    ) -> AtriumResult<P>
    where
        F: FnOnce() -> FactoryResult<P>,
    {
        let _span = navigate_span!(key, context.name()).entered();
        let shared = &self.shared;

        let payload = match shared.store.lookup(&key) {
            Some(hit) => {
                let context = if hit.prefetch_hit {
                    AccessContext::PrefetchHit
                } else {
                    context
                };
                shared.record(&key, context);
                hit.payload
            }
            None => {
                let payload = factory().map_err(|e| AtriumError::construction(key.as_str(), e))?;
                events::panel_constructed(&key, meta.estimated_bytes);
                match shared
                    .store
                    .put(key.clone(), payload.clone(), meta.estimated_bytes, &meta.type_tag)
                {
                    Ok(_) => {}
                    Err(AtriumError::CapacityExceeded {
                        needed_bytes,
                        ceiling_bytes,
                        ..
                    }) => events::panel_not_cached(&key, needed_bytes, ceiling_bytes),
                    Err(e) => return Err(e),
                }
                shared.record(&key, context);
                payload
            }
        };

        Shared::schedule_predictions(&self.shared, key);
        Ok(payload)
    }

    /// Register the factory the prefetcher may use for `key`.
    pub fn register_factory<F>(
        &self,
        key: &str,
        factory: F,
        estimated_bytes: u64,
        type_tag: &str,
    ) -> AtriumResult<()>
    where
        F: Fn() -> FactoryResult<P> + Send + Sync + 'static,
    {
        let key = CacheKey::new(key)?;
        self.shared
            .registry
            .register(key, factory, PanelMeta::new(estimated_bytes, type_tag));
        Ok(())
    }

    /// Returns whether a factory was registered.
    pub fn unregister_factory(&self, key: &str) -> AtriumResult<bool> {
        let key = CacheKey::new(key)?;
        Ok(self.shared.registry.unregister(&key))
    }

    pub fn registered_keys(&self) -> Vec<CacheKey> {
        self.shared.registry.keys()
    }

    /// Likely next panels after `key`, using the diagnostic threshold.
    pub fn predictions_for(&self, key: &str) -> AtriumResult<Vec<Prediction>> {
        let key = CacheKey::new(key)?;
        self.shared.refresh_model();
        Ok(self.shared.predictor.predict(
            &key,
            self.shared.config.top_n,
            self.shared.config.diagnostic_min_confidence,
        ))
    }

    /// Prefetch the `limit` most frequently visited registered panels that
    /// are not cached. Returns how many were scheduled.
    pub fn warm_up(&self, limit: usize) -> usize {
        let shared = &self.shared;
        let generation = shared.store.generation();
        let mut scheduled = 0;
        for (key, _) in shared.recorder.key_frequencies(usize::MAX) {
            if scheduled >= limit {
                break;
            }
            if shared.store.contains(&key) {
                continue;
            }
            let Some(registration) = shared.registry.get(&key) else {
                continue;
            };
            if Shared::submit_prefetch(&self.shared, key, registration, generation, 1.0) {
                scheduled += 1;
            }
        }
        tracing::debug!(scheduled, limit, "warm-up prefetch scheduled");
        scheduled
    }

    /// Drop one cached panel.
    pub fn invalidate(&self, key: &str) -> AtriumResult<bool> {
        let key = CacheKey::new(key)?;
        Ok(self.shared.store.remove(&key))
    }

    /// Drop every cached panel. In-flight prefetches are discarded.
    pub fn clear(&self) -> usize {
        self.shared.store.clear()
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            cache: self.shared.store.statistics(),
            pool: self.shared.pool.statistics(),
            prefetch: self.shared.scheduler.metrics().snapshot(),
            recorded_events: self.shared.recorder.len(),
        }
    }
}

impl<P: Clone + Send + Sync + 'static> Shared<P> {
    fn record(&self, key: &CacheKey, context: AccessContext) {
        self.recorder
            .record(AccessEvent::new(key.clone(), self.clock.now(), context));
    }

    /// Relearn from the recent window if anything was recorded since the
    /// last time.
    fn refresh_model(&self) {
        let total = self.recorder.total_recorded();
        if self.learned_at.swap(total, Ordering::SeqCst) == total && self.predictor.version() > 0 {
            return;
        }
        self.predictor
            .learn(&self.recorder.recent_window(self.config.window_size));
    }

    /// Learn, predict from `key`, and prefetch uncached candidates in the
    /// background. Failures are logged, never surfaced.
    fn schedule_predictions(this: &Arc<Self>, key: CacheKey) {
        if this.registry.is_empty() {
            return;
        }
        let shared = Arc::clone(this);
        let spawned = this.scheduler.spawn(async move {
            shared.refresh_model();
            let generation = shared.store.generation();
            let top_n = shared.config.top_n;
            let min_confidence = shared.config.min_confidence;
            let candidates = shared.predictor.predict(&key, top_n, min_confidence);
            for candidate in candidates {
                if shared.store.contains(&candidate.key)
                    || shared.scheduler.is_in_flight(&candidate.key)
                {
                    continue;
                }
                let Some(registration) = shared.registry.get(&candidate.key) else {
                    continue;
                };
                Shared::submit_prefetch(
                    &shared,
                    candidate.key,
                    registration,
                    generation,
                    candidate.confidence,
                );
            }
        });
        if !spawned {
            tracing::trace!("scheduler stopped, prediction skipped");
        }
    }

    fn submit_prefetch(
        this: &Arc<Self>,
        key: CacheKey,
        registration: Registration<P>,
        generation: u64,
        confidence: f64,
    ) -> bool {
        let store = Arc::clone(&this.store);
        let job_key = key.clone();
        this.scheduler.submit(key, generation, move || {
            let key = job_key;
            let _span = prefetch_span!(key, generation).entered();
            let payload = match (registration.factory)() {
                Ok(payload) => payload,
                Err(e) => {
                    let message = e.to_string();
                    events::prefetch_failed(&key, &message);
                    return PrefetchOutcome::Failed(message);
                }
            };
            let outcome = store.put_speculative(
                key.clone(),
                payload,
                registration.meta.estimated_bytes,
                &registration.meta.type_tag,
                generation,
            );
            let reason = match outcome {
                SpeculativeOutcome::Stored(_) => {
                    events::prefetch_stored(&key, confidence);
                    return PrefetchOutcome::Stored;
                }
                SpeculativeOutcome::StaleGeneration => "stale generation",
                SpeculativeOutcome::AlreadyPresent => "already cached",
                SpeculativeOutcome::Rejected => "exceeds memory ceiling",
            };
            events::prefetch_discarded(&key, reason);
            PrefetchOutcome::Discarded(reason)
        })
    }
}

impl<P> std::fmt::Debug for NavigationController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("registered", &self.shared.registry.len())
            .field("scheduler", &self.shared.scheduler)
            .finish()
    }
}
