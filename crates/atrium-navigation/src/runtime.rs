//! AtriumRuntime: builds and owns every component from one config.

use std::sync::Arc;
use std::time::Duration;

use atrium_core::config::AtriumConfig;
use atrium_core::errors::AtriumResult;
use atrium_core::models::{PressureLevel, StatisticsSnapshot};
use atrium_core::traits::{IClock, IShedTarget, SystemClock};
use atrium_observability::EvictionMetrics;
use atrium_pool::ObjectPool;
use atrium_prediction::{AccessRecorder, Predictor};
use atrium_pressure::{pressure_channel, PressureController, PressureReport, PressureSignalSender};
use atrium_store::CacheStore;

use crate::cleanup::{CleanupReport, CleanupTask};
use crate::controller::NavigationController;
use crate::scheduler::PrefetchScheduler;

/// An explicitly constructed engine instance. Hosts may run several.
pub struct AtriumRuntime<P> {
    config: AtriumConfig,
    navigation: NavigationController<P>,
    pressure: Arc<PressureController>,
    pressure_tx: PressureSignalSender,
    cleanup: Arc<CleanupTask<P>>,
    eviction_metrics: Arc<EvictionMetrics>,
    scheduler: Arc<PrefetchScheduler>,
}

impl<P: Clone + Send + Sync + 'static> AtriumRuntime<P> {
    /// Validate `config`, wire the components and start the background
    /// cleanup and pressure listener.
    pub fn new(config: AtriumConfig) -> AtriumResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AtriumConfig, clock: Arc<dyn IClock>) -> AtriumResult<Self> {
        config.validate()?;

        let store = Arc::new(CacheStore::with_clock(
            config.store.clone(),
            Arc::clone(&clock),
        ));
        let eviction_metrics = Arc::new(EvictionMetrics::new());
        store.register_handler(eviction_metrics.clone());

        let pool = Arc::new(ObjectPool::with_clock(
            config.pool.clone(),
            Arc::clone(&clock),
        ));
        let recorder = Arc::new(AccessRecorder::from_config(&config.prediction));
        let predictor = Arc::new(Predictor::new());
        let scheduler = Arc::new(PrefetchScheduler::new(&config.scheduler)?);

        let cache_target: Arc<dyn IShedTarget> = store.clone();
        let pool_target: Arc<dyn IShedTarget> = pool.clone();
        let pressure = Arc::new(PressureController::with_clock(
            cache_target,
            pool_target,
            config.pressure.clone(),
            Arc::clone(&clock),
        ));

        let (pressure_tx, pressure_rx) = pressure_channel();
        scheduler.spawn_service(
            pressure_rx.listen(Arc::clone(&pressure), scheduler.shutdown_signal()),
        );

        let interval = config.scheduler.cleanup_interval();
        let period = interval.to_std().unwrap_or(Duration::from_secs(1));
        let cleanup = Arc::new(CleanupTask::new(
            Arc::clone(&store),
            Arc::clone(&pool),
            Arc::clone(&pressure),
            interval,
        ));
        let periodic = Arc::clone(&cleanup);
        scheduler.spawn_periodic(period, move || {
            periodic.run();
        });

        let navigation = NavigationController::with_clock(
            store,
            pool,
            recorder,
            predictor,
            Arc::clone(&scheduler),
            config.prediction.clone(),
            clock,
        );

        tracing::info!(
            max_entries = config.store.max_entries,
            memory_ceiling_mb = config.store.memory_ceiling_mb,
            worker_threads = config.scheduler.worker_threads,
            "atrium runtime started"
        );

        Ok(Self {
            config,
            navigation,
            pressure,
            pressure_tx,
            cleanup,
            eviction_metrics,
            scheduler,
        })
    }

    pub fn config(&self) -> &AtriumConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationController<P> {
        &self.navigation
    }

    pub fn store(&self) -> &Arc<CacheStore<P>> {
        self.navigation.store()
    }

    pub fn pool(&self) -> &Arc<ObjectPool<P>> {
        self.navigation.pool()
    }

    pub fn pressure(&self) -> &Arc<PressureController> {
        &self.pressure
    }

    /// Handle for delivering pressure signals from any thread.
    pub fn pressure_sender(&self) -> PressureSignalSender {
        self.pressure_tx.clone()
    }

    pub fn eviction_metrics(&self) -> &Arc<EvictionMetrics> {
        &self.eviction_metrics
    }

    /// Handle a pressure signal on the calling thread.
    pub fn handle_pressure(&self, level: PressureLevel) -> PressureReport {
        self.pressure.handle(level)
    }

    /// Run one cleanup pass now.
    pub fn run_cleanup(&self) -> CleanupReport {
        self.cleanup.run()
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.navigation.statistics()
    }

    /// Block until background prediction and prefetch work has drained.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.scheduler.wait_idle(timeout)
    }

    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_stopped()
    }

    /// Stop background work. Cached panels stay readable.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }
}

impl<P> Drop for AtriumRuntime<P> {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}

impl<P> std::fmt::Debug for AtriumRuntime<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtriumRuntime")
            .field("navigation", &self.navigation)
            .field("pressure_signals", &self.pressure.signals_handled())
            .finish()
    }
}
