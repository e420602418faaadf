//! PrefetchScheduler: dedicated background runtime for speculative work.
//!
//! Prefetch constructions run through `spawn_blocking` and are bounded by a
//! semaphore. When no permit is free the request is skipped rather than
//! queued: a late prefetch is worth less than none.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::{watch, Semaphore};

use atrium_core::config::SchedulerConfig;
use atrium_core::errors::{AtriumError, AtriumResult};
use atrium_core::models::CacheKey;
use atrium_observability::PrefetchMetrics;

/// How a prefetch job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchOutcome {
    Stored,
    /// Built but thrown away.
    Discarded(&'static str),
    Failed(String),
}

/// Decrements the pending counter when a tracked task ends, however it ends.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the background runtime, the in-flight set, and prefetch counters.
pub struct PrefetchScheduler {
    runtime: Mutex<Option<Runtime>>,
    handle: Handle,
    permits: Arc<Semaphore>,
    in_flight: Arc<DashMap<CacheKey, u64>>,
    pending: Arc<AtomicUsize>,
    metrics: Arc<PrefetchMetrics>,
    shutdown_tx: watch::Sender<bool>,
    stopped: AtomicBool,
}

impl PrefetchScheduler {
    /// Build the runtime with `worker_threads` workers.
    pub fn new(config: &SchedulerConfig) -> AtriumResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .max_blocking_threads(config.max_in_flight.max(1))
            .thread_name("atrium-prefetch")
            .enable_all()
            .build()
            .map_err(|e| AtriumError::SchedulerError {
                reason: format!("failed to build background runtime: {e}"),
            })?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            handle,
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            in_flight: Arc::new(DashMap::new()),
            pending: Arc::new(AtomicUsize::new(0)),
            metrics: Arc::new(PrefetchMetrics::new()),
            shutdown_tx,
            stopped: AtomicBool::new(false),
        })
    }

    pub fn metrics(&self) -> &Arc<PrefetchMetrics> {
        &self.metrics
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Receiver that flips to `true` on shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Run a one-off task on the background runtime. Tracked by
    /// [`wait_idle`](Self::wait_idle). Returns false once stopped.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_stopped() {
            return false;
        }
        let guard = PendingGuard::new(&self.pending);
        self.handle.spawn(async move {
            let _guard = guard;
            task.await;
        });
        true
    }

    /// Run a long-lived task that should end on shutdown. Not tracked by
    /// `wait_idle`.
    pub fn spawn_service<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_stopped() {
            return false;
        }
        self.handle.spawn(task);
        true
    }

    /// Call `task` every `period` until shutdown. The first call happens
    /// one full period after start.
    pub fn spawn_periodic<F>(&self, period: Duration, task: F) -> bool
    where
        F: Fn() + Send + 'static,
    {
        let mut shutdown = self.shutdown_signal();
        self.spawn_service(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => task(),
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Schedule a blocking prefetch of `key` carrying `generation`.
    ///
    /// Skipped (returns false) when stopped, when `key` is already in
    /// flight, or when every permit is taken.
    pub fn submit<W>(&self, key: CacheKey, generation: u64, work: W) -> bool
    where
        W: FnOnce() -> PrefetchOutcome + Send + 'static,
    {
        if self.is_stopped() {
            self.metrics.record_skipped();
            return false;
        }
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            tracing::trace!(key = %key, "no prefetch permit, skipping");
            self.metrics.record_skipped();
            return false;
        };
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => {
                self.metrics.record_skipped();
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(generation);
            }
        }

        self.metrics.record_scheduled();
        let in_flight = Arc::clone(&self.in_flight);
        let metrics = Arc::clone(&self.metrics);
        let guard = PendingGuard::new(&self.pending);
        self.handle.spawn(async move {
            let _guard = guard;
            let _permit = permit;
            match tokio::task::spawn_blocking(work).await {
                Ok(PrefetchOutcome::Stored) => metrics.record_completed(),
                Ok(PrefetchOutcome::Discarded(_)) => metrics.record_discarded(),
                Ok(PrefetchOutcome::Failed(_)) => metrics.record_failed(),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "prefetch task panicked");
                    metrics.record_failed();
                }
            }
            in_flight.remove(&key);
        });
        true
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Block the calling thread until no tracked task is pending or
    /// `timeout` elapses. Returns whether the scheduler went idle.
    ///
    /// Must not be called from inside the background runtime.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pending.load(Ordering::SeqCst) == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    /// Stop accepting work, signal services, and drop the runtime without
    /// waiting for running tasks. Idempotent.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shutdown_tx.send_replace(true);
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }
        tracing::debug!("prefetch scheduler stopped");
    }
}

impl Drop for PrefetchScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PrefetchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchScheduler")
            .field("in_flight", &self.in_flight.len())
            .field("available_permits", &self.permits.available_permits())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn scheduler(max_in_flight: usize) -> PrefetchScheduler {
        PrefetchScheduler::new(&SchedulerConfig {
            worker_threads: 1,
            max_in_flight,
            cleanup_interval_secs: 240,
        })
        .unwrap()
    }

    fn key(s: &str) -> CacheKey {
        CacheKey::new(s).unwrap()
    }

    #[test]
    fn duplicate_key_is_skipped_while_in_flight() {
        let scheduler = scheduler(4);
        let (release_tx, release_rx) = mpsc::channel::<()>();
        assert!(scheduler.submit(key("a"), 0, move || {
            let _ = release_rx.recv();
            PrefetchOutcome::Stored
        }));
        assert!(!scheduler.submit(key("a"), 0, || PrefetchOutcome::Stored));
        release_tx.send(()).unwrap();
        assert!(scheduler.wait_idle(Duration::from_secs(5)));
        assert!(!scheduler.is_in_flight(&key("a")));

        let stats = scheduler.metrics().snapshot();
        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn exhausted_permits_skip_new_work() {
        let scheduler = scheduler(1);
        let (release_tx, release_rx) = mpsc::channel::<()>();
        assert!(scheduler.submit(key("a"), 0, move || {
            let _ = release_rx.recv();
            PrefetchOutcome::Discarded("test")
        }));
        assert!(!scheduler.submit(key("b"), 0, || PrefetchOutcome::Stored));
        release_tx.send(()).unwrap();
        assert!(scheduler.wait_idle(Duration::from_secs(5)));
        assert!(scheduler.submit(key("b"), 0, || PrefetchOutcome::Failed("x".into())));
        assert!(scheduler.wait_idle(Duration::from_secs(5)));

        let stats = scheduler.metrics().snapshot();
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn panicking_job_counts_as_failed_and_frees_key() {
        let scheduler = scheduler(2);
        assert!(scheduler.submit(key("p"), 0, || panic!("factory exploded")));
        assert!(scheduler.wait_idle(Duration::from_secs(5)));
        assert_eq!(scheduler.metrics().snapshot().failed, 1);
        assert!(!scheduler.is_in_flight(&key("p")));
    }

    #[test]
    fn periodic_task_ticks_until_shutdown() {
        let scheduler = scheduler(1);
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        assert!(scheduler.spawn_periodic(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let deadline = Instant::now() + Duration::from_secs(5);
        while ticks.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(ticks.load(Ordering::SeqCst) >= 3);

        scheduler.shutdown();
        std::thread::sleep(Duration::from_millis(20));
        let settled = ticks.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(ticks.load(Ordering::SeqCst), settled);
        assert!(!scheduler.spawn_periodic(Duration::from_millis(10), || {}));
    }

    #[test]
    fn shutdown_rejects_new_work() {
        let scheduler = scheduler(2);
        scheduler.shutdown();
        scheduler.shutdown();
        assert!(scheduler.is_stopped());
        assert!(!scheduler.submit(key("a"), 0, || PrefetchOutcome::Stored));
        assert!(!scheduler.spawn(async {}));
        assert!(*scheduler.shutdown_signal().borrow());
    }
}
