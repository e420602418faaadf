//! StoreEventDispatcher: synchronous fan-out of store lifecycle events.

use std::sync::{Arc, RwLock};

use atrium_core::models::CacheKey;
use atrium_core::traits::{EvictionReason, IStoreEventHandler};

/// Handlers notified on insert and eviction.
///
/// Runs on the thread that mutated the store, after its lock is released.
/// A panicking handler is logged and skipped; the rest still run.
#[derive(Default)]
pub struct StoreEventDispatcher {
    handlers: RwLock<Vec<Arc<dyn IStoreEventHandler>>>,
}

impl StoreEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn IStoreEventHandler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }

    fn emit<F: Fn(&dyn IStoreEventHandler)>(&self, f: F) {
        let handlers = match self.handlers.read() {
            Ok(h) => h.clone(),
            Err(e) => e.into_inner().clone(),
        };
        for handler in &handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("store event handler panicked");
            }
        }
    }

    pub fn emit_inserted(&self, key: &CacheKey, bytes: u64, speculative: bool) {
        self.emit(|h| h.on_inserted(key, bytes, speculative));
    }

    pub fn emit_evicted(&self, key: &CacheKey, bytes: u64, reason: EvictionReason) {
        self.emit(|h| h.on_evicted(key, bytes, reason));
    }
}

impl std::fmt::Debug for StoreEventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreEventDispatcher")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
