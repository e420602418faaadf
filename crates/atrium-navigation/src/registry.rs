//! FactoryRegistry: keys the prefetcher is allowed to build, via DashMap.

use std::sync::Arc;

use dashmap::DashMap;

use atrium_core::constants::{DEFAULT_ESTIMATED_BYTES, DEFAULT_TYPE_TAG};
use atrium_core::models::CacheKey;
use atrium_core::traits::{FactoryResult, SharedFactory};

/// Size estimate and type tag stored alongside a cached panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMeta {
    pub estimated_bytes: u64,
    pub type_tag: String,
}

impl PanelMeta {
    pub fn new(estimated_bytes: u64, type_tag: impl Into<String>) -> Self {
        Self {
            estimated_bytes,
            type_tag: type_tag.into(),
        }
    }
}

impl Default for PanelMeta {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATED_BYTES, DEFAULT_TYPE_TAG)
    }
}

/// A registered factory with its metadata.
pub struct Registration<P> {
    pub factory: SharedFactory<P>,
    pub meta: PanelMeta,
}

impl<P> Clone for Registration<P> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            meta: self.meta.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Registration<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("meta", &self.meta)
            .finish()
    }
}

/// Thread-safe factory registry.
pub struct FactoryRegistry<P> {
    factories: DashMap<CacheKey, Registration<P>>,
}

impl<P> FactoryRegistry<P> {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Register or replace the factory for `key`.
    pub fn register<F>(&self, key: CacheKey, factory: F, meta: PanelMeta)
    where
        F: Fn() -> FactoryResult<P> + Send + Sync + 'static,
    {
        self.factories.insert(
            key,
            Registration {
                factory: Arc::new(factory),
                meta,
            },
        );
    }

    /// Remove a registration. Returns whether one existed.
    pub fn unregister(&self, key: &CacheKey) -> bool {
        self.factories.remove(key).is_some()
    }

    /// Cloned registration for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<Registration<P>> {
        self.factories.get(key).map(|r| r.clone())
    }

    pub fn meta(&self, key: &CacheKey) -> Option<PanelMeta> {
        self.factories.get(key).map(|r| r.meta.clone())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.factories.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl<P> Default for FactoryRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
