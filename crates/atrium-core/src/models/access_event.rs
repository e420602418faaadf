use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CacheKey;

/// How the caller reached a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessContext {
    Navigation,
    TabSwitch,
    DeepLink,
    Search,
    Manual,
    /// A navigation served by an entry that was inserted speculatively.
    PrefetchHit,
}

impl AccessContext {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::TabSwitch => "tab-switch",
            Self::DeepLink => "deep-link",
            Self::Search => "search",
            Self::Manual => "manual",
            Self::PrefetchHit => "prefetch-hit",
        }
    }
}

/// A single recorded access. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub key: CacheKey,
    pub timestamp: DateTime<Utc>,
    pub context: AccessContext,
}

impl AccessEvent {
    pub fn new(key: CacheKey, timestamp: DateTime<Utc>, context: AccessContext) -> Self {
        Self {
            key,
            timestamp,
            context,
        }
    }
}
