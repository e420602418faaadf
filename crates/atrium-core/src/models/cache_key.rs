use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_KEY_LEN;
use crate::errors::{AtriumError, AtriumResult};

/// Caller-assigned identifier for a logical panel instance.
///
/// Only constructible through [`CacheKey::new`], so every key that reaches a
/// store has already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    /// Validate and wrap a key.
    ///
    /// Rejects empty keys, keys with leading or trailing whitespace, keys
    /// containing control characters, and keys longer than 256 bytes.
    pub fn new(key: impl Into<String>) -> AtriumResult<Self> {
        let key = key.into();
        let reason = if key.is_empty() {
            Some("key is empty")
        } else if key.len() > MAX_KEY_LEN {
            Some("key exceeds 256 bytes")
        } else if key.trim() != key {
            Some("key has leading or trailing whitespace")
        } else if key.chars().any(char::is_control) {
            Some("key contains control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AtriumError::InvalidKey {
                key,
                reason: reason.to_string(),
            }),
            None => Ok(Self(key)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheKey {
    type Error = AtriumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CacheKey {
    type Error = AtriumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}
