use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::storage::Storage;
use crate::error::StorageError;

/// Prefix prepended to every logical cache key in storage.
pub const CACHE_KEY_PREFIX: &str = "cache_";

/// Age after which an entry is shown as stale. Display only, nothing expires.
const STALE_AFTER_MINUTES: i64 = 60;

/// A cached dataset plus the instant it was captured.
///
/// Stored as `{ "data": ..., "timestamp": <epoch millis> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            captured_at: now_millis(),
        }
    }
}

/// Current time truncated to the millisecond precision used on disk.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Human-readable age of a capture instant: "just now", "5m ago", "2h ago", "3d ago".
pub fn age_display(captured_at: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - captured_at).num_minutes();
    if minutes < 1 {
        // Includes negative ages from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Whether a capture instant is old enough to be flagged in the status bar.
pub fn is_stale(captured_at: DateTime<Utc>) -> bool {
    (Utc::now() - captured_at).num_minutes() > STALE_AFTER_MINUTES
}

/// Write-through dataset cache over durable storage.
///
/// Every `put` overwrites one slot in storage and refreshes an in-memory
/// mirror, so the latest data for a key can be read within the session
/// without reparsing storage. There is no expiry, size bound or eviction.
pub struct CacheStore {
    storage: Box<dyn Storage>,
    mirror: HashMap<String, CacheEntry<Value>>,
}

impl CacheStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            mirror: HashMap::new(),
        }
    }

    fn storage_key(key: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, key)
    }

    /// Read an entry from durable storage.
    ///
    /// A missing key, a storage read failure and a malformed payload are all
    /// cache misses. Malformed payloads are left in place.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.storage.get_item(&Self::storage_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(cache = key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(cache = key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => {
                debug!(cache = key, captured_at = %entry.captured_at, "Cache hit");
                Some(entry)
            }
            Err(e) => {
                debug!(cache = key, error = %e, "Ignoring malformed cache entry");
                None
            }
        }
    }

    /// Store `data` under `key`, stamped with the current time.
    ///
    /// The in-memory mirror is updated even when the storage write fails.
    pub fn put<T: Serialize>(&mut self, key: &str, data: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(data).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        let entry = CacheEntry::new(value);
        let contents = serde_json::to_string(&entry).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;

        self.mirror.insert(key.to_string(), entry);
        self.storage.set_item(&Self::storage_key(key), &contents)?;
        debug!(cache = key, bytes = contents.len(), "Cache entry written");
        Ok(())
    }

    /// Latest data written this session, without touching storage.
    pub fn peek<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.mirror.get(key)?;
        match serde_json::from_value(entry.data.clone()) {
            Ok(data) => Some(CacheEntry {
                data,
                captured_at: entry.captured_at,
            }),
            Err(e) => {
                debug!(cache = key, error = %e, "Mirror entry has a different shape");
                None
            }
        }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) fn storage_mut(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }
}

// ============================================================================
// Tests
// ============================================================================
