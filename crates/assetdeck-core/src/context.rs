//! Process-wide UI context shared by every view.
//!
//! Holds the dataset cache and the dark-mode preference. It is built once at
//! startup and handed to views explicitly; nothing reaches it ambiently.

use tracing::{debug, warn};

use crate::cache::{CacheStore, Storage};

/// Storage key for the dark-mode preference
pub const DARK_MODE_KEY: &str = "darkMode";

pub struct UiContext {
    cache: CacheStore,
    dark_mode: bool,
}

impl UiContext {
    /// Open the context over durable storage, reading the persisted theme once.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let dark_mode = match storage.get_item(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                debug!(error = %e, "Ignoring malformed dark mode preference");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read dark mode preference");
                false
            }
        };

        Self {
            cache: CacheStore::new(storage),
            dark_mode,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CacheStore {
        &mut self.cache
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip the theme and persist it. Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        let encoded = if self.dark_mode { "true" } else { "false" };
        if let Err(e) = self.cache.storage_mut().set_item(DARK_MODE_KEY, encoded) {
            warn!(error = %e, "Failed to persist dark mode preference");
        }
        self.dark_mode
    }
}
