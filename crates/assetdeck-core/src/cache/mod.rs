//! Local caching module for fast view start-up.
//!
//! This module provides the `CacheStore`, a write-through cache of whole
//! datasets keyed by dataset name. Each entry carries the instant it was
//! captured; the age is informational and never forces a refetch.
//!
//! Durable storage sits behind the [`Storage`] trait:
//! - `FileStorage`: one JSON document per storage key in a directory
//! - `MemoryStorage`: in-process map, used by tests

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CacheEntry, CacheStore, CACHE_KEY_PREFIX};
