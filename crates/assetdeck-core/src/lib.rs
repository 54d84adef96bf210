//! Core library for assetdeck.
//!
//! Everything the dashboard needs below the view layer lives here:
//!
//! - `models`: certificate, SSH key, code-signing key and audit log records
//! - `fixtures`: the bundled datasets served by the fixture source
//! - `cache`: the storage-backed cache store with capture timestamps
//! - `context`: the shared UI context (cache + dark-mode flag)
//! - `source`: the data source abstraction and the fixture source
//! - `loader`: the cache-then-refresh dataset loader and per-view state
//! - `pipeline`: filter, search, sort and windowing over a dataset
//! - `config`: user configuration

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use cache::{CacheEntry, CacheStore, FileStorage, MemoryStorage, Storage};
pub use config::Config;
pub use context::UiContext;
pub use error::{SourceError, StorageError};
pub use loader::{DatasetView, LoadResult, ViewControls};
pub use models::{AssetRecord, DatasetKind};
pub use source::{DataSource, FixtureSource};
