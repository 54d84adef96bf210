//! Dataset loading: cached preview first, canonical data later.
//!
//! A view mounts, `begin_load` publishes whatever the cache holds, and
//! `spawn_load` starts an acquisition on a tokio task. The result comes back
//! over an mpsc channel as a [`LoadResult`]; the shell drains the channel
//! each tick and hands each result to [`apply_loaded`] or [`apply_failed`].
//!
//! There is no cancellation. Whichever acquisition settles last wins, for
//! both the view and the cache.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::error::SourceError;
use crate::models::{AssetRecord, AuditLogEntry, Certificate, CodeSigningKey, DatasetKind, SshKey};
use crate::pipeline::{ListPipeline, Summary, Window, WindowPosition};
use crate::source::DataSource;

// ============================================================================
// Background acquisition
// ============================================================================

/// Outcome of one acquisition, sent from the background task to the shell.
#[derive(Debug)]
pub enum LoadResult {
    Certificates(Vec<Certificate>),
    SshKeys(Vec<SshKey>),
    CodeSigningKeys(Vec<CodeSigningKey>),
    AuditLogs(Vec<AuditLogEntry>),
    /// Acquisition failed (dataset, reason)
    Failed(DatasetKind, String),
}

impl LoadResult {
    pub fn kind(&self) -> DatasetKind {
        match self {
            LoadResult::Certificates(_) => DatasetKind::Certificates,
            LoadResult::SshKeys(_) => DatasetKind::SshKeys,
            LoadResult::CodeSigningKeys(_) => DatasetKind::CodeSigningKeys,
            LoadResult::AuditLogs(_) => DatasetKind::AuditLogs,
            LoadResult::Failed(kind, _) => *kind,
        }
    }

    fn decode(kind: DatasetKind, raw: &str) -> Result<Self, SourceError> {
        fn parse<T: AssetRecord>(raw: &str) -> Result<Vec<T>, SourceError> {
            serde_json::from_str(raw).map_err(|source| SourceError::Malformed {
                kind: T::KIND,
                source,
            })
        }

        Ok(match kind {
            DatasetKind::Certificates => LoadResult::Certificates(parse(raw)?),
            DatasetKind::SshKeys => LoadResult::SshKeys(parse(raw)?),
            DatasetKind::CodeSigningKeys => LoadResult::CodeSigningKeys(parse(raw)?),
            DatasetKind::AuditLogs => LoadResult::AuditLogs(parse(raw)?),
        })
    }
}

/// Fetch and decode one dataset. Failures become [`LoadResult::Failed`].
pub async fn acquire(source: Arc<dyn DataSource>, kind: DatasetKind) -> LoadResult {
    match source
        .fetch(kind)
        .await
        .and_then(|raw| LoadResult::decode(kind, &raw))
    {
        Ok(result) => {
            info!(dataset = %kind, "Dataset acquired");
            result
        }
        Err(e) => {
            error!(dataset = %kind, error = %e, "Dataset acquisition failed");
            LoadResult::Failed(kind, e.to_string())
        }
    }
}

/// Start an acquisition on a tokio task, reporting on `tx`.
pub fn spawn_load(
    source: Arc<dyn DataSource>,
    kind: DatasetKind,
    tx: mpsc::Sender<LoadResult>,
) -> JoinHandle<()> {
    debug!(dataset = %kind, "Spawning acquisition");
    tokio::spawn(async move {
        let result = acquire(source, kind).await;
        if let Err(e) = tx.send(result).await {
            error!(dataset = %kind, error = %e, "Failed to send load result - channel closed");
        }
    })
}

/// Settle a successful acquisition.
///
/// The cache is written whether or not the view is still mounted; the view
/// update is skipped when it is gone.
pub fn apply_loaded<T: AssetRecord>(
    cache: &mut CacheStore,
    view: Option<&mut DatasetView<T>>,
    records: Vec<T>,
) {
    if let Err(e) = cache.put(T::KIND.cache_name(), &records) {
        warn!(dataset = %T::KIND, error = %e, "Failed to cache dataset");
    }
    match view {
        Some(view) => view.settle_loaded(records),
        None => debug!(dataset = %T::KIND, "View unmounted, dataset cached only"),
    }
}

/// Settle a failed acquisition. Whatever the view already shows is kept.
pub fn apply_failed<T: AssetRecord>(view: Option<&mut DatasetView<T>>) {
    match view {
        Some(view) => view.settle_failed(),
        None => debug!(dataset = %T::KIND, "View unmounted, failure dropped"),
    }
}

// ============================================================================
// Mounted view state
// ============================================================================

/// One mounted dataset view: the published records, load flags and the
/// pipeline state. Dropping it on unmount discards all of that.
#[derive(Debug, Clone)]
pub struct DatasetView<T: AssetRecord> {
    records: Vec<T>,
    data_revision: u64,
    loading: bool,
    failed: bool,
    captured_at: Option<DateTime<Utc>>,
    pipeline: ListPipeline<T>,
}

impl<T: AssetRecord> Default for DatasetView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AssetRecord> DatasetView<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            data_revision: 0,
            loading: true,
            failed: false,
            captured_at: None,
            pipeline: ListPipeline::new(),
        }
    }

    /// Publish cached data if any, otherwise show the loading state.
    ///
    /// The caller spawns the acquisition afterwards in either case.
    pub fn begin_load(&mut self, cache: &CacheStore) {
        self.failed = false;
        match cache.get::<Vec<T>>(T::KIND.cache_name()) {
            Some(CacheEntry { data, captured_at }) => {
                info!(dataset = %T::KIND, count = data.len(), "Showing cached dataset");
                self.publish(data);
                self.captured_at = Some(captured_at);
                self.loading = false;
            }
            None => {
                self.loading = true;
            }
        }
    }

    pub fn settle_loaded(&mut self, records: Vec<T>) {
        info!(dataset = %T::KIND, count = records.len(), "Canonical dataset published");
        self.publish(records);
        self.captured_at = Some(Utc::now());
        self.loading = false;
        self.failed = false;
    }

    pub fn settle_failed(&mut self) {
        self.loading = false;
        self.failed = true;
    }

    fn publish(&mut self, records: Vec<T>) {
        self.records = records;
        self.data_changed();
    }

    fn data_changed(&mut self) {
        self.data_revision += 1;
        self.pipeline.refresh(&self.records, self.data_revision);
    }

    /// Bring the memoized ordering up to date after a state change.
    fn sync(&mut self) {
        self.pipeline.refresh(&self.records, self.data_revision);
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// When the published data was captured, if any is published.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    pub fn pipeline(&self) -> &ListPipeline<T> {
        &self.pipeline
    }

    /// Mutate pipeline state directly; the ordering is refreshed afterwards.
    pub fn with_pipeline<R>(&mut self, f: impl FnOnce(&mut ListPipeline<T>) -> R) -> R {
        let out = f(&mut self.pipeline);
        self.sync();
        out
    }

    /// Rows inside the current window, in display order.
    pub fn rows(&self) -> Vec<&T> {
        self.pipeline.visible().iter().map(|&i| &self.records[i]).collect()
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.pipeline
            .visible()
            .get(index)
            .and_then(|&i| self.records.get(i))
    }

    pub fn summary(&self) -> Summary<T::Category> {
        self.pipeline.summary(&self.records)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }
}

impl DatasetView<Certificate> {
    /// Rename a certificate in the published dataset.
    ///
    /// Session-local: neither the cache nor storage sees it, so the next
    /// reload or fetch restores the canonical name. Returns false if no
    /// certificate has that id.
    pub fn commit_rename(&mut self, id: &str, name: &str) -> bool {
        let Some(cert) = self.records.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        cert.name = name.to_string();
        debug!(id, "Certificate renamed locally");
        self.data_changed();
        true
    }
}

// ============================================================================
// Shell-facing controls
// ============================================================================

/// Type-erased controls the shell drives a mounted view through.
pub trait ViewControls {
    fn kind(&self) -> DatasetKind;
    fn is_loading(&self) -> bool;
    fn has_failed(&self) -> bool;
    fn captured_at(&self) -> Option<DateTime<Utc>>;

    /// Restart the load sequence from the cache. The caller spawns the fetch.
    fn begin_load(&mut self, cache: &CacheStore);

    fn search_input(&self) -> &str;
    fn set_search(&mut self, raw: &str, now: Instant);
    fn search_pending(&self) -> bool;

    fn cycle_filter(&mut self);
    fn filter_label(&self) -> String;
    fn cycle_sort(&mut self);
    fn sort_label(&self) -> String;

    fn next_page(&mut self);
    fn prev_page(&mut self);

    /// Report the selected row. Selecting the last revealed row triggers a
    /// reveal; returns true if one started.
    fn select(&mut self, row: usize, now: Instant) -> bool;

    /// Toggle expansion of the displayed row at `row`. Returns the new state.
    fn toggle_expanded_at(&mut self, row: usize) -> bool;
    fn is_expanded_at(&self, row: usize) -> bool;

    /// Advance timers. Returns true if the displayed rows may have changed.
    fn tick(&mut self, now: Instant) -> bool;

    fn visible_len(&self) -> usize;
    fn total(&self) -> usize;
    fn filtered(&self) -> usize;
    fn position(&self) -> WindowPosition;
}

impl<T: AssetRecord> ViewControls for DatasetView<T> {
    fn kind(&self) -> DatasetKind {
        T::KIND
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn has_failed(&self) -> bool {
        self.failed
    }

    fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    fn begin_load(&mut self, cache: &CacheStore) {
        DatasetView::begin_load(self, cache)
    }

    fn search_input(&self) -> &str {
        self.pipeline.search().raw()
    }

    fn set_search(&mut self, raw: &str, now: Instant) {
        self.with_pipeline(|p| p.set_search(raw, now));
    }

    fn search_pending(&self) -> bool {
        self.pipeline.search().is_pending()
    }

    fn cycle_filter(&mut self) {
        self.with_pipeline(|p| p.cycle_filter());
    }

    fn filter_label(&self) -> String {
        self.pipeline.filter().label()
    }

    fn cycle_sort(&mut self) {
        self.with_pipeline(|p| p.cycle_sort());
    }

    fn sort_label(&self) -> String {
        self.pipeline.sort_key().to_string()
    }

    fn next_page(&mut self) {
        self.pipeline.next_page();
    }

    fn prev_page(&mut self) {
        self.pipeline.prev_page();
    }

    fn select(&mut self, row: usize, now: Instant) -> bool {
        let at_sentinel = matches!(self.pipeline.window(), Window::Reveal(_))
            && row + 1 == self.pipeline.visible().len();
        at_sentinel && self.pipeline.request_more(now)
    }

    fn toggle_expanded_at(&mut self, row: usize) -> bool {
        let Some(id) = self.row(row).map(|r| r.id().to_string()) else {
            return false;
        };
        self.pipeline.toggle_expanded(&id)
    }

    fn is_expanded_at(&self, row: usize) -> bool {
        self.row(row)
            .map(|r| self.pipeline.is_expanded(r.id()))
            .unwrap_or(false)
    }

    fn tick(&mut self, now: Instant) -> bool {
        self.with_pipeline(|p| p.tick(now))
    }

    fn visible_len(&self) -> usize {
        self.pipeline.visible().len()
    }

    fn total(&self) -> usize {
        self.records.len()
    }

    fn filtered(&self) -> usize {
        self.pipeline.filtered_count()
    }

    fn position(&self) -> WindowPosition {
        self.pipeline.position()
    }
}

// ============================================================================
// Tests
// ============================================================================
