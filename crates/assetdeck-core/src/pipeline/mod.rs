//! List pipeline: categorical filter, text search, sort, then windowing.
//!
//! The pipeline never owns the dataset. It holds the per-view state
//! (filter, search term, sort key, window, expanded rows) and a memo of the
//! ordered row indices, keyed on the data revision handed in by the caller
//! and its own state revision. Changing the window or expansion does not
//! invalidate the memo; changing filter, effective search term or sort does.

pub mod filter;
pub mod search;
pub mod sort;
pub mod window;

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use tracing::debug;

pub use filter::CategoryFilter;
pub use search::SearchTerm;
pub use window::{Pager, Reveal, Window, WindowPolicy, PAGE_SIZE, REVEAL_DELAY, REVEAL_INITIAL, REVEAL_STEP};

use crate::models::AssetRecord;

/// Filter, search and sort `records`, returning row indices in display order.
pub fn derive<T: AssetRecord>(
    records: &[T],
    filter: CategoryFilter<T::Category>,
    query: &str,
    sort_key: T::SortKey,
) -> Vec<usize> {
    let query = query.to_lowercase();
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(*r))
        .filter(|(_, r)| search::matches(*r, &query))
        .map(|(i, _)| i)
        .collect();
    sort::sort_indices(records, &mut indices, sort_key);
    indices
}

/// Count records per category over the whole dataset. Every category is
/// present, zero counts included.
pub fn tallies<T: AssetRecord>(records: &[T]) -> BTreeMap<T::Category, usize> {
    let mut counts: BTreeMap<T::Category, usize> =
        T::categories().iter().map(|c| (*c, 0)).collect();
    for record in records {
        *counts.entry(record.category()).or_insert(0) += 1;
    }
    counts
}

/// Counts reported alongside the displayed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary<C> {
    pub total: usize,
    pub filtered: usize,
    pub tallies: BTreeMap<C, usize>,
    pub position: WindowPosition,
}

/// Where the displayed rows sit inside the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    All,
    Page { page: usize, total_pages: usize },
    Revealed { revealed: usize, has_more: bool, loading: bool },
}

#[derive(Debug, Clone)]
struct Memo {
    data_revision: u64,
    state_revision: u64,
    indices: Vec<usize>,
}

/// Per-view pipeline state plus the memoized ordering.
#[derive(Debug, Clone)]
pub struct ListPipeline<T: AssetRecord> {
    filter: CategoryFilter<T::Category>,
    search: SearchTerm,
    sort_key: T::SortKey,
    window: Window,
    expanded: HashSet<String>,
    revision: u64,
    memo: Option<Memo>,
}

impl<T: AssetRecord> Default for ListPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AssetRecord> ListPipeline<T> {
    /// Fresh state with the record type's default sort, debounce and window.
    pub fn new() -> Self {
        Self {
            filter: CategoryFilter::All,
            search: SearchTerm::new(T::KIND.search_debounce()),
            sort_key: T::default_sort(),
            window: Window::for_policy(T::KIND.window_policy()),
            expanded: HashSet::new(),
            revision: 0,
            memo: None,
        }
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub fn filter(&self) -> CategoryFilter<T::Category> {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter<T::Category>) {
        if self.filter != filter {
            self.filter = filter;
            self.bump();
        }
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.cycle(T::categories()));
    }

    pub fn search(&self) -> &SearchTerm {
        &self.search
    }

    /// Feed the raw search input. Debounced views apply it on a later `tick`.
    pub fn set_search(&mut self, raw: &str, now: Instant) {
        if self.search.input(raw, now) {
            self.bump();
        }
    }

    pub fn sort_key(&self) -> T::SortKey {
        self.sort_key
    }

    pub fn set_sort(&mut self, key: T::SortKey) {
        if self.sort_key != key {
            self.sort_key = key;
            self.bump();
        }
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(sort::cycle::<T>(self.sort_key));
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn next_page(&mut self) {
        let filtered = self.filtered_count();
        if let Window::Paged(pager) = &mut self.window {
            pager.next(filtered);
        }
    }

    pub fn prev_page(&mut self) {
        let filtered = self.filtered_count();
        if let Window::Paged(pager) = &mut self.window {
            pager.prev(filtered);
        }
    }

    pub fn set_page(&mut self, page: usize) {
        let filtered = self.filtered_count();
        if let Window::Paged(pager) = &mut self.window {
            pager.set_page(page, filtered);
        }
    }

    /// Trigger a reveal. Returns false if the view does not reveal, nothing
    /// is left, or a reveal is already in flight.
    pub fn request_more(&mut self, now: Instant) -> bool {
        let filtered = self.filtered_count();
        match &mut self.window {
            Window::Reveal(reveal) => reveal.trigger(filtered, now),
            _ => false,
        }
    }

    /// Advance the debounce and reveal timers. Returns true if the displayed
    /// rows may have changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.search.tick(now) {
            self.bump();
            changed = true;
        }
        if let Window::Reveal(reveal) = &mut self.window {
            changed |= reveal.poll(now);
        }
        changed
    }

    /// Toggle a row's expanded state. Returns true if now expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Recompute the ordering if the data or any ordering input changed.
    /// Returns true when a recomputation happened.
    pub fn refresh(&mut self, records: &[T], data_revision: u64) -> bool {
        if let Some(memo) = &self.memo {
            if memo.data_revision == data_revision && memo.state_revision == self.revision {
                return false;
            }
        }

        let indices = derive(records, self.filter, self.search.effective(), self.sort_key);
        debug!(
            dataset = %T::KIND,
            total = records.len(),
            filtered = indices.len(),
            data_revision,
            state_revision = self.revision,
            "Pipeline recomputed"
        );

        let filtered = indices.len();
        self.memo = Some(Memo {
            data_revision,
            state_revision: self.revision,
            indices,
        });
        if let Window::Paged(pager) = &mut self.window {
            pager.clamp(filtered);
        }
        true
    }

    /// Every filtered row index in display order, before windowing.
    pub fn ordered(&self) -> &[usize] {
        self.memo.as_ref().map(|m| m.indices.as_slice()).unwrap_or(&[])
    }

    /// Row indices inside the current window.
    pub fn visible(&self) -> &[usize] {
        let ordered = self.ordered();
        &ordered[self.window.range(ordered.len())]
    }

    pub fn filtered_count(&self) -> usize {
        self.ordered().len()
    }

    pub fn position(&self) -> WindowPosition {
        let filtered = self.filtered_count();
        match &self.window {
            Window::Unbounded => WindowPosition::All,
            Window::Paged(pager) => WindowPosition::Page {
                page: pager.page(),
                total_pages: pager.total_pages(filtered),
            },
            Window::Reveal(reveal) => WindowPosition::Revealed {
                revealed: reveal.visible(filtered),
                has_more: reveal.has_more(filtered),
                loading: reveal.is_loading(),
            },
        }
    }

    pub fn summary(&self, records: &[T]) -> Summary<T::Category> {
        Summary {
            total: records.len(),
            filtered: self.filtered_count(),
            tallies: tallies(records),
            position: self.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fixtures;
    use crate::models::{
        AuditLogEntry, Certificate, CertificateSort, CertificateStatus, Severity, SshKey,
    };
    use serde_json::json;

    fn scenario_certs() -> Vec<Certificate> {
        serde_json::from_value(json!([
            {"id": "c1", "domain": "a.com", "expiryDate": "2099-01-01", "status": "active"},
            {"id": "c2", "domain": "b.com", "expiryDate": "2001-01-01", "status": "expired"},
        ]))
        .unwrap()
    }

    fn ids<'a, T: AssetRecord>(records: &'a [T], indices: &[usize]) -> Vec<&'a str> {
        indices.iter().map(|&i| records[i].id()).collect()
    }

    #[test]
    fn test_expiry_sort_scenario() {
        let certs = scenario_certs();
        let mut p = ListPipeline::<Certificate>::new();
        p.refresh(&certs, 1);
        assert_eq!(ids(&certs, p.visible()), vec!["c2", "c1"]);
    }

    #[test]
    fn test_search_is_case_insensitive_scenario() {
        let certs = scenario_certs();
        let mut p = ListPipeline::<Certificate>::new();
        p.set_search("A.COM", Instant::now());
        p.refresh(&certs, 1);
        assert_eq!(ids(&certs, p.visible()), vec!["c1"]);
    }

    #[test]
    fn test_all_filter_empty_term_keeps_everything() {
        let logs = fixtures::load::<AuditLogEntry>().unwrap();
        let order = derive(&logs, CategoryFilter::All, "", AuditLogEntry::default_sort());
        assert_eq!(order.len(), logs.len());
    }

    #[test]
    fn test_filtered_never_exceeds_total() {
        let certs = fixtures::load::<Certificate>().unwrap();
        for status in CertificateStatus::ALL {
            let order = derive(&certs, CategoryFilter::Only(status), "", CertificateSort::Name);
            assert!(order.len() <= certs.len());
            assert!(order.iter().all(|&i| certs[i].status == status));
        }
    }

    #[test]
    fn test_tallies_cover_full_dataset() {
        let logs = fixtures::load::<AuditLogEntry>().unwrap();
        let mut p = ListPipeline::<AuditLogEntry>::new();
        p.set_filter(CategoryFilter::Only(Severity::Critical));
        p.refresh(&logs, 1);

        let summary = p.summary(&logs);
        assert_eq!(summary.total, logs.len());
        assert_eq!(summary.tallies.values().sum::<usize>(), logs.len());
        assert_eq!(summary.filtered, summary.tallies[&Severity::Critical]);
    }

    #[test]
    fn test_tallies_include_zero_counts() {
        let certs = scenario_certs();
        let counts = tallies(&certs);
        assert_eq!(counts.len(), CertificateStatus::ALL.len());
        assert_eq!(counts[&CertificateStatus::Revoked], 0);
    }

    #[test]
    fn test_memo_skips_unchanged_inputs() {
        let certs = scenario_certs();
        let mut p = ListPipeline::<Certificate>::new();
        assert!(p.refresh(&certs, 1));
        assert!(!p.refresh(&certs, 1));

        p.toggle_expanded("c1");
        p.next_page();
        assert!(!p.refresh(&certs, 1));

        p.cycle_sort();
        assert!(p.refresh(&certs, 1));
        assert!(p.refresh(&certs, 2));
    }

    #[test]
    fn test_setting_same_filter_does_not_invalidate() {
        let certs = scenario_certs();
        let mut p = ListPipeline::<Certificate>::new();
        p.refresh(&certs, 1);
        p.set_filter(CategoryFilter::All);
        assert!(!p.refresh(&certs, 1));
    }

    #[test]
    fn test_paged_window_over_fixture() {
        let certs = fixtures::load::<Certificate>().unwrap();
        let mut p = ListPipeline::<Certificate>::new();
        p.refresh(&certs, 1);

        assert_eq!(p.visible().len(), PAGE_SIZE.min(certs.len()));
        p.next_page();
        assert_eq!(p.visible().len(), certs.len() - PAGE_SIZE);

        // far past the end clamps to the last page
        p.set_page(99);
        let total_pages = certs.len().div_ceil(PAGE_SIZE);
        assert_eq!(
            p.position(),
            WindowPosition::Page { page: total_pages, total_pages }
        );
    }

    #[test]
    fn test_page_clamped_when_filter_shrinks() {
        let certs = fixtures::load::<Certificate>().unwrap();
        let mut p = ListPipeline::<Certificate>::new();
        p.refresh(&certs, 1);
        p.next_page();

        p.set_search("no such certificate", Instant::now());
        p.refresh(&certs, 1);
        assert!(p.visible().is_empty());
        assert_eq!(p.position(), WindowPosition::Page { page: 1, total_pages: 1 });
    }

    #[test]
    fn test_reveal_over_fixture() {
        let logs = fixtures::load::<AuditLogEntry>().unwrap();
        let mut p = ListPipeline::<AuditLogEntry>::new();
        p.refresh(&logs, 1);
        assert_eq!(p.visible().len(), REVEAL_INITIAL);

        let start = Instant::now();
        assert!(p.request_more(start));
        assert!(!p.request_more(start + Duration::from_millis(10)));
        assert!(p.tick(start + REVEAL_DELAY));
        assert_eq!(p.visible().len(), REVEAL_INITIAL + REVEAL_STEP);

        let mut at = start + Duration::from_secs(1);
        while p.request_more(at) {
            at += REVEAL_DELAY;
            p.tick(at);
        }
        assert_eq!(p.visible().len(), logs.len());
        assert!(matches!(
            p.position(),
            WindowPosition::Revealed { has_more: false, .. }
        ));
    }

    #[test]
    fn test_reveal_completing_with_debounced_search_grows_full_step() {
        let logs: Vec<AuditLogEntry> = (0..40)
            .map(|i| {
                let user = if i < 12 { "alice" } else { "bob" };
                serde_json::from_value(json!({
                    "id": format!("log-{i}"),
                    "timestamp": format!("2024-01-01T00:00:{:02}Z", i),
                    "user": user,
                }))
                .unwrap()
            })
            .collect();
        let mut p = ListPipeline::<AuditLogEntry>::new();

        let start = Instant::now();
        p.set_search("alice", start);
        p.tick(start + Duration::from_millis(300));
        p.refresh(&logs, 1);
        assert_eq!(p.filtered_count(), 12);

        let t1 = start + Duration::from_secs(1);
        assert!(p.request_more(t1));
        p.set_search("", t1);
        // debounce and reveal both complete on this tick
        assert!(p.tick(t1 + REVEAL_DELAY));
        p.refresh(&logs, 1);

        assert_eq!(p.filtered_count(), 40);
        assert_eq!(p.visible().len(), REVEAL_INITIAL + REVEAL_STEP);
    }

    #[test]
    fn test_unbounded_window_shows_all() {
        let keys = fixtures::load::<SshKey>().unwrap();
        let mut p = ListPipeline::<SshKey>::new();
        p.refresh(&keys, 1);
        assert_eq!(p.visible().len(), keys.len());
        assert!(!p.request_more(Instant::now()));
        assert_eq!(p.position(), WindowPosition::All);
    }

    #[test]
    fn test_audit_search_is_debounced() {
        let logs = fixtures::load::<AuditLogEntry>().unwrap();
        let mut p = ListPipeline::<AuditLogEntry>::new();
        p.refresh(&logs, 1);

        let start = Instant::now();
        p.set_search("no-such-user", start);
        assert!(!p.refresh(&logs, 1));
        assert_eq!(p.filtered_count(), logs.len());

        assert!(p.tick(start + Duration::from_millis(300)));
        assert!(p.refresh(&logs, 1));
        assert_eq!(p.filtered_count(), 0);
    }

    #[test]
    fn test_expansion_is_independent() {
        let mut p = ListPipeline::<Certificate>::new();
        assert!(p.toggle_expanded("c1"));
        assert!(p.is_expanded("c1"));
        p.cycle_filter();
        p.cycle_sort();
        assert!(p.is_expanded("c1"));
        assert!(!p.toggle_expanded("c1"));
        assert!(!p.is_expanded("c1"));
    }
}
