//! Application state management for assetdeck.
//!
//! `App` owns the UI context, the mounted dataset view and the channel that
//! background acquisitions report on. Only the active tab's view is mounted;
//! switching tabs drops the old view along with its pipeline state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use assetdeck_core::cache::FileStorage;
use assetdeck_core::loader::{apply_failed, apply_loaded, spawn_load};
use assetdeck_core::models::{AuditLogEntry, Certificate, CodeSigningKey, SshKey};
use assetdeck_core::pipeline::WindowPolicy;
use assetdeck_core::{Config, DataSource, DatasetKind, DatasetView, FixtureSource, LoadResult, UiContext, ViewControls};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for a certificate name typed in the rename prompt.
const MAX_NAME_LENGTH: usize = 64;

/// Number of rows to jump on PageUp/PageDown in unwindowed lists.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs, one per dataset class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Certificates,
    SshKeys,
    CodeSigning,
    AuditLogs,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Certificates, Tab::SshKeys, Tab::CodeSigning, Tab::AuditLogs];

    pub fn kind(&self) -> DatasetKind {
        match self {
            Tab::Certificates => DatasetKind::Certificates,
            Tab::SshKeys => DatasetKind::SshKeys,
            Tab::CodeSigning => DatasetKind::CodeSigningKeys,
            Tab::AuditLogs => DatasetKind::AuditLogs,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    /// Look a tab up by its dataset cache name, as used in the config file.
    pub fn from_cache_name(name: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|t| t.kind().cache_name() == name)
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Certificates => Tab::SshKeys,
            Tab::SshKeys => Tab::CodeSigning,
            Tab::CodeSigning => Tab::AuditLogs,
            Tab::AuditLogs => Tab::Certificates,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Certificates => Tab::AuditLogs,
            Tab::SshKeys => Tab::Certificates,
            Tab::CodeSigning => Tab::SshKeys,
            Tab::AuditLogs => Tab::CodeSigning,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    Renaming,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub context: UiContext,
    source: Arc<dyn DataSource>,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub selection: usize,
    pub rename_input: String,
    rename_target: Option<String>,

    // Mounted views; at most one is Some
    pub certificates: Option<DatasetView<Certificate>>,
    pub ssh_keys: Option<DatasetView<SshKey>>,
    pub code_signing: Option<DatasetView<CodeSigningKey>>,
    pub audit_logs: Option<DatasetView<AuditLogEntry>>,

    // Background load channel
    load_rx: mpsc::Receiver<LoadResult>,
    load_tx: mpsc::Sender<LoadResult>,

    pub status_message: Option<String>,
}

impl App {
    /// Build the app with file-backed storage in `data_dir`, as resolved by
    /// [`Config::data_dir`].
    pub fn new(config: Config, data_dir: PathBuf) -> Result<Self> {
        debug!(?data_dir, "Data directory configured");
        let storage = FileStorage::new(data_dir)?;
        let context = UiContext::open(Box::new(storage));
        let source = Arc::new(FixtureSource::new(config.fetch_delay()));
        Ok(Self::with_parts(config, context, source))
    }

    pub fn with_parts(config: Config, context: UiContext, source: Arc<dyn DataSource>) -> Self {
        let (load_tx, load_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let current_tab = config
            .start_tab
            .as_deref()
            .and_then(|name| {
                let tab = Tab::from_cache_name(name);
                if tab.is_none() {
                    warn!(start_tab = name, "Unknown start tab in config");
                }
                tab
            })
            .unwrap_or(Tab::Certificates);

        Self {
            config,
            context,
            source,
            state: AppState::Normal,
            current_tab,
            selection: 0,
            rename_input: String::new(),
            rename_target: None,
            certificates: None,
            ssh_keys: None,
            code_signing: None,
            audit_logs: None,
            load_rx,
            load_tx,
            status_message: None,
        }
    }

    /// Mount the initial tab. Must run inside the tokio runtime.
    pub fn start(&mut self) {
        info!(tab = self.current_tab.title(), "Mounting initial view");
        self.mount(self.current_tab);
    }

    // ------------------------------------------------------------------------
    // Mounting
    // ------------------------------------------------------------------------

    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.current_tab && self.active_view().is_some() {
            return;
        }
        self.unmount(self.current_tab);
        self.current_tab = tab;
        self.mount(tab);
    }

    fn mount(&mut self, tab: Tab) {
        self.selection = 0;
        match tab {
            Tab::Certificates => self.certificates = Some(DatasetView::new()),
            Tab::SshKeys => self.ssh_keys = Some(DatasetView::new()),
            Tab::CodeSigning => self.code_signing = Some(DatasetView::new()),
            Tab::AuditLogs => self.audit_logs = Some(DatasetView::new()),
        }
        self.load_active();
    }

    fn unmount(&mut self, tab: Tab) {
        debug!(tab = tab.title(), "Unmounting view");
        match tab {
            Tab::Certificates => self.certificates = None,
            Tab::SshKeys => self.ssh_keys = None,
            Tab::CodeSigning => self.code_signing = None,
            Tab::AuditLogs => self.audit_logs = None,
        }
    }

    /// Run the load sequence for the active view: cache first, then fetch.
    fn load_active(&mut self) {
        let kind = self.current_tab.kind();
        let cache = self.context.cache();
        let view: Option<&mut dyn ViewControls> = match self.current_tab {
            Tab::Certificates => self.certificates.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::SshKeys => self.ssh_keys.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::CodeSigning => self.code_signing.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::AuditLogs => self.audit_logs.as_mut().map(|v| v as &mut dyn ViewControls),
        };
        if let Some(view) = view {
            view.begin_load(cache);
        }
        spawn_load(Arc::clone(&self.source), kind, self.load_tx.clone());
    }

    /// User-initiated retry of the active view's load.
    pub fn retry(&mut self) {
        info!(tab = self.current_tab.title(), "Retrying load");
        self.status_message = None;
        self.load_active();
    }

    pub fn active_view(&self) -> Option<&dyn ViewControls> {
        match self.current_tab {
            Tab::Certificates => self.certificates.as_ref().map(|v| v as &dyn ViewControls),
            Tab::SshKeys => self.ssh_keys.as_ref().map(|v| v as &dyn ViewControls),
            Tab::CodeSigning => self.code_signing.as_ref().map(|v| v as &dyn ViewControls),
            Tab::AuditLogs => self.audit_logs.as_ref().map(|v| v as &dyn ViewControls),
        }
    }

    pub fn active_view_mut(&mut self) -> Option<&mut dyn ViewControls> {
        match self.current_tab {
            Tab::Certificates => self.certificates.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::SshKeys => self.ssh_keys.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::CodeSigning => self.code_signing.as_mut().map(|v| v as &mut dyn ViewControls),
            Tab::AuditLogs => self.audit_logs.as_mut().map(|v| v as &mut dyn ViewControls),
        }
    }

    // ------------------------------------------------------------------------
    // Background results and timers
    // ------------------------------------------------------------------------

    /// Drain finished loads and apply them.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.process_load_result(result);
        }
        self.clamp_selection();
    }

    fn process_load_result(&mut self, result: LoadResult) {
        let cache = self.context.cache_mut();
        match result {
            LoadResult::Certificates(data) => apply_loaded(cache, self.certificates.as_mut(), data),
            LoadResult::SshKeys(data) => apply_loaded(cache, self.ssh_keys.as_mut(), data),
            LoadResult::CodeSigningKeys(data) => apply_loaded(cache, self.code_signing.as_mut(), data),
            LoadResult::AuditLogs(data) => apply_loaded(cache, self.audit_logs.as_mut(), data),
            LoadResult::Failed(kind, reason) => {
                debug!(dataset = %kind, reason, "Applying failed load");
                match kind {
                    DatasetKind::Certificates => apply_failed(self.certificates.as_mut()),
                    DatasetKind::SshKeys => apply_failed(self.ssh_keys.as_mut()),
                    DatasetKind::CodeSigningKeys => apply_failed(self.code_signing.as_mut()),
                    DatasetKind::AuditLogs => apply_failed(self.audit_logs.as_mut()),
                }
            }
        }
    }

    /// Advance debounce and reveal timers on the active view.
    pub fn tick(&mut self, now: Instant) {
        if let Some(view) = self.active_view_mut() {
            if view.tick(now) {
                self.clamp_selection();
            }
        }
    }

    fn visible_len(&self) -> usize {
        self.active_view().map(|v| v.visible_len()).unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn select_next(&mut self, now: Instant) {
        let len = self.visible_len();
        if self.selection + 1 < len {
            self.selection += 1;
        }
        self.report_selection(now);
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn select_last(&mut self, now: Instant) {
        self.selection = self.visible_len().saturating_sub(1);
        self.report_selection(now);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    fn report_selection(&mut self, now: Instant) {
        let selection = self.selection;
        if let Some(view) = self.active_view_mut() {
            if view.select(selection, now) {
                debug!("Reveal triggered");
            }
        }
    }

    pub fn next_page(&mut self) {
        if !self.is_paged() {
            return;
        }
        if let Some(view) = self.active_view_mut() {
            view.next_page();
        }
        self.selection = 0;
    }

    pub fn prev_page(&mut self) {
        if !self.is_paged() {
            return;
        }
        if let Some(view) = self.active_view_mut() {
            view.prev_page();
        }
        self.selection = 0;
    }

    fn is_paged(&self) -> bool {
        self.current_tab.kind().window_policy() == WindowPolicy::Paged
    }

    pub fn toggle_expanded(&mut self) {
        let selection = self.selection;
        if let Some(view) = self.active_view_mut() {
            view.toggle_expanded_at(selection);
        }
    }

    pub fn cycle_filter(&mut self) {
        if let Some(view) = self.active_view_mut() {
            view.cycle_filter();
        }
        self.clamp_selection();
    }

    pub fn cycle_sort(&mut self) {
        if let Some(view) = self.active_view_mut() {
            view.cycle_sort();
        }
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    pub fn search_text(&self) -> &str {
        self.active_view().map(|v| v.search_input()).unwrap_or("")
    }

    pub fn set_search(&mut self, raw: &str, now: Instant) {
        if let Some(view) = self.active_view_mut() {
            view.set_search(raw, now);
        }
        self.selection = 0;
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        let mut text = self.search_text().to_string();
        text.push(c);
        self.set_search(&text, now);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        let mut text = self.search_text().to_string();
        text.pop();
        self.set_search(&text, now);
    }

    // ------------------------------------------------------------------------
    // Certificate rename
    // ------------------------------------------------------------------------

    /// Open the rename prompt for the selected certificate.
    pub fn start_rename(&mut self) {
        let Some(view) = self.certificates.as_ref() else {
            return;
        };
        if self.current_tab != Tab::Certificates {
            return;
        }
        if let Some(cert) = view.row(self.selection) {
            self.rename_target = Some(cert.id.clone());
            self.rename_input = cert.name.clone();
            self.state = AppState::Renaming;
        }
    }

    pub fn push_rename_char(&mut self, c: char) {
        if self.rename_input.chars().count() < MAX_NAME_LENGTH && !c.is_control() {
            self.rename_input.push(c);
        }
    }

    pub fn commit_rename(&mut self) {
        let name = self.rename_input.trim().to_string();
        if let (Some(id), Some(view)) = (self.rename_target.take(), self.certificates.as_mut()) {
            if !name.is_empty() && view.commit_rename(&id, &name) {
                self.status_message = Some(format!("Renamed to \"{}\" (until reload)", name));
            }
        }
        self.rename_input.clear();
        self.state = AppState::Normal;
    }

    pub fn cancel_rename(&mut self) {
        self.rename_target = None;
        self.rename_input.clear();
        self.state = AppState::Normal;
    }

    // ------------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------------

    pub fn dark_mode(&self) -> bool {
        self.context.dark_mode()
    }

    pub fn toggle_dark_mode(&mut self) {
        let dark = self.context.toggle_dark_mode();
        debug!(dark, "Theme toggled");
    }
}
