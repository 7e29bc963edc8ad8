//! Application state: single-owner, main-thread only.
//!
//! The page shown is always `build_page(dataset, selected area)`; every
//! selection change rebuilds it from scratch.

use std::cell::Cell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use forecastlab_core::chart::HoverInfo;
use forecastlab_core::data::{CachedLoad, DatasetCache, LoadError};
use forecastlab_core::domain::Record;
use forecastlab_core::{build_page, AreaSelector, PageModel, ViewerConfig};

use crate::viewport::Viewport;

/// Which panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    Areas,
    Chart,
    Data,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Areas, Focus::Chart, Focus::Data];

    pub fn index(self) -> usize {
        match self {
            Focus::Areas => 0,
            Focus::Chart => 1,
            Focus::Data => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Areas => "Areas",
            Focus::Chart => "Chart",
            Focus::Data => "Data",
        }
    }

    pub fn next(self) -> Focus {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Config,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Config => "CFG",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    ErrorHistory,
}

/// Screen rectangles from the last draw, used to route mouse events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitAreas {
    pub areas_list: Rect,
    /// Index of the first area shown in `areas_list`.
    pub areas_offset: usize,
    pub plot: Rect,
    pub table: Rect,
}

const MAX_ERRORS: usize = 50;

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Focus,
    pub overlay: Overlay,

    pub config: ViewerConfig,
    pub data_path: PathBuf,
    pub cache: DatasetCache,
    pub source: Option<Arc<CachedLoad>>,
    pub selector: Option<AreaSelector>,
    pub page: Option<PageModel>,

    // Chart interaction
    pub viewport: Viewport,
    pub hover: Option<NaiveDate>,
    pub drag_from: Option<(u16, u16)>,

    // Data preview
    pub table_scroll: usize,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    /// Unrecoverable error that ends the session after the terminal is restored.
    pub fatal: Option<LoadError>,
    pub hit_areas: Cell<HitAreas>,
}

impl AppState {
    pub fn new(config: ViewerConfig, data_path: PathBuf) -> Self {
        Self {
            running: true,
            focus: Focus::Areas,
            overlay: Overlay::None,
            config,
            data_path,
            cache: DatasetCache::new(),
            source: None,
            selector: None,
            page: None,
            viewport: Viewport::default(),
            hover: None,
            drag_from: None,
            table_scroll: 0,
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            fatal: None,
            hit_areas: Cell::new(HitAreas::default()),
        }
    }

    /// Load (or fetch from cache) the configured dataset and show its first area.
    ///
    /// Recoverable failures become an error message and an empty page; only a
    /// fatal load error is returned.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let entry = self.cache.get_or_load(&self.data_path)?;

        self.selector = AreaSelector::new(&entry.dataset);
        let area_count = self.selector.as_ref().map(|s| s.options().len());
        match (&entry.error, area_count) {
            (Some(message), _) => {
                let context = self.data_path.display().to_string();
                self.push_error(ErrorCategory::Data, message.clone(), context);
            }
            (None, None) => self.set_warning("No areas found in the dataset."),
            (None, Some(areas)) => {
                let format = entry.format.map(|f| f.to_string()).unwrap_or_default();
                let message = format!(
                    "Loaded {} rows, {areas} areas from {} ({format})",
                    entry.dataset.len(),
                    self.data_path.display(),
                );
                self.set_status(message);
            }
        }
        self.source = Some(entry);
        self.refresh_page();
        Ok(())
    }

    /// Drop the cached dataset and read the file again.
    pub fn reload(&mut self) {
        let keep_area = self.selected_area().map(str::to_string);
        self.cache.invalidate(&self.data_path);
        match self.load() {
            Ok(()) => {
                if let Some(area) = keep_area {
                    self.restore_area(&area);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.fatal = Some(e);
                self.running = false;
            }
        }
    }

    pub fn selected_area(&self) -> Option<&str> {
        self.selector.as_ref().map(AreaSelector::selected)
    }

    /// Rebuild the page for the current selection.
    pub fn refresh_page(&mut self) {
        self.page = match (&self.source, &self.selector) {
            (Some(source), Some(selector)) => Some(build_page(
                &source.dataset,
                selector.selected(),
                &self.config.chart,
            )),
            _ => None,
        };
        self.viewport = match &self.page {
            Some(page) => Viewport::fit(page.chart.x_domain, page.chart.y_domain),
            None => Viewport::default(),
        };
        self.hover = None;
        self.drag_from = None;
        self.table_scroll = 0;
    }

    /// Apply a selector movement and rebuild the page if the selection changed.
    pub fn update_selection(&mut self, change: impl FnOnce(&mut AreaSelector) -> bool) {
        let changed = self.selector.as_mut().map(change).unwrap_or(false);
        if changed {
            self.refresh_page();
        }
    }

    /// Re-select a previously chosen area; unknown names are ignored.
    pub fn restore_area(&mut self, area: &str) {
        self.update_selection(|s| s.selected() != area && s.select_by_name(area));
    }

    pub fn hover_info(&self) -> Option<HoverInfo> {
        let page = self.page.as_ref()?;
        self.hover.map(|date| page.chart.hover_on(date))
    }

    /// Move the hover cursor by whole dates.
    pub fn step_hover(&mut self, delta: isize) {
        if let Some(page) = &self.page {
            self.hover = page.chart.step_date(self.hover, delta);
        }
    }

    /// Hover the date nearest to a data-space X.
    pub fn hover_x(&mut self, x: f64) {
        if let Some(page) = &self.page {
            self.hover = page.chart.nearest_date(x);
        }
    }

    /// Rows shown in the data preview, capped by `preview_rows`.
    pub fn preview_rows(&self) -> &[Record] {
        match &self.page {
            Some(page) => {
                let rows = &page.view.rows;
                &rows[..rows.len().min(self.config.preview_rows)]
            }
            None => &[],
        }
    }

    pub fn scroll_table(&mut self, delta: isize) {
        let max = self.preview_rows().len().saturating_sub(1);
        self.table_scroll = self.table_scroll.saturating_add_signed(delta).min(max);
    }

    /// Record an error in the history and show it in the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > MAX_ERRORS {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_csv, NORTH_SOUTH};

    #[test]
    fn focus_cycle() {
        assert_eq!(Focus::Areas.next(), Focus::Chart);
        assert_eq!(Focus::Data.next(), Focus::Areas);
        assert_eq!(Focus::Areas.prev(), Focus::Data);
        assert_eq!(Focus::Chart.prev(), Focus::Areas);
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = AppState::new(ViewerConfig::default(), PathBuf::from("missing.csv"));
        for i in 0..60 {
            app.push_error(ErrorCategory::Data, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn load_selects_first_area_and_builds_page() {
        let (_dir, app) = app_with_csv(NORTH_SOUTH);
        assert_eq!(app.selected_area(), Some("North"));
        let page = app.page.as_ref().unwrap();
        assert_eq!(page.chart.title, "Forecast Analysis for North");
        assert_eq!(app.viewport.x, page.chart.x_domain);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Info))));
    }

    #[test]
    fn selection_change_rebuilds_the_page() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.hover = Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.viewport.pan_x(0.3);
        app.update_selection(AreaSelector::select_next);
        assert_eq!(app.page.as_ref().unwrap().area(), "South");
        assert!(app.hover.is_none());
        assert!(app.viewport.is_home());

        // Clamped movement does not rebuild.
        app.viewport.pan_x(0.3);
        app.update_selection(AreaSelector::select_next);
        assert!(!app.viewport.is_home());
    }

    #[test]
    fn missing_file_shows_error_and_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::new(ViewerConfig::default(), dir.path().join("absent.csv"));
        app.load().unwrap();
        assert!(app.page.is_none());
        assert!(app.selector.is_none());
        assert_eq!(app.error_history.len(), 1);
        assert!(app.error_history[0]
            .message
            .starts_with("Could not load the file using standard encodings."));
    }

    #[test]
    fn restore_area_ignores_unknown_names() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.restore_area("Atlantis");
        assert_eq!(app.selected_area(), Some("North"));
        app.restore_area("South");
        assert_eq!(app.selected_area(), Some("South"));
    }

    #[test]
    fn hover_steps_through_dates() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.step_hover(1);
        assert_eq!(app.hover, NaiveDate::from_ymd_opt(2024, 1, 1));
        app.step_hover(2);
        let info = app.hover_info().unwrap();
        assert_eq!(info.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(info.rule.is_some());
    }

    #[test]
    fn preview_is_capped() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.config.preview_rows = 2;
        assert_eq!(app.preview_rows().len(), 2);
        app.scroll_table(10);
        assert_eq!(app.table_scroll, 1);
        app.scroll_table(-5);
        assert_eq!(app.table_scroll, 0);
    }
}
