//! ForecastLab Core: forecast dataset loading, area selection, reshaping and chart model.
//!
//! This crate contains everything below the terminal UI:
//! - Domain types (records, series identities)
//! - CSV/spreadsheet loading with encoding fallback and a per-path cache
//! - Area selector state
//! - Per-area transformation (forecast boundary, long-form rows, confidence band)
//! - Backend-independent chart layers with explicit z-order
//! - Viewer configuration

pub mod chart;
pub mod config;
pub mod data;
pub mod dataset;
pub mod domain;
pub mod format;
pub mod pipeline;
pub mod selector;
pub mod transform;

pub use config::{ConfigError, ViewerConfig};
pub use dataset::Dataset;
pub use pipeline::{build_page, PageModel};
pub use selector::AreaSelector;
pub use transform::AreaView;
