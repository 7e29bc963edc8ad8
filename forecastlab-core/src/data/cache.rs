//! Per-path dataset cache.
//!
//! The first request for a path loads it; every later request returns the
//! same shared entry without touching the disk. Entries never expire within
//! a process. Recoverable failures are cached too (as an empty dataset plus
//! the message to show), so a broken file is read once, not on every
//! interaction. Fatal failures are returned and not cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{load_dataset, LoadError, SourceFormat};
use crate::dataset::Dataset;

/// Outcome of loading one path, shared read-only once created.
#[derive(Debug)]
pub struct CachedLoad {
    pub path: PathBuf,
    pub dataset: Dataset,
    /// `None` when loading failed.
    pub format: Option<SourceFormat>,
    /// User-facing error message for a recoverable failure.
    pub error: Option<String>,
}

impl CachedLoad {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Dataset cache keyed by path.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<CachedLoad>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `path`, loading it on first access.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<CachedLoad>, LoadError> {
        if let Some(entry) = self.entries.get(path) {
            tracing::debug!(path = %path.display(), "dataset cache hit");
            return Ok(Arc::clone(entry));
        }

        let entry = match load_dataset(path) {
            Ok(loaded) => CachedLoad {
                path: loaded.path,
                dataset: loaded.dataset,
                format: Some(loaded.format),
                error: None,
            },
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "dataset load failed");
                CachedLoad {
                    path: path.to_path_buf(),
                    dataset: Dataset::empty(),
                    format: None,
                    error: Some(format!(
                        "Could not load the file using standard encodings. \
                         Please check the file path and encoding. Details: {e}"
                    )),
                }
            }
        };

        let entry = Arc::new(entry);
        self.entries.insert(path.to_path_buf(), Arc::clone(&entry));
        Ok(entry)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the entry for `path` so the next access reloads it.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }
}
