//! Dataset cache
//!
//! Process-wide memoization of a loaded table, keyed by file path and
//! modification time. A hit hands out the same `Arc` snapshot; a changed
//! path or mtime triggers a reload; `invalidate` forces one.

use super::error::{DataError, DataResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

struct CacheEntry<T> {
    path: PathBuf,
    modified: Option<SystemTime>,
    rows: Arc<Vec<T>>,
}

/// Memoized, read-only table
pub struct DatasetCache<T> {
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    /// Return the cached table for `path`, loading it on a miss
    ///
    /// The file is stat'ed on every call; an unreadable file is an error
    /// even when a previous snapshot is cached.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> DataResult<Arc<Vec<T>>>
    where
        F: FnOnce(&Path) -> DataResult<Vec<T>>,
    {
        let modified = std::fs::metadata(path)
            .map_err(|e| DataError::io(path, e))?
            .modified()
            .ok();

        let mut entry = self.lock();

        if let Some(cached) = entry.as_ref() {
            if cached.path == path && cached.modified == modified {
                tracing::debug!(path = %path.display(), "Dataset cache hit");
                return Ok(Arc::clone(&cached.rows));
            }
            tracing::info!(path = %path.display(), "Dataset changed on disk, reloading");
        }

        let rows = Arc::new(load(path)?);
        *entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            rows: Arc::clone(&rows),
        });

        Ok(rows)
    }

    /// Drop the cached snapshot so the next access re-reads the file
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("Dataset cache invalidated");
        }
    }

    /// Whether a snapshot is currently held
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry<T>>> {
        // A panic inside a loader leaves the entry untouched, so the data is still sound
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
