use std::cell::{Cell, OnceCell};
use std::path::{Path, PathBuf};

use super::loader::{LoadError, load_file};
use super::model::ArticleDataset;

// ---------------------------------------------------------------------------
// Load-once dataset cache
// ---------------------------------------------------------------------------

/// Holds the outcome of the first load for the rest of the process.
///
/// The cell is never cleared, and a failed load is remembered as-is, so the
/// file is read at most once.  `OnceCell` is `!Sync`, which keeps the cache on
/// the UI thread that owns it.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    outcome: OnceCell<Result<ArticleDataset, LoadError>>,
    loads: Cell<u32>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            outcome: OnceCell::new(),
            loads: Cell::new(0),
        }
    }

    /// The configured input path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load on first use, then return the memoized result.
    pub fn get(&self) -> Result<&ArticleDataset, &LoadError> {
        self.outcome
            .get_or_init(|| {
                self.loads.set(self.loads.get() + 1);
                log::info!("Loading article metadata from {}", self.path.display());
                let outcome = load_file(&self.path);
                if let Err(e) = &outcome {
                    log::error!("Failed to load {}: {e}", self.path.display());
                }
                outcome
            })
            .as_ref()
    }

    /// Whether the load has happened (successfully or not).
    #[cfg(test)]
    pub fn is_initialized(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// How many times the file was actually read.
    #[cfg(test)]
    pub fn load_count(&self) -> u32 {
        self.loads.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_read_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(
            &path,
            "title,publish_time,journal,source_x\nA,2020-01-01,J,S\n",
        )
        .unwrap();

        let cache = DatasetCache::new(&path);
        assert!(!cache.is_initialized());
        assert_eq!(cache.get().unwrap().len(), 1);

        // Later edits to the file are not observed.
        std::fs::write(&path, "title,publish_time,journal,source_x\n").unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn failure_is_memoized_and_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_metadata.csv");
        let cache = DatasetCache::new(&path);

        assert!(cache.get().unwrap_err().is_missing_file());

        std::fs::write(&path, "title,publish_time,journal,source_x\n").unwrap();
        assert!(cache.get().is_err());
        assert_eq!(cache.load_count(), 1);
    }
}
