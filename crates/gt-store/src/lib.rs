//! Storage layer for the gt time tracker.
//!
//! The whole [`Tracker`] is persisted as one pretty-printed JSON document.
//! Commands load it, run a single operation, and save it back.
//!
//! # Concurrency
//!
//! There is no locking. Two processes saving concurrently race and the last
//! save wins. Saves write the file in place and are not crash-atomic.
//!
//! # Document Evolution
//!
//! Missing collections default to empty, and every load renumbers short IDs
//! and reconciles the stash, so hand-edited documents are normalized before
//! any operation sees them. Undo payloads are kept as raw JSON and decoded
//! only on restore; a corrupt payload does not prevent loading.

use std::path::{Path, PathBuf};

use chrono::Utc;
use gt_core::Tracker;
use thiserror::Error;

/// Default document name, placed in the home directory.
pub const DEFAULT_FILE_NAME: &str = ".gotime.json";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the document failed.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document exists but is not valid tracker JSON.
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The tracker could not be encoded.
    #[error("failed to serialize tracker")]
    Serialize(#[source] serde_json::Error),
}

/// A tracker document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `~/.gotime.json`, or `None` if the home directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the tracker, returning an empty one if the document is absent.
    pub fn load(&self) -> Result<Tracker, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no tracker document, starting fresh");
                return Ok(Tracker::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut tracker: Tracker =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracker.normalize(Utc::now());
        tracing::debug!(
            path = %self.path.display(),
            entries = tracker.entries().len(),
            undo_records = tracker.undo_history().len(),
            "loaded tracker"
        );
        Ok(tracker)
    }

    /// Writes the tracker, creating parent directories as needed.
    pub fn save(&self, tracker: &Tracker) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(tracker).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "saved tracker");
        Ok(())
    }
}
