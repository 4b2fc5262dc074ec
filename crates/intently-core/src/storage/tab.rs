//! Per-tab ephemeral store.
//!
//! The browser analogue is session storage: one small JSON record per tab
//! holding the current intention text and timer state, keyed by a stable
//! tab identifier. Best effort only; a lost record just means the widget
//! starts over on the next load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;
use crate::timer::TimerRecord;

/// Everything a tab persists between page loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerRecord>,
}

/// JSON file at `<data dir>/tabs/<tab id>.json`.
pub struct TabStore {
    path: PathBuf,
}

impl TabStore {
    /// Open the store for a tab in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the tabs directory cannot be created.
    pub fn open(tab_id: &str) -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?, tab_id)
    }

    /// Open the store for a tab under an explicit base directory.
    pub fn open_at(base: &Path, tab_id: &str) -> Result<Self, StorageError> {
        let dir = base.join("tabs");
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::WriteFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            path: dir.join(format!("{tab_id}.json")),
        })
    }

    /// Load the tab record, defaulting when nothing is persisted yet.
    ///
    /// # Errors
    /// Returns an error for unreadable or corrupt records; callers treat
    /// that as a fresh tab.
    pub fn load(&self) -> Result<TabRecord, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TabRecord::default()),
            Err(source) => Err(StorageError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, record: &TabRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Remove the persisted record, if any.
    pub fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_record_defaults() {
        let dir = TempDir::new().unwrap();
        let store = TabStore::open_at(dir.path(), "t1").unwrap();
        assert_eq!(store.load().unwrap(), TabRecord::default());
    }

    #[test]
    fn roundtrip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = TabStore::open_at(dir.path(), "t1").unwrap();

        let record = TabRecord {
            intention: Some("catch up on messages".into()),
            timer: Some(TimerRecord::timed(15, Some("15 min".into()), 1_000)),
        };
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), record);

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), TabRecord::default());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_record_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let store = TabStore::open_at(dir.path(), "t1").unwrap();
        std::fs::write(dir.path().join("tabs/t1.json"), "{broken").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn tabs_are_isolated() {
        let dir = TempDir::new().unwrap();
        let a = TabStore::open_at(dir.path(), "a").unwrap();
        let b = TabStore::open_at(dir.path(), "b").unwrap();
        a.save(&TabRecord {
            intention: Some("a".into()),
            timer: None,
        })
        .unwrap();
        assert_eq!(b.load().unwrap(), TabRecord::default());
    }
}
