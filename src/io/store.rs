use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::atomic_write;

/// Error type for store access
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a JSON object store: {reason}")]
    Malformed {
        path: PathBuf,
        reason: String,
        /// The file content as read
        raw: String,
    },
    #[error("value under {key} is not a collection: {reason}")]
    InvalidValue {
        key: String,
        reason: String,
        /// The stored value, pretty-printed
        raw: String,
    },
    #[error("could not encode store: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Lock(#[from] LockError),
}

impl StoreError {
    /// The unreadable stored text, for errors that carry one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            StoreError::Malformed { raw, .. } | StoreError::InvalidValue { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Key-value persistence the board is saved into.
///
/// Values are whole JSON documents. `get` returns only the keys that exist;
/// a missing key is not an error. `set` replaces the full value of each key
/// it is given and leaves other keys alone.
pub trait Store {
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError>;
    fn set(&mut self, entries: IndexMap<String, Value>) -> Result<(), StoreError>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: Value) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(key.to_string(), value);
        MemoryStore { entries }
    }
}

impl Store for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError> {
        Ok(keys
            .iter()
            .filter_map(|k| self.entries.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn set(&mut self, entries: IndexMap<String, Value>) -> Result<(), StoreError> {
        self.entries.extend(entries);
        Ok(())
    }
}

/// A store backed by one JSON object file, one top-level member per key.
///
/// Writes read the current file, replace the given keys and write the whole
/// file atomically under a lock, so keys written by other processes survive
/// and a crash never leaves a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn read_all(&self) -> Result<IndexMap<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
            raw: text.clone(),
        })
    }
}

impl Store for JsonFileStore {
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError> {
        let mut all = self.read_all()?;
        Ok(keys
            .iter()
            .filter_map(|k| all.shift_remove(*k).map(|v| (k.to_string(), v)))
            .collect())
    }

    fn set(&mut self, entries: IndexMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        let _lock = FileLock::acquire_default(&self.path)?;
        // An unparsable file is replaced rather than merged into; its text
        // went to the recovery log when it was loaded.
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(StoreError::Malformed { .. }) => IndexMap::new(),
            Err(e) => return Err(e),
        };
        let keys: Vec<String> = entries.keys().cloned().collect();
        all.extend(entries);

        let mut content = serde_json::to_string_pretty(&all)?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), ?keys, "store written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entries(key: &str, value: Value) -> IndexMap<String, Value> {
        let mut map = IndexMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn memory_store_get_returns_present_keys_only() {
        let mut store = MemoryStore::new();
        store.set(entries("a", json!([1, 2]))).unwrap();
        let got = store.get(&["a", "missing"]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["a"], json!([1, 2]));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("links.json"));
        assert!(store.get(&["navigationColumns"]).unwrap().is_empty());
    }

    #[test]
    fn file_store_round_trip_and_overwrite() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path().join("links.json"));
        store.set(entries("k", json!({"v": 1}))).unwrap();
        store.set(entries("k", json!({"v": 2}))).unwrap();
        let got = store.get(&["k"]).unwrap();
        assert_eq!(got["k"], json!({"v": 2}));
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::write(&path, r#"{"theme": "dark", "k": []}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        store.set(entries("k", json!([{"title": "Work"}]))).unwrap();

        let got = store.get(&["theme", "k"]).unwrap();
        assert_eq!(got["theme"], json!("dark"));
        assert_eq!(got["k"], json!([{"title": "Work"}]));
        assert!(!FileLock::lock_path(&path).exists());
    }

    #[test]
    fn file_store_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/links.json");
        let mut store = JsonFileStore::new(&path);
        store.set(entries("k", json!(true))).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_store_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get(&["k"]),
            Err(StoreError::Malformed { .. })
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            store.get(&["k"]),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn malformed_error_carries_file_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::write(&path, "{\"k\": [1,").unwrap();
        let err = JsonFileStore::new(&path).get(&["k"]).unwrap_err();
        assert_eq!(err.raw(), Some("{\"k\": [1,"));
    }

    #[test]
    fn set_propagates_read_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::create_dir(&path).unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(
            store.set(entries("k", json!(1))),
            Err(StoreError::Read { .. })
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn file_store_overwrites_malformed_file_on_set() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("links.json");
        fs::write(&path, "garbage").unwrap();
        let mut store = JsonFileStore::new(&path);
        store.set(entries("k", json!(1))).unwrap();
        assert_eq!(store.get(&["k"]).unwrap()["k"], json!(1));
    }
}
