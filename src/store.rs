//! Settings persistence.
//!
//! The gallery stores exactly one record under one key ([`OPTION_KEY`]). The
//! store is a plain get/set of a JSON blob with last-write-wins semantics: a
//! save replaces the whole record, there is no partial update and no locking.
//!
//! Two implementations:
//!
//! - [`JsonFileStore`]: one pretty-printed `<key>.json` file per key inside a
//!   directory. Used by the CLI.
//! - [`MemoryStore`]: a map behind a `RefCell`, for tests and embedding.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the gallery settings record.
pub const OPTION_KEY: &str = "pog_options";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid settings key: {0:?}")]
    InvalidKey(String),
}

/// Named JSON blob storage.
pub trait SettingsStore {
    /// Read the blob stored under `key`. `Ok(None)` when nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        // Readers never observe a partially written record.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one record.
    pub fn with(key: &str, value: Value) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.to_string(), value);
        store
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn file_store_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert!(store.load(OPTION_KEY).unwrap().is_none());
    }

    #[test]
    fn file_store_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("nested"));
        let value = json!({ "gap": 4, "images": [] });
        store.save(OPTION_KEY, &value).unwrap();
        assert_eq!(store.load(OPTION_KEY).unwrap(), Some(value));
        assert!(tmp.path().join("nested/pog_options.json").exists());
    }

    #[test]
    fn file_store_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        store.save(OPTION_KEY, &json!({ "gap": 1 })).unwrap();
        store.save(OPTION_KEY, &json!({ "hover": "none" })).unwrap();
        assert_eq!(store.load(OPTION_KEY).unwrap(), Some(json!({ "hover": "none" })));
    }

    #[test]
    fn file_store_corrupt_json_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("pog_options.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert!(matches!(store.load(OPTION_KEY), Err(StoreError::Json(_))));
    }

    #[test]
    fn file_store_rejects_path_keys() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert!(matches!(
            store.save("../escape", &json!({})),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.load(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load("k").unwrap().is_none());
        store.save("k", &json!([1, 2])).unwrap();
        assert_eq!(store.load("k").unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn memory_store_seeded() {
        let store = MemoryStore::with(OPTION_KEY, json!({ "gap": 3 }));
        assert_eq!(store.load(OPTION_KEY).unwrap(), Some(json!({ "gap": 3 })));
    }
}
