//! Key-value persistence backends
//!
//! The ledger is stored as two string values (income and expenses), each a
//! serialized JSON document. Backends only move strings around; shaping the
//! documents is the store's job.

use crate::error::{LedgerError, LedgerResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key holding every year's 12-month income array
pub const INCOME_KEY: &str = "allIncomeData";

/// Key holding every year's expense list
pub const EXPENSES_KEY: &str = "allExpensesData";

/// Minimal string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> LedgerResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> LedgerResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory storage, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> LedgerResult<()> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// A single JSON file holding `{ "key": "<serialized value>", ... }`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> LedgerResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(LedgerError::corrupt(
                &self.path.display().to_string(),
                "storage file is not a JSON object",
            )),
        }
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_atomic(&self, data: &str) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        let entries = self.read_all()?;
        match entries.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(LedgerError::corrupt(
                key,
                format!("expected a string value, found {}", json_kind(other)),
            )),
        }
    }

    fn set(&mut self, key: &str, value: String) -> LedgerResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value));
        let data = serde_json::to_string_pretty(&Value::Object(entries))?;
        self.write_atomic(&data)?;
        debug!(key, path = %self.path.display(), "storage key written");
        Ok(())
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new().with_entry("seed", "1");
        assert_eq!(store.writes(), 0);
        store.set("a", "x".to_string()).unwrap();
        store.set("a", "y".to_string()).unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("y"));
        assert_eq!(store.get("seed").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("ledger.json"));
        assert_eq!(store.get(INCOME_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parent_dirs_and_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let mut store = FileStore::new(&path);

        store.set(INCOME_KEY, "{}".to_string()).unwrap();
        store.set(EXPENSES_KEY, "{\"2024\":[]}".to_string()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(INCOME_KEY).unwrap().as_deref(), Some("{}"));
        assert_eq!(
            reopened.get(EXPENSES_KEY).unwrap().as_deref(),
            Some("{\"2024\":[]}")
        );
    }

    #[test]
    fn test_file_store_rejects_non_object_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileStore::new(&path);
        let err = store.get(INCOME_KEY).unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt { .. }));
    }

    #[test]
    fn test_file_store_rejects_non_string_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, r#"{"allIncomeData": 5}"#).unwrap();

        let store = FileStore::new(&path);
        let err = store.get(INCOME_KEY).unwrap_err();
        assert!(err.to_string().contains("found number"));
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "   \n").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get(EXPENSES_KEY).unwrap(), None);
    }
}
