//! Origin-scoped string key/value storage, the desktop stand-in for a
//! browser's local storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::config::app_dir;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing medium refused the write (quota, permissions, read-only).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A string map persisted as one JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    /// The store under the user's local data directory.
    pub fn open_default() -> Self {
        let mut path = app_dir(dirs::data_local_dir());
        path.push("local_storage.json");
        Self::open(path)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails, as when the quota is exhausted.
    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Unavailable("writes rejected".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
