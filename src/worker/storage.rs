//! Named caches of asset responses.
//!
//! A cache name is a manifest `cache_version`; one name holds one
//! generation of assets. Population goes through [`CacheStorage::put_all`],
//! which stores either every entry or none.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::config::app_dir;
use crate::worker::error::WorkerError;
use crate::worker::request::AssetResponse;

pub trait CacheStorage: Send + Sync {
    /// Create the named cache if it does not exist yet.
    fn open(&self, name: &str) -> Result<(), WorkerError>;
    fn keys(&self) -> Result<Vec<String>, WorkerError>;
    /// Returns whether a cache was removed.
    fn delete(&self, name: &str) -> Result<bool, WorkerError>;
    fn put_all(&self, name: &str, entries: Vec<AssetResponse>) -> Result<(), WorkerError>;
    fn match_url(&self, name: &str, url: &str) -> Result<Option<AssetResponse>, WorkerError>;
    /// URLs stored in the named cache, empty when it does not exist.
    fn entries(&self, name: &str) -> Result<Vec<String>, WorkerError>;
}

fn check_name(name: &str) -> Result<(), WorkerError> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(WorkerError::Storage(format!("bad cache name '{name}'")));
    }
    Ok(())
}

/* =========================
   In-memory
   ========================= */

type CacheMap = BTreeMap<String, BTreeMap<String, AssetResponse>>;

#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<CacheMap>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheMap> {
        self.caches.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, name: &str) -> Result<(), WorkerError> {
        check_name(name)?;
        self.lock().entry(name.to_string()).or_default();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, WorkerError> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        Ok(self.lock().remove(name).is_some())
    }

    fn put_all(&self, name: &str, entries: Vec<AssetResponse>) -> Result<(), WorkerError> {
        check_name(name)?;
        let mut caches = self.lock();
        let cache = caches.entry(name.to_string()).or_default();
        for entry in entries {
            cache.insert(entry.url.clone(), entry);
        }
        Ok(())
    }

    fn match_url(&self, name: &str, url: &str) -> Result<Option<AssetResponse>, WorkerError> {
        Ok(self.lock().get(name).and_then(|c| c.get(url)).cloned())
    }

    fn entries(&self, name: &str) -> Result<Vec<String>, WorkerError> {
        Ok(self
            .lock()
            .get(name)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default())
    }
}

/* =========================
   On disk
   ========================= */

const INDEX_FILE: &str = "entries.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    url: String,
    status: u16,
    content_type: Option<String>,
    file: String,
}

/// One directory per cache, holding an `entries.json` index and one body
/// file per entry. Writes go to a staging directory that replaces the cache
/// directory only once every body is on disk.
pub struct DiskCacheStorage {
    root: PathBuf,
    lock: Mutex<()>,
}

impl DiskCacheStorage {
    pub fn new(root: PathBuf) -> Result<Self, WorkerError> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// `<cache dir>/poke_rand/asset-cache`
    pub fn open_default() -> Result<Self, WorkerError> {
        let mut root = app_dir(dirs::cache_dir());
        root.push("asset-cache");
        Self::new(root)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cache_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_index(dir: &Path) -> Result<Option<Vec<StoredEntry>>, WorkerError> {
        let path = dir.join(INDEX_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write_cache(&self, name: &str, entries: &[(StoredEntry, Vec<u8>)]) -> Result<(), WorkerError> {
        let staging = self
            .root
            .join(format!(".staging-{name}-{}", rand::random::<u32>()));
        fs::create_dir_all(&staging)?;

        let written = (|| -> Result<(), WorkerError> {
            for (entry, body) in entries {
                fs::write(staging.join(&entry.file), body)?;
            }
            let index: Vec<&StoredEntry> = entries.iter().map(|(e, _)| e).collect();
            fs::write(staging.join(INDEX_FILE), serde_json::to_vec_pretty(&index)?)?;
            Ok(())
        })();

        if let Err(e) = written {
            fs::remove_dir_all(&staging).ok();
            return Err(e);
        }

        let target = self.cache_dir(name);
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        fs::rename(&staging, &target)?;
        Ok(())
    }
}

impl CacheStorage for DiskCacheStorage {
    fn open(&self, name: &str) -> Result<(), WorkerError> {
        check_name(name)?;
        let _guard = self.guard();
        if Self::read_index(&self.cache_dir(name))?.is_none() {
            self.write_cache(name, &[])?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, WorkerError> {
        let _guard = self.guard();
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().join(INDEX_FILE).exists() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        check_name(name)?;
        let _guard = self.guard();
        let dir = self.cache_dir(name);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(dir)?;
        Ok(true)
    }

    fn put_all(&self, name: &str, entries: Vec<AssetResponse>) -> Result<(), WorkerError> {
        check_name(name)?;
        let _guard = self.guard();
        let dir = self.cache_dir(name);

        let mut merged: BTreeMap<String, (StoredEntry, Vec<u8>)> = BTreeMap::new();
        for old in Self::read_index(&dir)?.unwrap_or_default() {
            let body = fs::read(dir.join(&old.file))?;
            merged.insert(old.url.clone(), (old, body));
        }
        for new in entries {
            let stored = StoredEntry {
                url: new.url.clone(),
                status: new.status,
                content_type: new.content_type,
                file: String::new(),
            };
            merged.insert(new.url, (stored, new.body));
        }

        let numbered: Vec<(StoredEntry, Vec<u8>)> = merged
            .into_values()
            .enumerate()
            .map(|(i, (mut entry, body))| {
                entry.file = format!("{i:04}.bin");
                (entry, body)
            })
            .collect();

        self.write_cache(name, &numbered)
    }

    fn match_url(&self, name: &str, url: &str) -> Result<Option<AssetResponse>, WorkerError> {
        check_name(name)?;
        let _guard = self.guard();
        let dir = self.cache_dir(name);
        let Some(index) = Self::read_index(&dir)? else {
            return Ok(None);
        };
        let Some(entry) = index.into_iter().find(|e| e.url == url) else {
            return Ok(None);
        };
        let body = fs::read(dir.join(&entry.file))?;
        Ok(Some(AssetResponse {
            url: entry.url,
            status: entry.status,
            content_type: entry.content_type,
            body,
        }))
    }

    fn entries(&self, name: &str) -> Result<Vec<String>, WorkerError> {
        check_name(name)?;
        let _guard = self.guard();
        Ok(Self::read_index(&self.cache_dir(name))?
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.url)
            .collect())
    }
}
