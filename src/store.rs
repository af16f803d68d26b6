//! Persistent string key-value store for the session.
//!
//! [`open_store`] checks once at startup whether a data directory is usable
//! and returns either a [`FileStore`] backed by a JSON file there or a
//! [`NullStore`] that silently drops writes.
//!
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Context, Result};

pub const STORE_FILE: &str = "session.json";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Store used when nothing can be persisted.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}
}

/// JSON object on disk, loaded at open and rewritten after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_ctx(|| format!("read {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .with_ctx(|| format!("parse {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        let res = serde_json::to_string_pretty(entries)
            .with_ctx(|| "encode store".to_string())
            .and_then(|buf| {
                fs::write(&self.path, buf).with_ctx(|| format!("write {}", self.path.display()))
            });
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to persist store");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
            self.flush(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.remove(key).is_some() {
                self.flush(&entries);
            }
        }
    }
}

/// Platform data directory for the application, if one can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "reqres-admin").map(|d| d.data_dir().to_path_buf())
}

/// Pick a store: a file store in `dir` when it can be created and read,
/// otherwise a no-op store.
pub fn open_store(dir: Option<&Path>) -> SharedStore {
    let Some(dir) = dir else {
        tracing::info!("no data directory available; session will not persist");
        return Arc::new(NullStore);
    };
    let opened = fs::create_dir_all(dir)
        .with_ctx(|| format!("create {}", dir.display()))
        .and_then(|_| FileStore::open(dir.join(STORE_FILE)));
    match opened {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "using file store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "falling back to in-process null store");
            Arc::new(NullStore)
        }
    }
}
