// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed key-value store.
//!
//! Values are strings, mirroring browser local storage. The whole map is
//! rewritten on every mutation (write to a temp file, then rename), which
//! is fine for the handful of keys the client keeps.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persisted key-value storage.
#[derive(Clone)]
pub struct LocalStorage {
    entries: Arc<DashMap<String, String>>,
    /// Backing file; `None` keeps everything in memory.
    path: Option<PathBuf>,
    /// Serializes file rewrites.
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Open (or create) storage backed by the JSON file at `path`.
    ///
    /// An unreadable or corrupt file is logged and treated as empty, so a
    /// damaged state file never prevents the client from starting.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let entries = DashMap::new();
        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    for (key, value) in map {
                        entries.insert(key, value);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt storage file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io(e.to_string())),
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened local storage");

        Ok(Self {
            entries: Arc::new(entries),
            path: Some(path),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create in-memory storage (nothing survives the process).
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            path: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// Store `value` under `key`. The in-memory map only changes once the
    /// file has been written.
    pub fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = self.snapshot();
        next.insert(key.to_string(), value.clone());
        self.write_file(&next)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.snapshot();
        next.remove(key);
        self.write_file(&next)?;
        self.entries.remove(key);
        Ok(())
    }

    /// Read and deserialize a JSON value. `Ok(None)` if the key is absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.set(key, raw)
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Replace the backing file with `contents`. Callers hold `write_lock`.
    fn write_file(&self, contents: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let raw = serde_json::to_string_pretty(contents)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, path).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors from local storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Malformed value under '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("Failed to serialize value: {0}")]
    Serialize(String),
}
