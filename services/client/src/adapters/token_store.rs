//! services/client/src/adapters/token_store.rs
//!
//! Implementations of the `TokenStore` port: a process-local map and a JSON
//! file that survives restarts.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sysfree_core::domain::StorageKey;
use sysfree_core::ports::{PortError, PortResult, TokenStore};
use tracing::{debug, warn};

//=========================================================================================
// In-memory store
//=========================================================================================

/// A `TokenStore` that lives as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> PortResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> PortResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&key);
        Ok(())
    }
}

//=========================================================================================
// File-backed store
//=========================================================================================

/// A `TokenStore` persisted as a flat JSON object keyed by the storage key names.
///
/// Every mutation rewrites the file through a temporary sibling and a rename.
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Opens the store, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(raw) if raw.is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| {
                PortError::Storage(format!("{} is not a token file: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "token file absent, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(PortError::Storage(e.to_string())),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `apply` to a copy, and only keeps it once it is on disk.
    fn update(&self, apply: impl FnOnce(&mut HashMap<String, String>)) -> PortResult<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = entries.clone();
        apply(&mut next);
        persist(&self.path, &next)?;
        *entries = next;
        Ok(())
    }
}

fn persist(path: &Path, entries: &HashMap<String, String>) -> PortResult<()> {
    let raw = serde_json::to_vec_pretty(entries).map_err(|e| PortError::Storage(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&raw)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    };
    write().map_err(|e| {
        warn!(path = %path.display(), "failed to persist tokens: {e}");
        PortError::Storage(e.to_string())
    })
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key.as_str())
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> PortResult<()> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: StorageKey) -> PortResult<()> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }

    fn clear(&self) -> PortResult<()> {
        self.update(|entries| {
            for key in StorageKey::ALL {
                entries.remove(key.as_str());
            }
        })
    }
}
