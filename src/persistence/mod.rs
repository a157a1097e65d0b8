//! Key-value persistence for player progress
//!
//! The game only stores small integers (best level reached). Backends:
//! - `MemoryPrefs`: in-process map, used by tests and as a fallback
//! - `JsonFilePrefs`: JSON object on disk (native)
//! - `LocalStoragePrefs`: browser LocalStorage (wasm32)

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised by storage backends. Never surfaced through `Persistence`.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// Integer key-value store
pub trait Persistence {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32);
    /// Flush pending writes. Failures are logged, not returned.
    fn save(&mut self);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, i32>,
    /// Number of `save` calls (lets callers observe flushes)
    pub saves: u32,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryPrefs {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) {
        self.saves += 1;
    }
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: std::path::PathBuf,
    values: BTreeMap<String, i32>,
    dirty: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFilePrefs {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => {
                log::info!("Loaded {} prefs from {}", values.len(), path.display());
                values
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Ignoring prefs at {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path,
            values,
            dirty: false,
        }
    }

    fn read(path: &std::path::Path) -> Result<BTreeMap<String, i32>, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write the store to disk
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        // Atomic replace via sibling temp file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Persistence for JsonFilePrefs {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        if self.values.insert(key.to_string(), value) != Some(value) {
            self.dirty = true;
        }
    }

    fn save(&mut self) {
        if !self.dirty {
            return;
        }
        match self.flush() {
            Ok(()) => log::info!("Prefs saved to {}", self.path.display()),
            Err(e) => log::warn!("Failed to save prefs to {}: {e}", self.path.display()),
        }
    }
}

/// LocalStorage store (WASM only). Keys are namespaced.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStoragePrefs;

#[cfg(target_arch = "wasm32")]
impl LocalStoragePrefs {
    const PREFIX: &'static str = "herd_dash.";

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Persistence for LocalStoragePrefs {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        Self::storage()
            .ok()
            .and_then(|s| s.get_item(&format!("{}{key}", Self::PREFIX)).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        match Self::storage() {
            Ok(s) => {
                let _ = s.set_item(&format!("{}{key}", Self::PREFIX), &value.to_string());
            }
            Err(e) => log::warn!("Cannot store {key}: {e}"),
        }
    }

    fn save(&mut self) {
        // LocalStorage writes are synchronous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_prefs() {
        let mut prefs = MemoryPrefs::new();
        assert_eq!(prefs.get_int("BestLevel", 1), 1);
        prefs.set_int("BestLevel", 4);
        assert_eq!(prefs.get_int("BestLevel", 1), 4);
        prefs.save();
        assert_eq!(prefs.saves, 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("herd_dash_{}_{name}.json", std::process::id()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_prefs_persist_across_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_int("BestLevel", 1), 1);
        prefs.set_int("BestLevel", 6);
        prefs.save();

        let reopened = JsonFilePrefs::open(&path);
        assert_eq!(reopened.get_int("BestLevel", 1), 6);

        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_prefs_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json at all").unwrap();

        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_int("BestLevel", 1), 1);

        let _ = std::fs::remove_file(&path);
    }
}
