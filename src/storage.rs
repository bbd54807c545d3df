//! Key-value blob storage for the project slot
//!
//! The editor core only needs get/set/remove of text blobs under a key. Two
//! backends ship with the crate: an in-memory map and a directory where each
//! key is a `<key>.json` file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Slot holding the whole project document
pub const PROJECT_KEY: &str = "project";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Minimal text blob store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile store, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io { key: key.to_string(), source }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(io_error(key))?;
        fs::write(&path, value).map_err(io_error(key))?;
        log::debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &mut dyn KeyValueStore) {
        assert_eq!(store.get(PROJECT_KEY).unwrap(), None);
        store.set(PROJECT_KEY, "{\"size\":8}").unwrap();
        assert_eq!(store.get(PROJECT_KEY).unwrap().as_deref(), Some("{\"size\":8}"));
        store.set(PROJECT_KEY, "{}").unwrap();
        assert_eq!(store.get(PROJECT_KEY).unwrap().as_deref(), Some("{}"));
        store.remove(PROJECT_KEY).unwrap();
        assert_eq!(store.get(PROJECT_KEY).unwrap(), None);
        store.remove(PROJECT_KEY).unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_directory_store() {
        let temp = TempDir::new().unwrap();
        let mut store = DirectoryStore::new(temp.path().join("nested").join(".pixed"));
        exercise(&mut store);
    }

    #[test]
    fn test_directory_store_file_layout() {
        let temp = TempDir::new().unwrap();
        let mut store = DirectoryStore::new(temp.path());
        store.set("project", "x").unwrap();
        assert!(temp.path().join("project.json").exists());
    }

    #[test]
    fn test_directory_store_rejects_path_keys() {
        let temp = TempDir::new().unwrap();
        let store = DirectoryStore::new(temp.path());
        assert!(matches!(store.get("../escape"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
