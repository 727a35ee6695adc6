//! Filesystem key/value storage
//!
//! Stateless handler storing each key as one file under a base directory,
//! the native stand-in for `localStorage` / `sessionStorage`.

use bz_core::effects::{KeyValueEffects, StorageError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem-based key/value store
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    /// Directory holding one file per key
    base_path: PathBuf,
}

impl FilesystemStore {
    /// Store rooted at `base_path`. The directory is created on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Session-scoped store: starts empty, whatever an earlier run left.
    pub fn session(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self::new(base_path);
        store.clear()?;
        Ok(store)
    }

    /// Base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Remove every stored key.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_dir_all(&self.base_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to clear {}: {e}",
                self.base_path.display()
            ))),
        }
    }

    /// File backing `key`. Keys are percent-encoded so any key maps to one
    /// flat file name.
    fn file_path(&self, key: &str) -> PathBuf {
        let name: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.base_path.join(format!("{name}.json"))
    }
}

impl KeyValueEffects for FilesystemStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("Failed to read {key}: {e}"))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::WriteFailed("Key cannot be empty".to_string()));
        }
        fs::create_dir_all(&self.base_path).map_err(|e| {
            StorageError::Unavailable(format!(
                "Failed to create {}: {e}",
                self.base_path.display()
            ))
        })?;
        fs::write(self.file_path(key), value)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write {key}: {e}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove {key}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path().join("local"));

        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));

        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn keys_with_separators_stay_flat() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());

        store.set_item("../escape/attempt", "x").unwrap();
        store.set_item("product:Firefox", "y").unwrap();

        assert_eq!(store.get_item("../escape/attempt").unwrap().as_deref(), Some("x"));
        assert!(!dir.path().parent().unwrap().join("escape").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn empty_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        assert!(matches!(store.set_item("", "x"), Err(StorageError::WriteFailed(_))));
    }

    #[test]
    fn session_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        FilesystemStore::new(&path).set_item("left", "over").unwrap();

        let session = FilesystemStore::session(&path).unwrap();
        assert_eq!(session.get_item("left").unwrap(), None);
    }
}
