//! In-memory key/value store with failure injection

use bz_core::effects::{KeyValueEffects, StorageError};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Memory store for testing.
///
/// Reads and writes can be made to fail, and a byte quota can be set to
/// mimic a full `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<BTreeMap<String, String>>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
    quota_bytes: Rc<Cell<Option<usize>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.insert_raw(key, value);
        }
        store
    }

    /// Stored text for `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    /// Store text directly, bypassing failure injection and quota.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.borrow_mut().insert(key.into(), value.into());
    }

    /// Stored keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.data.borrow().keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make writes and deletes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Limit total stored bytes (keys plus values).
    pub fn set_quota(&self, quota_bytes: Option<usize>) {
        self.quota_bytes.set(quota_bytes);
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.data
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueEffects for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            tracing::debug!(key, "injecting read failure");
            return Err(StorageError::ReadFailed(format!("injected failure reading {key}")));
        }
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            tracing::debug!(key, "injecting write failure");
            return Err(StorageError::WriteFailed(format!("injected failure writing {key}")));
        }
        if let Some(quota) = self.quota_bytes.get() {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                tracing::debug!(key, needed, quota, "memory store over quota");
                return Err(StorageError::QuotaExceeded(format!(
                    "{needed} bytes exceeds quota of {quota}"
                )));
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            tracing::debug!(key, "injecting delete failure");
            return Err(StorageError::DeleteFailed(format!("injected failure removing {key}")));
        }
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn injected_failures_are_traced() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let store = MemoryStore::new();
        store.set_quota(Some(4));
        tracing::subscriber::with_default(subscriber, || {
            assert!(matches!(
                store.set_item("key", "value"),
                Err(StorageError::QuotaExceeded(_))
            ));
            store.fail_writes(true);
            assert!(store.remove_item("key").is_err());
        });

        let log = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
        assert!(log.contains("memory store over quota"), "{log}");
        assert!(log.contains("injecting delete failure"), "{log}");
    }
}
