//! Key/value storage effect interface
//!
//! Models the browser's `sessionStorage` / `localStorage`: string keys,
//! string values, synchronous access. Handlers report failures (quota
//! exceeded, storage disabled) as [`StorageError`]; callers such as the
//! storage cache decide whether those failures matter.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Storage operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// The store is disabled or does not exist in this host
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write because it is full
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Reading a value failed
    #[error("Storage read failed: {0}")]
    ReadFailed(String),

    /// Writing a value failed
    #[error("Storage write failed: {0}")]
    WriteFailed(String),

    /// Removing a value failed
    #[error("Storage delete failed: {0}")]
    DeleteFailed(String),
}

/// Which store a value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StorageScope {
    /// Durable across sessions (`localStorage`)
    #[default]
    Durable,
    /// Cleared when the browsing session ends (`sessionStorage`)
    Session,
}

impl StorageScope {
    /// Scope for the `session_only` flag used by page scripts.
    pub fn from_session_only(session_only: bool) -> Self {
        if session_only {
            StorageScope::Session
        } else {
            StorageScope::Durable
        }
    }
}

/// Synchronous string key/value store.
pub trait KeyValueEffects {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueEffects + ?Sized> KeyValueEffects for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
