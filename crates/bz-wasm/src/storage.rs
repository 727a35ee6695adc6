//! `localStorage` / `sessionStorage` handler

use crate::error::describe;
use crate::time::BrowserClock;
use bz_core::effects::{KeyValueEffects, StorageError, StorageScope};
use bz_core::StorageCache;
use wasm_bindgen::JsValue;

/// One of the window's Web Storage areas, or a stand-in for one the
/// browser refused to open.
#[derive(Debug, Clone)]
pub struct WebStorage {
    storage: Option<web_sys::Storage>,
    scope: StorageScope,
}

impl WebStorage {
    /// Wrap an existing storage area.
    pub fn new(storage: web_sys::Storage, scope: StorageScope) -> Self {
        Self {
            storage: Some(storage),
            scope,
        }
    }

    /// Store whose every operation fails with `StorageError::Unavailable`.
    pub fn unavailable(scope: StorageScope) -> Self {
        Self {
            storage: None,
            scope,
        }
    }

    /// Whether a real storage area backs this store.
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn area(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable(format!("{:?} storage is disabled", self.scope)))
    }

    /// `window.localStorage`
    pub fn local() -> Result<Self, StorageError> {
        Self::open(StorageScope::Durable)
    }

    /// `window.sessionStorage`
    pub fn session() -> Result<Self, StorageError> {
        Self::open(StorageScope::Session)
    }

    /// Storage area backing `scope`.
    pub fn open(scope: StorageScope) -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        // Access throws when storage is disabled, e.g. for opaque origins.
        let storage = match scope {
            StorageScope::Durable => window.local_storage(),
            StorageScope::Session => window.session_storage(),
        }
        .map_err(|err| StorageError::Unavailable(describe(&err)))?
        .ok_or_else(|| StorageError::Unavailable(format!("{scope:?} storage is missing")))?;
        Ok(Self::new(storage, scope))
    }

    /// Storage area backing `scope`, or an unavailable stand-in.
    pub fn open_or_unavailable(scope: StorageScope) -> Self {
        Self::open(scope).unwrap_or_else(|error| {
            tracing::warn!(?scope, %error, "browser storage unavailable");
            Self::unavailable(scope)
        })
    }
}

fn is_quota_error(err: &JsValue) -> bool {
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "QuotaExceededError")
}

impl KeyValueEffects for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area()?
            .get_item(key)
            .map_err(|err| StorageError::ReadFailed(describe(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area()?.set_item(key, value).map_err(|err| {
            if is_quota_error(&err) {
                StorageError::QuotaExceeded(describe(&err))
            } else {
                StorageError::WriteFailed(describe(&err))
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.area()?
            .remove_item(key)
            .map_err(|err| StorageError::DeleteFailed(describe(&err)))
    }
}

/// Cache over the window's session and local storage.
///
/// Each area opens on its own, so a disabled `sessionStorage` still leaves
/// the durable scope working.
pub fn browser_cache() -> StorageCache<WebStorage, BrowserClock> {
    StorageCache::new(
        WebStorage::open_or_unavailable(StorageScope::Session),
        WebStorage::open_or_unavailable(StorageScope::Durable),
        BrowserClock,
    )
}
