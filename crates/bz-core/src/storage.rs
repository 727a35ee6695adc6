//! Best-effort JSON cache over browser key/value storage
//!
//! Entries are stored as `{"data": ..., "expires": <ms>}` where `expires` is
//! an absolute timestamp or `0` for "never". Expiry is lazy: a reader that
//! finds an expired entry deletes it. Caching is advisory, so every storage
//! or serialization failure degrades to a miss instead of an error.

use crate::effects::{ClockEffects, KeyValueEffects, StorageScope};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored form of a cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Cached payload
    pub data: T,
    /// Absolute expiry in epoch milliseconds, `0` for unlimited
    #[serde(default)]
    pub expires: i64,
}

impl<T> CacheEntry<T> {
    /// Entry for `data` saved at `now_ms` with a lifetime of `life_ms`.
    ///
    /// A lifetime of `0` never expires; negative lifetimes are already stale.
    pub fn new(data: T, now_ms: i64, life_ms: i64) -> Self {
        let expires = if life_ms == 0 {
            0
        } else {
            now_ms.saturating_add(life_ms)
        };
        Self { data, expires }
    }

    /// Whether a reader at `now_ms` may see this entry.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires == 0 || now_ms < self.expires
    }
}

/// Cache over a session-scoped and a durable store.
#[derive(Debug, Clone)]
pub struct StorageCache<S, C> {
    session: S,
    durable: S,
    clock: C,
}

impl<S: KeyValueEffects, C: ClockEffects> StorageCache<S, C> {
    /// Cache over the given stores.
    pub fn new(session: S, durable: S, clock: C) -> Self {
        Self {
            session,
            durable,
            clock,
        }
    }

    /// Store backing `scope`.
    pub fn store(&self, scope: StorageScope) -> &S {
        match scope {
            StorageScope::Session => &self.session,
            StorageScope::Durable => &self.durable,
        }
    }

    /// Cached value for `key`, if present, fresh and decodable as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, scope: StorageScope) -> Option<T> {
        let store = self.store(scope);
        let raw = match store.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(error) => {
                tracing::debug!(key, %error, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(error) => {
                tracing::debug!(key, %error, "cache entry is not valid JSON");
                return None;
            }
        };

        if entry.is_fresh(self.clock.now_ms()) {
            return serde_json::from_value(entry.data)
                .map_err(|error| tracing::debug!(key, %error, "cache entry has unexpected shape"))
                .ok();
        }

        tracing::trace!(key, expires = entry.expires, "removing expired cache entry");
        if let Err(error) = store.remove_item(key) {
            tracing::debug!(key, %error, "failed to remove expired cache entry");
        }
        None
    }

    /// Cache `data` under `key` for `life_ms` milliseconds (`0` = unlimited).
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T, life_ms: i64, scope: StorageScope) {
        let entry = CacheEntry::new(data, self.clock.now_ms(), life_ms);
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::debug!(key, %error, "cache value is not serializable");
                return;
            }
        };
        if let Err(error) = self.store(scope).set_item(key, &serialized) {
            tracing::debug!(key, %error, "cache write failed");
        }
    }

    /// Drop `key` from the cache.
    pub fn remove(&self, key: &str, scope: StorageScope) {
        if let Err(error) = self.store(scope).remove_item(key) {
            tracing::debug!(key, %error, "cache delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_life_never_expires() {
        let entry = CacheEntry::new((), 1_000, 0);
        assert_eq!(entry.expires, 0);
        assert!(entry.is_fresh(i64::MAX));
    }

    #[test]
    fn fresh_only_before_expiry() {
        let entry = CacheEntry::new((), 1_000, 500);
        assert!(entry.is_fresh(1_499));
        assert!(!entry.is_fresh(1_500));
    }

    #[test]
    fn negative_life_is_already_stale() {
        let entry = CacheEntry::new((), 1_000, -1);
        assert!(!entry.is_fresh(1_000));
    }

    #[test]
    fn missing_expires_means_unlimited() {
        let entry: CacheEntry<Value> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert!(entry.is_fresh(42));
    }
}
