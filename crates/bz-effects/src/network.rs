//! Fixed connectivity for native hosts

use bz_core::effects::NetworkStatusEffects;

/// Native hosts have no `navigator.onLine`; status is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticNetworkStatus {
    online: bool,
}

impl StaticNetworkStatus {
    /// Always online.
    pub fn online() -> Self {
        Self { online: true }
    }

    /// Always offline, e.g. for `--offline` tooling modes.
    pub fn offline() -> Self {
        Self { online: false }
    }
}

impl Default for StaticNetworkStatus {
    fn default() -> Self {
        Self::online()
    }
}

impl NetworkStatusEffects for StaticNetworkStatus {
    fn is_online(&self) -> bool {
        self.online
    }
}
