//! Switchable connectivity

use bz_core::effects::NetworkStatusEffects;
use std::cell::Cell;
use std::rc::Rc;

/// Network status that tests can flip.
#[derive(Debug, Clone)]
pub struct ToggleNetwork {
    online: Rc<Cell<bool>>,
}

impl ToggleNetwork {
    /// Starts online.
    pub fn online() -> Self {
        Self {
            online: Rc::new(Cell::new(true)),
        }
    }

    /// Starts offline.
    pub fn offline() -> Self {
        Self {
            online: Rc::new(Cell::new(false)),
        }
    }

    /// Change the reported status.
    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }
}

impl Default for ToggleNetwork {
    fn default() -> Self {
        Self::online()
    }
}

impl NetworkStatusEffects for ToggleNetwork {
    fn is_online(&self) -> bool {
        self.online.get()
    }
}
