//! Network status effect interface

use std::rc::Rc;
use std::sync::Arc;

/// Connectivity as reported by the host (`navigator.onLine` in browsers).
pub trait NetworkStatusEffects {
    /// Whether the host currently believes it has a network connection.
    fn is_online(&self) -> bool;
}

impl<T: NetworkStatusEffects + ?Sized> NetworkStatusEffects for Rc<T> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

impl<T: NetworkStatusEffects + ?Sized> NetworkStatusEffects for Arc<T> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}
