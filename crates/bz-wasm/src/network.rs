//! `navigator.onLine` handler

use bz_core::effects::NetworkStatusEffects;

/// Connectivity as reported by the browser.
///
/// Without a window (workers without `navigator`, tests under Node) the host
/// is assumed online and the request itself reports any failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorStatus;

impl NetworkStatusEffects for NavigatorStatus {
    fn is_online(&self) -> bool {
        web_sys::window().map_or(true, |window| window.navigator().on_line())
    }
}
