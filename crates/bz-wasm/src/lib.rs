//! Bugzilla WASM - browser bindings
//!
//! Browser implementations of the `bz-core` effect and DOM traits, plus the
//! `#[wasm_bindgen]` surface page scripts call.
//!
//! - [`transport::FetchTransport`]: `fetch` via `gloo-net`, or
//!   `XMLHttpRequest` when progress listeners are attached
//! - [`storage::WebStorage`]: `localStorage` / `sessionStorage`
//! - [`network::NavigatorStatus`]: `navigator.onLine`
//! - [`time`]: `Date.now()` and `setTimeout` timers
//! - [`dom`]: wrappers implementing the DOM helper traits, and `fire_event`

#![forbid(unsafe_code)]

pub mod bindings;
pub mod dom;
pub mod effects;
pub mod error;
pub mod logging;
pub mod network;
pub mod storage;
pub mod time;
pub mod transport;

pub use dom::{fire_event, PageElement, PageOption, PageSelect};
pub use effects::{browser_client, BrowserApiEffects};
pub use error::{bz_error_to_js, WasmError, WasmResult};
pub use logging::init_logging;
pub use network::NavigatorStatus;
pub use storage::{browser_cache, WebStorage};
pub use time::{BrowserClock, GlooTimer};
pub use transport::FetchTransport;
