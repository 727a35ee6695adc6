//! Bugzilla Effects - native handlers
//!
//! Production implementations of the `bz-core` effect traits for native
//! hosts: command-line tools, integration harnesses and anything else that
//! talks to a Bugzilla REST endpoint outside a browser.
//!
//! - [`ReqwestTransport`]: HTTP over `reqwest`, download progress by chunk
//! - [`TokioTimer`], [`SystemClock`]: time
//! - [`StaticNetworkStatus`]: connectivity fixed at construction
//! - [`FilesystemStore`]: key/value storage as one file per key
//!
//! Deterministic handlers for tests live in `bz-testkit`.

#![forbid(unsafe_code)]

pub mod effects;
pub mod logging;
pub mod network;
pub mod storage;
pub mod time;
pub mod transport;

pub use effects::{native_client, NativeApiEffects};
pub use logging::init_tracing;
pub use network::StaticNetworkStatus;
pub use storage::FilesystemStore;
pub use time::{SystemClock, TokioTimer};
pub use transport::ReqwestTransport;
