//! Effect trait definitions
//!
//! Pure trait definitions for every side effect the utility layer performs.
//! This module defines **what** effects exist; handlers define **how**.
//!
//! # Effect Classification
//!
//! - **Transport**: send a [`RequestDescriptor`] and return the raw response
//! - **Time**: wall-clock reads for cache expiry, timers for request timeouts
//! - **Network status**: whether the host believes it is online
//! - **Storage**: session-scoped and durable key/value stores
//!
//! Production handlers live in `bz-effects` (native) and `bz-wasm` (browser).
//! Deterministic handlers for tests live in `bz-testkit`.
//!
//! All traits are single-threaded (`?Send`), matching the browser event loop.

pub mod network;
pub mod storage;
pub mod supertraits;
pub mod time;
pub mod transport;

pub use network::NetworkStatusEffects;
pub use storage::{KeyValueEffects, StorageError, StorageScope};
pub use supertraits::ApiEffects;
pub use time::{ClockEffects, TimerEffects};
pub use transport::{
    HttpMethod, HttpResponse, ProgressEvent, ProgressHooks, ProgressListener, ProgressPhase,
    RequestDescriptor, TransportEffects, TransportError,
};
