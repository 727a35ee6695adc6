//! Bugzilla Core - browser utility layer
//!
//! Pure types, effect interfaces and helpers shared by the Bugzilla web UI.
//! Nothing in this crate touches the network, storage or the DOM directly;
//! those are reached through effect traits whose handlers live in
//! `bz-effects` (native), `bz-wasm` (browser) and `bz-testkit` (tests).
//!
//! # Layout
//!
//! ## REST client
//! - [`ApiClient`]: `get`/`post`/`put`/`patch`/`delete`, `fetch`, and
//!   `send_with_events` for progress-reporting uploads
//! - [`BzError`]: the single error shape every failure is reduced to
//! - [`request`]: URL, query and body construction
//!
//! ## Effect interfaces
//! - `TransportEffects`, `TimerEffects`, `ClockEffects`,
//!   `NetworkStatusEffects`, `KeyValueEffects`
//! - `ApiEffects`: everything the client needs
//!
//! ## Helpers
//! - [`storage`]: JSON cache with expiry over key/value storage
//! - [`l10n`]: localized string lookup
//! - [`array`], [`text`]: sorting, membership, search and highlight
//! - [`dom`]: geometry, `<select>` and class-list helpers over DOM traits

#![forbid(unsafe_code)]

/// REST API client
pub mod api;

/// Record sorting and membership tests
pub mod array;

/// Site configuration
pub mod config;

/// DOM helper traits and functions
pub mod dom;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error type
pub mod errors;

/// Localized strings
pub mod l10n;

/// Request construction
pub mod request;

/// Cache over key/value storage
pub mod storage;

/// Search, highlight and relative time
pub mod text;

// === Public API Re-exports ===

pub use api::{
    interpret_response, ApiClient, EventOptions, EventedRequest, FetchOptions, PendingRequest,
    RequestHandle, RequestInit,
};
pub use array::{contains_value, contains_value_ignore_case, sort_by_key, SortOptions};
pub use config::{ApiConfig, BugzillaConfig, ConfigError, SiteConfig};
pub use dom::DomError;
pub use effects::{
    ApiEffects, ClockEffects, HttpMethod, HttpResponse, KeyValueEffects, NetworkStatusEffects,
    ProgressEvent, ProgressHooks, ProgressPhase, RequestDescriptor, StorageError, StorageScope,
    TimerEffects, TransportEffects, TransportError,
};
pub use errors::{BzError, BzErrorBuilder, BzResult, ErrorKind};
pub use l10n::StringTable;
pub use request::Params;
pub use storage::{CacheEntry, StorageCache};
pub use text::{find, highlight, html_escape, time_ago, FindOptions, HighlightOptions, SearchWords};
