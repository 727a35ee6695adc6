//! Bugzilla Testing Infrastructure
//!
//! Deterministic effect handlers and fixtures for exercising `bz-core`
//! without a browser or a network.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! bz-testkit = { path = "../bz-testkit" }
//! ```
//!
//! ```rust,no_run
//! use bz_testkit::*;
//!
//! let transport = MockTransport::new().respond(200, r#"{"bugs":[]}"#);
//! let client = test_client(MockApiEffects::new(transport.clone()));
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod dom;
pub mod effects;
pub mod network;
pub mod storage;
pub mod strategies;
pub mod time;
pub mod transport;

pub use dom::{MockElement, MockOption, MockSelect};
pub use effects::MockApiEffects;
pub use network::ToggleNetwork;
pub use storage::MemoryStore;
pub use time::{ManualClock, MockTimer};
pub use transport::{MockOutcome, MockTransport};

use bz_core::{ApiClient, ApiConfig};
use url::Url;

/// Origin used by test configurations.
pub const TEST_ORIGIN: &str = "https://bugzilla.test";

/// Client configuration pointing at [`TEST_ORIGIN`] with the default base path.
pub fn test_api_config() -> ApiConfig {
    ApiConfig::new(Url::parse(TEST_ORIGIN).expect("test origin is a valid URL"))
}

/// Client over `effects` using [`test_api_config`].
pub fn test_client(effects: MockApiEffects) -> ApiClient<MockApiEffects> {
    ApiClient::new(test_api_config(), effects)
}

/// Install a test-writer tracing subscriber. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bugzilla=debug,bz_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
