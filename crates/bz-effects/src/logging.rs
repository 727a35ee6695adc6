//! Tracing setup for native hosts

use tracing_subscriber::EnvFilter;

/// Directive used when neither `BZ_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatted subscriber filtered by `BZ_LOG`, then `RUST_LOG`,
/// then `default_filter`. Does nothing if a subscriber is already set.
pub fn init_tracing(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_env("BZ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
