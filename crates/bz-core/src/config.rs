//! Page configuration for the web utility layer
//!
//! The server renders a JSON blob of page globals into every page:
//! `{ "config": { "basepath": "/" }, "api_token": "...", "string": { ... } }`.
//! [`BugzillaConfig`] deserializes that blob and hands explicit pieces of it
//! to the API client ([`ApiConfig`]) and localization lookup
//! ([`StringTable`](crate::l10n::StringTable)).

use crate::l10n::StringTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Origin used when the page did not provide one (native tools and tests).
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "BZ_";

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration source failed
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration was not valid JSON for this shape
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value that cannot be used
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Site-level settings nested under `config` in the page globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Installation base path, e.g. `/` or `/bugzilla/`
    #[serde(default = "default_basepath")]
    pub basepath: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            basepath: default_basepath(),
        }
    }
}

fn default_basepath() -> String {
    "/".to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Page globals consumed by the utility layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugzillaConfig {
    /// Site settings
    #[serde(default)]
    pub config: SiteConfig,

    /// Session access token appended to every REST call
    #[serde(default)]
    pub api_token: Option<String>,

    /// Localized strings keyed by identifier
    #[serde(default, rename = "string")]
    pub strings: HashMap<String, String>,

    /// Page origin the base path is resolved against
    #[serde(default = "default_origin")]
    pub origin: String,

    /// REST call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for BugzillaConfig {
    fn default() -> Self {
        Self {
            config: SiteConfig::default(),
            api_token: None,
            strings: HashMap::new(),
            origin: default_origin(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BugzillaConfig {
    /// Parse the page globals from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the page globals from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Apply `BZ_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `BZ_*` overrides from an explicit variable list.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "BASEPATH" => self.config.basepath = value,
                "API_TOKEN" => {
                    self.api_token = Some(value).filter(|token| !token.is_empty());
                }
                "ORIGIN" => self.origin = value,
                "TIMEOUT_MS" => {
                    self.timeout_ms = value.parse().map_err(|e| {
                        ConfigError::invalid("timeout_ms", format!("{value:?}: {e}"))
                    })?;
                }
                _ => {}
            }
        }
        self.validate()
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let basepath = &self.config.basepath;
        if !basepath.starts_with('/') || !basepath.ends_with('/') {
            return Err(ConfigError::invalid(
                "config.basepath",
                format!("{basepath:?} must start and end with '/'"),
            ));
        }
        let origin = Url::parse(&self.origin)
            .map_err(|e| ConfigError::invalid("origin", format!("{:?}: {e}", self.origin)))?;
        if origin.cannot_be_a_base() {
            return Err(ConfigError::invalid("origin", "must be an absolute URL"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("timeout_ms", "must be greater than 0"));
        }
        Ok(())
    }

    /// Settings for the REST API client.
    pub fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        self.validate()?;
        let origin = Url::parse(&self.origin)
            .map_err(|e| ConfigError::invalid("origin", e.to_string()))?;
        Ok(ApiConfig {
            origin,
            basepath: self.config.basepath.clone(),
            api_token: self.api_token.clone().filter(|t| !t.is_empty()),
            timeout_ms: self.timeout_ms,
        })
    }

    /// Localized string table.
    pub fn string_table(&self) -> StringTable {
        StringTable::new(self.strings.clone())
    }
}

/// Explicit configuration for [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Page origin
    pub origin: Url,
    /// Installation base path, always `/`-terminated
    pub basepath: String,
    /// Access token appended to every request
    pub api_token: Option<String>,
    /// Timeout for each call
    pub timeout_ms: u64,
}

impl ApiConfig {
    /// Config for `origin` with defaults for everything else.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            basepath: default_basepath(),
            api_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the installation base path.
    pub fn with_basepath(mut self, basepath: impl Into<String>) -> Self {
        self.basepath = basepath.into();
        self
    }

    /// Set the access token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
