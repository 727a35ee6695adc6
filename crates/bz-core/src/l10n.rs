//! Localized string lookup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder replaced by [`StringTable::get`].
pub const PLACEHOLDER: &str = "%s";

/// Localized strings keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    strings: HashMap<String, String>,
}

impl StringTable {
    /// Table over `strings`.
    pub fn new(strings: HashMap<String, String>) -> Self {
        Self { strings }
    }

    /// String for `key` with the first `%s` replaced by `replacer`.
    pub fn get(&self, key: &str, replacer: &str) -> Option<String> {
        match self.strings.get(key) {
            Some(template) => Some(template.replacen(PLACEHOLDER, replacer, 1)),
            None => {
                tracing::warn!(key, "missing localized string");
                None
            }
        }
    }

    /// String for `key` with the placeholder removed.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key, "")
    }

    /// Add or replace a string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl FromIterator<(String, String)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StringTable {
        [
            ("comment_added", "Comment %s added"),
            ("twice", "%s and %s"),
            ("plain", "Nothing to replace"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn replaces_placeholder() {
        assert_eq!(table().get("comment_added", "#3").as_deref(), Some("Comment #3 added"));
    }

    #[test]
    fn replaces_first_placeholder_only() {
        assert_eq!(table().get("twice", "a").as_deref(), Some("a and %s"));
    }

    #[test]
    fn default_replacer_is_empty() {
        assert_eq!(table().text("comment_added").as_deref(), Some("Comment  added"));
        assert_eq!(table().text("plain").as_deref(), Some("Nothing to replace"));
    }

    #[test]
    fn missing_key_is_none() {
        assert!(table().get("nope", "x").is_none());
    }
}
