//! Page configuration loading

use assert_matches::assert_matches;
use bz_core::{BugzillaConfig, ConfigError};
use std::io::Write;

const PAGE_GLOBALS: &str = r#"{
    "config": { "basepath": "/bugzilla/" },
    "api_token": "abc123",
    "string": { "bug_count": "%s bugs found" }
}"#;

#[test]
fn loads_page_globals_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PAGE_GLOBALS.as_bytes()).unwrap();

    let config = BugzillaConfig::load_from_file(file.path()).unwrap();
    let api = config.api_config().unwrap();

    assert_eq!(api.basepath, "/bugzilla/");
    assert_eq!(api.api_token.as_deref(), Some("abc123"));
    assert_eq!(api.timeout_ms, 30_000);
    assert_eq!(api.origin.as_str(), "http://localhost/");
    assert_eq!(
        config.string_table().get("bug_count", "3").as_deref(),
        Some("3 bugs found")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BugzillaConfig::load_from_file(&dir.path().join("nope.json")).unwrap_err();
    assert_matches!(err, ConfigError::Io(_));
}

#[test]
fn env_overrides_apply_and_validate() {
    let mut config = BugzillaConfig::from_json(PAGE_GLOBALS).unwrap();
    config
        .merge_with_vars([
            ("BZ_ORIGIN".to_string(), "https://bugzilla.mozilla.org".to_string()),
            ("BZ_TIMEOUT_MS".to_string(), "5000".to_string()),
            ("BZ_API_TOKEN".to_string(), String::new()),
            ("HOME".to_string(), "/root".to_string()),
        ])
        .unwrap();

    let api = config.api_config().unwrap();
    assert_eq!(api.origin.as_str(), "https://bugzilla.mozilla.org/");
    assert_eq!(api.timeout_ms, 5000);
    assert_eq!(api.api_token, None);

    let err = config
        .merge_with_vars([("BZ_BASEPATH".to_string(), "bugzilla".to_string())])
        .unwrap_err();
    assert_matches!(err, ConfigError::Invalid { ref field, .. } if field == "config.basepath");
}
