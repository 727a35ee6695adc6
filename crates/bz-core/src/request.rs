//! REST request construction
//!
//! Turns `(endpoint, method, params)` into a [`RequestDescriptor`]:
//!
//! - the URL is `<origin><basepath>rest/<endpoint>`
//! - GET params are serialized into the query string
//! - write params are serialized as a JSON body
//! - the session token, when configured, is set on every query string

use crate::config::ApiConfig;
use crate::effects::{HttpMethod, RequestDescriptor};
use crate::errors::{BzError, BzResult, ErrorKind};
use serde_json::{Map, Value};
use url::Url;

/// Request parameters: field name to scalar or sequence value.
pub type Params = Map<String, Value>;

/// Sequence params the REST API accepts comma-joined.
pub const COMMA_JOINED_PARAMS: &[&str] = &["include_fields", "exclude_fields"];

/// Query parameter carrying the session token.
pub const TOKEN_PARAM: &str = "Bugzilla_api_token";

/// Build the request for `endpoint`.
///
/// `extra_headers` are appended after the defaults.
pub fn build_request(
    config: &ApiConfig,
    endpoint: &str,
    method: HttpMethod,
    params: &Params,
    extra_headers: &[(String, String)],
) -> BzResult<RequestDescriptor> {
    let mut url = endpoint_url(config, endpoint)?;
    let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    if method.is_read() {
        for (key, value) in params {
            match value {
                Value::Array(items) if COMMA_JOINED_PARAMS.contains(&key.as_str()) => {
                    let joined = items.iter().map(param_text).collect::<Vec<_>>().join(",");
                    set_pair(&mut query, key, joined);
                }
                // The REST API rejects comma-joined lists for most params, so
                // each element goes out as its own `key=value` pair.
                Value::Array(items) => {
                    query.extend(items.iter().map(|item| (key.clone(), param_text(item))));
                }
                scalar => set_pair(&mut query, key, param_text(scalar)),
            }
        }
    }

    if let Some(token) = config.api_token.as_deref() {
        set_pair(&mut query, TOKEN_PARAM, token.to_string());
    }

    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(query);
    }

    let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
    let body = if method.is_read() {
        None
    } else {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        Some(serde_json::to_string(params).map_err(|e| {
            BzError::builder(ErrorKind::Generic("TypeError".into()))
                .detail(e.to_string())
                .build()
        })?)
    };
    headers.extend(extra_headers.iter().cloned());

    Ok(RequestDescriptor::new(url, method, headers, body))
}

/// Resolve `<basepath>rest/<endpoint>` against the configured origin.
pub fn endpoint_url(config: &ApiConfig, endpoint: &str) -> BzResult<Url> {
    let path = format!("{}rest/{}", config.basepath, endpoint);
    config.origin.join(&path).map_err(|e| {
        BzError::builder(ErrorKind::Generic("TypeError".into()))
            .message(format!("Invalid endpoint: {endpoint}"))
            .detail(e.to_string())
            .build()
    })
}

/// The URL with the session token masked, for logging.
pub fn redacted_url(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == TOKEN_PARAM) {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == TOKEN_PARAM {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

/// Text form of a param value as it appears in a query string.
fn param_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `URLSearchParams.set` semantics: replace the first pair named `key` in
/// place, drop any later duplicates, or append when absent.
fn set_pair(query: &mut Vec<(String, String)>, key: &str, value: String) {
    match query.iter().position(|(name, _)| name == key) {
        Some(first) => {
            query[first].1 = value;
            let mut index = 0;
            query.retain(|(name, _)| {
                let keep = index <= first || name != key;
                index += 1;
                keep
            });
        }
        None => query.push((key.to_string(), value)),
    }
}
