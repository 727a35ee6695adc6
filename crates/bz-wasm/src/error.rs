//! Error conversions between Rust and JavaScript

use bz_core::dom::DomError;
use bz_core::effects::{StorageError, TransportError};
use bz_core::BzError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Unified error type for the browser bindings
#[derive(Error, Debug)]
pub enum WasmError {
    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JavaScript interop error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// DOM helper error.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Browser storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Page configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<JsValue> for WasmError {
    fn from(js_val: JsValue) -> Self {
        WasmError::JavaScript(describe(&js_val))
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result type for browser binding operations
pub type WasmResult<T> = Result<T, WasmError>;

fn string_prop(value: &JsValue, name: &str) -> Option<String> {
    js_sys::Reflect::get(value, &JsValue::from_str(name))
        .ok()
        .and_then(|prop| prop.as_string())
}

/// Best-effort text for a thrown JavaScript value.
pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| string_prop(value, "message"))
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Transport error for a thrown `DOMException` or `TypeError`.
pub fn transport_error(value: &JsValue) -> TransportError {
    let name = string_prop(value, "name").unwrap_or_default();
    let message = describe(value);
    match name.as_str() {
        "AbortError" => TransportError::Aborted,
        "TimeoutError" => TransportError::TimedOut,
        // fetch rejects with TypeError when the network is unreachable
        "TypeError" | "NetworkError" | "" => TransportError::Network(message),
        _ => {
            let code = js_sys::Reflect::get(value, &JsValue::from_str("code"))
                .ok()
                .and_then(|code| code.as_f64())
                .map_or(0, |code| code as i64);
            TransportError::Failed {
                name,
                code,
                message,
            }
        }
    }
}

/// DOM error for a failed DOM call.
pub fn dom_error(operation: &'static str) -> impl Fn(JsValue) -> DomError {
    move |value| DomError::operation(operation, describe(&value))
}

/// `{name, message, code, detail}` object handed to page scripts.
pub fn bz_error_to_js(err: &BzError) -> JsValue {
    let object = js_sys::Object::new();
    let fields = [
        ("name", JsValue::from_str(err.name())),
        ("message", JsValue::from_str(err.message())),
        ("code", JsValue::from_f64(err.code() as f64)),
        (
            "detail",
            err.detail().map_or(JsValue::UNDEFINED, JsValue::from_str),
        ),
    ];
    for (key, value) in fields {
        // Setting a property on a fresh plain object cannot fail.
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), &value);
    }
    object.into()
}
