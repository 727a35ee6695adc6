//! `#[wasm_bindgen]` surface for page scripts

use crate::dom::{fire_event as dispatch, PageElement, PageSelect};
use crate::effects::{browser_client, BrowserApiEffects};
use crate::error::{bz_error_to_js, WasmError, WasmResult};
use crate::logging::init_logging;
use crate::storage::{browser_cache, WebStorage};
use crate::time::BrowserClock;
use bz_core::dom::{self, SelectOption};
use bz_core::effects::{HttpMethod, ProgressEvent, ProgressHooks, StorageScope};
use bz_core::{
    ApiClient, BugzillaConfig, BzError, EventOptions, FetchOptions, Params, RequestHandle,
    RequestInit, SearchWords, SortOptions, StorageCache, StringTable,
};
use js_sys::{Array, Promise, JSON};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlElement, HtmlSelectElement};

#[wasm_bindgen]
extern "C" {
    /// Success callback
    #[wasm_bindgen(typescript_type = "(data: any) => void")]
    pub type ResolveCallback;

    #[wasm_bindgen(method, structural, js_name = "call")]
    fn call1(this: &ResolveCallback, this_arg: &JsValue, data: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    /// Failure callback, receives `{name, message, code, detail}`
    #[wasm_bindgen(typescript_type = "(error: BzError) => void")]
    pub type RejectCallback;

    #[wasm_bindgen(method, structural, js_name = "call")]
    fn call1(this: &RejectCallback, this_arg: &JsValue, error: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    /// Progress callback
    #[wasm_bindgen(typescript_type = "(loaded: number, total?: number) => void")]
    pub type ProgressCallback;

    #[wasm_bindgen(method, structural, js_name = "call")]
    fn call2(this: &ProgressCallback, this_arg: &JsValue, loaded: f64, total: &JsValue);
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
}

fn to_js(value: &Value) -> WasmResult<JsValue> {
    Ok(JSON::parse(&serde_json::to_string(value)?)?)
}

fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> WasmResult<Option<T>> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let text: String = JSON::stringify(value)?.into();
    Ok(Some(serde_json::from_str(&text)?))
}

fn page_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

/// Utility layer bound to one page's globals.
#[wasm_bindgen]
pub struct Bugzilla {
    client: ApiClient<BrowserApiEffects>,
    strings: StringTable,
    cache: StorageCache<WebStorage, BrowserClock>,
}

#[wasm_bindgen]
impl Bugzilla {
    /// Build from the page globals (`{config: {basepath}, api_token, string}`).
    /// The origin defaults to the page's own.
    #[wasm_bindgen(constructor)]
    pub fn new(globals: JsValue) -> Result<Bugzilla, JsValue> {
        let mut globals: serde_json::Map<String, Value> =
            from_js(&globals)?.unwrap_or_default();
        if !globals.contains_key("origin") {
            if let Some(origin) = page_origin() {
                globals.insert("origin".to_string(), Value::String(origin));
            }
        }
        let config: BugzillaConfig = serde_json::from_value(Value::Object(globals))
            .map_err(WasmError::from)?;
        let api_config = config
            .api_config()
            .map_err(|err| WasmError::Config(err.to_string()))?;

        Ok(Bugzilla {
            client: browser_client(api_config),
            strings: config.string_table(),
            cache: browser_cache(),
        })
    }

    /// Call `endpoint`. Resolves to the response body, rejects with
    /// `{name, message, code, detail}`. `init` may carry `headers` and
    /// `timeoutMs`.
    pub fn fetch(
        &self,
        endpoint: &str,
        method: Option<String>,
        params: JsValue,
        init: JsValue,
    ) -> Result<Promise, JsValue> {
        let method = parse_method(method)?;
        let params: Params = from_js(&params)?.unwrap_or_default();
        let init: CallInit = from_js(&init)?.unwrap_or_default();
        let call = self.client.fetch(
            endpoint,
            FetchOptions {
                method,
                params,
                init: init.into(),
            },
        );
        Ok(wasm_bindgen_futures::future_to_promise(async move {
            match call.await {
                Ok(body) => Ok(to_js(&body)?),
                Err(error) => Err(bz_error_to_js(&error)),
            }
        }))
    }

    /// Call `endpoint`, reporting through callbacks and optional progress
    /// listeners. Returns a handle whose `abort()` cancels the call.
    #[wasm_bindgen(js_name = sendWithEvents)]
    pub fn send_with_events(
        &self,
        endpoint: &str,
        method: Option<String>,
        params: JsValue,
        resolve: ResolveCallback,
        reject: RejectCallback,
        on_upload: Option<ProgressCallback>,
        on_download: Option<ProgressCallback>,
    ) -> Result<ApiRequest, JsValue> {
        let method = parse_method(method)?;
        let params: Params = from_js(&params)?.unwrap_or_default();

        let mut progress = ProgressHooks::new();
        if let Some(listener) = on_upload {
            progress = progress.on_upload(move |event| report(&listener, event));
        }
        if let Some(listener) = on_download {
            progress = progress.on_download(move |event| report(&listener, event));
        }

        let request = self.client.send_with_events(
            endpoint,
            EventOptions {
                method,
                params,
                resolve: Some(Box::new(move |body: Value| match to_js(&body) {
                    Ok(data) => resolve.call1(&JsValue::NULL, &data),
                    Err(error) => tracing::error!(%error, "response body is not representable"),
                })),
                reject: Some(Box::new(move |error: BzError| {
                    reject.call1(&JsValue::NULL, &bz_error_to_js(&error));
                })),
                progress,
            },
        );
        let (handle, driver) = request.into_parts();
        wasm_bindgen_futures::spawn_local(driver);
        Ok(ApiRequest { handle })
    }

    /// Localized string for `key`, with the first `%s` replaced.
    pub fn l10n(&self, key: &str, replacer: Option<String>) -> Option<String> {
        self.strings.get(key, replacer.as_deref().unwrap_or(""))
    }

    /// Cached value for `key`, `undefined` on a miss.
    #[wasm_bindgen(js_name = cacheGet)]
    pub fn cache_get(&self, key: &str, session_only: Option<bool>) -> JsValue {
        let scope = StorageScope::from_session_only(session_only.unwrap_or(false));
        self.cache
            .get::<Value>(key, scope)
            .and_then(|value| to_js(&value).ok())
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Cache `data` for `life_ms` milliseconds (`0` or absent keeps it forever).
    #[wasm_bindgen(js_name = cacheSave)]
    pub fn cache_save(&self, key: &str, data: JsValue, life_ms: Option<f64>, session_only: Option<bool>) {
        let data: Value = match from_js(&data) {
            Ok(data) => data.unwrap_or(Value::Null),
            Err(error) => {
                tracing::debug!(key, %error, "cache value is not serializable");
                return;
            }
        };
        let scope = StorageScope::from_session_only(session_only.unwrap_or(false));
        self.cache.save(key, &data, life_ms.unwrap_or(0.0) as i64, scope);
    }
}

/// Per-call settings passed from page scripts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallInit {
    #[serde(default)]
    headers: serde_json::Map<String, Value>,
    #[serde(default)]
    timeout_ms: Option<u64>,
}

impl From<CallInit> for RequestInit {
    fn from(init: CallInit) -> Self {
        let mut request_init = init
            .headers
            .into_iter()
            .fold(RequestInit::default(), |request_init, (name, value)| {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                request_init.header(name, value)
            });
        request_init.timeout_ms = init.timeout_ms;
        request_init
    }
}

fn parse_method(method: Option<String>) -> WasmResult<HttpMethod> {
    match method {
        Some(method) => method
            .parse()
            .map_err(|err: BzError| WasmError::JavaScript(err.to_string())),
        None => Ok(HttpMethod::Get),
    }
}

fn report(listener: &ProgressCallback, event: ProgressEvent) {
    let total = event
        .total
        .map_or(JsValue::UNDEFINED, |total| JsValue::from_f64(total as f64));
    listener.call2(&JsValue::NULL, event.loaded as f64, &total);
}

/// An in-flight `sendWithEvents` call.
#[wasm_bindgen]
pub struct ApiRequest {
    handle: RequestHandle,
}

#[wasm_bindgen]
impl ApiRequest {
    /// Cancel the call; `reject` receives an `AbortError`.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Calls `f` with `words`, a query string or an array of phrases. Query
/// strings split the same way as in `bz_core::text`.
fn with_search_words<R>(words: &JsValue, f: impl FnOnce(SearchWords<'_>) -> R) -> R {
    match words.as_string() {
        Some(query) => f(SearchWords::from(query.as_str())),
        None => f(Array::from(words)
            .iter()
            .filter_map(|word| word.as_string())
            .collect::<Vec<_>>()
            .into()),
    }
}

/// Whether `words` (a query string or an array of phrases) occur in `string`.
#[wasm_bindgen]
pub fn find(
    string: &str,
    words: JsValue,
    find_all: Option<bool>,
    match_boundaries: Option<bool>,
    ignore_case: Option<bool>,
) -> bool {
    let defaults = bz_core::FindOptions::default();
    let options = bz_core::FindOptions {
        ignore_case: ignore_case.unwrap_or(defaults.ignore_case),
        find_all: find_all.unwrap_or(defaults.find_all),
        match_boundaries: match_boundaries.unwrap_or(defaults.match_boundaries),
    };
    with_search_words(&words, |words| bz_core::find(string, words, options))
}

/// Escaped `string` with every occurrence of `words` wrapped in `<strong>`.
#[wasm_bindgen]
pub fn highlight(string: &str, words: JsValue) -> String {
    with_search_words(&words, |words| {
        bz_core::highlight(string, words, bz_core::HighlightOptions::default())
    })
}

/// Human-readable age of something `seconds` old.
#[wasm_bindgen(js_name = timeAgo)]
pub fn time_ago(seconds: f64) -> String {
    bz_core::time_ago(seconds as i64)
}

/// Sorted copy of `records` on the field `key`.
#[wasm_bindgen(js_name = sortByKey)]
pub fn sort_by_key(records: JsValue, key: &str, descending: Option<bool>) -> Result<JsValue, JsValue> {
    let mut records: Vec<Value> = from_js(&records)?.unwrap_or_default();
    let options = SortOptions {
        descending: descending.unwrap_or(false),
    };
    bz_core::sort_by_key(&mut records, key, options);
    Ok(to_js(&Value::Array(records))?)
}

/// Page x coordinate of `element`.
#[wasm_bindgen(js_name = findPosX)]
pub fn find_pos_x(element: HtmlElement) -> i32 {
    dom::find_pos_x(&PageElement(element))
}

/// Page y coordinate of `element`.
#[wasm_bindgen(js_name = findPosY)]
pub fn find_pos_y(element: HtmlElement) -> i32 {
    dom::find_pos_y(&PageElement(element))
}

/// Height including scrolled-out content.
#[wasm_bindgen(js_name = fullHeight)]
pub fn full_height(element: HtmlElement) -> i32 {
    dom::full_height(&PageElement(element))
}

/// Width including scrolled-out content.
#[wasm_bindgen(js_name = fullWidth)]
pub fn full_width(element: HtmlElement) -> i32 {
    dom::full_width(&PageElement(element))
}

/// Position `item` directly below `parent`.
#[wasm_bindgen(js_name = overlayBelow)]
pub fn overlay_below(item: HtmlElement, parent: HtmlElement) -> Result<(), JsValue> {
    dom::overlay_below(&PageElement(item), &PageElement(parent)).map_err(WasmError::from)?;
    Ok(())
}

/// Toggle `name` on `element`; returns whether it is now present.
#[wasm_bindgen(js_name = toggleClass)]
pub fn toggle_class(element: Element, name: &str) -> Result<bool, JsValue> {
    let element: HtmlElement = element.dyn_into()?;
    Ok(dom::toggle_class(&PageElement(element), name).map_err(WasmError::from)?)
}

/// Dispatch a bubbling, cancelable event; returns whether it was cancelled.
#[wasm_bindgen(js_name = fireEvent)]
pub fn fire_event(target: EventTarget, name: &str) -> Result<bool, JsValue> {
    Ok(dispatch(&target, name).map_err(WasmError::from)?)
}

/// Replace the options of `select` with `[[value, text], ...]`.
#[wasm_bindgen(js_name = populateSelect)]
pub fn populate_select(select: HtmlSelectElement, pairs: JsValue) -> Result<(), JsValue> {
    let pairs: Vec<(String, String)> = from_js(&pairs)?.unwrap_or_default();
    dom::populate_from_pairs(&PageSelect(select), &pairs).map_err(WasmError::from)?;
    Ok(())
}

/// Values of the selected options.
#[wasm_bindgen(js_name = selectedValues)]
pub fn selected_values(select: HtmlSelectElement) -> Vec<String> {
    dom::selected_options(&PageSelect(select))
        .iter()
        .map(SelectOption::value)
        .collect()
}

/// Whether an option with exactly `value` is selected.
#[wasm_bindgen(js_name = valueSelected)]
pub fn value_selected(select: HtmlSelectElement, value: &str) -> bool {
    dom::value_selected(&PageSelect(select), value)
}

/// Values of the options marked `selected` in markup.
#[wasm_bindgen(js_name = preselectedValues)]
pub fn preselected_values(select: HtmlSelectElement) -> Vec<String> {
    dom::preselected_options(&PageSelect(select))
        .iter()
        .map(SelectOption::value)
        .collect()
}

/// Index of the first option with exactly `value`, `undefined` if none.
#[wasm_bindgen(js_name = optionIndex)]
pub fn option_index(select: HtmlSelectElement, value: &str) -> Option<u32> {
    dom::option_index(&PageSelect(select), value).and_then(|index| u32::try_from(index).ok())
}

/// Remove every option of `select`.
#[wasm_bindgen(js_name = clearOptions)]
pub fn clear_options(select: HtmlSelectElement) -> Result<(), JsValue> {
    dom::clear_options(&PageSelect(select)).map_err(WasmError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_init_carries_headers_and_timeout() {
        let init: CallInit =
            serde_json::from_str(r#"{"headers":{"X-Requested-With":"XMLHttpRequest","X-Retry":2},"timeoutMs":500}"#)
                .unwrap();
        let init = RequestInit::from(init);
        assert_eq!(
            init.headers,
            vec![
                ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
                ("X-Retry".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(init.timeout_ms, Some(500));
    }

    #[test]
    fn empty_call_init_is_the_default() {
        let init: CallInit = serde_json::from_str("{}").unwrap();
        assert_eq!(RequestInit::from(init), RequestInit::default());
    }
}
