//! REST API client
//!
//! [`ApiClient`] sends calls to `<basepath>rest/<endpoint>` and reduces every
//! outcome to either the decoded JSON body or one [`BzError`].
//!
//! Both public call styles share one dispatch routine:
//!
//! - [`ApiClient::fetch`] (and the `get`/`post`/`put`/`patch`/`delete`
//!   shorthands) returns a [`PendingRequest`] future
//! - [`ApiClient::send_with_events`] reports through `resolve`/`reject`
//!   callbacks and upload/download progress listeners, for file uploads
//!
//! Each dispatch checks connectivity, then races the transport against the
//! configured timeout. The loser is dropped, which cancels it.

use crate::config::ApiConfig;
use crate::effects::{ApiEffects, HttpMethod, HttpResponse, ProgressHooks, RequestDescriptor};
use crate::errors::{BzError, BzResult, ErrorKind};
use crate::request::{build_request, redacted_url, Params};
use futures::future::{self, AbortHandle, AbortRegistration, Abortable, Either, LocalBoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Extra per-call settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInit {
    /// Headers appended after the defaults
    pub headers: Vec<(String, String)>,
    /// Overrides the configured timeout for this call
    pub timeout_ms: Option<u64>,
}

impl RequestInit {
    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the timeout.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Options for [`ApiClient::fetch`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// HTTP method, `GET` by default
    pub method: HttpMethod,
    /// Query params for GET, JSON body otherwise
    pub params: Params,
    /// Extra settings
    pub init: RequestInit,
}

/// Success callback for [`ApiClient::send_with_events`].
pub type ResolveCallback = Box<dyn FnOnce(Value)>;

/// Failure callback for [`ApiClient::send_with_events`].
pub type RejectCallback = Box<dyn FnOnce(BzError)>;

/// Options for [`ApiClient::send_with_events`].
#[derive(Default)]
pub struct EventOptions {
    /// HTTP method, `GET` by default
    pub method: HttpMethod,
    /// Query params for GET, JSON body otherwise
    pub params: Params,
    /// Called with the decoded body on success
    pub resolve: Option<ResolveCallback>,
    /// Called with the normalized error on any failure
    pub reject: Option<RejectCallback>,
    /// Upload and download progress listeners
    pub progress: ProgressHooks,
}

impl fmt::Debug for EventOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventOptions")
            .field("method", &self.method)
            .field("params", &self.params)
            .field("resolve", &self.resolve.is_some())
            .field("reject", &self.reject.is_some())
            .field("progress", &self.progress)
            .finish()
    }
}

/// Cancels an in-flight call.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    abort: AbortHandle,
}

impl RequestHandle {
    fn pair() -> (Self, AbortRegistration) {
        let (abort, registration) = AbortHandle::new_pair();
        (Self { abort }, registration)
    }

    /// Abort the call. It rejects with `AbortError` unless already settled.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Whether [`abort`](Self::abort) has been called.
    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// A call in progress. Resolves to the response body or the normalized error.
#[must_use = "requests do nothing unless awaited"]
pub struct PendingRequest {
    handle: RequestHandle,
    future: LocalBoxFuture<'static, BzResult<Value>>,
}

impl PendingRequest {
    /// Handle that can abort this call.
    pub fn handle(&self) -> RequestHandle {
        self.handle.clone()
    }
}

impl Future for PendingRequest {
    type Output = BzResult<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// A callback-style call. The host must spawn `driver` for anything to happen.
#[must_use = "the driver future must be spawned"]
pub struct EventedRequest {
    /// Handle that can abort this call
    pub handle: RequestHandle,
    /// Future that performs the call and invokes the callbacks
    pub driver: LocalBoxFuture<'static, ()>,
}

impl EventedRequest {
    /// Split into the handle and the driver future.
    pub fn into_parts(self) -> (RequestHandle, LocalBoxFuture<'static, ()>) {
        (self.handle, self.driver)
    }
}

impl fmt::Debug for EventedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventedRequest")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Client for the Bugzilla REST API.
pub struct ApiClient<E> {
    config: Rc<ApiConfig>,
    effects: Rc<E>,
}

impl<E> Clone for ApiClient<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            effects: self.effects.clone(),
        }
    }
}

impl<E> fmt::Debug for ApiClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: ApiEffects + 'static> ApiClient<E> {
    /// Create a client over the given effect handlers.
    pub fn new(config: ApiConfig, effects: E) -> Self {
        Self::from_shared(config, Rc::new(effects))
    }

    /// Create a client sharing already reference-counted handlers.
    pub fn from_shared(config: ApiConfig, effects: Rc<E>) -> Self {
        Self {
            config: Rc::new(config),
            effects,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Effect handlers.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Build the request a call would send, without sending it.
    pub fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: &Params,
    ) -> BzResult<RequestDescriptor> {
        build_request(&self.config, endpoint, method, params, &[])
    }

    /// Send a call and return its pending result.
    pub fn fetch(&self, endpoint: &str, options: FetchOptions) -> PendingRequest {
        let FetchOptions {
            method,
            params,
            init,
        } = options;
        let (handle, registration) = RequestHandle::pair();
        let future = self.dispatch(endpoint, method, &params, init, ProgressHooks::new(), registration);
        PendingRequest { handle, future }
    }

    /// Shorthand for a GET call.
    pub fn get(&self, endpoint: &str, params: Params, init: RequestInit) -> PendingRequest {
        self.fetch_with(endpoint, HttpMethod::Get, params, init)
    }

    /// Shorthand for a POST call.
    pub fn post(&self, endpoint: &str, params: Params, init: RequestInit) -> PendingRequest {
        self.fetch_with(endpoint, HttpMethod::Post, params, init)
    }

    /// Shorthand for a PUT call.
    pub fn put(&self, endpoint: &str, params: Params, init: RequestInit) -> PendingRequest {
        self.fetch_with(endpoint, HttpMethod::Put, params, init)
    }

    /// Shorthand for a PATCH call.
    pub fn patch(&self, endpoint: &str, params: Params, init: RequestInit) -> PendingRequest {
        self.fetch_with(endpoint, HttpMethod::Patch, params, init)
    }

    /// Shorthand for a DELETE call.
    pub fn delete(&self, endpoint: &str, params: Params, init: RequestInit) -> PendingRequest {
        self.fetch_with(endpoint, HttpMethod::Delete, params, init)
    }

    /// Send a call that reports through callbacks and progress listeners.
    ///
    /// When offline, `reject` runs before this returns and the driver is
    /// already complete.
    pub fn send_with_events(&self, endpoint: &str, options: EventOptions) -> EventedRequest {
        let EventOptions {
            method,
            params,
            resolve,
            reject,
            progress,
        } = options;
        let (handle, registration) = RequestHandle::pair();

        if !self.effects.is_online() {
            let error = BzError::offline();
            if let Some(reject) = reject {
                reject(error);
            }
            return EventedRequest {
                handle,
                driver: future::ready(()).boxed_local(),
            };
        }

        let call = self.dispatch(
            endpoint,
            method,
            &params,
            RequestInit::default(),
            progress,
            registration,
        );
        let driver = async move {
            match call.await {
                Ok(data) => {
                    if let Some(resolve) = resolve {
                        resolve(data);
                    }
                }
                Err(error) => {
                    if let Some(reject) = reject {
                        reject(error);
                    }
                }
            }
        }
        .boxed_local();

        EventedRequest { handle, driver }
    }

    fn fetch_with(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: Params,
        init: RequestInit,
    ) -> PendingRequest {
        self.fetch(
            endpoint,
            FetchOptions {
                method,
                params,
                init,
            },
        )
    }

    fn dispatch(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: &Params,
        init: RequestInit,
        progress: ProgressHooks,
        registration: AbortRegistration,
    ) -> LocalBoxFuture<'static, BzResult<Value>> {
        let request = build_request(&self.config, endpoint, method, params, &init.headers);
        let timeout_ms = init.timeout_ms.unwrap_or(self.config.timeout_ms);
        let effects = self.effects.clone();

        async move {
            let request = request?;

            if !effects.is_online() {
                return Err(BzError::offline());
            }

            tracing::debug!(
                method = %request.method(),
                url = %redacted_url(request.url()),
                timeout_ms,
                "dispatching REST call"
            );

            // Both futures are boxed by the effect traits, so they are Unpin.
            let send = Abortable::new(effects.send(&request, &progress), registration);
            let timer = effects.sleep_ms(timeout_ms);

            let outcome = match future::select(send, timer).await {
                Either::Left((Ok(Ok(response)), _)) => interpret_response(response),
                Either::Left((Ok(Err(error)), _)) => Err(error.into()),
                Either::Left((Err(_aborted), _)) => Err(BzError::abort()),
                Either::Right(((), in_flight)) => {
                    // Dropping the transport future cancels the request.
                    drop(in_flight);
                    Err(BzError::timeout())
                }
            };
            outcome
        }
        .boxed_local()
    }
}

/// Reduce a raw response to the decoded body or an error.
///
/// - 2xx with a JSON body lacking a truthy `error` member resolves
/// - a truthy `error` member rejects with `APIError`, whatever the status
/// - any other non-2xx status rejects with `APIError`
/// - a 2xx body that is not JSON rejects with `SyntaxError`
pub fn interpret_response(response: HttpResponse) -> BzResult<Value> {
    let ok = response.is_success();
    let status_detail = (!ok).then(|| format!("HTTP {}", response.status));

    match serde_json::from_str::<Value>(&response.body) {
        Ok(body) if ok && !is_truthy(body.get("error")) => Ok(body),
        Ok(body) => {
            let code = body.get("code").and_then(as_code);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(BzError::builder(ErrorKind::Api)
                .code(code.unwrap_or(0))
                .maybe_message(message)
                .maybe_detail(status_detail)
                .build())
        }
        Err(error) if ok => Err(BzError::syntax(error.to_string())),
        Err(_) => Err(BzError::builder(ErrorKind::Api)
            .maybe_detail(status_detail)
            .build()),
    }
}

/// JavaScript truthiness of an optional JSON value.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|n| n as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_resolves() {
        let body = interpret_response(HttpResponse::new(200, r#"{"bugs":[{"id":1}]}"#)).unwrap();
        assert_eq!(body, json!({ "bugs": [{ "id": 1 }] }));
    }

    #[test]
    fn arrays_resolve() {
        let body = interpret_response(HttpResponse::new(200, r#"[{"id":1},{"id":2}]"#)).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn error_flag_rejects_even_on_200() {
        let err = interpret_response(HttpResponse::new(
            200,
            r#"{"error":true,"code":123,"message":"bad"}"#,
        ))
        .unwrap_err();
        assert!(err.is(&ErrorKind::Api));
        assert_eq!(err.code(), 123);
        assert_eq!(err.message(), "bad");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn error_false_is_not_an_error() {
        let body = interpret_response(HttpResponse::new(200, r#"{"error":false,"id":3}"#)).unwrap();
        assert_eq!(body["id"], 3);
    }

    #[test]
    fn non_2xx_rejects_with_server_fields() {
        let err = interpret_response(HttpResponse::new(
            401,
            r#"{"error":true,"code":410,"message":"You must log in"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.code(), 410);
        assert_eq!(err.message(), "You must log in");
        assert_eq!(err.detail(), Some("HTTP 401"));
    }

    #[test]
    fn non_2xx_without_json_is_api_error() {
        let err = interpret_response(HttpResponse::new(502, "<html>Bad Gateway</html>")).unwrap_err();
        assert!(err.is(&ErrorKind::Api));
        assert_eq!(err.code(), 0);
        assert_eq!(err.detail(), Some("HTTP 502"));
    }

    #[test]
    fn malformed_success_body_is_syntax_error() {
        let err = interpret_response(HttpResponse::new(200, "{not json")).unwrap_err();
        assert!(err.is(&ErrorKind::Syntax));
        assert!(err.detail().is_some());
    }

    #[test]
    fn string_codes_parse() {
        let err = interpret_response(HttpResponse::new(
            200,
            r#"{"error":1,"code":"32000","message":"x"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.code(), 32000);
    }

    #[test]
    fn truthiness_matches_javascript() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!({}))));
    }
}
