//! REST client behavior against scripted effects
//!
//! Covers request shape, offline short-circuit, response normalization,
//! the timeout race and cancellation.

use assert_matches::assert_matches;
use bz_core::effects::{HttpMethod, ProgressEvent, ProgressHooks, ProgressPhase, TransportError};
use bz_core::{
    ApiClient, BzError, ErrorKind, EventOptions, EventedRequest, FetchOptions, Params, RequestInit,
};
use bz_testkit::{
    init_test_tracing, test_api_config, test_client, MockApiEffects, MockTimer, MockTransport,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("params must be an object, got {other}"),
    }
}

fn pairs(url: &url::Url) -> Vec<(String, String)> {
    url.query_pairs().into_owned().collect()
}

fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn get_puts_params_in_query_string() {
    init_test_tracing();
    let transport = MockTransport::new().respond(200, r#"{"bugs":[]}"#);
    let client = ApiClient::new(
        test_api_config().with_api_token("s3cret"),
        MockApiEffects::new(transport.clone()),
    );

    let body = client
        .get(
            "bug",
            params(json!({
                "id": 12,
                "include_fields": ["id", "summary"],
                "product": ["Firefox", "Core"],
            })),
            RequestInit::default(),
        )
        .await
        .unwrap();
    assert_eq!(body, json!({ "bugs": [] }));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method(), HttpMethod::Get);
    assert_eq!(request.url().path(), "/rest/bug");
    assert_eq!(
        pairs(request.url()),
        owned(&[
            ("id", "12"),
            ("include_fields", "id,summary"),
            ("product", "Firefox"),
            ("product", "Core"),
            ("Bugzilla_api_token", "s3cret"),
        ])
    );
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), None);
    assert_eq!(request.body(), None);
}

#[tokio::test]
async fn writes_send_json_body_and_only_the_token_in_query() {
    let transport = MockTransport::new().respond(201, r#"{"id":7}"#);
    let client = ApiClient::new(
        test_api_config()
            .with_basepath("/bugzilla/")
            .with_api_token("tok"),
        MockApiEffects::new(transport.clone()),
    );

    let body = client
        .post(
            "bug/7/comment",
            params(json!({ "comment": "Works for me", "is_private": false })),
            RequestInit::default().header("X-Requested-With", "test"),
        )
        .await
        .unwrap();
    assert_eq!(body["id"], 7);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.url().path(), "/bugzilla/rest/bug/7/comment");
    assert_eq!(pairs(request.url()), owned(&[("Bugzilla_api_token", "tok")]));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("x-requested-with"), Some("test"));
    let sent: Value = serde_json::from_str(request.body().unwrap()).unwrap();
    assert_eq!(sent, json!({ "comment": "Works for me", "is_private": false }));
}

#[tokio::test]
async fn every_method_shorthand_uses_its_verb() {
    let transport = MockTransport::new()
        .respond(200, "{}")
        .respond(200, "{}")
        .respond(200, "{}");
    let client = test_client(MockApiEffects::new(transport.clone()));

    client.put("bug/1", Params::new(), RequestInit::default()).await.unwrap();
    client.patch("bug/1", Params::new(), RequestInit::default()).await.unwrap();
    client.delete("bug/1", Params::new(), RequestInit::default()).await.unwrap();

    let methods: Vec<_> = transport.requests().iter().map(|r| r.method()).collect();
    assert_eq!(methods, vec![HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete]);
}

#[tokio::test]
async fn no_token_means_no_query_string() {
    let transport = MockTransport::new().respond(200, "{}");
    let client = test_client(MockApiEffects::new(transport.clone()));

    client.get("version", Params::new(), RequestInit::default()).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.url().as_str(), "https://bugzilla.test/rest/version");
}

#[tokio::test]
async fn offline_fails_without_touching_the_network() {
    let transport = MockTransport::new().respond(200, "{}");
    let client = test_client(MockApiEffects::new(transport.clone()).offline());

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();

    assert!(err.is(&ErrorKind::Offline));
    assert_eq!(err.name(), "OfflineError");
    assert_eq!(err.message(), "You are currently offline.");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn error_member_in_body_rejects_whatever_the_status() {
    let transport = MockTransport::new()
        .respond_json(200, &json!({ "error": true, "code": 101, "message": "Bug #99 does not exist." }))
        .respond_json(404, &json!({ "error": true, "code": 101, "message": "Bug #99 does not exist." }));
    let client = test_client(MockApiEffects::new(transport));

    for expected_detail in [None, Some("HTTP 404")] {
        let err = client.get("bug/99", Params::new(), RequestInit::default()).await.unwrap_err();
        assert!(err.is(&ErrorKind::Api));
        assert_eq!(err.name(), "APIError");
        assert_eq!(err.code(), 101);
        assert_eq!(err.message(), "Bug #99 does not exist.");
        assert_eq!(err.detail(), expected_detail);
    }
}

#[tokio::test]
async fn failed_status_with_plain_json_body_is_an_api_error() {
    let transport =
        MockTransport::new().respond_json(404, &json!({ "code": 5, "message": "x" }));
    let client = test_client(MockApiEffects::new(transport));

    let err = client.get("bug/5", Params::new(), RequestInit::default()).await.unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Api);
    assert_eq!(err.code(), 5);
    assert_eq!(err.message(), "x");
    assert_eq!(err.detail(), Some("HTTP 404"));
}

#[tokio::test]
async fn api_error_without_message_uses_default() {
    let transport = MockTransport::new().respond(500, r#"{"error":true}"#);
    let client = test_client(MockApiEffects::new(transport));

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();
    assert_eq!(err.message(), "Unexpected Error");
    assert_eq!(err.code(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_syntax_error() {
    let transport = MockTransport::new().respond(200, "<!DOCTYPE html>");
    let client = test_client(MockApiEffects::new(transport));

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();
    assert_eq!(err.name(), "SyntaxError");
    assert!(err.detail().is_some());
}

#[tokio::test]
async fn transport_failures_keep_their_names() {
    let transport = MockTransport::new()
        .fail(TransportError::Network("connection refused".into()))
        .fail(TransportError::Failed {
            name: "NotAllowedError".into(),
            code: 18,
            message: "blocked by policy".into(),
        });
    let client = test_client(MockApiEffects::new(transport));

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();
    assert!(err.is(&ErrorKind::Network));
    assert_eq!(err.detail(), Some("connection refused"));

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();
    assert_eq!(err.name(), "NotAllowedError");
    assert_eq!(err.code(), 18);
}

#[tokio::test]
async fn timeout_wins_and_cancels_the_transport() {
    let transport = MockTransport::new().hang();
    let timer = MockTimer::immediate();
    let client = test_client(MockApiEffects::new(transport.clone()).with_timer(timer.clone()));

    let err = client.get("bug", Params::new(), RequestInit::default()).await.unwrap_err();

    assert!(err.is(&ErrorKind::Timeout));
    assert_eq!(err.message(), "Request Timeout");
    assert_eq!(timer.requested(), vec![30_000]);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.cancelled_count(), 1);
    assert_eq!(transport.completed_count(), 0);
}

#[tokio::test]
async fn completed_transport_beats_the_timer() {
    let transport = MockTransport::new().respond(200, r#"{"ok":1}"#);
    let timer = MockTimer::immediate();
    let client = test_client(MockApiEffects::new(transport.clone()).with_timer(timer));

    let body = client.get("bug", Params::new(), RequestInit::default()).await.unwrap();
    assert_eq!(body["ok"], 1);
    assert_eq!(transport.cancelled_count(), 0);
}

#[tokio::test]
async fn per_call_timeout_overrides_config() {
    let transport = MockTransport::new().hang();
    let timer = MockTimer::immediate();
    let client = ApiClient::new(
        test_api_config().with_timeout_ms(10_000),
        MockApiEffects::new(transport).with_timer(timer.clone()),
    );

    let _ = client.get("a", Params::new(), RequestInit::default()).await;
    let _ = client
        .fetch(
            "b",
            FetchOptions {
                init: RequestInit::default().timeout_ms(250),
                ..FetchOptions::default()
            },
        )
        .await;
    assert_eq!(timer.requested(), vec![10_000, 250]);
}

#[tokio::test]
async fn abort_before_dispatch_never_sends() {
    let transport = MockTransport::new().respond(200, "{}");
    let client = test_client(MockApiEffects::new(transport.clone()));

    let pending = client.get("bug", Params::new(), RequestInit::default());
    pending.handle().abort();

    let err = pending.await.unwrap_err();
    assert!(err.is(&ErrorKind::Abort));
    assert_eq!(err.name(), "AbortError");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn abort_in_flight_cancels_the_transport() {
    let transport = MockTransport::new().hang();
    let client = test_client(MockApiEffects::new(transport.clone()));

    let mut pending = client.get("bug", Params::new(), RequestInit::default());
    assert!(futures::poll!(&mut pending).is_pending());
    assert_eq!(transport.request_count(), 1);

    let handle = pending.handle();
    handle.abort();
    assert!(handle.is_aborted());

    let err = pending.await.unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Abort);
    assert_eq!(transport.cancelled_count(), 1);
}

#[tokio::test]
async fn evented_call_reports_progress_then_resolves() {
    let upload = ProgressEvent {
        phase: ProgressPhase::Upload,
        loaded: 512,
        total: Some(1024),
    };
    let download = ProgressEvent {
        phase: ProgressPhase::Download,
        loaded: 9,
        total: None,
    };
    let transport = MockTransport::new().respond_with_progress(
        201,
        r#"{"ids":[44]}"#,
        vec![upload, download],
    );
    let client = test_client(MockApiEffects::new(transport.clone()));

    let uploads = Rc::new(RefCell::new(Vec::new()));
    let downloads = Rc::new(RefCell::new(Vec::new()));
    let resolved = Rc::new(RefCell::new(None));
    let (up, down, slot) = (uploads.clone(), downloads.clone(), resolved.clone());

    let evented = client.send_with_events(
        "bug/3/attachment",
        EventOptions {
            method: HttpMethod::Post,
            params: params(json!({ "file_name": "trace.txt", "data": "aGVsbG8=" })),
            resolve: Some(Box::new(move |body: Value| *slot.borrow_mut() = Some(body))),
            reject: Some(Box::new(|error: BzError| panic!("unexpected rejection: {error}"))),
            progress: ProgressHooks::new()
                .on_upload(move |event| up.borrow_mut().push(event))
                .on_download(move |event| down.borrow_mut().push(event)),
        },
    );
    let (_handle, driver) = evented.into_parts();
    driver.await;

    assert_eq!(*uploads.borrow(), vec![upload]);
    assert_eq!(*downloads.borrow(), vec![download]);
    assert_eq!(*resolved.borrow(), Some(json!({ "ids": [44] })));
    assert_eq!(transport.last_request().unwrap().method(), HttpMethod::Post);
}

#[tokio::test]
async fn evented_call_rejects_synchronously_when_offline() {
    let transport = MockTransport::new().respond(200, "{}");
    let client = test_client(MockApiEffects::new(transport.clone()).offline());

    let rejected = Rc::new(RefCell::new(None));
    let slot = rejected.clone();
    let evented = client.send_with_events(
        "bug",
        EventOptions {
            reject: Some(Box::new(move |error: BzError| *slot.borrow_mut() = Some(error))),
            ..EventOptions::default()
        },
    );

    // Rejected before the driver is ever polled.
    let error = rejected.borrow_mut().take().unwrap();
    assert!(error.is(&ErrorKind::Offline));

    evented.driver.await;
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn evented_call_abort_rejects_with_abort_error() {
    let transport = MockTransport::new().hang();
    let client = test_client(MockApiEffects::new(transport.clone()));

    let rejected = Rc::new(RefCell::new(None));
    let slot = rejected.clone();
    let EventedRequest { handle, driver } = client.send_with_events(
        "bug",
        EventOptions {
            reject: Some(Box::new(move |error: BzError| *slot.borrow_mut() = Some(error))),
            ..EventOptions::default()
        },
    );
    handle.abort();
    driver.await;

    let error = rejected.borrow_mut().take().unwrap();
    assert_eq!(error.name(), "AbortError");
}
