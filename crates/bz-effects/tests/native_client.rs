//! Native client against a local HTTP listener

use assert_matches::assert_matches;
use bz_core::effects::ProgressHooks;
use bz_core::{ApiClient, ApiConfig, ErrorKind, EventOptions, Params, RequestInit};
use bz_effects::{NativeApiEffects, StaticNetworkStatus};
use serde_json::json;
use std::cell::RefCell;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

/// Serve one connection. Returns the listener address and the request head.
async fn serve_once(status: &'static str, body: String) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let head = read_head(&mut socket).await;
        let _ = tx.send(head);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (addr, rx)
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn client(addr: SocketAddr, timeout_ms: u64) -> ApiClient<NativeApiEffects> {
    let origin = Url::parse(&format!("http://{addr}")).unwrap();
    ApiClient::new(
        ApiConfig::new(origin)
            .with_api_token("tok")
            .with_timeout_ms(timeout_ms),
        NativeApiEffects::default(),
    )
}

#[tokio::test]
async fn get_round_trip() {
    let (addr, head) = serve_once("200 OK", json!({ "bugs": [{ "id": 1 }] }).to_string()).await;
    let mut params = Params::new();
    params.insert("include_fields".into(), json!(["id", "status"]));

    let body = client(addr, 5_000)
        .get("bug/1", params, RequestInit::default())
        .await
        .unwrap();

    assert_eq!(body["bugs"][0]["id"], 1);
    let head = head.await.unwrap();
    assert!(
        head.starts_with("GET /rest/bug/1?include_fields=id%2Cstatus&Bugzilla_api_token=tok HTTP/1.1"),
        "{head}"
    );
    assert!(head.to_ascii_lowercase().contains("accept: application/json"));
}

#[tokio::test]
async fn server_error_body_is_normalized() {
    let (addr, _head) = serve_once(
        "400 Bad Request",
        json!({ "error": true, "code": 51, "message": "Invalid component" }).to_string(),
    )
    .await;

    let err = client(addr, 5_000)
        .post("bug", Params::new(), RequestInit::default())
        .await
        .unwrap_err();

    assert_matches!(err.kind(), ErrorKind::Api);
    assert_eq!(err.code(), 51);
    assert_eq!(err.detail(), Some("HTTP 400"));
}

#[tokio::test]
async fn download_progress_reaches_listeners() {
    let payload = json!({ "attachments": { "9": { "data": "x".repeat(4096) } } }).to_string();
    let expected_len = payload.len() as u64;
    let (addr, _head) = serve_once("200 OK", payload).await;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let (_handle, driver) = client(addr, 5_000)
        .send_with_events(
            "bug/attachment/9",
            EventOptions {
                progress: ProgressHooks::new().on_download(move |event| sink.borrow_mut().push(event)),
                ..EventOptions::default()
            },
        )
        .into_parts();
    driver.await;

    let seen = seen.borrow();
    let last = seen.last().unwrap();
    assert_eq!(last.loaded, expected_len);
    assert_eq!(last.total, Some(expected_len));
}

#[tokio::test]
async fn unresponsive_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = read_head(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let err = client(addr, 100)
        .get("bug", Params::new(), RequestInit::default())
        .await
        .unwrap_err();

    assert_matches!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = client(addr, 5_000)
        .get("bug", Params::new(), RequestInit::default())
        .await
        .unwrap_err();

    assert_matches!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn offline_status_short_circuits() {
    let origin = Url::parse("http://127.0.0.1:9").unwrap();
    let client = ApiClient::new(
        ApiConfig::new(origin),
        NativeApiEffects {
            network: StaticNetworkStatus::offline(),
            ..NativeApiEffects::default()
        },
    );

    let err = client
        .get("bug", Params::new(), RequestInit::default())
        .await
        .unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Offline);
}
