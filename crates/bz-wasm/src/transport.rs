//! Browser HTTP transport
//!
//! Plain calls go through `fetch` (via `gloo-net`) with an `AbortController`
//! tied to the future. Calls with progress listeners use `XMLHttpRequest`,
//! the only browser API that reports upload progress. Either way, dropping
//! the future aborts the request.

use crate::error::transport_error;
use async_trait::async_trait;
use bz_core::effects::{
    HttpMethod, HttpResponse, ProgressEvent, ProgressHooks, ProgressPhase, RequestDescriptor,
    TransportEffects, TransportError,
};
use futures::channel::mpsc::{self, UnboundedSender};
use futures::StreamExt;
use gloo_net::http::{Method, RequestBuilder};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AbortController, XmlHttpRequest, XmlHttpRequestEventTarget, XmlHttpRequestUpload};

/// `fetch` / `XMLHttpRequest` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl TransportEffects for FetchTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        if progress.is_empty() {
            send_fetch(request).await
        } else {
            send_xhr(request, progress).await
        }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn gloo_error(err: gloo_net::Error) -> TransportError {
    match err {
        gloo_net::Error::JsError(js) => match js.name.as_str() {
            "AbortError" => TransportError::Aborted,
            "TypeError" => TransportError::Network(js.message),
            _ => TransportError::Failed {
                name: js.name,
                code: 0,
                message: js.message,
            },
        },
        other => TransportError::Network(other.to_string()),
    }
}

/// Aborts the controller unless disarmed.
struct AbortOnDrop {
    controller: AbortController,
    armed: bool,
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("aborting fetch");
            self.controller.abort();
        }
    }
}

async fn send_fetch(request: &RequestDescriptor) -> Result<HttpResponse, TransportError> {
    let controller = AbortController::new().map_err(|err| transport_error(&err))?;
    let signal = controller.signal();
    let mut guard = AbortOnDrop {
        controller,
        armed: true,
    };

    let mut builder = RequestBuilder::new(request.url().as_str())
        .method(method(request.method()))
        .abort_signal(Some(&signal));
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }
    let prepared = match request.body() {
        Some(body) => builder.body(body.to_string()),
        None => builder.build(),
    }
    .map_err(gloo_error)?;

    let response = prepared.send().await.map_err(gloo_error)?;
    let status = response.status();
    let body = response.text().await.map_err(gloo_error)?;
    guard.armed = false;
    Ok(HttpResponse::new(status, body))
}

enum XhrSignal {
    Progress(ProgressEvent),
    Loaded,
    Failed(TransportError),
}

type XhrListener = Closure<dyn FnMut(web_sys::ProgressEvent)>;

/// An open `XMLHttpRequest` and the listeners attached to it. Dropping it
/// detaches the listeners and aborts the request unless it settled.
struct XhrCall {
    xhr: XmlHttpRequest,
    upload: Option<XmlHttpRequestUpload>,
    listeners: Vec<XhrListener>,
    settled: bool,
}

impl XhrCall {
    fn target(&self) -> &XmlHttpRequestEventTarget {
        &self.xhr
    }

    fn listen(&mut self, target: &XmlHttpRequestEventTarget, event: &str, listener: XhrListener) {
        let callback = Some(listener.as_ref().unchecked_ref());
        match event {
            "progress" => target.set_onprogress(callback),
            "load" => target.set_onload(callback),
            "error" => target.set_onerror(callback),
            "abort" => target.set_onabort(callback),
            "timeout" => target.set_ontimeout(callback),
            _ => return,
        }
        self.listeners.push(listener);
    }
}

impl Drop for XhrCall {
    fn drop(&mut self) {
        let targets = [Some(self.target()), self.upload.as_deref()];
        for target in targets.into_iter().flatten() {
            target.set_onprogress(None);
            target.set_onload(None);
            target.set_onerror(None);
            target.set_onabort(None);
            target.set_ontimeout(None);
        }
        if !self.settled {
            tracing::debug!("aborting XMLHttpRequest");
            if let Err(err) = self.xhr.abort() {
                tracing::debug!(error = ?err, "XMLHttpRequest abort failed");
            }
        }
    }
}

fn signal_on(
    sender: &UnboundedSender<XhrSignal>,
    signal: impl Fn(web_sys::ProgressEvent) -> XhrSignal + 'static,
) -> XhrListener {
    let sender = sender.clone();
    Closure::new(move |event: web_sys::ProgressEvent| {
        // The receiver is gone once the call settled or was dropped.
        let _ = sender.unbounded_send(signal(event));
    })
}

fn progress_event(phase: ProgressPhase, event: &web_sys::ProgressEvent) -> ProgressEvent {
    ProgressEvent {
        phase,
        loaded: event.loaded() as u64,
        total: event.length_computable().then(|| event.total() as u64),
    }
}

fn js_failure(err: JsValue) -> TransportError {
    transport_error(&err)
}

async fn send_xhr(
    request: &RequestDescriptor,
    progress: &ProgressHooks,
) -> Result<HttpResponse, TransportError> {
    let xhr = XmlHttpRequest::new().map_err(js_failure)?;
    xhr.open_with_async(request.method().as_str(), request.url().as_str(), true)
        .map_err(js_failure)?;
    for (name, value) in request.headers() {
        xhr.set_request_header(name, value).map_err(js_failure)?;
    }

    let (sender, mut signals) = mpsc::unbounded();
    let mut call = XhrCall {
        xhr,
        upload: None,
        listeners: Vec::new(),
        settled: false,
    };

    if progress.wants_upload() {
        // Upload listeners must be attached before send() or they never fire.
        let upload = call.xhr.upload().map_err(js_failure)?;
        let listener = signal_on(&sender, |event| {
            XhrSignal::Progress(progress_event(ProgressPhase::Upload, &event))
        });
        call.listen(&upload, "progress", listener);
        call.upload = Some(upload);
    }
    if progress.wants_download() {
        let target = call.xhr.clone();
        let listener = signal_on(&sender, |event| {
            XhrSignal::Progress(progress_event(ProgressPhase::Download, &event))
        });
        call.listen(&target, "progress", listener);
    }

    let target = call.xhr.clone();
    call.listen(&target, "load", signal_on(&sender, |_| XhrSignal::Loaded));
    call.listen(
        &target,
        "error",
        signal_on(&sender, |_| {
            XhrSignal::Failed(TransportError::Network("XMLHttpRequest failed".to_string()))
        }),
    );
    call.listen(
        &target,
        "abort",
        signal_on(&sender, |_| XhrSignal::Failed(TransportError::Aborted)),
    );
    call.listen(
        &target,
        "timeout",
        signal_on(&sender, |_| XhrSignal::Failed(TransportError::TimedOut)),
    );
    drop(sender);

    call.xhr.send_with_opt_str(request.body()).map_err(js_failure)?;

    while let Some(signal) = signals.next().await {
        match signal {
            XhrSignal::Progress(event) => progress.emit(event),
            XhrSignal::Loaded => {
                call.settled = true;
                let status = call.xhr.status().map_err(js_failure)?;
                let body = call.xhr.response_text().map_err(js_failure)?;
                return Ok(HttpResponse::new(status, body.unwrap_or_default()));
            }
            XhrSignal::Failed(error) => {
                call.settled = true;
                return Err(error);
            }
        }
    }
    Err(TransportError::Network(
        "XMLHttpRequest closed without a response".to_string(),
    ))
}
