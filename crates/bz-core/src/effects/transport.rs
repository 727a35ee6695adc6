//! HTTP transport effect interface
//!
//! A transport takes a fully built [`RequestDescriptor`], performs the call,
//! and returns the raw status and body. Interpreting the body is the API
//! client's job, so every transport produces the same error shapes.
//!
//! Dropping the future returned by [`TransportEffects::send`] must cancel the
//! in-flight request. The API client relies on this when a timeout wins.

use crate::errors::{BzError, ErrorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use url::Url;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    /// Read; params go into the query string
    #[default]
    Get,
    /// Create
    Post,
    /// Replace
    Put,
    /// Partial update
    Patch,
    /// Remove
    Delete,
}

impl HttpMethod {
    /// Upper-case method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether params travel in the query string rather than the body.
    pub fn is_read(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = BzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(BzError::builder(ErrorKind::Generic("TypeError".into()))
                .message(format!("Unsupported HTTP method: {other}"))
                .build()),
        }
    }
}

/// A request ready to hand to a transport. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Url,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestDescriptor {
    pub(crate) fn new(
        url: Url,
        method: HttpMethod,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Self {
        Self {
            url,
            method,
            headers,
            body,
        }
    }

    /// Complete request URL including query parameters.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Request headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// JSON body for write requests.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Raw response as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl HttpResponse {
    /// Response with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Direction of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressPhase {
    /// Request body upload
    Upload,
    /// Response body download
    Download,
}

/// Transfer progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Upload or download
    pub phase: ProgressPhase,
    /// Bytes transferred so far
    pub loaded: u64,
    /// Total bytes, when known
    pub total: Option<u64>,
}

/// Progress listener callback.
pub type ProgressListener = Box<dyn Fn(ProgressEvent)>;

/// Upload and download progress listeners for one request.
#[derive(Default)]
pub struct ProgressHooks {
    upload: Vec<ProgressListener>,
    download: Vec<ProgressListener>,
}

impl ProgressHooks {
    /// No listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an upload progress listener.
    pub fn on_upload(mut self, listener: impl Fn(ProgressEvent) + 'static) -> Self {
        self.upload.push(Box::new(listener));
        self
    }

    /// Add a download progress listener.
    pub fn on_download(mut self, listener: impl Fn(ProgressEvent) + 'static) -> Self {
        self.download.push(Box::new(listener));
        self
    }

    /// Whether anyone listens for upload progress.
    pub fn wants_upload(&self) -> bool {
        !self.upload.is_empty()
    }

    /// Whether anyone listens for download progress.
    pub fn wants_download(&self) -> bool {
        !self.download.is_empty()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.upload.is_empty() && self.download.is_empty()
    }

    /// Deliver `event` to the listeners for its phase.
    pub fn emit(&self, event: ProgressEvent) {
        let listeners = match event.phase {
            ProgressPhase::Upload => &self.upload,
            ProgressPhase::Download => &self.download,
        };
        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for ProgressHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressHooks")
            .field("upload", &self.upload.len())
            .field("download", &self.download.len())
            .finish()
    }
}

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection-level failure
    #[error("Network failure: {0}")]
    Network(String),

    /// The request was cancelled before completing
    #[error("Request aborted")]
    Aborted,

    /// The transport's own timeout elapsed
    #[error("Transport timeout")]
    TimedOut,

    /// Any other named failure raised by the host
    #[error("{name}: {message}")]
    Failed {
        /// Exception name, e.g. `NotAllowedError`
        name: String,
        /// Exception code, `0` if none
        code: i64,
        /// Exception message
        message: String,
    },
}

impl From<TransportError> for BzError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(detail) => {
                BzError::network(Some(detail).filter(|d| !d.is_empty()))
            }
            TransportError::Aborted => BzError::abort(),
            TransportError::TimedOut => BzError::timeout(),
            TransportError::Failed {
                name,
                code,
                message,
            } => BzError::builder(ErrorKind::from_name(&name))
                .code(code)
                .detail(message)
                .build(),
        }
    }
}

/// HTTP transport.
#[async_trait(?Send)]
pub trait TransportEffects {
    /// Perform `request`, reporting transfer progress to `progress`.
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError>;
}

#[async_trait(?Send)]
impl<T: TransportEffects + ?Sized> TransportEffects for Rc<T> {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(request, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn progress_hooks_route_by_phase() {
        let uploads = Rc::new(Cell::new(0u64));
        let seen = uploads.clone();
        let hooks = ProgressHooks::new().on_upload(move |event| seen.set(event.loaded));

        hooks.emit(ProgressEvent {
            phase: ProgressPhase::Download,
            loaded: 10,
            total: None,
        });
        assert_eq!(uploads.get(), 0);

        hooks.emit(ProgressEvent {
            phase: ProgressPhase::Upload,
            loaded: 42,
            total: Some(100),
        });
        assert_eq!(uploads.get(), 42);
        assert!(hooks.wants_upload());
        assert!(!hooks.wants_download());
    }

    #[test]
    fn transport_errors_normalize() {
        let err: BzError = TransportError::Failed {
            name: "NotAllowedError".into(),
            code: 18,
            message: "blocked".into(),
        }
        .into();
        assert_eq!(err.name(), "NotAllowedError");
        assert_eq!(err.code(), 18);
        assert_eq!(err.detail(), Some("blocked"));

        let err: BzError = TransportError::Aborted.into();
        assert!(err.is(&ErrorKind::Abort));
    }
}
