//! Normalized error type for REST API calls
//!
//! Every failure the API client can observe (offline, timeout, transport
//! failure, abort, malformed response, server-reported error) is reduced to a
//! single [`BzError`] shape. Errors are logged the moment they are built, so
//! callers never need to log them again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message used when no user-facing message is available.
pub const DEFAULT_MESSAGE: &str = "Unexpected Error";

/// Distinguishable error name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The host reported itself disconnected before dispatch
    Offline,
    /// The request did not settle within the configured timeout
    Timeout,
    /// Transport-level failure (DNS, connection reset, CORS, ...)
    Network,
    /// The request was cancelled
    Abort,
    /// The response body was not valid JSON
    Syntax,
    /// The server reported an application error or a non-2xx status
    Api,
    /// Any other named failure, e.g. a transport exception name
    Generic(String),
}

impl ErrorKind {
    /// Error name as exposed to UI code.
    pub fn name(&self) -> &str {
        match self {
            ErrorKind::Offline => "OfflineError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Abort => "AbortError",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Api => "APIError",
            ErrorKind::Generic(name) => name,
        }
    }

    /// Parse an error name back into a kind. Unknown names become `Generic`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "OfflineError" => ErrorKind::Offline,
            "TimeoutError" => ErrorKind::Timeout,
            "NetworkError" => ErrorKind::Network,
            "AbortError" => ErrorKind::Abort,
            "SyntaxError" => ErrorKind::Syntax,
            "APIError" => ErrorKind::Api,
            other => ErrorKind::Generic(other.to_string()),
        }
    }
}

impl Default for ErrorKind {
    fn default() -> Self {
        ErrorKind::Generic("Error".to_string())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized API error: `{name, message, code, detail}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BzError {
    kind: ErrorKind,
    message: String,
    code: i64,
    detail: Option<String>,
}

impl fmt::Display for BzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\" (code: {}", self.kind, self.message, self.code)?;
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            write!(f, ", detail: {detail}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for BzError {}

impl BzError {
    /// Start building an error of the given kind.
    pub fn builder(kind: ErrorKind) -> BzErrorBuilder {
        BzErrorBuilder {
            kind,
            message: None,
            code: 0,
            detail: None,
        }
    }

    /// No network connection before dispatch.
    pub fn offline() -> Self {
        Self::builder(ErrorKind::Offline)
            .message("You are currently offline.")
            .build()
    }

    /// The request timer fired first.
    pub fn timeout() -> Self {
        Self::builder(ErrorKind::Timeout)
            .message("Request Timeout")
            .build()
    }

    /// Transport-level failure.
    pub fn network(detail: Option<String>) -> Self {
        Self::builder(ErrorKind::Network)
            .maybe_detail(detail)
            .build()
    }

    /// Request cancelled.
    pub fn abort() -> Self {
        Self::builder(ErrorKind::Abort).build()
    }

    /// Response body failed to parse.
    pub fn syntax(detail: impl Into<String>) -> Self {
        Self::builder(ErrorKind::Syntax).detail(detail).build()
    }

    /// Server-reported error; missing code or message fall back to defaults.
    pub fn api(code: Option<i64>, message: Option<String>) -> Self {
        Self::builder(ErrorKind::Api)
            .code(code.unwrap_or(0))
            .maybe_message(message)
            .build()
    }

    /// Error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Error name, e.g. `APIError`.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric code from the server or transport; `0` when unknown.
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Technical detail end users do not need to see.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: &ErrorKind) -> bool {
        &self.kind == kind
    }
}

/// Builder for [`BzError`]. `build` logs the finished error.
#[derive(Debug, Clone)]
#[must_use]
pub struct BzErrorBuilder {
    kind: ErrorKind,
    message: Option<String>,
    code: i64,
    detail: Option<String>,
}

impl BzErrorBuilder {
    /// Set the user-facing message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the message if one is available.
    pub fn maybe_message(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.message = message;
        }
        self
    }

    /// Set the numeric code.
    pub fn code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Set the technical detail.
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the detail if one is available.
    pub fn maybe_detail(mut self, detail: Option<String>) -> Self {
        if detail.is_some() {
            self.detail = detail;
        }
        self
    }

    /// Finish the error and write it to the diagnostic log.
    pub fn build(self) -> BzError {
        let error = BzError {
            kind: self.kind,
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            code: self.code,
            detail: self.detail,
        };
        tracing::error!(target: "bugzilla::error", name = error.name(), code = error.code, "{error}");
        error
    }
}

/// Result type for API operations
pub type BzResult<T> = Result<T, BzError>;
