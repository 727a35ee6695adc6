//! reqwest-backed HTTP transport

use async_trait::async_trait;
use bz_core::effects::{
    HttpMethod, HttpResponse, ProgressEvent, ProgressHooks, ProgressPhase, RequestDescriptor,
    TransportEffects, TransportError,
};

/// HTTP transport over a shared `reqwest::Client`.
///
/// Download progress is reported per received chunk. Upload progress is not
/// observable through reqwest and is never emitted.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over an existing client (proxies, custom TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait(?Send)]
impl TransportEffects for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method()), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }
        if progress.wants_upload() {
            tracing::trace!("upload progress is not reported by the native transport");
        }

        let mut response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let total = response.content_length();

        let mut body = Vec::with_capacity(total.unwrap_or(0).min(1 << 20) as usize);
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            body.extend_from_slice(&chunk);
            if progress.wants_download() {
                progress.emit(ProgressEvent {
                    phase: ProgressPhase::Download,
                    loaded: body.len() as u64,
                    total,
                });
            }
        }

        tracing::trace!(status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(
            status,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }
}
