//! Composite browser effects for the API client

use crate::network::NavigatorStatus;
use crate::time::GlooTimer;
use crate::transport::FetchTransport;
use async_trait::async_trait;
use bz_core::effects::{
    HttpResponse, NetworkStatusEffects, ProgressHooks, RequestDescriptor, TimerEffects,
    TransportEffects, TransportError,
};
use bz_core::{ApiClient, ApiConfig};

/// Browser handlers for every effect [`ApiClient`] needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserApiEffects {
    /// `fetch` / `XMLHttpRequest`
    pub transport: FetchTransport,
    /// `setTimeout`
    pub timer: GlooTimer,
    /// `navigator.onLine`
    pub network: NavigatorStatus,
}

#[async_trait(?Send)]
impl TransportEffects for BrowserApiEffects {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        self.transport.send(request, progress).await
    }
}

#[async_trait(?Send)]
impl TimerEffects for BrowserApiEffects {
    async fn sleep_ms(&self, ms: u64) {
        self.timer.sleep_ms(ms).await;
    }
}

impl NetworkStatusEffects for BrowserApiEffects {
    fn is_online(&self) -> bool {
        self.network.is_online()
    }
}

/// API client over the browser handlers.
pub fn browser_client(config: ApiConfig) -> ApiClient<BrowserApiEffects> {
    ApiClient::new(config, BrowserApiEffects::default())
}
