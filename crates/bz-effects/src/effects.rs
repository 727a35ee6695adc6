//! Composite native effects for the API client

use crate::network::StaticNetworkStatus;
use crate::time::TokioTimer;
use crate::transport::ReqwestTransport;
use async_trait::async_trait;
use bz_core::effects::{
    HttpResponse, NetworkStatusEffects, ProgressHooks, RequestDescriptor, TimerEffects,
    TransportEffects, TransportError,
};
use bz_core::{ApiClient, ApiConfig};

/// Native handlers for every effect [`ApiClient`] needs.
#[derive(Debug, Clone, Default)]
pub struct NativeApiEffects {
    /// HTTP transport
    pub transport: ReqwestTransport,
    /// Timeout timer
    pub timer: TokioTimer,
    /// Connectivity
    pub network: StaticNetworkStatus,
}

#[async_trait(?Send)]
impl TransportEffects for NativeApiEffects {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        self.transport.send(request, progress).await
    }
}

#[async_trait(?Send)]
impl TimerEffects for NativeApiEffects {
    async fn sleep_ms(&self, ms: u64) {
        self.timer.sleep_ms(ms).await;
    }
}

impl NetworkStatusEffects for NativeApiEffects {
    fn is_online(&self) -> bool {
        self.network.is_online()
    }
}

/// API client over the default native handlers.
pub fn native_client(config: ApiConfig) -> ApiClient<NativeApiEffects> {
    ApiClient::new(config, NativeApiEffects::default())
}
