//! Composite mock effects for the API client

use crate::network::ToggleNetwork;
use crate::time::MockTimer;
use crate::transport::MockTransport;
use async_trait::async_trait;
use bz_core::effects::{
    HttpResponse, NetworkStatusEffects, ProgressHooks, RequestDescriptor, TimerEffects,
    TransportEffects, TransportError,
};

/// Everything [`ApiClient`](bz_core::ApiClient) needs, each part observable.
///
/// Starts online with a timer that never fires.
#[derive(Debug, Clone, Default)]
pub struct MockApiEffects {
    /// Scripted transport
    pub transport: MockTransport,
    /// Timeout timer
    pub timer: MockTimer,
    /// Connectivity
    pub network: ToggleNetwork,
}

impl MockApiEffects {
    /// Effects over `transport`.
    pub fn new(transport: MockTransport) -> Self {
        Self {
            transport,
            ..Self::default()
        }
    }

    /// Replace the timer.
    pub fn with_timer(mut self, timer: MockTimer) -> Self {
        self.timer = timer;
        self
    }

    /// Start offline.
    pub fn offline(self) -> Self {
        self.network.set_online(false);
        self
    }
}

#[async_trait(?Send)]
impl TransportEffects for MockApiEffects {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        self.transport.send(request, progress).await
    }
}

#[async_trait(?Send)]
impl TimerEffects for MockApiEffects {
    async fn sleep_ms(&self, ms: u64) {
        self.timer.sleep_ms(ms).await;
    }
}

impl NetworkStatusEffects for MockApiEffects {
    fn is_online(&self) -> bool {
        self.network.is_online()
    }
}
