//! Browser clock and timer handlers

use async_trait::async_trait;
use bz_core::effects::{ClockEffects, TimerEffects};
use gloo_timers::future::TimeoutFuture;

/// `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl ClockEffects for BrowserClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// `setTimeout`-backed timer. Dropping the sleep clears the timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

#[async_trait(?Send)]
impl TimerEffects for GlooTimer {
    async fn sleep_ms(&self, ms: u64) {
        let ms = u32::try_from(ms).unwrap_or(u32::MAX);
        TimeoutFuture::new(ms).await;
    }
}
