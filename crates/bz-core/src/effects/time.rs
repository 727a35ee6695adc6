//! Time effect interfaces
//!
//! - `ClockEffects`: wall-clock milliseconds, used for cache expiry
//! - `TimerEffects`: an awaitable delay, used to race requests against a timeout

use async_trait::async_trait;
use std::rc::Rc;

/// Wall clock.
pub trait ClockEffects {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Awaitable timer.
#[async_trait(?Send)]
pub trait TimerEffects {
    /// Complete after `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64);
}

impl<T: ClockEffects + ?Sized> ClockEffects for Rc<T> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

#[async_trait(?Send)]
impl<T: TimerEffects + ?Sized> TimerEffects for Rc<T> {
    async fn sleep_ms(&self, ms: u64) {
        (**self).sleep_ms(ms).await;
    }
}
