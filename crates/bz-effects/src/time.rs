//! Real clock and timer

use async_trait::async_trait;
use bz_core::effects::{ClockEffects, TimerEffects};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockEffects for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64
    }
}

/// Timer backed by `tokio::time::sleep`. Needs a Tokio runtime with time
/// enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait(?Send)]
impl TimerEffects for TokioTimer {
    async fn sleep_ms(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_past_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_sleeps_for_the_requested_time() {
        let start = tokio::time::Instant::now();
        TokioTimer.sleep_ms(1_500).await;
        assert!(start.elapsed() >= Duration::from_millis(1_500));
    }
}
