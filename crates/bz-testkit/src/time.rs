//! Controllable clock and timer

use async_trait::async_trait;
use bz_core::effects::{ClockEffects, TimerEffects};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Wall clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    /// Clock reading `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(now_ms)),
        }
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    /// Jump to `now_ms`.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }
}

impl ClockEffects for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerMode {
    Never,
    Immediate,
}

/// Timer that either never fires or fires as soon as it is polled.
///
/// Records every requested delay.
#[derive(Debug, Clone)]
pub struct MockTimer {
    mode: TimerMode,
    requested: Rc<RefCell<Vec<u64>>>,
}

impl MockTimer {
    /// Timer that never fires; the other side of any race wins.
    pub fn never() -> Self {
        Self::with_mode(TimerMode::Never)
    }

    /// Timer that fires on first poll.
    pub fn immediate() -> Self {
        Self::with_mode(TimerMode::Immediate)
    }

    fn with_mode(mode: TimerMode) -> Self {
        Self {
            mode,
            requested: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Delays requested so far, in milliseconds.
    pub fn requested(&self) -> Vec<u64> {
        self.requested.borrow().clone()
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::never()
    }
}

#[async_trait(?Send)]
impl TimerEffects for MockTimer {
    async fn sleep_ms(&self, ms: u64) {
        self.requested.borrow_mut().push(ms);
        if self.mode == TimerMode::Never {
            futures::future::pending::<()>().await;
        }
    }
}
