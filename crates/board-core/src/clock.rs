//! Monotonic time source for command timestamps and merge windows.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Time elapsed since some fixed origin. Only differences are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and for hosts that already have a frame
/// timestamp (e.g. `requestAnimationFrame`'s argument).
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn set_millis(&self, ms: u64) {
        self.set(Duration::from_millis(ms));
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_millis(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
