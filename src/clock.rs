//! Monotonic time source

use std::thread;
use std::time::{Duration, Instant};

/// Supplies monotonic timestamps and a sleep primitive
pub trait Clock {
    /// Current monotonic instant
    fn now(&self) -> Instant;

    /// Suspend the caller for `duration`
    fn sleep(&self, duration: Duration);
}

/// Clock backed by [`Instant`] and [`thread::sleep`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
