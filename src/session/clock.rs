//! Monotonic time source for the controller loop.
//!
//! The engine never reads a clock; whoever builds commands stamps them with
//! `now_mono()` from one of these.

use std::cell::Cell;
use std::time::Instant;

use crate::game::state::Seconds;

/// Port for monotonic time.
pub trait MonotonicClock {
    /// Seconds since an arbitrary, fixed origin. Never decreases.
    fn now_mono(&self) -> Seconds;
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_mono(&self) -> Seconds {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for scripted sessions and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Seconds>,
}

impl ManualClock {
    /// Start at `now`.
    pub fn starting_at(now: Seconds) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Move forward by `delta` seconds (negative deltas are ignored).
    pub fn advance(&self, delta: Seconds) {
        self.now.set(self.now.get() + delta.max(0.0));
    }
}

impl MonotonicClock for ManualClock {
    fn now_mono(&self) -> Seconds {
        self.now.get()
    }
}
