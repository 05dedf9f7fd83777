//! Fixed-rate tick pacing on the monotonic clock.

use std::{
    thread,
    time::{Duration, Instant},
};

/// Sleeps the calling thread until successive fixed-rate deadlines.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    deadline: Option<Instant>,
}

impl FrameClock {
    /// Creates a clock whose first wait returns immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the next tick boundary of a `target_hz` schedule.
    pub fn wait(&mut self, target_hz: u32) {
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }

        self.deadline = Some(next_deadline(
            self.deadline,
            Instant::now(),
            tick_interval(target_hz),
        ));
    }
}

/// Duration of one tick at `target_hz`. A rate of zero is treated as one.
#[must_use]
pub fn tick_interval(target_hz: u32) -> Duration {
    Duration::from_secs(1) / target_hz.max(1)
}

/// Computes the deadline that follows `previous`.
///
/// Deadlines advance by exactly one interval so rounding in `sleep` never
/// accumulates. A loop running more than one interval late is re-anchored at
/// `now`, so a stall is absorbed instead of replayed as a burst of ticks.
#[must_use]
pub fn next_deadline(previous: Option<Instant>, now: Instant, interval: Duration) -> Instant {
    match previous {
        Some(previous) if previous + interval > now => previous + interval,
        _ => now + interval,
    }
}
