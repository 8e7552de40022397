//! Injectable time source
//!
//! Backoff and pacing read time and sleep only through [`Clock`], so tests
//! can drive them with [`ManualClock`] without real waits.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Time source used for backoff and pacing
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on or advanced; records every sleep
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    state: Mutex<ManualState>,
}

#[derive(Debug, Default)]
struct ManualState {
    offset: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            state: Mutex::new(ManualState::default()),
        }
    }

    /// Move time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.state().offset += duration;
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state().sleeps.clone()
    }

    /// Time elapsed since creation
    pub fn elapsed(&self) -> Duration {
        self.state().offset
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.state().offset
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state();
        state.offset += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_sleep_advances_and_records() {
        let clock = ManualClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_secs(1));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now() - before, Duration::from_millis(1500));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
    }
}
