//! Wall-clock source for record timestamps

use std::cell::Cell;

/// Supplies "now" in epoch milliseconds
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// The real wall clock
///
/// Under the `wasm` feature chrono reads `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    /// Start at `now` milliseconds
    pub fn new(now: i64) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Jump to `now`
    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    /// Move forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_on_demand() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
