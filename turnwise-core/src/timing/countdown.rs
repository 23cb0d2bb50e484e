//! Per-turn countdown clock
//!
//! Tracks elapsed time for the active turn. Time only moves forward: the
//! caller feeds measured inter-tick intervals, and a negative interval is
//! rejected as a broken time source rather than clamped.

use core::fmt;

/// Countdown clock errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// A negative tick interval was supplied
    InvalidInterval,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::InvalidInterval => f.write_str("tick interval must not be negative"),
        }
    }
}

/// Countdown for a single turn
///
/// Elapsed time never exceeds the duration. Once the remaining time hits
/// zero the clock stays expired until [`CountdownClock::start`] is called
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountdownClock {
    /// Turn budget (ms)
    duration_ms: u32,
    /// Time spent so far (ms)
    elapsed_ms: u32,
    /// Whether `start` has been called since the last reset
    started: bool,
}

impl CountdownClock {
    /// Create an unstarted clock
    pub const fn new() -> Self {
        Self {
            duration_ms: 0,
            elapsed_ms: 0,
            started: false,
        }
    }

    /// Create a clock already started at `duration_ms`
    pub const fn started(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0,
            started: true,
        }
    }

    /// (Re)start the countdown from `duration_ms`
    pub fn start(&mut self, duration_ms: u32) {
        *self = Self::started(duration_ms);
    }

    /// Advance the clock by `delta_ms`
    ///
    /// Returns the remaining time. An unstarted clock validates the interval
    /// but does not accumulate it.
    pub fn tick(&mut self, delta_ms: i64) -> Result<u32, ClockError> {
        let delta_ms = Self::check_interval(delta_ms)?;

        if self.started {
            let budget_left = self.duration_ms - self.elapsed_ms;
            let step = u32::try_from(delta_ms).unwrap_or(u32::MAX).min(budget_left);
            self.elapsed_ms += step;
        }

        Ok(self.remaining_ms())
    }

    /// Validate a tick interval without a clock
    pub fn check_interval(delta_ms: i64) -> Result<u64, ClockError> {
        u64::try_from(delta_ms).map_err(|_| ClockError::InvalidInterval)
    }

    /// Remaining time (ms), zero when unstarted or expired
    pub fn remaining_ms(&self) -> u32 {
        if self.started {
            self.duration_ms - self.elapsed_ms
        } else {
            0
        }
    }

    /// Elapsed time (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Turn budget (ms)
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Check if the countdown has run out
    pub fn is_expired(&self) -> bool {
        self.started && self.elapsed_ms >= self.duration_ms
    }

    /// Check if the clock has been started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Return to the unstarted state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown() {
        let mut clock = CountdownClock::new();
        clock.start(60_000);

        assert_eq!(clock.tick(15_000), Ok(45_000));
        assert_eq!(clock.elapsed_ms(), 15_000);
        assert!(!clock.is_expired());

        assert_eq!(clock.tick(45_000), Ok(0));
        assert!(clock.is_expired());
    }

    #[test]
    fn test_elapsed_never_exceeds_duration() {
        let mut clock = CountdownClock::started(1_000);
        assert_eq!(clock.tick(5_000), Ok(0));
        assert_eq!(clock.elapsed_ms(), 1_000);

        // Still expired, still bounded
        assert_eq!(clock.tick(i64::MAX), Ok(0));
        assert_eq!(clock.elapsed_ms(), 1_000);
        assert!(clock.is_expired());
    }

    #[test]
    fn test_negative_interval_rejected() {
        let mut clock = CountdownClock::started(10_000);
        clock.tick(2_000).unwrap();

        assert_eq!(clock.tick(-1), Err(ClockError::InvalidInterval));
        // Clock untouched
        assert_eq!(clock.remaining_ms(), 8_000);
    }

    #[test]
    fn test_zero_interval() {
        let mut clock = CountdownClock::started(10_000);
        assert_eq!(clock.tick(0), Ok(10_000));
    }

    #[test]
    fn test_restart_clears_expiry() {
        let mut clock = CountdownClock::started(500);
        clock.tick(500).unwrap();
        assert!(clock.is_expired());

        clock.start(500);
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_ms(), 500);
    }

    #[test]
    fn test_reset() {
        let mut clock = CountdownClock::started(500);
        clock.tick(500).unwrap();
        clock.reset();

        assert!(!clock.is_started());
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_ms(), 0);

        // Unstarted clock ignores time but still validates it
        assert_eq!(clock.tick(100), Ok(0));
        assert_eq!(clock.elapsed_ms(), 0);
        assert_eq!(clock.tick(-5), Err(ClockError::InvalidInterval));
    }
}
