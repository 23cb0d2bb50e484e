//! Control loop
//!
//! One cooperative loop drives the whole timer. Each step, in order:
//! 1. Read the button line and debounce it
//! 2. Dispatch presses (and long holds) to the controller
//! 3. Advance the countdown by the measured interval since the last step
//!
//! The caller owns the schedule and supplies a monotonic timestamp, so the
//! loop is testable with synthetic time.

use heapless::Vec;

use super::controller::{Outcome, TurnController};
use crate::config::{ConfigError, TimerConfig};
use crate::input::{ButtonEventKind, InputDebouncer};
use crate::timing::ClockError;
use crate::traits::{DigitalInput, OutputSink};

/// Most outcomes a single step can produce (press or hold, then tick)
pub const MAX_STEP_OUTCOMES: usize = 2;

/// Outcomes of one loop step
pub type StepOutcomes = Vec<Outcome, MAX_STEP_OUTCOMES>;

/// Button hold tracking for hold-to-stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    /// Button up
    Released,
    /// Button down since the given time
    Held { since_ms: u64 },
    /// Hold already stopped the session; wait for release
    Consumed,
}

/// Single-loop scheduler for the turn timer
pub struct ControlLoop<I, S> {
    input: I,
    debouncer: InputDebouncer,
    controller: TurnController<S>,
    hold: Hold,
    hold_to_stop_ms: u64,
    last_tick_ms: Option<u64>,
}

impl<I: DigitalInput, S: OutputSink> ControlLoop<I, S> {
    /// Build the loop from its collaborators
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: TimerConfig, input: I, sink: S) -> Result<Self, ConfigError> {
        let controller = TurnController::new(config, sink)?;
        Ok(Self {
            input,
            debouncer: InputDebouncer::new(config.debounce_ms),
            controller,
            hold: Hold::Released,
            hold_to_stop_ms: u64::from(config.hold_to_stop_ms),
            last_tick_ms: None,
        })
    }

    /// Turn controller
    pub fn controller(&self) -> &TurnController<S> {
        &self.controller
    }

    /// Turn controller (mutable, for explicit start/stop and sink servicing)
    pub fn controller_mut(&mut self) -> &mut TurnController<S> {
        &mut self.controller
    }

    /// Run one loop iteration at `now_ms`
    ///
    /// The first step only establishes the time base. A timestamp earlier
    /// than the previous one is reported as [`ClockError::InvalidInterval`].
    pub fn step(&mut self, now_ms: u64) -> Result<StepOutcomes, ClockError> {
        let mut outcomes = StepOutcomes::new();

        let raw_level = self.input.read();
        match self.debouncer.poll(raw_level, now_ms).map(|e| e.kind) {
            Some(ButtonEventKind::Pressed) => {
                self.hold = Hold::Held { since_ms: now_ms };
                let _ = outcomes.push(self.controller.on_button_press());
            }
            Some(ButtonEventKind::Released) => self.hold = Hold::Released,
            None => {
                if let Some(outcome) = self.check_hold(now_ms) {
                    let _ = outcomes.push(outcome);
                }
            }
        }

        let delta_ms = match self.last_tick_ms {
            Some(last) => (now_ms as i64).wrapping_sub(last as i64),
            None => 0,
        };
        if let Some(outcome) = self.controller.on_tick(delta_ms)? {
            let _ = outcomes.push(outcome);
        }
        self.last_tick_ms = Some(now_ms);

        Ok(outcomes)
    }

    /// Stop the session when the button has been held long enough
    fn check_hold(&mut self, now_ms: u64) -> Option<Outcome> {
        let Hold::Held { since_ms } = self.hold else {
            return None;
        };
        let held_ms = now_ms.saturating_sub(since_ms);
        if self.hold_to_stop_ms == 0 || held_ms < self.hold_to_stop_ms {
            return None;
        }

        self.hold = Hold::Consumed;
        self.controller.stop_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{BuzzerPattern, Cue, LedColor};
    use core::cell::Cell;

    /// Button line backed by a shared cell (true = high = released)
    struct MockLine<'a>(&'a Cell<bool>);

    impl DigitalInput for MockLine<'_> {
        fn read(&mut self) -> bool {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct CountingSink {
        led: Option<LedColor>,
        clears: u32,
    }

    impl OutputSink for CountingSink {
        fn set_led(&mut self, color: LedColor) {
            self.led = Some(color);
        }

        fn set_buzzer(&mut self, _pattern: BuzzerPattern) {}

        fn set_display(&mut self, _player: u8, _text: &str, _time_up: bool) {}

        fn clear(&mut self) {
            self.led = None;
            self.clears += 1;
        }

        fn play_cue(&mut self, _cue: Cue) {}
    }

    fn config() -> TimerConfig {
        TimerConfig {
            turn_seconds: 60,
            warning_seconds: 20,
            critical_seconds: 10,
            players: 2,
            debounce_ms: 30,
            tick_interval_ms: 10,
            hold_to_stop_ms: 2_000,
            ..Default::default()
        }
    }

    fn control_loop(line: &Cell<bool>) -> ControlLoop<MockLine<'_>, CountingSink> {
        ControlLoop::new(config(), MockLine(line), CountingSink::default()).unwrap()
    }

    /// Step every 10ms from `from` (inclusive) to `to` (exclusive)
    fn run(
        ctl: &mut ControlLoop<MockLine<'_>, CountingSink>,
        from: u64,
        to: u64,
    ) -> heapless::Vec<Outcome, 32> {
        let mut all = heapless::Vec::new();
        for t in (from..to).step_by(10) {
            for outcome in ctl.step(t).unwrap() {
                let _ = all.push(outcome);
            }
        }
        all
    }

    #[test]
    fn test_press_starts_then_advances() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);

        run(&mut ctl, 0, 100);
        assert_eq!(ctl.controller().active_player(), None);

        // First press starts the session
        line.set(false);
        let outcomes = run(&mut ctl, 100, 200);
        assert_eq!(outcomes.as_slice(), &[Outcome::SessionStarted { player: 0 }]);
        line.set(true);
        run(&mut ctl, 200, 300);

        // Second press hands over to player 1
        line.set(false);
        let outcomes = run(&mut ctl, 300, 400);
        assert_eq!(outcomes.as_slice(), &[Outcome::TurnEnded { from: 0, to: 1 }]);
        assert_eq!(ctl.controller().active_player(), Some(1));
    }

    #[test]
    fn test_clock_follows_timestamps() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);
        ctl.controller_mut().start_session();

        ctl.step(1_000).unwrap();
        ctl.step(1_020).unwrap();
        ctl.step(6_020).unwrap();

        let remaining = ctl.controller().state().turn().map(|t| t.remaining_ms());
        assert_eq!(remaining, Some(60_000 - 5_020));
    }

    #[test]
    fn test_time_going_backwards_is_an_error() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);
        ctl.controller_mut().start_session();

        ctl.step(500).unwrap();
        assert_eq!(ctl.step(499), Err(ClockError::InvalidInterval));
    }

    #[test]
    fn test_bounce_does_not_press() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);

        let samples = [(0, false), (10, true), (20, false), (30, true), (40, true), (80, true)];
        for (t, level) in samples {
            line.set(level);
            assert!(ctl.step(t).unwrap().is_empty());
        }
        assert_eq!(ctl.controller().active_player(), None);
    }

    #[test]
    fn test_hold_stops_session_once() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);
        ctl.controller_mut().start_session();

        // Press registers at t=30 (debounce), hold until well past 2s
        line.set(false);
        let outcomes = run(&mut ctl, 0, 5_000);
        assert_eq!(
            outcomes.as_slice(),
            &[
                Outcome::TurnEnded { from: 0, to: 1 },
                Outcome::SessionStopped
            ]
        );
        assert_eq!(ctl.controller().sink().clears, 1);
        assert_eq!(ctl.controller().sink().led, None);

        // Release, then a fresh press starts a new session
        line.set(true);
        run(&mut ctl, 5_000, 5_100);
        line.set(false);
        let outcomes = run(&mut ctl, 5_100, 5_200);
        assert_eq!(outcomes.as_slice(), &[Outcome::SessionStarted { player: 0 }]);
    }

    #[test]
    fn test_hold_disabled() {
        let line = Cell::new(true);
        let config = TimerConfig {
            hold_to_stop_ms: 0,
            ..config()
        };
        let mut ctl = ControlLoop::new(config, MockLine(&line), CountingSink::default()).unwrap();
        ctl.controller_mut().start_session();

        line.set(false);
        run(&mut ctl, 0, 5_000);
        assert_eq!(ctl.controller().active_player(), Some(1));
        assert_eq!(ctl.controller().sink().clears, 0);
    }

    #[test]
    fn test_expiry_reported_from_step() {
        let line = Cell::new(true);
        let mut ctl = control_loop(&line);
        ctl.controller_mut().start_session();

        ctl.step(0).unwrap();
        let outcomes = ctl.step(60_000).unwrap();
        assert_eq!(
            outcomes.as_slice(),
            &[Outcome::TimeExpired {
                player: 0,
                next: None
            }]
        );
        assert_eq!(ctl.controller().sink().led, Some(LedColor::Red));
    }
}
