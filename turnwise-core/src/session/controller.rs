//! Turn controller
//!
//! Owns the session state and applies it to the output sink:
//! - Starts, advances and stops sessions
//! - Advances the active countdown on every tick
//! - Derives the feedback state and pushes it to the sink
//! - Applies the expiry policy and plays tone cues
//!
//! The controller performs no I/O beyond the [`OutputSink`] boundary.

use crate::config::{ConfigError, ExpiryPolicy, TimerConfig};
use crate::feedback::{derive, Cue, OutputState};
use crate::state::{Event, SessionState};
use crate::timing::ClockError;
use crate::traits::OutputSink;

/// What a controller operation changed, for logging by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A session began with `player`
    SessionStarted { player: u8 },
    /// A press ended `from`'s turn and handed the clock to `to`
    TurnEnded { from: u8, to: u8 },
    /// `player` ran out of time; `next` is set when the clock moved on by itself
    TimeExpired { player: u8, next: Option<u8> },
    /// The session was stopped and outputs cleared
    SessionStopped,
}

/// Turn controller for a single session
pub struct TurnController<S> {
    config: TimerConfig,
    state: SessionState,
    /// Last output pushed to the sink (None while idle)
    output: Option<OutputState>,
    sink: S,
}

impl<S: OutputSink> TurnController<S> {
    /// Create an idle controller
    ///
    /// Fails if the configuration is invalid; the caller must not enter the
    /// control loop in that case.
    pub fn new(config: TimerConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::Idle,
            output: None,
            sink,
        })
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active player, if a session is running
    pub fn active_player(&self) -> Option<u8> {
        self.state.turn().map(|t| t.player_index())
    }

    /// Last output state pushed to the sink
    pub fn output(&self) -> Option<&OutputState> {
        self.output.as_ref()
    }

    /// Session configuration
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Output sink (mutable, for peripheral servicing)
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Start a session with the first player
    ///
    /// Does nothing if a session is already running.
    pub fn start_session(&mut self) -> Option<Outcome> {
        if self.state.is_active() {
            return None;
        }

        self.apply(Event::Start);
        self.push_output();
        self.sink.play_cue(Cue::TurnStart(0));
        Some(Outcome::SessionStarted { player: 0 })
    }

    /// Handle a debounced button press
    ///
    /// While a turn is active the press ends it immediately, whatever time is
    /// left, and the next player starts with a full budget. While idle the
    /// press starts the session.
    pub fn on_button_press(&mut self) -> Outcome {
        let Some(from) = self.active_player() else {
            return self
                .start_session()
                .unwrap_or(Outcome::SessionStarted { player: 0 });
        };

        self.apply(Event::Press);
        let to = self.config.next_player(from);
        self.push_output();
        self.sink.play_cue(Cue::TurnStart(to));
        Outcome::TurnEnded { from, to }
    }

    /// Advance the active countdown by `delta_ms`
    ///
    /// Pushes the derived output state to the sink on every call while a
    /// session runs. A negative interval means the time source is broken and
    /// is returned as an error without touching any state.
    pub fn on_tick(&mut self, delta_ms: i64) -> Result<Option<Outcome>, ClockError> {
        let before = self.state.turn().copied();
        self.state = self.state.transition(Event::Tick(delta_ms), &self.config)?;

        let (Some(before), Some(after)) = (before, self.state.turn().copied()) else {
            return Ok(None);
        };

        if before.is_expired() || !after.is_expired() {
            self.push_output();
            return Ok(None);
        }

        // Newly out of time
        let player = after.player_index();
        self.sink.play_cue(Cue::TimeUp);

        let next = match self.config.expiry {
            ExpiryPolicy::AwaitPress => None,
            ExpiryPolicy::AutoAdvance => {
                self.apply(Event::Press);
                Some(self.config.next_player(player))
            }
        };

        self.push_output();
        if let Some(next) = next {
            self.sink.play_cue(Cue::TurnStart(next));
        }

        Ok(Some(Outcome::TimeExpired { player, next }))
    }

    /// Stop the session from any state
    ///
    /// Outputs are driven to neutral with a single `clear` call.
    pub fn stop_session(&mut self) -> Option<Outcome> {
        let was_active = self.state.is_active();

        self.apply(Event::Stop);
        self.output = None;
        self.sink.clear();

        was_active.then_some(Outcome::SessionStopped)
    }

    /// Apply a non-tick event
    fn apply(&mut self, event: Event) {
        // Only ticks can fail a transition
        if let Ok(next) = self.state.transition(event, &self.config) {
            self.state = next;
        }
    }

    /// Derive the output for the active turn and push all of it to the sink
    fn push_output(&mut self) {
        let Some(turn) = self.state.turn().copied() else {
            return;
        };

        let output = derive(turn.remaining_ms(), self.config.thresholds());
        self.sink.set_led(output.led_color);
        self.sink.set_buzzer(output.buzzer_pattern);
        self.sink
            .set_display(turn.player_index(), &output.display_text, output.time_up);
        self.output = Some(output);
    }
}
