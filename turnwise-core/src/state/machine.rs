//! State machine definition
//!
//! Every output the timer produces is a function of the current state.
//! Side effects live in the controller; this module only decides the next
//! state.

use super::events::Event;
use crate::config::TimerConfig;
use crate::timing::{ClockError, CountdownClock};

/// The active player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Turn {
    player: u8,
    clock: CountdownClock,
}

impl Turn {
    /// Start a fresh turn for `player` with a full budget
    pub fn new(player: u8, duration_ms: u32) -> Self {
        Self {
            player,
            clock: CountdownClock::started(duration_ms),
        }
    }

    /// Active player (0-based)
    pub fn player_index(&self) -> u8 {
        self.player
    }

    /// Turn budget (ms)
    pub fn duration_budget_ms(&self) -> u32 {
        self.clock.duration_ms()
    }

    /// Time used so far (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.clock.elapsed_ms()
    }

    /// Time left (ms)
    pub fn remaining_ms(&self) -> u32 {
        self.clock.remaining_ms()
    }

    /// Check if the turn has run out of time
    pub fn is_expired(&self) -> bool {
        self.clock.is_expired()
    }
}

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No session running; outputs neutral
    #[default]
    Idle,
    /// A player's turn is being timed
    TurnActive(Turn),
}

impl SessionState {
    /// Check if a session is running
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::TurnActive(_))
    }

    /// Current turn, if a session is running
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            SessionState::TurnActive(turn) => Some(turn),
            SessionState::Idle => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic. A negative tick interval is
    /// rejected in every state.
    pub fn transition(self, event: Event, config: &TimerConfig) -> Result<Self, ClockError> {
        use Event::*;
        use SessionState::*;

        let fresh_turn = |player| TurnActive(Turn::new(player, config.turn_duration_ms()));

        let next = match (self, event) {
            // Idle transitions; the button doubles as the start control
            (Idle, Start) | (Idle, Press) => fresh_turn(0),
            (Idle, Tick(delta_ms)) => {
                CountdownClock::check_interval(delta_ms)?;
                Idle
            }

            // A press always ends the turn, whatever time is left
            (TurnActive(turn), Press) => fresh_turn(config.next_player(turn.player)),

            // Running out of time keeps the same player; expiry policy is the controller's call
            (TurnActive(mut turn), Tick(delta_ms)) => {
                turn.clock.tick(delta_ms)?;
                TurnActive(turn)
            }

            // Already running
            (TurnActive(_), Start) => self,

            (_, Stop) => Idle,
        };

        Ok(next)
    }
}
