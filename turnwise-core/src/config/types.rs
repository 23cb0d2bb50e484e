//! Configuration type definitions
//!
//! These types represent the timer configuration. The firmware embeds a
//! `timer.toml` file whose `[timer]` keys match the field names below.

use core::fmt;

use crate::feedback::Thresholds;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Upper bound on players (display shows "Player N" with N <= 99)
pub const MAX_PLAYERS: u8 = 99;

/// What happens when a turn's countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExpiryPolicy {
    /// Out of time but still your turn until the button is pressed
    #[default]
    AwaitPress,
    /// Hand the clock to the next player as soon as time runs out
    AutoAdvance,
}

/// Timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimerConfig {
    /// Time budget per turn (seconds)
    pub turn_seconds: u16,
    /// Remaining time at or below which feedback turns yellow (seconds)
    pub warning_seconds: u16,
    /// Remaining time at or below which feedback turns red (seconds)
    pub critical_seconds: u16,
    /// Number of players in the rotation
    pub players: u8,
    /// Button debounce window (ms)
    pub debounce_ms: u16,
    /// Control loop period (ms)
    pub tick_interval_ms: u16,
    /// Holding the button this long stops the session (ms, 0 = disabled)
    pub hold_to_stop_ms: u16,
    /// Behavior when a turn runs out of time
    pub expiry: ExpiryPolicy,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 60,
            warning_seconds: 20,
            critical_seconds: 5,
            players: 2,
            debounce_ms: 50,
            tick_interval_ms: 20,
            hold_to_stop_ms: 2000,
            expiry: ExpiryPolicy::AwaitPress,
        }
    }
}

/// Configuration errors
///
/// All of these are fatal at startup: the control loop never runs with an
/// invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Turn duration is zero
    ZeroTurnDuration,
    /// Thresholds violate `critical < warning <= turn`
    InvalidThresholds,
    /// Player count is zero or above [`MAX_PLAYERS`]
    NoPlayers,
    /// Control loop period is zero
    ZeroTickInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTurnDuration => f.write_str("turn duration must be non-zero"),
            ConfigError::InvalidThresholds => {
                f.write_str("thresholds must satisfy critical < warning <= turn duration")
            }
            ConfigError::NoPlayers => {
                write!(f, "player count must be between 1 and {}", MAX_PLAYERS)
            }
            ConfigError::ZeroTickInterval => f.write_str("tick interval must be non-zero"),
        }
    }
}

impl TimerConfig {
    /// Check the configuration invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_seconds == 0 {
            return Err(ConfigError::ZeroTurnDuration);
        }
        if self.critical_seconds >= self.warning_seconds || self.warning_seconds > self.turn_seconds
        {
            return Err(ConfigError::InvalidThresholds);
        }
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(ConfigError::NoPlayers);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Turn budget in milliseconds
    pub fn turn_duration_ms(&self) -> u32 {
        u32::from(self.turn_seconds) * 1000
    }

    /// Feedback thresholds in milliseconds
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            warning_ms: u32::from(self.warning_seconds) * 1000,
            critical_ms: u32::from(self.critical_seconds) * 1000,
        }
    }

    /// Player that follows `player` in the rotation
    pub fn next_player(&self, player: u8) -> u8 {
        // players >= 1 after validation; max(1) keeps an unvalidated config from dividing by zero
        ((u16::from(player) + 1) % u16::from(self.players.max(1))) as u8
    }
}
