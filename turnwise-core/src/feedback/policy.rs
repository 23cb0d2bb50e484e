//! Remaining-time to output-state mapping
//!
//! `derive` is a pure function: the same remaining time and thresholds
//! always produce the same output state. It is recomputed every tick.

use core::fmt::Write;

use heapless::String;

/// Capacity of the countdown text (`M:SS`, up to 71582:48 for `u32::MAX` ms)
pub const DISPLAY_TEXT_LEN: usize = 8;

/// Countdown text buffer
pub type DisplayText = String<DISPLAY_TEXT_LEN>;

/// Period of the warning chirp (ms)
pub const BEEP_PERIOD_MS: u64 = 1000;
/// Length of each warning chirp (ms)
pub const BEEP_ON_MS: u64 = 100;
/// Period of the critical alarm (ms)
pub const ALARM_PERIOD_MS: u64 = 300;
/// On-time of each alarm pulse (ms)
pub const ALARM_ON_MS: u64 = 150;
/// Tone used for the continuous patterns (Hz)
pub const PATTERN_TONE_HZ: u16 = 1000;

/// LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Green,
    Yellow,
    Red,
}

/// Continuous buzzer cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerPattern {
    /// Silent
    #[default]
    None,
    /// One short chirp per second
    Beep,
    /// Fast on/off pulsing
    Alarm,
}

impl BuzzerPattern {
    /// Whether the buzzer should sound `phase_ms` after the pattern began
    pub fn is_sounding(&self, phase_ms: u64) -> bool {
        match self {
            BuzzerPattern::None => false,
            BuzzerPattern::Beep => phase_ms % BEEP_PERIOD_MS < BEEP_ON_MS,
            BuzzerPattern::Alarm => phase_ms % ALARM_PERIOD_MS < ALARM_ON_MS,
        }
    }
}

/// Remaining-time cutoffs (ms)
///
/// Configuration validation guarantees `critical_ms < warning_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub warning_ms: u32,
    pub critical_ms: u32,
}

/// Desired peripheral state for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    pub led_color: LedColor,
    pub buzzer_pattern: BuzzerPattern,
    /// Remaining time as `M:SS`
    pub display_text: DisplayText,
    /// The turn has run out
    pub time_up: bool,
}

/// Derive the output state for `remaining_ms`
pub fn derive(remaining_ms: u32, thresholds: Thresholds) -> OutputState {
    let (led_color, buzzer_pattern) = if remaining_ms > thresholds.warning_ms {
        (LedColor::Green, BuzzerPattern::None)
    } else if remaining_ms > thresholds.critical_ms {
        (LedColor::Yellow, BuzzerPattern::Beep)
    } else {
        (LedColor::Red, BuzzerPattern::Alarm)
    };

    OutputState {
        led_color,
        buzzer_pattern,
        display_text: format_remaining(remaining_ms),
        time_up: remaining_ms == 0,
    }
}

/// Format a remaining time as `M:SS`
///
/// Seconds are rounded up so `0:00` is only ever shown at expiry.
pub fn format_remaining(remaining_ms: u32) -> DisplayText {
    let total_s = (u64::from(remaining_ms) + 999) / 1000;
    let mut text = DisplayText::new();
    // Capacity covers the largest u32 input
    let _ = write!(text, "{}:{:02}", total_s / 60, total_s % 60);
    text
}
