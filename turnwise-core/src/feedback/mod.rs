//! Feedback policy
//!
//! Maps the remaining turn time to what the player should see and hear.

pub mod cue;
pub mod policy;

pub use cue::{Cue, Tone, MAX_CUE_TONES};
pub use policy::{
    derive, format_remaining, BuzzerPattern, DisplayText, LedColor, OutputState, Thresholds,
    ALARM_ON_MS, ALARM_PERIOD_MS, BEEP_ON_MS, BEEP_PERIOD_MS, PATTERN_TONE_HZ,
};
