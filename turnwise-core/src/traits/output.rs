//! Peripheral output sink (LEDs, buzzer, display)

use crate::feedback::{BuzzerPattern, Cue, LedColor};

/// Output peripherals driven by the turn controller
///
/// Every call is fire-and-forget and idempotent. The controller pushes the
/// full output state on every tick, so implementations must tolerate being
/// called repeatedly with unchanged values. Peripheral failures are the
/// implementation's concern and must not be reported back.
pub trait OutputSink {
    /// Light the LED for `color`
    fn set_led(&mut self, color: LedColor);

    /// Select the continuous buzzer cadence
    fn set_buzzer(&mut self, pattern: BuzzerPattern);

    /// Show the countdown for `player` (0-based)
    ///
    /// - `text`: remaining time as `M:SS`
    /// - `time_up`: the turn has run out; show the time-up indicator
    fn set_display(&mut self, player: u8, text: &str, time_up: bool);

    /// Drive every output to its neutral state (LEDs off, buzzer silent,
    /// display showing the idle banner)
    fn clear(&mut self);

    /// Play a one-shot tone cue
    fn play_cue(&mut self, _cue: Cue) {}
}
