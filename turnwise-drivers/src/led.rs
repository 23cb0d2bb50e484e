//! Traffic-light LEDs
//!
//! Three discrete LEDs (green, yellow, red) on GPIO pins, directly or via
//! transistors. At most one is lit at a time.

use embedded_hal::digital::OutputPin;
use turnwise_core::feedback::LedColor;

/// Half-period of the red blink while time is up (ms)
pub const BLINK_HALF_PERIOD_MS: u64 = 150;

/// Traffic-light LED bank
///
/// The pins can be configured as active-high (default) or active-low.
/// Pin errors are ignored.
pub struct TrafficLight<G, Y, R> {
    green: G,
    yellow: Y,
    red: R,
    /// If true, LED ON = pin LOW
    inverted: bool,
    /// Color currently selected (None = all off)
    color: Option<LedColor>,
    /// Red blinks instead of staying lit
    blinking: bool,
    /// Red pin state while blinking
    blink_on: bool,
}

impl<G: OutputPin, Y: OutputPin, R: OutputPin> TrafficLight<G, Y, R> {
    /// Create a new LED bank with every LED off
    ///
    /// # Arguments
    /// - `inverted`: If true, LEDs are ON when their pin is LOW
    pub fn new(green: G, yellow: Y, red: R, inverted: bool) -> Self {
        let mut light = Self {
            green,
            yellow,
            red,
            inverted,
            color: None,
            blinking: false,
            blink_on: false,
        };
        light.off();
        light
    }

    /// Create a new LED bank with active-high outputs
    pub fn new_active_high(green: G, yellow: Y, red: R) -> Self {
        Self::new(green, yellow, red, false)
    }

    /// Create a new LED bank with active-low outputs
    pub fn new_active_low(green: G, yellow: Y, red: R) -> Self {
        Self::new(green, yellow, red, true)
    }

    /// Light exactly the LED for `color`
    pub fn show(&mut self, color: LedColor) {
        if self.color == Some(color) {
            return;
        }
        self.color = Some(color);
        self.blink_on = true;
        self.apply();
    }

    /// Turn every LED off and stop blinking
    pub fn off(&mut self) {
        self.color = None;
        self.blinking = false;
        self.blink_on = false;
        self.apply();
    }

    /// Make the red LED blink (only visible while red is selected)
    pub fn set_blinking(&mut self, blinking: bool) {
        if self.blinking == blinking {
            return;
        }
        self.blinking = blinking;
        self.blink_on = true;
        self.apply();
    }

    /// Advance the blink phase
    pub fn service(&mut self, now_ms: u64) {
        if !self.blinking || self.color != Some(LedColor::Red) {
            return;
        }
        let on = (now_ms / BLINK_HALF_PERIOD_MS) % 2 == 0;
        if on != self.blink_on {
            self.blink_on = on;
            self.apply();
        }
    }

    /// Currently selected color
    pub fn color(&self) -> Option<LedColor> {
        self.color
    }

    fn apply(&mut self) {
        let green = self.color == Some(LedColor::Green);
        let yellow = self.color == Some(LedColor::Yellow);
        let red = self.color == Some(LedColor::Red) && (!self.blinking || self.blink_on);

        let inverted = self.inverted;
        drive(&mut self.green, green, inverted);
        drive(&mut self.yellow, yellow, inverted);
        drive(&mut self.red, red, inverted);
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, inverted: bool) {
    // Normal: on=true, inverted=false → high
    // Inverted: on=true, inverted=true → low
    let _ = if on != inverted {
        pin.set_high()
    } else {
        pin.set_low()
    };
}
