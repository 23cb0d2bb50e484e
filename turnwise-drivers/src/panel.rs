//! Front panel
//!
//! Composes the LEDs, buzzer and character display into the core's
//! [`OutputSink`]. The controller pushes the full state every tick; the
//! panel only touches hardware when something actually changed.

use core::fmt::Write;

use heapless::String;
use turnwise_core::feedback::{BuzzerPattern, Cue, LedColor};
use turnwise_core::traits::OutputSink;

use crate::buzzer::{Buzzer, ToneOutput};
use crate::lcd::{Lcd, COLUMNS, ROWS};
use crate::led::TrafficLight;

/// One display line
pub type Line = String<COLUMNS>;

const IDLE_BANNER: [&str; 2] = ["Press to start", "   Game Timer"];
const TIME_UP_BANNER: [&str; 2] = ["   TIME IS UP", "Press for next"];

/// LED bank as seen by the panel
pub trait Light {
    /// Light the LED for `color`
    fn show(&mut self, color: LedColor);

    /// Everything off
    fn off(&mut self);

    /// Blink the red LED
    fn set_blinking(&mut self, blinking: bool);

    /// Advance the blink phase
    fn service(&mut self, now_ms: u64);
}

impl<G, Y, R> Light for TrafficLight<G, Y, R>
where
    G: embedded_hal::digital::OutputPin,
    Y: embedded_hal::digital::OutputPin,
    R: embedded_hal::digital::OutputPin,
{
    fn show(&mut self, color: LedColor) {
        TrafficLight::show(self, color);
    }

    fn off(&mut self) {
        TrafficLight::off(self);
    }

    fn set_blinking(&mut self, blinking: bool) {
        TrafficLight::set_blinking(self, blinking);
    }

    fn service(&mut self, now_ms: u64) {
        TrafficLight::service(self, now_ms);
    }
}

/// Line-oriented text display
pub trait TextDisplay {
    type Error;

    /// Replace the contents of `row`
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Self::Error>;
}

impl<I2C, D> TextDisplay for Lcd<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    type Error = I2C::Error;

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Self::Error> {
        Lcd::write_line(self, row, text)
    }
}

/// Front panel output sink
pub struct Panel<L, T, D> {
    light: L,
    buzzer: Buzzer<T>,
    display: D,
    /// Text last written successfully per row (None = unknown)
    shown: [Option<Line>; ROWS as usize],
    /// A display write has failed
    fault: bool,
}

impl<L, T, D> Panel<L, T, D>
where
    L: Light,
    T: ToneOutput,
    D: TextDisplay,
{
    /// Create the panel and show the idle banner
    ///
    /// The display must already be initialized.
    pub fn new(light: L, buzzer: Buzzer<T>, display: D) -> Self {
        let mut panel = Self {
            light,
            buzzer,
            display,
            shown: [None, None],
            fault: false,
        };
        panel.show_lines(IDLE_BANNER);
        panel
    }

    /// Drive blink and buzzer cadence; call every loop iteration
    pub fn service(&mut self, now_ms: u64) {
        self.light.service(now_ms);
        self.buzzer.service(now_ms);
    }

    /// Check if any display write has failed since boot
    pub fn display_fault(&self) -> bool {
        self.fault
    }

    /// Text currently on the display
    pub fn lines(&self) -> [&str; 2] {
        [
            self.shown[0].as_deref().unwrap_or(""),
            self.shown[1].as_deref().unwrap_or(""),
        ]
    }

    fn show_lines(&mut self, lines: [&str; 2]) {
        for (row, text) in lines.into_iter().enumerate() {
            self.show_line(row, text);
        }
    }

    /// Redraw `row` if its text changed
    fn show_line(&mut self, row: usize, text: &str) {
        if self.shown[row].as_deref() == Some(text) {
            return;
        }

        match self.display.write_line(row as u8, text) {
            Ok(()) => {
                let mut line = Line::new();
                let _ = line.push_str(text);
                self.shown[row] = Some(line);
            }
            Err(_) => {
                self.fault = true;
                self.shown[row] = None;
            }
        }
    }
}

impl<L, T, D> OutputSink for Panel<L, T, D>
where
    L: Light,
    T: ToneOutput,
    D: TextDisplay,
{
    fn set_led(&mut self, color: LedColor) {
        self.light.show(color);
    }

    fn set_buzzer(&mut self, pattern: BuzzerPattern) {
        self.buzzer.set_pattern(pattern);
    }

    fn set_display(&mut self, player: u8, text: &str, time_up: bool) {
        self.light.set_blinking(time_up);

        if time_up {
            self.show_lines(TIME_UP_BANNER);
            return;
        }

        let mut title = Line::new();
        let _ = write!(title, "Player {}", u16::from(player) + 1);
        let mut time = Line::new();
        let _ = write!(time, "Time: {}", text);
        self.show_lines([title.as_str(), time.as_str()]);
    }

    fn clear(&mut self) {
        self.light.off();
        self.buzzer.stop();
        self.show_lines(IDLE_BANNER);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.buzzer.play(cue);
    }
}
