//! Raspberry Pi Pico board wiring
//!
//! | Function      | Pin    | Peripheral      |
//! |---------------|--------|-----------------|
//! | Button        | GPIO17 | input, pull-up  |
//! | Green LED     | GPIO13 | output          |
//! | Yellow LED    | GPIO14 | output          |
//! | Red LED       | GPIO15 | output          |
//! | Buzzer        | GPIO18 | PWM slice 1, A  |
//! | LCD SDA       | GPIO4  | I2C0            |
//! | LCD SCL       | GPIO5  | I2C0            |

use defmt::*;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Blocking, Config as I2cConfig, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::Peripherals;
use embassy_time::Delay;
use fixed::traits::ToFixed;

use turnwise_drivers::button::ButtonLine;
use turnwise_drivers::buzzer::{Buzzer, ToneOutput};
use turnwise_drivers::lcd::{Lcd, DEFAULT_ADDRESS};
use turnwise_drivers::led::TrafficLight;
use turnwise_drivers::panel::Panel;

/// PWM input clock (system clock)
const PWM_CLOCK_HZ: u32 = 125_000_000;
/// PWM clock divider; puts the audible range within a 16-bit counter
const PWM_DIVIDER: u8 = 64;
/// Lowest tone the divider can reach
const MIN_TONE_HZ: u16 = 30;

pub type Light = TrafficLight<Output<'static>, Output<'static>, Output<'static>>;
pub type Display = Lcd<I2c<'static, I2C0, Blocking>, Delay>;
pub type TimerPanel = Panel<Light, PwmTone, Display>;
pub type Button = ButtonLine<Input<'static>>;

/// Passive piezo on a PWM channel (square wave at the tone frequency)
pub struct PwmTone {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmTone {
    /// Take the PWM channel and start silent
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.to_fixed();
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }

    /// Counter wrap value for `freq_hz`
    fn top_for(freq_hz: u16) -> u16 {
        let ticks = PWM_CLOCK_HZ / u32::from(PWM_DIVIDER) / u32::from(freq_hz.max(MIN_TONE_HZ));
        ticks.saturating_sub(1).min(u32::from(u16::MAX)) as u16
    }
}

impl ToneOutput for PwmTone {
    fn tone(&mut self, freq_hz: u16) {
        let top = Self::top_for(freq_hz);
        self.config.top = top;
        // 50% duty
        self.config.compare_a = top / 2;
        self.pwm.set_config(&self.config);
    }

    fn silence(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}

/// Bring up every peripheral the timer uses
///
/// An LCD that fails to initialize is reported and otherwise ignored; the
/// panel keeps the timer running without it.
pub fn init(p: Peripherals) -> (Button, TimerPanel) {
    let button = ButtonLine::new(Input::new(p.PIN_17, Pull::Up));

    let light = TrafficLight::new_active_high(
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    );

    let pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, PwmConfig::default());
    let buzzer = Buzzer::new(PwmTone::new(pwm));

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, I2cConfig::default());
    let mut lcd = Lcd::new(i2c, Delay, DEFAULT_ADDRESS);
    match lcd.init() {
        Ok(()) => info!("LCD ready at {:#x}", DEFAULT_ADDRESS),
        Err(e) => warn!("LCD init failed: {}", e),
    }

    (button, Panel::new(light, buzzer, lcd))
}
