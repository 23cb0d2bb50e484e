//! Turnwise - Tabletop Turn Timer Firmware
//!
//! Main firmware binary for RP2040-based turn timers. One button hands the
//! clock to the next player; LEDs, a buzzer and a 16x2 LCD show how much
//! of the turn is left.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use turnwise_core::config::parse_config;
use turnwise_core::session::ControlLoop;

/// Embedded configuration (compiled into firmware)
/// Edit timer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../timer.toml");

mod board;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Turnwise firmware starting...");

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse timer.toml: {}", e);
            park().await
        }
    };
    if let Err(e) = config.validate() {
        error!("Invalid timer configuration: {}", e);
        park().await
    }
    info!(
        "Configuration loaded: {} players, {}s turns (warning {}s, critical {}s), expiry {}",
        config.players,
        config.turn_seconds,
        config.warning_seconds,
        config.critical_seconds,
        config.expiry
    );

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let (button, panel) = board::init(p);
    info!("Peripherals initialized");

    let control = match ControlLoop::new(config, button, panel) {
        Ok(control) => control,
        Err(e) => {
            error!("Invalid timer configuration: {}", e);
            park().await
        }
    };

    spawner
        .spawn(tasks::control_task(control, config.tick_interval_ms))
        .unwrap();

    info!("Control task spawned, press the button to start");
}

/// Never enter the control loop; idle forever
async fn park() -> ! {
    loop {
        embassy_time::Timer::after_secs(60).await;
    }
}
