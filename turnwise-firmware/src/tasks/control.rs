//! Control task
//!
//! Runs the turn timer's control loop on a fixed ticker:
//! - Poll and debounce the button
//! - Advance the countdown by the measured interval
//! - Push LED, buzzer and display state to the panel
//! - Service blink and buzzer cadence

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use turnwise_core::session::{ControlLoop, Outcome};

use crate::board::{Button, TimerPanel};

/// Control task - owns the controller and every peripheral
#[embassy_executor::task]
pub async fn control_task(mut control: ControlLoop<Button, TimerPanel>, tick_interval_ms: u16) {
    info!("Control task started ({}ms tick)", tick_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(tick_interval_ms)));
    let mut fault_reported = false;

    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis();

        match control.step(now_ms) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    log_outcome(outcome);
                }
            }
            Err(e) => {
                // Time source is broken; leave the outputs neutral and halt
                control.controller_mut().stop_session();
                defmt::panic!("Clock fault: {}", e);
            }
        }

        let panel = control.controller_mut().sink_mut();
        panel.service(now_ms);

        if panel.display_fault() && !fault_reported {
            warn!("LCD write failed, display may be stale");
            fault_reported = true;
        }
    }
}

fn log_outcome(outcome: Outcome) {
    match outcome {
        Outcome::SessionStarted { player } => info!("Session started, player {}", player + 1),
        Outcome::TurnEnded { from, to } => debug!("Turn ended: player {} -> {}", from + 1, to + 1),
        Outcome::TimeExpired { player, next: None } => info!("Player {} out of time", player + 1),
        Outcome::TimeExpired {
            player,
            next: Some(next),
        } => info!("Player {} out of time, player {} up", player + 1, next + 1),
        Outcome::SessionStopped => info!("Session stopped"),
    }
}
