//! Board-agnostic core logic for the turn timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Peripheral traits (button input, output sink)
//! - Button debouncing
//! - Per-turn countdown clock
//! - Feedback policy (LED color, buzzer cadence, display text, tone cues)
//! - Session state machine and turn controller
//! - Control loop tying the above to an injected time source
//! - Configuration type definitions and validation

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod feedback;
pub mod input;
pub mod session;
pub mod state;
pub mod timing;
pub mod traits;
