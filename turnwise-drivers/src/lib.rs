//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in turnwise-core for the timer's peripherals:
//!
//! - Traffic-light LEDs
//! - Piezo buzzer (pattern cadence and tone cues)
//! - HD44780 character LCD behind a PCF8574 I2C backpack
//! - Push button line
//! - Panel: all of the above behind one output sink

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod buzzer;
pub mod lcd;
pub mod led;
pub mod panel;
