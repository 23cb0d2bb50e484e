//! Session control
//!
//! [`TurnController`] applies state transitions to the outputs and
//! [`ControlLoop`] drives it from the button line and a monotonic clock.

pub mod controller;
pub mod runner;

pub use controller::{Outcome, TurnController};
pub use runner::{ControlLoop, StepOutcomes, MAX_STEP_OUTCOMES};
