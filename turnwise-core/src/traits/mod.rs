//! Peripheral traits
//!
//! These traits define the interface between the turn logic and the
//! board-specific peripheral drivers.

pub mod input;
pub mod output;

pub use input::DigitalInput;
pub use output::OutputSink;
