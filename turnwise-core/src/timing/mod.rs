//! Turn timing

pub mod countdown;

pub use countdown::{ClockError, CountdownClock};
