//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Begin a session with the first player
    Start,
    /// Debounced button press
    Press,
    /// Time passed since the previous tick (ms)
    Tick(i64),
    /// End the session
    Stop,
}
