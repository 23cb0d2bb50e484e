//! Button input line

/// Raw digital input, polled once per loop tick
///
/// Returns the electrical level of the line. The button is wired
/// active-low with a pull-up, so a pressed button reads `false`.
pub trait DigitalInput {
    /// Read the current line level (true = high)
    fn read(&mut self) -> bool;
}

