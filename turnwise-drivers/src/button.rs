//! Push button input line
//!
//! Wraps an `embedded-hal` input pin as the core's [`DigitalInput`]. The
//! button pulls the line low when pressed.

use embedded_hal::digital::InputPin;
use turnwise_core::traits::DigitalInput;

/// Button on a GPIO input
pub struct ButtonLine<P> {
    pin: P,
}

impl<P: InputPin> ButtonLine<P> {
    /// Wrap a pin already configured with a pull-up
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> DigitalInput for ButtonLine<P> {
    fn read(&mut self) -> bool {
        // A failed read looks like a released button
        self.pin.is_high().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Mock input pin; `None` fails the read
    struct MockPin {
        level: Option<bool>,
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.level.ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[test]
    fn test_reads_level() {
        let mut line = ButtonLine::new(MockPin { level: Some(false) });
        assert!(!line.read());

        line.pin.level = Some(true);
        assert!(line.read());
    }

    #[test]
    fn test_read_error_is_released() {
        let mut line = ButtonLine::new(MockPin { level: None });
        assert!(line.read());
    }
}
