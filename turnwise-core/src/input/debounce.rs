//! Timestamp-driven button debouncer
//!
//! Converts raw line samples into clean press/release edges. A change is
//! only accepted after the line has held the new level for the whole
//! debounce window, so contact bounce and short glitches are dropped.
//!
//! The debouncer never sleeps or reads a clock itself: the caller passes the
//! sample time, which keeps it deterministic under synthetic time.

/// Kind of debounced button edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEventKind {
    /// Button went down and stayed down for the debounce window
    Pressed,
    /// Button came up and stayed up for the debounce window
    Released,
}

/// Debounced button edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// Edge kind
    pub kind: ButtonEventKind,
    /// Time at which the edge was accepted (ms)
    pub timestamp_ms: u64,
}

/// Debouncer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Stable, button up
    Released,
    /// Stable, button down
    Pressed,
    /// Line differs from the stable level; waiting for it to settle
    Settling {
        /// Last accepted level (true = pressed)
        stable_pressed: bool,
        /// When the line first differed from the stable level
        since_ms: u64,
    },
}

/// Button debouncer for an active-low input
#[derive(Debug, Clone)]
pub struct InputDebouncer {
    window_ms: u64,
    state: State,
}

impl InputDebouncer {
    /// Create a debouncer with the given window, starting released
    pub fn new(window_ms: u16) -> Self {
        Self {
            window_ms: u64::from(window_ms),
            state: State::Released,
        }
    }

    /// Feed one raw sample
    ///
    /// - `raw_level`: electrical line level (low = pressed)
    /// - `now_ms`: sample timestamp
    ///
    /// Returns an event when a new level has been stable for the window.
    pub fn poll(&mut self, raw_level: bool, now_ms: u64) -> Option<ButtonEvent> {
        let pressed = !raw_level;

        let (stable_pressed, since_ms) = match self.state {
            State::Released if !pressed => return None,
            State::Pressed if pressed => return None,
            State::Released | State::Pressed => {
                // First sample at the new level
                let stable_pressed = self.state == State::Pressed;
                self.state = State::Settling {
                    stable_pressed,
                    since_ms: now_ms,
                };
                (stable_pressed, now_ms)
            }
            State::Settling {
                stable_pressed,
                since_ms,
            } => {
                if pressed == stable_pressed {
                    // Glitch shorter than the window: back to where we were
                    self.state = Self::stable(stable_pressed);
                    return None;
                }
                (stable_pressed, since_ms)
            }
        };

        if now_ms.saturating_sub(since_ms) < self.window_ms {
            return None;
        }

        self.state = Self::stable(!stable_pressed);
        let kind = if stable_pressed {
            ButtonEventKind::Released
        } else {
            ButtonEventKind::Pressed
        };
        Some(ButtonEvent {
            kind,
            timestamp_ms: now_ms,
        })
    }

    /// Whether the last accepted level is pressed
    pub fn is_pressed(&self) -> bool {
        match self.state {
            State::Pressed => true,
            State::Released => false,
            State::Settling { stable_pressed, .. } => stable_pressed,
        }
    }

    /// Forget any in-flight transition and return to released
    pub fn reset(&mut self) {
        self.state = State::Released;
    }

    fn stable(pressed: bool) -> State {
        if pressed {
            State::Pressed
        } else {
            State::Released
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HIGH: bool = true;
    const LOW: bool = false;

    fn pressed_count(events: impl IntoIterator<Item = Option<ButtonEvent>>) -> usize {
        events
            .into_iter()
            .flatten()
            .filter(|e| e.kind == ButtonEventKind::Pressed)
            .count()
    }

    #[test]
    fn test_clean_press_and_release() {
        let mut debouncer = InputDebouncer::new(30);

        assert_eq!(debouncer.poll(HIGH, 0), None);
        assert_eq!(debouncer.poll(LOW, 10), None);
        assert_eq!(debouncer.poll(LOW, 20), None);
        assert_eq!(
            debouncer.poll(LOW, 40),
            Some(ButtonEvent {
                kind: ButtonEventKind::Pressed,
                timestamp_ms: 40
            })
        );
        assert!(debouncer.is_pressed());

        // Holding produces nothing further
        assert_eq!(debouncer.poll(LOW, 60), None);
        assert_eq!(debouncer.poll(LOW, 500), None);

        assert_eq!(debouncer.poll(HIGH, 510), None);
        assert_eq!(
            debouncer.poll(HIGH, 540),
            Some(ButtonEvent {
                kind: ButtonEventKind::Released,
                timestamp_ms: 540
            })
        );
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_glitch_is_rejected() {
        let mut debouncer = InputDebouncer::new(30);

        // low -> high -> low, each flip inside the window
        let events = [
            debouncer.poll(LOW, 0),
            debouncer.poll(HIGH, 10),
            debouncer.poll(LOW, 20),
            debouncer.poll(HIGH, 30),
        ];
        assert_eq!(pressed_count(events), 0);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_bounce_restarts_window() {
        let mut debouncer = InputDebouncer::new(30);

        assert_eq!(debouncer.poll(LOW, 0), None);
        assert_eq!(debouncer.poll(HIGH, 5), None);
        assert_eq!(debouncer.poll(LOW, 10), None);
        // 30ms after the first low, but only 25ms after the bounce settled
        assert_eq!(debouncer.poll(LOW, 35), None);
        assert!(debouncer.poll(LOW, 40).is_some());
    }

    #[test]
    fn test_one_event_per_press() {
        let mut debouncer = InputDebouncer::new(20);
        let mut events = heapless::Vec::<Option<ButtonEvent>, 64>::new();

        for t in (0..200).step_by(10) {
            let _ = events.push(debouncer.poll(LOW, t));
        }
        assert_eq!(pressed_count(events), 1);
    }

    #[test]
    fn test_zero_window_is_immediate() {
        let mut debouncer = InputDebouncer::new(0);
        assert_eq!(
            debouncer.poll(LOW, 7).map(|e| e.kind),
            Some(ButtonEventKind::Pressed)
        );
        assert_eq!(
            debouncer.poll(HIGH, 8).map(|e| e.kind),
            Some(ButtonEventKind::Released)
        );
    }

    #[test]
    fn test_reset() {
        let mut debouncer = InputDebouncer::new(10);
        debouncer.poll(LOW, 0);
        debouncer.poll(LOW, 10);
        assert!(debouncer.is_pressed());

        debouncer.reset();
        assert!(!debouncer.is_pressed());
    }

    proptest! {
        #[test]
        fn prop_pulses_narrower_than_window_never_press(
            window in 5u16..100,
            pulses in proptest::collection::vec(1u64..5, 1..20),
        ) {
            let mut debouncer = InputDebouncer::new(window);
            let mut now = 0u64;
            let mut presses = 0;

            for width in pulses {
                // Each low pulse is shorter than the window, then released long enough to settle
                let width = width.min(u64::from(window) - 1);
                for event in [debouncer.poll(LOW, now), debouncer.poll(LOW, now + width)] {
                    if matches!(event, Some(ButtonEvent { kind: ButtonEventKind::Pressed, .. })) {
                        presses += 1;
                    }
                }
                now += width + 1;
                debouncer.poll(HIGH, now);
                now += u64::from(window) + 1;
                debouncer.poll(HIGH, now);
            }

            prop_assert_eq!(presses, 0);
        }
    }
}
