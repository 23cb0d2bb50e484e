//! Buzzer driver
//!
//! Plays the continuous [`BuzzerPattern`] cadence and one-shot [`Cue`]s on
//! any [`ToneOutput`]. Cues preempt the pattern; the pattern resumes when
//! the cue queue drains.
//!
//! Nothing here blocks: the owner calls [`Buzzer::service`] from its loop
//! and the buzzer switches tones when their time comes.

use embedded_hal::digital::OutputPin;
use heapless::{Deque, Vec};
use turnwise_core::feedback::{BuzzerPattern, Cue, Tone, MAX_CUE_TONES, PATTERN_TONE_HZ};

/// Pending cues kept before the oldest is dropped
pub const CUE_QUEUE_LEN: usize = 4;

/// Something that can sound a tone
pub trait ToneOutput {
    /// Start sounding at `freq_hz`
    fn tone(&mut self, freq_hz: u16);

    /// Stop sounding
    fn silence(&mut self);
}

/// Active buzzer on a plain GPIO pin
///
/// An active buzzer has its own oscillator, so the frequency is ignored
/// and every tone sounds the same.
pub struct PinTone<P> {
    pin: P,
}

impl<P: OutputPin> PinTone<P> {
    /// Wrap an active-high buzzer pin and drive it low
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin }
    }
}

impl<P: OutputPin> ToneOutput for PinTone<P> {
    fn tone(&mut self, _freq_hz: u16) {
        let _ = self.pin.set_high();
    }

    fn silence(&mut self) {
        let _ = self.pin.set_low();
    }
}

/// Where a cue is at a given offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CueStep {
    /// A tone is sounding at this frequency
    Tone(u16),
    /// Silent gap between tones
    Gap,
    /// Past the last tone
    Finished,
}

/// Cue being played
struct Playing {
    tones: Vec<Tone, MAX_CUE_TONES>,
    started_ms: u64,
}

impl Playing {
    /// Step due `offset_ms` into the cue
    fn step_at(&self, offset_ms: u64) -> CueStep {
        let mut at = 0u64;
        for tone in &self.tones {
            let on_end = at + u64::from(tone.on_ms);
            if offset_ms < on_end {
                return CueStep::Tone(tone.freq_hz);
            }
            at = on_end + u64::from(tone.gap_ms);
            if offset_ms < at {
                return CueStep::Gap;
            }
        }
        CueStep::Finished
    }
}

/// Pattern and cue player
pub struct Buzzer<T> {
    output: T,
    pattern: BuzzerPattern,
    /// When the current pattern began (set on first service)
    pattern_since_ms: Option<u64>,
    queue: Deque<Cue, CUE_QUEUE_LEN>,
    playing: Option<Playing>,
    /// Frequency currently sounding
    sounding: Option<u16>,
}

impl<T: ToneOutput> Buzzer<T> {
    /// Create a silent buzzer
    pub fn new(mut output: T) -> Self {
        output.silence();
        Self {
            output,
            pattern: BuzzerPattern::None,
            pattern_since_ms: None,
            queue: Deque::new(),
            playing: None,
            sounding: None,
        }
    }

    /// Select the continuous pattern
    ///
    /// The cadence restarts only when the pattern actually changes.
    pub fn set_pattern(&mut self, pattern: BuzzerPattern) {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.pattern_since_ms = None;
        }
    }

    /// Current continuous pattern
    pub fn pattern(&self) -> BuzzerPattern {
        self.pattern
    }

    /// Queue a cue; the oldest pending cue is dropped when the queue is full
    pub fn play(&mut self, cue: Cue) {
        if self.queue.is_full() {
            self.queue.pop_front();
        }
        let _ = self.queue.push_back(cue);
    }

    /// Check if a cue is playing or pending
    pub fn is_cue_active(&self) -> bool {
        self.playing.is_some() || !self.queue.is_empty()
    }

    /// Drop the pattern and every cue, and go silent
    pub fn stop(&mut self) {
        self.pattern = BuzzerPattern::None;
        self.pattern_since_ms = None;
        self.queue.clear();
        self.playing = None;
        self.sound(None);
    }

    /// Update the output for `now_ms`
    pub fn service(&mut self, now_ms: u64) {
        let freq = match self.cue_tone(now_ms) {
            Some(freq) => freq,
            None => {
                let since = *self.pattern_since_ms.get_or_insert(now_ms);
                self.pattern
                    .is_sounding(now_ms.saturating_sub(since))
                    .then_some(PATTERN_TONE_HZ)
            }
        };
        self.sound(freq);
    }

    /// Tone due from the cue queue; `None` when no cue is playing
    fn cue_tone(&mut self, now_ms: u64) -> Option<Option<u16>> {
        loop {
            if self.playing.is_none() {
                let cue = self.queue.pop_front()?;
                self.playing = Some(Playing {
                    tones: cue.tones(),
                    started_ms: now_ms,
                });
            }

            let playing = self.playing.as_ref()?;
            match playing.step_at(now_ms.saturating_sub(playing.started_ms)) {
                CueStep::Tone(freq_hz) => return Some(Some(freq_hz)),
                CueStep::Gap => return Some(None),
                // Try the next one
                CueStep::Finished => self.playing = None,
            }
        }
    }

    fn sound(&mut self, freq: Option<u16>) {
        if freq == self.sounding {
            return;
        }
        self.sounding = freq;
        match freq {
            Some(hz) => self.output.tone(hz),
            None => self.output.silence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every change of the tone output
    #[derive(Default)]
    struct MockTone {
        current: Option<u16>,
        changes: u32,
    }

    impl ToneOutput for MockTone {
        fn tone(&mut self, freq_hz: u16) {
            self.current = Some(freq_hz);
            self.changes += 1;
        }

        fn silence(&mut self) {
            self.current = None;
            self.changes += 1;
        }
    }

    #[test]
    fn test_pattern_cadence() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.set_pattern(BuzzerPattern::Beep);

        buzzer.service(5_000);
        assert_eq!(buzzer.output.current, Some(PATTERN_TONE_HZ));
        buzzer.service(5_100);
        assert_eq!(buzzer.output.current, None);
        buzzer.service(6_000);
        assert_eq!(buzzer.output.current, Some(PATTERN_TONE_HZ));
    }

    #[test]
    fn test_same_pattern_keeps_phase() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.set_pattern(BuzzerPattern::Beep);
        buzzer.service(0);
        buzzer.service(500);

        // Pushed every tick by the controller
        buzzer.set_pattern(BuzzerPattern::Beep);
        buzzer.service(600);
        assert_eq!(buzzer.output.current, None);
    }

    #[test]
    fn test_unchanged_output_not_rewritten() {
        let mut buzzer = Buzzer::new(MockTone::default());
        let initial = buzzer.output.changes;

        for t in 0..50 {
            buzzer.service(t);
        }
        assert_eq!(buzzer.output.changes, initial);
    }

    #[test]
    fn test_cue_preempts_pattern() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.set_pattern(BuzzerPattern::Alarm);
        buzzer.service(0);
        assert_eq!(buzzer.output.current, Some(PATTERN_TONE_HZ));

        // Two 1200 Hz chirps for the first player
        buzzer.play(Cue::TurnStart(0));
        buzzer.service(10);
        assert_eq!(buzzer.output.current, Some(1200));
        buzzer.service(10 + 80);
        assert_eq!(buzzer.output.current, None);
        buzzer.service(10 + 150);
        assert_eq!(buzzer.output.current, Some(1200));
        assert!(buzzer.is_cue_active());

        // Pattern resumes once the cue is done
        buzzer.service(10 + 300);
        assert!(!buzzer.is_cue_active());
        assert_eq!(
            buzzer.output.current,
            BuzzerPattern::Alarm
                .is_sounding(310)
                .then_some(PATTERN_TONE_HZ)
        );
    }

    #[test]
    fn test_cues_play_back_to_back() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.play(Cue::TimeUp);
        buzzer.play(Cue::TurnStart(1));

        buzzer.service(0);
        assert_eq!(buzzer.output.current, Some(1200));
        buzzer.service(4 * 130);
        assert_eq!(buzzer.output.current, Some(400));

        // TimeUp lasts 650 ms, then player 2's chirp at 900 Hz
        buzzer.service(650);
        assert_eq!(buzzer.output.current, Some(900));
    }

    #[test]
    fn test_cue_steps() {
        let playing = Playing {
            tones: Cue::TurnStart(1).tones(),
            started_ms: 0,
        };

        // Three 900 Hz chirps, 80 ms on and 70 ms off
        assert_eq!(playing.step_at(0), CueStep::Tone(900));
        assert_eq!(playing.step_at(79), CueStep::Tone(900));
        assert_eq!(playing.step_at(80), CueStep::Gap);
        assert_eq!(playing.step_at(150), CueStep::Tone(900));
        assert_eq!(playing.step_at(2 * 150 + 80), CueStep::Gap);
        assert_eq!(playing.step_at(3 * 150 - 1), CueStep::Gap);
        assert_eq!(playing.step_at(3 * 150), CueStep::Finished);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.play(Cue::TimeUp);
        for player in 0..CUE_QUEUE_LEN as u8 {
            buzzer.play(Cue::TurnStart(player));
        }

        buzzer.service(0);
        assert_eq!(buzzer.output.current, Some(1200));
        assert_eq!(buzzer.queue.len(), CUE_QUEUE_LEN - 1);
    }

    #[test]
    fn test_stop_silences() {
        let mut buzzer = Buzzer::new(MockTone::default());
        buzzer.set_pattern(BuzzerPattern::Alarm);
        buzzer.play(Cue::TimeUp);
        buzzer.service(0);

        buzzer.stop();
        assert_eq!(buzzer.output.current, None);
        assert!(!buzzer.is_cue_active());

        buzzer.service(1_000);
        assert_eq!(buzzer.output.current, None);
    }

    struct MockPin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    #[test]
    fn test_active_buzzer_pin() {
        let mut buzzer = Buzzer::new(PinTone::new(MockPin { high: true }));
        assert!(!buzzer.output.pin.high);

        buzzer.play(Cue::TurnStart(3));
        buzzer.service(0);
        assert!(buzzer.output.pin.high);
        buzzer.service(80);
        assert!(!buzzer.output.pin.high);
    }
}
