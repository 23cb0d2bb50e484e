//! One-shot tone cues
//!
//! Short tone sequences played on top of the continuous buzzer pattern:
//! a per-player chirp when a turn starts and a descending run when time
//! is up. Each player gets a distinct count and pitch so the table can
//! tell by ear whose turn it is.

use heapless::Vec;

/// Longest cue in tones
pub const MAX_CUE_TONES: usize = 5;

/// Highest turn-start pitch (Hz), used for the first player
const TURN_START_BASE_HZ: u16 = 1200;
/// Pitch drop per player (Hz)
const TURN_START_STEP_HZ: u16 = 300;
/// Lowest turn-start pitch (Hz)
const TURN_START_MIN_HZ: u16 = 600;

const TIME_UP_RUN_HZ: [u16; MAX_CUE_TONES] = [1200, 1000, 800, 600, 400];

/// A single tone in a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    /// Pitch (Hz)
    pub freq_hz: u16,
    /// Sounding time (ms)
    pub on_ms: u16,
    /// Silence after the tone (ms)
    pub gap_ms: u16,
}

/// Tone cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    /// A turn began for the given player (0-based)
    TurnStart(u8),
    /// The active turn ran out of time
    TimeUp,
}

impl Cue {
    /// Tone sequence for this cue
    pub fn tones(&self) -> Vec<Tone, MAX_CUE_TONES> {
        let mut tones = Vec::new();

        match *self {
            Cue::TurnStart(player) => {
                let count = (usize::from(player) + 2).min(MAX_CUE_TONES);
                let drop = TURN_START_STEP_HZ.saturating_mul(u16::from(player));
                let freq_hz = TURN_START_BASE_HZ
                    .saturating_sub(drop)
                    .max(TURN_START_MIN_HZ);

                for _ in 0..count {
                    let _ = tones.push(Tone {
                        freq_hz,
                        on_ms: 80,
                        gap_ms: 70,
                    });
                }
            }
            Cue::TimeUp => {
                for freq_hz in TIME_UP_RUN_HZ {
                    let _ = tones.push(Tone {
                        freq_hz,
                        on_ms: 100,
                        gap_ms: 30,
                    });
                }
            }
        }

        tones
    }

    /// Total playing time (ms)
    pub fn duration_ms(&self) -> u32 {
        self.tones()
            .iter()
            .map(|t| u32::from(t.on_ms) + u32::from(t.gap_ms))
            .sum()
    }
}
