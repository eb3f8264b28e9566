//! Frequency guessing game
//!
//! A round sounds a hidden target tone; the player stops it with the button
//! and is shown how far the sounded frequency was from the target.

use crate::hal::Entropy;

/// Target uniformly in `[0, max_hz)` (multiply-shift, no modulo bias
/// beyond one part in 2^32).
pub fn pick_target<E: Entropy>(rng: &mut E, max_hz: u32) -> u32 {
    ((rng.next_u32() as u64 * max_hz as u64) >> 32) as u32
}

/// One armed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRound {
    pub target_hz: u32,
}

/// Result shown after the tone stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameScore {
    pub target_hz: u32,
    pub sounded_hz: u32,
    pub difference_hz: u32,
}

impl GameRound {
    pub fn new(target_hz: u32) -> Self {
        Self { target_hz }
    }

    /// Score against the frequency that was actually sounding.
    pub fn score(&self, sounded_hz: u32) -> GameScore {
        GameScore {
            target_hz: self.target_hz,
            sounded_hz,
            difference_hz: sounded_hz.abs_diff(self.target_hz),
        }
    }
}
