//! Difficulty-driven timing

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Playback timing for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingProfile {
    /// Pause before the first tile; half of it separates consecutive tiles
    pub step_interval_ms: u64,
    /// How long each tile stays lit
    pub highlight_ms: u64,
}

impl TimingProfile {
    /// Dark gap after each highlight
    pub fn gap_ms(&self) -> u64 {
        self.step_interval_ms / 2
    }
}

/// Timing profile for a difficulty
pub fn profile_for(difficulty: Difficulty) -> TimingProfile {
    match difficulty {
        Difficulty::Easy => TimingProfile {
            step_interval_ms: 800,
            highlight_ms: 500,
        },
        Difficulty::Medium => TimingProfile {
            step_interval_ms: 600,
            highlight_ms: 350,
        },
        Difficulty::Hard => TimingProfile {
            step_interval_ms: 400,
            highlight_ms: 220,
        },
    }
}
