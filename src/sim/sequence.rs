//! Tile sequence and timed playback

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::TimingProfile;

/// The growing list of tiles the player must reproduce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    tiles: Vec<u8>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear back to empty (new game)
    pub fn reset(&mut self) {
        self.tiles.clear();
    }

    /// Append one tile drawn uniformly from `[0, grid_size)` and return it
    pub fn extend<R: Rng + ?Sized>(&mut self, grid_size: u8, rng: &mut R) -> u8 {
        let tile = rng.random_range(0..grid_size);
        self.tiles.push(tile);
        tile
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.tiles.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Timed playback of the current tiles
    ///
    /// The returned iterator owns a snapshot, so extending the sequence
    /// afterwards does not change an in-flight playback.
    pub fn playback(&self, profile: TimingProfile) -> Playback {
        Playback {
            tiles: self.tiles.clone(),
            profile,
            cursor: 0,
        }
    }
}

/// What happens at a playback step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Tile `index` of the sequence lights up
    TileOn { index: usize, tile: u8 },
    /// Tile `index` of the sequence goes dark
    TileOff { index: usize, tile: u8 },
    /// Playback is over, input may begin
    Finished,
}

/// A cue and its offset from the start of playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStep {
    pub offset_ms: u64,
    pub cue: Cue,
}

/// Finite, non-restartable playback timeline
///
/// One `step_interval` pause, then for each tile: lit for `highlight_ms`,
/// dark for `step_interval / 2`. Ends with a single `Finished` step.
#[derive(Debug, Clone)]
pub struct Playback {
    tiles: Vec<u8>,
    profile: TimingProfile,
    cursor: usize,
}

impl Playback {
    fn slot_ms(&self) -> u64 {
        self.profile.highlight_ms + self.profile.gap_ms()
    }

    /// Offset of the `Finished` step
    pub fn duration_ms(&self) -> u64 {
        self.profile.step_interval_ms + self.tiles.len() as u64 * self.slot_ms()
    }

    fn total_steps(&self) -> usize {
        self.tiles.len() * 2 + 1
    }
}

impl Iterator for Playback {
    type Item = PlaybackStep;

    fn next(&mut self) -> Option<PlaybackStep> {
        if self.cursor >= self.total_steps() {
            return None;
        }
        let step = self.cursor;
        self.cursor += 1;

        if step == self.total_steps() - 1 {
            return Some(PlaybackStep {
                offset_ms: self.duration_ms(),
                cue: Cue::Finished,
            });
        }

        let index = step / 2;
        let tile = self.tiles[index];
        let on_at = self.profile.step_interval_ms + index as u64 * self.slot_ms();
        let item = if step % 2 == 0 {
            PlaybackStep {
                offset_ms: on_at,
                cue: Cue::TileOn { index, tile },
            }
        } else {
            PlaybackStep {
                offset_ms: on_at + self.profile.highlight_ms,
                cue: Cue::TileOff { index, tile },
            }
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_steps().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Playback {}
