//! Tile Echo - A repeat-the-sequence memory game
//!
//! Core modules:
//! - `sim`: Deterministic game state machine (sequence, playback, input, daily task)
//! - `tuning`: Difficulty-driven timing profiles
//! - `palette`: Tile colors and tone assignments
//! - `persistence`: Flat key/value store gateway
//! - `platform`: Clock and host abstraction
//! - `app`: Shell wiring the simulation to audio, storage and host

pub mod app;
pub mod audio;
pub mod highscores;
pub mod palette;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::{App, Snapshot};
pub use highscores::BestRecord;
pub use settings::{Difficulty, GameMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Number of tiles on the board (3x3 grid)
    pub const GRID_SIZE: u8 = 9;

    /// Points awarded per completed level (multiplied by the level number)
    pub const POINTS_PER_LEVEL: u64 = 10;
    /// One-time bonus when the daily task completes
    pub const TASK_BONUS: u64 = 500;

    /// Splash delay before the start screen, with or without a host
    pub const LOADING_DELAY_MS: u64 = 1200;
    /// Pre-roll between pressing start and the first tile
    pub const START_DELAY_MS: u64 = 500;
    /// Success pause between a completed round and the next level
    pub const ROUND_PAUSE_MS: u64 = 800;
    /// Shake/cue window before a zen replay starts
    pub const ZEN_RETRY_DELAY_MS: u64 = 1000;
}
