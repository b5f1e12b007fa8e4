//! Session state and emitted events
//!
//! Everything the visual surface needs to draw a frame lives in `Session`.

use serde::{Deserialize, Serialize};

use super::daily::DailyTask;
use super::sequence::Sequence;
use super::validator::InputValidator;
use crate::audio::SoundEffect;
use crate::settings::{Difficulty, GameMode};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Splash, waiting for the host (or the fallback delay)
    Loading,
    /// Title screen, waiting for the player to start
    Start,
    /// The machine is talking: pre-roll, playback, success pause, zen retry
    Showing,
    /// Accepting taps
    Playing,
    /// Classic run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::Start => "start",
            GamePhase::Showing => "showing",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
        }
    }

    /// A run is in progress
    pub fn in_run(&self) -> bool {
        matches!(self, GamePhase::Showing | GamePhase::Playing)
    }
}

/// The live game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub sequence: Sequence,
    /// Taps for the current round
    pub validator: InputValidator,
    /// Number of tiles shown this round
    pub level: u32,
    /// Classic only
    pub score: u64,
    /// Rounds completed back to back this run
    pub consecutive_levels: u32,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub palette: usize,
    /// Tile currently lit by playback
    pub active_tile: Option<u8>,
    /// Set when the daily task completed during this run
    pub task_just_completed: bool,
}

impl Session {
    pub fn new(mode: GameMode, difficulty: Difficulty, palette: usize) -> Self {
        Self {
            phase: GamePhase::Loading,
            sequence: Sequence::new(),
            validator: InputValidator::new(),
            level: 0,
            score: 0,
            consecutive_levels: 0,
            mode,
            difficulty,
            palette,
            active_tile: None,
            task_just_completed: false,
        }
    }
}

/// Things that happened during a call into the session
///
/// The shell drains these to drive audio, storage and the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Loading finished, the start screen is up
    Loaded,
    /// Playback lit a tile
    TileLit { tile: u8, tone: usize },
    /// Playback dimmed a tile
    TileDimmed { tile: u8 },
    /// Playback finished, input is open
    InputOpened,
    /// Player tapped the right tile
    TilePressed { tile: u8, tone: usize },
    /// Sound effect cue
    Effect(SoundEffect),
    /// A new level began
    LevelStarted { level: u32 },
    /// The whole sequence was reproduced
    RoundComplete { level: u32, score: u64 },
    /// Zen mistake, the sequence will replay
    ZenMistake { level: u32 },
    /// Classic run ended
    GameOver { score: u64, new_high_score: bool },
    /// High score or best zen depth changed
    RecordsChanged,
    /// Daily task changed (progress, completion, or a new day)
    TaskChanged,
    /// Daily task reached its target
    TaskCompleted { task: DailyTask, bonus: u64 },
}
