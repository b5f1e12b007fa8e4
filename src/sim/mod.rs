//! Deterministic game simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `GameSession::tick`
//! - Seeded RNG only
//! - No audio, storage or platform dependencies (effects leave as `GameEvent`s)

pub mod daily;
pub mod schedule;
pub mod sequence;
pub mod state;
pub mod tick;
pub mod validator;

pub use daily::{
    DailyTask, DailyTaskEngine, DailyTaskRecord, DateKey, TASK_TEMPLATES, TaskKind, TaskOrigin,
    TaskProgress, TaskStats, TaskTemplate,
};
pub use schedule::{Continuation, Scheduler};
pub use sequence::{Cue, Playback, PlaybackStep, Sequence};
pub use state::{GameEvent, GamePhase, Session};
pub use tick::{GameInput, GameSession};
pub use validator::{InputValidator, Verdict};
