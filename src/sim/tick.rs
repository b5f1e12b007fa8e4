//! Session state machine
//!
//! `GameSession` owns the session, best records and today's task. Time only
//! moves through `tick(now_ms)`, which runs every continuation that has
//! come due. Anything the outside world should react to is pushed onto an
//! event queue and drained by the caller.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::daily::{DailyTaskEngine, DailyTaskRecord, DateKey, TaskOrigin, TaskProgress, TaskStats};
use super::schedule::{Continuation, Scheduler};
use super::sequence::Cue;
use super::state::{GameEvent, GamePhase, Session};
use super::validator::Verdict;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::highscores::BestRecord;
use crate::palette::{self, PALETTE_COUNT};
use crate::settings::{Difficulty, GameMode, Settings};
use crate::tuning::profile_for;

/// Commands accepted by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    /// Advance the session clock
    Tick { now_ms: u64 },
    /// Start (or restart) a run
    Start,
    /// Player tapped a tile
    Tap(u8),
    SetDifficulty(Difficulty),
    SetMode(GameMode),
    SetPalette(usize),
}

/// The game state machine
#[derive(Debug, Clone)]
pub struct GameSession {
    session: Session,
    records: BestRecord,
    daily: DailyTaskRecord,
    engine: DailyTaskEngine,
    rng: Pcg32,
    scheduler: Scheduler,
    /// Stamped on every continuation; bumped to cancel them all
    epoch: u64,
    now_ms: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session in `Loading`; the start screen follows after
    /// `LOADING_DELAY_MS` of session time
    pub fn new(
        seed: u64,
        settings: &Settings,
        records: BestRecord,
        today: &DateKey,
        stored_task: Option<DailyTaskRecord>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = DailyTaskEngine::default();
        let (daily, origin) = engine.load_or_create(today, stored_task, &mut rng);

        let mut game = Self {
            session: Session::new(
                settings.mode,
                settings.difficulty,
                settings.palette % PALETTE_COUNT,
            ),
            records,
            daily,
            engine,
            rng,
            scheduler: Scheduler::new(),
            epoch: 0,
            now_ms: 0,
            events: Vec::new(),
        };
        if origin == TaskOrigin::Generated {
            game.events.push(GameEvent::TaskChanged);
        }
        game.schedule(LOADING_DELAY_MS, Continuation::FinishLoading);
        log::info!("Session created with seed {}", seed);
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn records(&self) -> &BestRecord {
        &self.records
    }

    pub fn daily(&self) -> &DailyTaskRecord {
        &self.daily
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Session time of the next scheduled continuation
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one input
    pub fn apply(&mut self, input: GameInput) {
        match input {
            GameInput::Tick { now_ms } => self.tick(now_ms),
            GameInput::Start => self.start(),
            GameInput::Tap(tile) => self.submit_input(tile),
            GameInput::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
            GameInput::SetMode(mode) => self.set_mode(mode),
            GameInput::SetPalette(index) => self.set_palette(index),
        }
    }

    /// Run every continuation due at or before `now_ms`
    ///
    /// Each continuation runs at its own due time, so anything it schedules
    /// is timed from there rather than from `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        let now_ms = now_ms.max(self.now_ms);
        while let Some(due) = self.scheduler.pop_due(now_ms) {
            self.now_ms = self.now_ms.max(due.at_ms);
            if due.epoch != self.epoch {
                log::debug!("Dropping stale {:?}", due.action);
                continue;
            }
            self.run(due.action);
        }
        self.now_ms = now_ms;
    }

    /// Start a new run (from the start screen, game over, or mid-run)
    pub fn start(&mut self) {
        if self.session.phase == GamePhase::Loading {
            log::debug!("Ignoring start while loading");
            return;
        }
        self.bump_epoch();
        self.reset_run();
        self.session.phase = GamePhase::Showing;
        log::info!(
            "Starting {} game on {}",
            self.session.mode.as_str(),
            self.session.difficulty.as_str()
        );
        self.schedule(START_DELAY_MS, Continuation::AdvanceLevel);
    }

    /// Player tap; ignored unless the session is accepting input
    pub fn submit_input(&mut self, tile: u8) {
        if self.session.phase != GamePhase::Playing {
            log::debug!(
                "Ignoring tap on {} while {}",
                tile,
                self.session.phase.as_str()
            );
            return;
        }

        let verdict = self.session.validator.submit(&self.session.sequence, tile);
        match verdict {
            Verdict::Mismatch {
                position,
                expected,
                actual,
            } => {
                log::info!(
                    "Mismatch at {}: expected {:?}, got {}",
                    position,
                    expected,
                    actual
                );
                match self.session.mode {
                    GameMode::Classic => self.game_over(),
                    GameMode::Zen => self.handle_zen_mistake(),
                }
            }
            Verdict::Partial { .. } => self.press(tile),
            Verdict::Complete => {
                self.press(tile);
                self.on_round_complete();
            }
        }
    }

    /// Takes effect at the next playback
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.session.difficulty = difficulty;
    }

    /// Switch modes; a run in progress is abandoned
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.session.mode == mode {
            return;
        }
        self.session.mode = mode;
        log::info!("Mode switched to {}", mode.as_str());
        // Loading keeps its pending FinishLoading
        if self.session.phase == GamePhase::Loading {
            return;
        }
        self.bump_epoch();
        self.reset_run();
        self.session.score = 0;
        self.session.consecutive_levels = 0;
        self.session.phase = GamePhase::Start;
    }

    pub fn set_palette(&mut self, index: usize) {
        self.session.palette = index % PALETTE_COUNT;
    }

    /// Replace the daily task if `today` is a new day
    pub fn refresh_daily_task(&mut self, today: &DateKey) {
        if self.daily.date == *today {
            return;
        }
        self.daily = self.engine.generate(today, &mut self.rng);
        self.events.push(GameEvent::TaskChanged);
    }

    fn run(&mut self, action: Continuation) {
        match action {
            Continuation::FinishLoading => {
                if self.session.phase == GamePhase::Loading {
                    self.session.phase = GamePhase::Start;
                    self.events.push(GameEvent::Loaded);
                    log::info!("Loaded");
                }
            }
            Continuation::AdvanceLevel => self.advance_level(),
            Continuation::Replay => self.begin_playback(),
            Continuation::Playback(cue) => self.play_cue(cue),
        }
    }

    fn advance_level(&mut self) {
        self.session.level += 1;
        let level = self.session.level;

        if self.session.mode == GameMode::Zen
            && level > self.records.best_zen_depth
            && self.records.record_zen_depth(level - 1)
        {
            self.events.push(GameEvent::RecordsChanged);
        }

        self.session.validator.clear();
        let tile = self.session.sequence.extend(GRID_SIZE, &mut self.rng);
        self.session.phase = GamePhase::Showing;
        self.events.push(GameEvent::LevelStarted { level });
        log::debug!("Level {} (new tile {})", level, tile);
        self.begin_playback();
    }

    /// Schedule playback of the whole sequence, starting now
    fn begin_playback(&mut self) {
        let profile = profile_for(self.session.difficulty);
        let playback = self.session.sequence.playback(profile);
        for step in playback {
            self.schedule(step.offset_ms, Continuation::Playback(step.cue));
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if self.session.phase != GamePhase::Showing {
            return;
        }
        match cue {
            Cue::TileOn { tile, .. } => {
                self.session.active_tile = Some(tile);
                let tone = self.tone_for(tile);
                self.events.push(GameEvent::TileLit { tile, tone });
            }
            Cue::TileOff { tile, .. } => {
                self.session.active_tile = None;
                self.events.push(GameEvent::TileDimmed { tile });
            }
            Cue::Finished => {
                self.session.active_tile = None;
                self.session.phase = GamePhase::Playing;
                self.events.push(GameEvent::InputOpened);
            }
        }
    }

    fn press(&mut self, tile: u8) {
        let tone = self.tone_for(tile);
        self.events.push(GameEvent::TilePressed { tile, tone });
    }

    fn on_round_complete(&mut self) {
        let level = self.session.level;
        match self.session.mode {
            GameMode::Classic => {
                self.session.score += u64::from(level) * POINTS_PER_LEVEL;
                self.session.consecutive_levels += 1;
                self.advance_task();
            }
            GameMode::Zen => {
                if self.records.record_zen_depth(level) {
                    self.events.push(GameEvent::RecordsChanged);
                }
            }
        }

        self.session.phase = GamePhase::Showing;
        self.events.push(GameEvent::Effect(SoundEffect::Correct));
        self.events.push(GameEvent::RoundComplete {
            level,
            score: self.session.score,
        });
        log::debug!("Round {} complete, score {}", level, self.session.score);
        self.schedule(ROUND_PAUSE_MS, Continuation::AdvanceLevel);
    }

    fn handle_zen_mistake(&mut self) {
        self.session.validator.clear();
        self.session.phase = GamePhase::Showing;
        self.events.push(GameEvent::Effect(SoundEffect::Mistake));
        self.events.push(GameEvent::ZenMistake {
            level: self.session.level,
        });
        self.schedule(ZEN_RETRY_DELAY_MS, Continuation::Replay);
    }

    fn game_over(&mut self) {
        self.session.phase = GamePhase::GameOver;
        // The losing tap can still settle a score task
        self.advance_task();

        let score = self.session.score;
        let new_high_score = self.records.record_score(score);
        if new_high_score {
            self.events.push(GameEvent::RecordsChanged);
        }
        self.events.push(GameEvent::Effect(SoundEffect::GameOver));
        self.events.push(GameEvent::GameOver {
            score,
            new_high_score,
        });
        self.session.consecutive_levels = 0;
        log::info!(
            "Game over at level {} with score {}{}",
            self.session.level,
            score,
            if new_high_score { " (new high score)" } else { "" }
        );
    }

    /// Feed classic-mode stats into today's task
    fn advance_task(&mut self) {
        let stats = TaskStats {
            score: self.session.score,
            consecutive_levels: self.session.consecutive_levels,
        };
        match self.engine.advance(&mut self.daily.task, &stats) {
            TaskProgress::Unchanged => {}
            TaskProgress::Progressed => self.events.push(GameEvent::TaskChanged),
            TaskProgress::JustCompleted => {
                self.session.score += TASK_BONUS;
                self.session.task_just_completed = true;
                self.events.push(GameEvent::TaskChanged);
                self.events.push(GameEvent::TaskCompleted {
                    task: self.daily.task.clone(),
                    bonus: TASK_BONUS,
                });
            }
        }
    }

    fn reset_run(&mut self) {
        let session = &mut self.session;
        session.sequence.reset();
        session.validator.clear();
        session.level = 0;
        session.active_tile = None;
        session.task_just_completed = false;
        if session.mode == GameMode::Classic {
            session.score = 0;
            session.consecutive_levels = 0;
        }
    }

    fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.scheduler.discard_before(self.epoch);
    }

    fn schedule(&mut self, delay_ms: u64, action: Continuation) {
        self.scheduler
            .schedule(self.now_ms + delay_ms, self.epoch, action);
    }

    fn tone_for(&self, tile: u8) -> usize {
        palette::palette_at(self.session.palette).tone_for(tile)
    }
}
