//! Application shell
//!
//! Owns the collaborators (store, audio, clock, optional host) and the
//! `GameSession`. Every call forwards into the session and then applies the
//! events it emitted: sounds go to the audio backend, record and task
//! changes are written through to the store.

use serde::Serialize;

use crate::audio::AudioOutput;
use crate::highscores::BestRecord;
use crate::palette;
use crate::persistence::{self, Store};
use crate::platform::{Clock, HostReadiness, Profile};
use crate::settings::{Difficulty, GameMode, Settings};
use crate::sim::{GameEvent, GamePhase, GameSession};

/// Today's task as shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub description: String,
    pub progress: u32,
    pub target: u32,
    pub completed: bool,
}

/// Read-only view for the visual surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub best_zen_depth: u32,
    pub sequence_len: usize,
    pub input_len: usize,
    pub active_tile: Option<u8>,
    pub palette_name: &'static str,
    pub tile_colors: Vec<&'static str>,
    pub task: TaskView,
    pub task_just_completed: bool,
    pub muted: bool,
    pub player_name: Option<String>,
}

/// The game plus everything it talks to
pub struct App<S: Store, A: AudioOutput, C: Clock> {
    store: S,
    audio: A,
    clock: C,
    host: Option<Box<dyn HostReadiness>>,
    settings: Settings,
    game: GameSession,
    profile: Option<Profile>,
}

impl<S: Store, A: AudioOutput, C: Clock> App<S, A, C> {
    /// Read persisted state once and build the session
    pub fn new(
        store: S,
        mut audio: A,
        clock: C,
        host: Option<Box<dyn HostReadiness>>,
        seed: u64,
    ) -> Self {
        let settings = Settings::load(&store);
        let records = BestRecord::load(&store);
        let stored_task = persistence::load_daily_task(&store);
        let today = clock.today();
        audio.set_muted(settings.muted);

        let game = GameSession::new(seed, &settings, records, &today, stored_task);
        let mut app = Self {
            store,
            audio,
            clock,
            host,
            settings,
            game,
            profile: None,
        };
        app.flush_events();
        app
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.game.tick(now_ms);
        self.flush_events();
    }

    pub fn tap(&mut self, tile: u8) {
        self.game.submit_input(tile);
        self.flush_events();
    }

    /// Start a run, rolling the daily task over first if the day changed
    pub fn start(&mut self) {
        let today = self.clock.today();
        self.game.refresh_daily_task(&today);
        self.game.start();
        self.flush_events();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.settings.difficulty == difficulty {
            return;
        }
        self.settings.difficulty = difficulty;
        self.game.set_difficulty(difficulty);
        self.settings.save(&mut self.store);
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if self.settings.mode == mode {
            return;
        }
        self.settings.mode = mode;
        self.game.set_mode(mode);
        self.settings.save(&mut self.store);
        self.flush_events();
    }

    /// Step through palettes (`delta` may be negative)
    pub fn cycle_palette(&mut self, delta: isize) {
        self.settings.cycle_palette(delta);
        self.game.set_palette(self.settings.palette);
        self.settings.save(&mut self.store);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.set_muted(muted);
        self.settings.save(&mut self.store);
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.settings.muted);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game(&self) -> &GameSession {
        &self.game
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = self.game.session();
        let records = self.game.records();
        let task = &self.game.daily().task;
        let palette = palette::palette_at(session.palette);
        Snapshot {
            phase: session.phase,
            mode: session.mode,
            difficulty: session.difficulty,
            level: session.level,
            score: session.score,
            high_score: records.high_score,
            best_zen_depth: records.best_zen_depth,
            sequence_len: session.sequence.len(),
            input_len: session.validator.len(),
            active_tile: session.active_tile,
            palette_name: palette.name,
            tile_colors: palette.tiles.iter().map(|t| t.color).collect(),
            task: TaskView {
                description: task.description.clone(),
                progress: task.progress,
                target: task.target,
                completed: task.completed,
            },
            task_just_completed: session.task_just_completed,
            muted: self.settings.muted,
            player_name: self.profile.as_ref().map(|p| p.name.clone()),
        }
    }

    fn flush_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::TileLit { tone, .. } | GameEvent::TilePressed { tone, .. } => {
                    self.audio.play_tone(tone)
                }
                GameEvent::Effect(effect) => self.audio.play_effect(effect),
                GameEvent::RecordsChanged => self.game.records().save(&mut self.store),
                GameEvent::TaskChanged => {
                    if let Err(e) = persistence::save_daily_task(&mut self.store, self.game.daily()) {
                        log::warn!("Failed to save daily task: {}", e);
                    }
                }
                GameEvent::TaskCompleted { task, bonus } => {
                    log::info!("Daily task \"{}\" done, +{} bonus", task.description, bonus);
                }
                GameEvent::Loaded => self.connect_host(),
                GameEvent::TileDimmed { .. }
                | GameEvent::InputOpened
                | GameEvent::LevelStarted { .. }
                | GameEvent::RoundComplete { .. }
                | GameEvent::ZenMistake { .. }
                | GameEvent::GameOver { .. } => {}
            }
        }
    }

    /// Signal readiness and fetch the profile; failures never block the game
    fn connect_host(&mut self) {
        let Some(host) = self.host.as_mut() else {
            log::info!("No host attached, running standalone");
            return;
        };
        if let Err(e) = host.ready() {
            log::warn!("Host ready signal failed: {}", e);
        }
        match host.fetch_profile() {
            Ok(Some(profile)) => {
                log::info!("Playing as {}", profile.name);
                self.profile = Some(profile);
            }
            Ok(None) => log::info!("Host has no player profile"),
            Err(e) => log::warn!("Profile fetch failed: {}", e),
        }
    }
}
