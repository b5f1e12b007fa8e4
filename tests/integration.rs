// Integration tests for the `tile-echo` shell: persistence, audio cues and
// host readiness wired around the game session.

use std::cell::RefCell;

use tile_echo::App;
use tile_echo::audio::{AudioOutput, SoundEffect};
use tile_echo::consts::*;
use tile_echo::persistence::{MemoryStore, Store, keys, load_daily_task};
use tile_echo::platform::{Clock, FixedClock, HostError, HostReadiness, Profile};
use tile_echo::settings::{Difficulty, GameMode};
use tile_echo::sim::{DailyTask, DateKey, GamePhase, TaskKind};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Played {
    Tone(usize),
    Effect(SoundEffect),
}

#[derive(Default)]
struct RecordingAudio {
    played: RefCell<Vec<Played>>,
    muted: bool,
}

impl RecordingAudio {
    fn take(&self) -> Vec<Played> {
        self.played.borrow_mut().drain(..).collect()
    }
}

impl AudioOutput for RecordingAudio {
    fn play_tone(&self, tone: usize) {
        if !self.muted {
            self.played.borrow_mut().push(Played::Tone(tone));
        }
    }

    fn play_effect(&self, effect: SoundEffect) {
        if !self.muted {
            self.played.borrow_mut().push(Played::Effect(effect));
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Clock whose date can be moved between calls
struct SharedClock(std::rc::Rc<RefCell<DateKey>>);

impl Clock for SharedClock {
    fn today(&self) -> DateKey {
        self.0.borrow().clone()
    }
}

struct StubHost {
    fail: bool,
}

impl HostReadiness for StubHost {
    fn ready(&mut self) -> Result<(), HostError> {
        if self.fail {
            Err(HostError::Unreachable("offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn fetch_profile(&mut self) -> Result<Option<Profile>, HostError> {
        if self.fail {
            Err(HostError::Rejected("no session".to_string()))
        } else {
            Ok(Some(Profile {
                id: "p-1".to_string(),
                name: "Robin".to_string(),
            }))
        }
    }
}

fn day(d: u32) -> DateKey {
    DateKey::from_ymd(2024, 7, d).expect("valid date")
}

type TestApp = App<MemoryStore, RecordingAudio, FixedClock>;

fn app_with(store: MemoryStore) -> TestApp {
    App::new(store, RecordingAudio::default(), FixedClock(day(1)), None, 7)
}

/// Tick through scheduled steps until input opens (or nothing is pending)
fn run_until_input<S: Store, A: AudioOutput, C: Clock>(app: &mut App<S, A, C>) {
    while app.game().phase() != GamePhase::Playing {
        match app.game().next_due() {
            Some(at) => app.tick(at),
            None => break,
        }
    }
}

fn reproduce_round<S: Store, A: AudioOutput, C: Clock>(app: &mut App<S, A, C>) {
    run_until_input(app);
    let tiles = app.game().session().sequence.tiles().to_vec();
    for tile in tiles {
        app.tap(tile);
    }
}

fn fail_round<S: Store, A: AudioOutput, C: Clock>(app: &mut App<S, A, C>) {
    run_until_input(app);
    let expected = app.game().session().sequence.tiles()[0];
    app.tap((expected + 1) % GRID_SIZE);
}

fn unreachable_task() -> DailyTask {
    DailyTask {
        id: TaskKind::ScoreInGame,
        description: "Score 600 points in a single game".to_string(),
        target: 600,
        progress: 0,
        completed: false,
    }
}

fn store_with_task(date: &DateKey, task: &DailyTask) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(keys::LAST_TASK_DATE, date.as_str());
    store.insert(
        keys::LAST_TASK,
        &serde_json::to_string(task).expect("serializable"),
    );
    store
}

#[test]
fn first_launch_persists_a_fresh_task() {
    let app = app_with(MemoryStore::new());
    let record = load_daily_task(app.store()).expect("task written at startup");
    assert_eq!(record.date, day(1));
    assert_eq!(record.task.progress, 0);
    assert!(!record.task.completed);
    assert_eq!(app.game().phase(), GamePhase::Loading);
}

#[test]
fn stale_task_is_replaced_on_launch() {
    let mut old = unreachable_task();
    old.progress = 450;
    let yesterday = DateKey::from_ymd(2024, 6, 30).expect("valid date");

    let app = app_with(store_with_task(&yesterday, &old));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.task.progress, 0);
    assert!(!snapshot.task.completed);
    assert_eq!(load_daily_task(app.store()).map(|r| r.date), Some(day(1)));
}

#[test]
fn same_day_task_is_restored_verbatim() {
    let mut task = unreachable_task();
    task.progress = 120;
    let app = app_with(store_with_task(&day(1), &task));
    assert_eq!(app.game().daily().task, task);
}

#[test]
fn standalone_reaches_start_after_loading_delay() {
    let mut app = app_with(MemoryStore::new());
    app.tick(LOADING_DELAY_MS - 1);
    assert_eq!(app.game().phase(), GamePhase::Loading);
    app.tick(LOADING_DELAY_MS);
    assert_eq!(app.game().phase(), GamePhase::Start);
    assert_eq!(app.profile(), None);
}

#[test]
fn host_profile_is_fetched_once_loaded() {
    let mut app = App::new(
        MemoryStore::new(),
        RecordingAudio::default(),
        FixedClock(day(1)),
        Some(Box::new(StubHost { fail: false })),
        1,
    );
    assert_eq!(app.profile(), None);
    app.tick(LOADING_DELAY_MS);
    assert_eq!(app.profile().map(|p| p.name.as_str()), Some("Robin"));
    assert_eq!(app.snapshot().player_name.as_deref(), Some("Robin"));
}

#[test]
fn failing_host_still_reaches_start() {
    let mut app = App::new(
        MemoryStore::new(),
        RecordingAudio::default(),
        FixedClock(day(1)),
        Some(Box::new(StubHost { fail: true })),
        1,
    );
    app.tick(LOADING_DELAY_MS);
    assert_eq!(app.game().phase(), GamePhase::Start);
    assert_eq!(app.profile(), None);
}

#[test]
fn classic_game_over_persists_high_score() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.tick(LOADING_DELAY_MS);
    app.start();
    reproduce_round(&mut app);
    reproduce_round(&mut app);
    fail_round(&mut app);

    assert_eq!(app.game().phase(), GamePhase::GameOver);
    assert_eq!(app.store().get(keys::HIGH_SCORE).as_deref(), Some("30"));

    // A worse run leaves the stored record alone
    app.start();
    fail_round(&mut app);
    assert_eq!(app.snapshot().score, 0);
    assert_eq!(app.store().get(keys::HIGH_SCORE).as_deref(), Some("30"));
}

#[test]
fn records_survive_a_relaunch() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.tick(LOADING_DELAY_MS);
    app.start();
    reproduce_round(&mut app);
    fail_round(&mut app);

    let store = app.store().clone();
    let relaunched = app_with(store);
    assert_eq!(relaunched.snapshot().high_score, 10);
}

#[test]
fn task_progress_is_written_through() {
    let task = DailyTask {
        id: TaskKind::ConsecutiveLevels,
        description: "Complete 3 levels in a row".to_string(),
        target: 3,
        progress: 0,
        completed: false,
    };
    let mut app = app_with(store_with_task(&day(1), &task));
    app.tick(LOADING_DELAY_MS);
    app.start();
    for _ in 0..3 {
        reproduce_round(&mut app);
    }

    let stored = load_daily_task(app.store()).expect("task stored");
    assert_eq!(stored.task.progress, 3);
    assert!(stored.task.completed);
    let snapshot = app.snapshot();
    assert!(snapshot.task_just_completed);
    assert_eq!(snapshot.score, 60 + TASK_BONUS);
}

#[test]
fn day_rollover_on_start_regenerates_task() {
    let date = std::rc::Rc::new(RefCell::new(day(1)));
    let mut app = App::new(
        store_with_task(&day(1), &unreachable_task()),
        RecordingAudio::default(),
        SharedClock(date.clone()),
        None,
        9,
    );
    app.tick(LOADING_DELAY_MS);
    app.start();
    reproduce_round(&mut app);
    assert_eq!(app.game().daily().task.progress, 10);

    *date.borrow_mut() = day(2);
    app.start();
    assert_eq!(app.game().daily().date, day(2));
    assert_eq!(app.game().daily().task.progress, 0);
    assert_eq!(
        load_daily_task(app.store()).map(|r| r.date),
        Some(day(2))
    );
}

#[test]
fn zen_best_depth_is_persisted() {
    let mut store = store_with_task(&day(1), &unreachable_task());
    store.insert(keys::MODE, "zen");
    let mut app = app_with(store);
    assert_eq!(app.settings().mode, GameMode::Zen);
    app.tick(LOADING_DELAY_MS);
    app.start();
    reproduce_round(&mut app);
    reproduce_round(&mut app);
    fail_round(&mut app);

    assert_ne!(app.game().phase(), GamePhase::GameOver);
    assert_eq!(app.store().get(keys::BEST_ZEN).as_deref(), Some("2"));
    assert_eq!(app.snapshot().score, 0);
}

#[test]
fn playback_and_taps_trigger_palette_tones() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.cycle_palette(1);
    app.tick(LOADING_DELAY_MS);
    app.start();
    run_until_input(&mut app);

    let palette = tile_echo::palette::palette_at(app.settings().palette);
    let tile = app.game().session().sequence.tiles()[0];
    let tone = palette.tone_for(tile);
    assert_eq!(app.audio().take(), vec![Played::Tone(tone)]);

    app.tap(tile);
    assert_eq!(
        app.audio().take(),
        vec![Played::Tone(tone), Played::Effect(SoundEffect::Correct)]
    );
}

#[test]
fn muted_app_plays_nothing() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.toggle_mute();
    assert!(app.snapshot().muted);
    assert_eq!(app.store().get(keys::MUTED).as_deref(), Some("true"));

    app.tick(LOADING_DELAY_MS);
    app.start();
    reproduce_round(&mut app);
    assert!(app.audio().take().is_empty());
}

#[test]
fn settings_changes_are_saved() {
    let mut app = app_with(MemoryStore::new());
    app.set_difficulty(Difficulty::Hard);
    app.set_mode(GameMode::Zen);
    app.cycle_palette(-1);

    let store = app.store();
    assert_eq!(store.get(keys::DIFFICULTY).as_deref(), Some("hard"));
    assert_eq!(store.get(keys::MODE).as_deref(), Some("zen"));
    assert_eq!(
        store.get(keys::PALETTE),
        Some((tile_echo::palette::PALETTE_COUNT - 1).to_string())
    );

    let snapshot = app.snapshot();
    assert_eq!(snapshot.difficulty, Difficulty::Hard);
    assert_eq!(snapshot.mode, GameMode::Zen);

    app.tick(LOADING_DELAY_MS);
    assert_eq!(app.snapshot().phase, GamePhase::Start);
}

#[test]
fn mode_toggled_during_splash_can_still_play() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.set_mode(GameMode::Zen);
    app.set_mode(GameMode::Classic);
    app.set_mode(GameMode::Zen);

    app.tick(LOADING_DELAY_MS);
    assert_eq!(app.snapshot().phase, GamePhase::Start);

    app.start();
    run_until_input(&mut app);
    let snapshot = app.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Playing);
    assert_eq!(snapshot.mode, GameMode::Zen);
    assert_eq!(snapshot.level, 1);
}

#[test]
fn snapshot_tracks_playback() {
    let mut app = app_with(store_with_task(&day(1), &unreachable_task()));
    app.tick(LOADING_DELAY_MS);
    app.start();
    let level_at = LOADING_DELAY_MS + START_DELAY_MS;
    let first_on = level_at + tile_echo::tuning::profile_for(Difficulty::Medium).step_interval_ms;
    app.tick(first_on);

    let snapshot = app.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Showing);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.sequence_len, 1);
    assert_eq!(
        snapshot.active_tile,
        Some(app.game().session().sequence.tiles()[0])
    );
    assert_eq!(snapshot.tile_colors.len(), GRID_SIZE as usize);

    let json = serde_json::to_string(&snapshot).expect("serializable");
    assert!(json.contains("\"phase\":\"showing\""));
}
