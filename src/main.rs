//! Tile Echo entry point
//!
//! Web: binds the DOM board to the game and runs the frame loop.
//! Native: plays a headless demo game against itself.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use tile_echo::App;
    use tile_echo::Snapshot;
    use tile_echo::audio::WebAudio;
    use tile_echo::consts::GRID_SIZE;
    use tile_echo::persistence::LocalStorageStore;
    use tile_echo::platform::SystemClock;
    use tile_echo::sim::GamePhase;

    type WebApp = App<LocalStorageStore, WebAudio, SystemClock>;

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tile Echo starting...");

        let seed = js_sys::Date::now() as u64;
        let app: WebApp = App::new(
            LocalStorageStore::new(),
            WebAudio::new(),
            SystemClock,
            None,
            seed,
        );
        let game = Rc::new(RefCell::new(app));

        setup_tiles(game.clone());
        setup_buttons(game.clone());

        // Frame loop: advance session time, then redraw
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut app = game.borrow_mut();
                app.tick(time as u64);
                render(&app.snapshot());
            }
            if let Some(cb) = f.borrow().as_ref() {
                request_animation_frame(cb);
            }
        }));
        if let Some(cb) = g.borrow().as_ref() {
            request_animation_frame(cb);
        }

        log::info!("Tile Echo running!");
    }

    fn setup_tiles(game: Rc<RefCell<WebApp>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, board not bound");
            return;
        };
        for tile in 0..GRID_SIZE {
            let Some(el) = document.get_element_by_id(&format!("tile-{}", tile)) else {
                log::warn!("Missing #tile-{}", tile);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut app = game.borrow_mut();
                app.audio().resume();
                app.tap(tile);
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<WebApp>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, board not bound");
            return;
        };

        let bind = |id: &str, action: Box<dyn Fn(&mut WebApp)>| {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut app = game.borrow_mut();
                    app.audio().resume();
                    action(&mut app);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        };

        bind("start-btn", Box::new(|app: &mut WebApp| app.start()));
        bind("mute-btn", Box::new(|app: &mut WebApp| app.toggle_mute()));
        bind("palette-prev-btn", Box::new(|app: &mut WebApp| app.cycle_palette(-1)));
        bind("palette-next-btn", Box::new(|app: &mut WebApp| app.cycle_palette(1)));
        bind("mode-btn", Box::new(|app: &mut WebApp| {
            let next = match app.settings().mode {
                tile_echo::GameMode::Classic => tile_echo::GameMode::Zen,
                tile_echo::GameMode::Zen => tile_echo::GameMode::Classic,
            };
            app.set_mode(next);
        }));
        for difficulty in tile_echo::Difficulty::ALL {
            let id = format!("difficulty-{}-btn", difficulty.as_str());
            bind(&id, Box::new(move |app: &mut WebApp| app.set_difficulty(difficulty)));
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn render(snapshot: &Snapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (tile, color) in snapshot.tile_colors.iter().enumerate() {
            if let Some(el) = document.get_element_by_id(&format!("tile-{}", tile)) {
                let lit = snapshot.active_tile == Some(tile as u8);
                let _ = el.class_list().toggle_with_force("lit", lit);
                let _ = el.set_attribute("style", &format!("background:{}", color));
            }
        }

        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-phase", snapshot.phase.as_str());
        }

        let status = match snapshot.phase {
            GamePhase::Loading => "Loading...".to_string(),
            GamePhase::Start => "Press start".to_string(),
            GamePhase::Showing => "Watch".to_string(),
            GamePhase::Playing => "Your turn".to_string(),
            GamePhase::GameOver => format!("Game over - {} points", snapshot.score),
        };
        set_text(&document, "status", &status);
        set_text(&document, "level", &snapshot.level.to_string());
        set_text(&document, "score", &snapshot.score.to_string());
        set_text(&document, "high-score", &snapshot.high_score.to_string());
        set_text(&document, "best-zen", &snapshot.best_zen_depth.to_string());
        set_text(&document, "palette", snapshot.palette_name);
        set_text(
            &document,
            "task",
            &format!(
                "{} ({}/{}){}",
                snapshot.task.description,
                snapshot.task.progress,
                snapshot.task.target,
                if snapshot.task.completed { " done" } else { "" }
            ),
        );
        set_text(&document, "mute-btn", if snapshot.muted { "Unmute" } else { "Mute" });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tile_echo::App;
    use tile_echo::audio::NullAudio;
    use tile_echo::persistence::MemoryStore;
    use tile_echo::platform::SystemClock;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tile Echo (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random::<u64>);

    let mut app = App::new(MemoryStore::new(), NullAudio::new(), SystemClock, None, seed);
    demo::autoplay(&mut app, 8);

    match serde_json::to_string_pretty(&app.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tile_echo::App;
    use tile_echo::audio::AudioOutput;
    use tile_echo::consts::GRID_SIZE;
    use tile_echo::persistence::Store;
    use tile_echo::platform::Clock;
    use tile_echo::sim::GamePhase;

    /// Run the session clock forward until `done` holds or nothing is scheduled
    fn advance_until<S: Store, A: AudioOutput, C: Clock>(
        app: &mut App<S, A, C>,
        done: impl Fn(GamePhase) -> bool,
    ) {
        while !done(app.game().phase()) {
            match app.game().next_due() {
                Some(at) => app.tick(at),
                None => break,
            }
        }
    }

    /// Play a classic game perfectly, then miss on purpose at `miss_at_level`
    pub fn autoplay<S: Store, A: AudioOutput, C: Clock>(app: &mut App<S, A, C>, miss_at_level: u32) {
        advance_until(app, |phase| phase == GamePhase::Start);
        app.start();

        loop {
            advance_until(app, |phase| matches!(phase, GamePhase::Playing | GamePhase::GameOver));
            if app.game().phase() != GamePhase::Playing {
                break;
            }

            let session = app.game().session();
            let level = session.level;
            let tiles = session.sequence.tiles().to_vec();
            if level >= miss_at_level {
                let wrong = (tiles[0] + 1) % GRID_SIZE;
                log::info!("Level {}: tapping {} instead of {}", level, wrong, tiles[0]);
                app.tap(wrong);
            } else {
                log::info!("Level {}: reproducing {:?}", level, tiles);
                for tile in tiles {
                    app.tap(tile);
                }
            }
        }

        let snapshot = app.snapshot();
        log::info!(
            "Demo finished at level {} with {} points (task: {} {}/{})",
            snapshot.level,
            snapshot.score,
            snapshot.task.description,
            snapshot.task.progress,
            snapshot.task.target
        );
    }
}
