//! Avoid Boxes entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
        HtmlSelectElement,
    };

    use avoid_boxes::audio::AudioManager;
    use avoid_boxes::game::{Command, Game};
    use avoid_boxes::highscores::{HighScores, ScoreEntry};
    use avoid_boxes::language::{Language, Strings};
    use avoid_boxes::platform::{AudioOut, Hud, LocalStorageStore, Renderer, SoundEffect};
    use avoid_boxes::renderer::CanvasRenderer;
    use avoid_boxes::sim::{Canvas, Clock, EntityKind, GamePhase, Rect, Session, SystemClock};
    use avoid_boxes::{Difficulty, Settings, format_seconds};

    /// Space taken by the side panels and top bar when they are missing
    const FALLBACK_PANEL_WIDTH: f64 = 500.0;
    const FALLBACK_TOP_BAR_HEIGHT: f64 = 80.0;

    /// HUD elements in the page
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn element(&self, id: &str) -> Option<web_sys::Element> {
            self.document.get_element_by_id(id)
        }

        fn button(&self, id: &str) -> Option<HtmlButtonElement> {
            self.element(id)?.dyn_into().ok()
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_button(&self, id: &str, enabled: bool, label: Option<&str>) {
            if let Some(btn) = self.button(id) {
                btn.set_disabled(!enabled);
                if let Some(label) = label {
                    btn.set_text_content(Some(label));
                }
            }
        }

        /// Rebuild the leaderboard list
        fn show_leaderboard(&self, entries: &[ScoreEntry], strings: &Strings) {
            let Some(board) = self.element("leaderboard") else { return };
            board.set_inner_html("");

            if entries.is_empty() {
                if let Ok(empty) = self.document.create_element("p") {
                    empty.set_class_name("leaderboard-empty");
                    empty.set_text_content(Some(strings.no_records));
                    let _ = board.append_child(&empty);
                }
                return;
            }

            for (i, entry) in entries.iter().enumerate() {
                let Ok(row) = self.document.create_element("div") else { continue };
                row.set_class_name("leaderboard-item");
                for (class, text) in [
                    ("rank", (i + 1).to_string()),
                    ("name", entry.name.clone()),
                    ("score", strings.with_unit(&format_seconds(entry.time))),
                ] {
                    if let Ok(span) = self.document.create_element("span") {
                        span.set_class_name(class);
                        span.set_text_content(Some(&text));
                        let _ = row.append_child(&span);
                    }
                }
                let _ = board.append_child(&row);
            }
        }

        /// Relabel the static page text; HUD values are kept
        fn apply_language(&self, strings: &Strings) {
            let health = self
                .element("healthValue")
                .and_then(|el| el.text_content())
                .unwrap_or_default();
            let time = self
                .element("timeValue")
                .and_then(|el| el.text_content())
                .unwrap_or_default();
            // The value spans are rebuilt, so restore the health color afterwards
            if let Some(el) = self.element("healthText") {
                el.set_inner_html(&format!("{}: <span id=\"healthValue\"></span>", strings.health));
            }
            if let Some(el) = self.element("timeText") {
                el.set_inner_html(&format!(
                    "{}: <span id=\"timeValue\"></span>{}",
                    strings.time, strings.seconds
                ));
            }
            self.set_text("timeValue", &time);
            if let Ok(health) = health.parse::<u8>() {
                self.show_health(health);
            }

            for (id, text) in [
                ("languageLabel", strings.language),
                ("difficultyLabel", strings.difficulty),
                ("musicLabel", strings.music),
                ("sfxLabel", strings.sfx),
                ("startBtn", strings.start),
                ("resetBtn", strings.reset),
                ("controlsTitle", strings.controls_title),
                ("controlUp", strings.control_up),
                ("controlDown", strings.control_down),
                ("controlLeft", strings.control_left),
                ("controlRight", strings.control_right),
                ("itemsTitle", strings.items_title),
                ("itemGodmode", strings.item_godmode),
                ("itemHealth", strings.item_health),
                ("itemSpeedUp", strings.item_speed_up),
                ("itemSpeedDown", strings.item_speed_down),
                ("leaderboardTitle", strings.leaderboard_title),
            ] {
                self.set_text(id, text);
            }

            for difficulty in Difficulty::ALL {
                let selector = format!("#difficulty option[value=\"{}\"]", difficulty.as_str());
                if let Ok(Some(option)) = self.document.query_selector(&selector) {
                    option.set_text_content(Some(strings.difficulty_name(difficulty)));
                }
            }
        }

        fn show_health(&self, health: u8) {
            let Some(el) = self.element("healthValue") else { return };
            el.set_text_content(Some(&health.to_string()));
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let color = match health {
                    0 | 1 => "#e74c3c",
                    2 => "#f39c12",
                    _ => "#27ae60",
                };
                let _ = el.style().set_property("color", color);
            }
        }
    }

    impl Hud for DomHud {
        fn set_health(&mut self, health: u8) {
            self.show_health(health);
        }

        fn set_elapsed_time(&mut self, seconds: &str) {
            self.set_text("timeValue", seconds);
        }

        fn show_overlay(&mut self, title: &str, message: &str) {
            if let Some(overlay) = self.element("gameOverlay") {
                let _ = overlay.class_list().remove_1("hidden");
            }
            self.set_text("overlayTitle", title);
            self.set_text("overlayMessage", message);
        }

        fn hide_overlay(&mut self) {
            if let Some(overlay) = self.element("gameOverlay") {
                let _ = overlay.class_list().add_1("hidden");
            }
        }

        fn set_buttons_for_state(&mut self, phase: GamePhase, strings: &Strings) {
            let (start, pause, reset) = match phase {
                GamePhase::NotStarted => (true, false, false),
                GamePhase::Playing | GamePhase::Paused => (false, true, true),
                GamePhase::GameOver => (true, false, true),
            };
            self.set_button("startBtn", start, Some(strings.start));
            self.set_button("pauseBtn", pause, Some(strings.pause_button(phase)));
            self.set_button("resetBtn", reset, Some(strings.reset));
        }
    }

    /// Browser-side collaborators bundled for the frame driver
    struct WebHost {
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        hud: DomHud,
    }

    impl Renderer for WebHost {
        fn draw_background(&mut self, scroll_offset: f32) {
            if let Some(r) = &mut self.renderer {
                r.draw_background(scroll_offset);
            }
        }

        fn draw_entity(&mut self, kind: &EntityKind, rect: Rect) {
            if let Some(r) = &mut self.renderer {
                r.draw_entity(kind, rect);
            }
        }

        fn draw_player(&mut self, rect: Rect, blinking: bool) {
            if let Some(r) = &mut self.renderer {
                r.draw_player(rect, blinking);
            }
        }

        fn draw_time(&mut self, readout: &str) {
            if let Some(r) = &mut self.renderer {
                r.draw_time(readout);
            }
        }

        fn draw_game_over(&mut self, survival: &str) {
            if let Some(r) = &mut self.renderer {
                r.draw_game_over(survival);
            }
        }
    }

    impl AudioOut for WebHost {
        fn play_one_shot(&mut self, effect: SoundEffect) {
            self.audio.play_one_shot(effect);
        }

        fn play_loop(&mut self) {
            self.audio.play_loop();
        }

        fn pause(&mut self) {
            self.audio.pause();
        }

        fn resume(&mut self) {
            self.audio.resume();
        }

        fn stop(&mut self) {
            self.audio.stop();
        }
    }

    impl Hud for WebHost {
        fn set_health(&mut self, health: u8) {
            self.hud.set_health(health);
        }

        fn set_elapsed_time(&mut self, seconds: &str) {
            self.hud.set_elapsed_time(seconds);
        }

        fn show_overlay(&mut self, title: &str, message: &str) {
            self.hud.show_overlay(title, message);
        }

        fn hide_overlay(&mut self) {
            self.hud.hide_overlay();
        }

        fn set_buttons_for_state(&mut self, phase: GamePhase, strings: &Strings) {
            self.hud.set_buttons_for_state(phase, strings);
        }
    }

    /// Everything the page callbacks share
    struct App {
        game: Game,
        host: WebHost,
        store: LocalStorageStore,
        settings: Settings,
        clock: SystemClock,
    }

    impl App {
        fn command(&mut self, command: Command) {
            let now = self.clock.now();
            self.game.command(command, now, &mut self.host);
        }

        fn frame(&mut self) {
            let now = self.clock.now();
            if let Some(survival_secs) = self.game.frame(now, &mut self.host) {
                self.ask_for_name(survival_secs);
            }
        }

        /// Leaderboard entry after game over; cancel or a blank name skips it
        fn ask_for_name(&mut self, survival_secs: f64) {
            let Some(window) = web_sys::window() else { return };
            let strings = self.game.strings();
            let name = window
                .prompt_with_message_and_default(
                    &strings.name_prompt(survival_secs),
                    strings.default_player_name,
                )
                .ok()
                .flatten()
                .unwrap_or_default();
            if self
                .game
                .record_score(&mut self.store, &name, survival_secs)
                .is_some()
            {
                self.host.hud.show_leaderboard(&self.game.scores.entries, strings);
            }
        }

        fn resize(&mut self, width: f32, height: f32) {
            self.game.session.resize(width, height);
            let canvas = self.game.session.state.canvas;
            if let Some(r) = &self.host.renderer {
                r.resize(canvas.width, canvas.height);
            }
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.game.set_difficulty(difficulty);
            self.settings.difficulty = difficulty;
            self.settings.save();
        }

        fn set_language(&mut self, language: Language) {
            let App { game, host, .. } = &mut *self;
            game.set_language(language, host);
            let strings = game.strings();
            host.hud.apply_language(strings);
            host.hud.show_leaderboard(&game.scores.entries, strings);
            self.settings.language = language;
            self.settings.save();
        }

        /// Slider moved: apply live and persist
        fn set_volume(&mut self, slider: VolumeSlider, volume: f32) {
            match slider {
                VolumeSlider::Music => self.settings.music_volume = volume,
                VolumeSlider::Sfx => self.settings.sfx_volume = volume,
            }
            self.host.audio.apply_settings(&self.settings);
            self.settings.save();
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum VolumeSlider {
        Music,
        Sfx,
    }

    impl VolumeSlider {
        /// (slider id, percent label id)
        fn ids(&self) -> (&'static str, &'static str) {
            match self {
                VolumeSlider::Music => ("musicVolume", "musicVolumeValue"),
                VolumeSlider::Sfx => ("sfxVolume", "sfxVolumeValue"),
            }
        }

        fn volume(&self, settings: &Settings) -> f32 {
            match self {
                VolumeSlider::Music => settings.music_volume,
                VolumeSlider::Sfx => settings.sfx_volume,
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Avoid Boxes starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let renderer = CanvasRenderer::new(canvas);
        if renderer.is_none() {
            log::warn!("Canvas 2D context unavailable - rendering disabled");
        }

        let settings = Settings::load();
        let store = LocalStorageStore;
        let scores = HighScores::load(&store);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(Canvas::default(), settings.difficulty, seed);
        log::info!("Session created with seed: {}", seed);

        let hud = DomHud {
            document: document.clone(),
        };
        let strings = settings.language.strings();
        hud.apply_language(strings);
        hud.show_leaderboard(&scores.entries, strings);

        let app = Rc::new(RefCell::new(App {
            game: Game::new(session, scores).with_language(settings.language),
            host: WebHost {
                renderer,
                audio: AudioManager::new(&settings),
                hud,
            },
            store,
            settings,
            clock: SystemClock,
        }));

        {
            let mut a = app.borrow_mut();
            let (w, h) = available_canvas_size(&window, &document);
            a.resize(w, h);
            let App { game, host, .. } = &mut *a;
            game.attach(host);
        }

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_difficulty_select(app.clone());
        setup_language_select(app.clone());
        setup_volume_sliders(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);

        log::info!("Avoid Boxes running!");
    }

    /// Room left for the canvas between the side panels and under the top bar
    fn available_canvas_size(window: &web_sys::Window, document: &Document) -> (f32, f32) {
        let inner_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let inner_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let measure = |selector: &str, height: bool| -> Option<f64> {
            let el: HtmlElement = document.query_selector(selector).ok()??.dyn_into().ok()?;
            let px = if height { el.offset_height() } else { el.offset_width() };
            Some(px as f64)
        };

        let panels = match (measure(".controls-panel", false), measure(".leaderboard-panel", false)) {
            (Some(left), Some(right)) => left + right,
            _ => FALLBACK_PANEL_WIDTH,
        };
        let top_bar = measure(".top-bar", true).unwrap_or(FALLBACK_TOP_BAR_HEIGHT);

        ((inner_w - panels - 100.0) as f32, (inner_h - top_bar - 60.0) as f32)
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if app.borrow_mut().game.key(&event.key(), pressed) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        for (id, command) in [
            ("startBtn", Command::Start),
            ("pauseBtn", Command::TogglePause),
            ("resetBtn", Command::Reset),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_difficulty_select(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };

        select.set_value(app.borrow().settings.difficulty.as_str());

        let select_clone = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let difficulty = Difficulty::from_str_or_default(&select_clone.value());
            app.borrow_mut().set_difficulty(difficulty);
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_language_select(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        let Some(select) = document
            .get_element_by_id("language")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };

        select.set_value(app.borrow().settings.language.as_str());

        let select_clone = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let language = Language::from_str_or_default(&select_clone.value());
            app.borrow_mut().set_language(language);
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_volume_sliders(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        for slider in [VolumeSlider::Music, VolumeSlider::Sfx] {
            let (slider_id, label_id) = slider.ids();
            let Some(input) = document
                .get_element_by_id(slider_id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let label = document.get_element_by_id(label_id);
            let show_percent = move |percent: u32| {
                if let Some(label) = &label {
                    label.set_text_content(Some(&format!("{}%", percent)));
                }
            };

            let percent = Settings::percent(slider.volume(&app.borrow().settings));
            input.set_value(&percent.to_string());
            show_percent(percent);

            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(volume) = Settings::volume_from_percent(&input_clone.value()) else {
                    return;
                };
                app.borrow_mut().set_volume(slider, volume);
                show_percent(Settings::percent(volume));
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        // Visibility change (tab switch, minimize); never auto-resumes
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut a = app.borrow_mut();
                let now = a.clock.now();
                let App { game, host, .. } = &mut *a;
                game.visibility_hidden(now, host);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let Some(document) = window.document() else { return };
            let (w, h) = available_canvas_size(&window, &document);
            app.borrow_mut().resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use avoid_boxes::game::Game;
    use avoid_boxes::platform::headless::{self, Headless, HeadlessOutcome};
    use avoid_boxes::platform::JsonFileStore;
    use avoid_boxes::sim::{Canvas, Clock, ManualClock, Session, SystemClock};
    use avoid_boxes::{HighScores, Settings, format_seconds};

    const SCORES_FILE: &str = "avoid_boxes_scores.json";
    const PLAYER_NAME: &str = "headless";
    const TIME_LIMIT_MS: f64 = 10.0 * 60.0 * 1000.0;

    env_logger::init();
    log::info!("Avoid Boxes (native) starting...");
    log::info!("Native mode runs a headless session - build for wasm32 to play");

    let settings = Settings::load();
    let mut store = JsonFileStore::new(SCORES_FILE);
    let scores = HighScores::load(&store);

    let seed = SystemClock.now().0 as u64;
    let session = Session::new(Canvas::default(), settings.difficulty, seed);
    let mut game = Game::new(session, scores).with_language(settings.language);
    let mut host = Headless::default();
    game.attach(&mut host);

    log::info!(
        "Running {} session ({}) with seed {}",
        settings.difficulty.as_str(),
        settings.language.as_str(),
        seed
    );
    let clock = ManualClock::new(0.0);
    let outcome = headless::drive(&mut game, &clock, &mut host, TIME_LIMIT_MS);

    match outcome {
        HeadlessOutcome::GameOver(secs) => log::info!("Game over at {}s", format_seconds(secs)),
        HeadlessOutcome::TimeLimit(secs) => {
            log::info!("Time limit reached, still alive at {}s", format_seconds(secs))
        }
    }

    let secs = outcome.survival_secs();
    println!("{}", game.strings().survival_message(secs));
    match game.record_score(&mut store, PLAYER_NAME, secs) {
        Some(rank) => println!("Rank #{} in {}", rank, store.path().display()),
        None => println!("Not a top score"),
    }
}
