//! Tap Dash entry point
//!
//! Handles platform-specific initialization. The wasm build wires the
//! DOM to the game driver and runs the frame loop; the native build runs
//! a short headless session as a smoke demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement, MouseEvent, TouchEvent};

    use tap_dash::TapDash;
    use tap_dash::audio::AudioManager;
    use tap_dash::sim::{InputEvent, Overlay, RenderCommand};
    use tap_dash::store::BrowserStore;

    const OVERLAY_IDS: [&str; 3] = ["menu-overlay", "gameover-overlay", "leaderboard-overlay"];

    /// Browser-side game instance: the driver plus frame clock and audio
    struct Game {
        app: TapDash<BrowserStore>,
        audio: AudioManager,
        last_time: f64,
    }

    type Handle = Rc<RefCell<Game>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tap Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            app: TapDash::new(seed, BrowserStore),
            audio: AudioManager::new(),
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        refresh_playfield(&document, &mut game.borrow_mut());
        update_highscore_label(&document, game.borrow().app.high_score());

        setup_target_events(&document, game.clone());
        setup_buttons(&document, game.clone());

        show_overlay(&document, &game.borrow(), Overlay::Menu);
        request_animation_frame(game);

        log::info!("Tap Dash running!");
    }

    fn request_animation_frame(game: Handle) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Handle, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Clamp huge deltas after a hidden tab so a single frame
            // can't drain the whole countdown
            let dt = if g.last_time > 0.0 {
                (time - g.last_time).min(100.0)
            } else {
                0.0
            };
            g.last_time = time;

            g.app.advance(dt);

            let commands = g.app.drain_commands();
            if !commands.is_empty() {
                let document = web_sys::window().unwrap().document().unwrap();
                for cmd in commands {
                    apply_command(&document, &mut g, cmd);
                }
            }
        }
        request_animation_frame(game);
    }

    /// Apply one engine command to the page
    fn apply_command(document: &Document, g: &mut Game, cmd: RenderCommand) {
        match cmd {
            RenderCommand::UpdateScore(text) => set_text(document, "score", &text),
            RenderCommand::UpdateLevel(text) => set_text(document, "level", &text),
            RenderCommand::UpdateCombo(text) => set_text(document, "combo", &text),
            RenderCommand::UpdateTimer(fraction) => {
                set_style(
                    document,
                    "timer",
                    "width",
                    &format!("{:.1}%", fraction * 100.0),
                );
            }
            RenderCommand::ShowTarget { kind, size, x, y } => {
                if let Some(el) = document.get_element_by_id("circle") {
                    el.set_class_name(kind.as_str());
                    if let Some(html) = el.dyn_ref::<HtmlElement>() {
                        let style = html.style();
                        let _ = style.set_property("width", &format!("{size}px"));
                        let _ = style.set_property("height", &format!("{size}px"));
                        let _ = style.set_property("left", &format!("{x}px"));
                        let _ = style.set_property("top", &format!("{y}px"));
                        let _ = style.set_property("display", "block");
                    }
                }
            }
            RenderCommand::HideTarget => set_style(document, "circle", "display", "none"),
            RenderCommand::SpawnParticles { x, y, color } => {
                spawn_particles(document, x, y, color);
            }
            RenderCommand::PlayTone {
                freq,
                duration_ms,
                volume,
            } => g.audio.play_tone(freq, duration_ms, volume),
            RenderCommand::ShowOverlay(overlay) => show_overlay(document, g, overlay),
            RenderCommand::SessionSummary(summary) => {
                set_text(
                    document,
                    "final-score-text",
                    &format!("Score: {}", summary.final_score),
                );
                set_text(
                    document,
                    "final-level-text",
                    &format!("Level reached: {}", summary.final_level),
                );
                update_highscore_label(document, g.app.high_score());
                if let Some(area) = document.get_element_by_id("new-highscore-area") {
                    if summary.is_new_high_score {
                        let _ = area.class_list().remove_1("hidden");
                        if let Some(input) = name_input(document) {
                            input.set_value("");
                            let _ = input.focus();
                        }
                    } else {
                        let _ = area.class_list().add_1("hidden");
                    }
                }
            }
        }
    }

    fn setup_target_events(document: &Document, game: Handle) {
        let Some(circle) = document.get_element_by_id("circle") else {
            log::warn!("no target element; taps will be ignored");
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.app.handle(InputEvent::Tap {
                    at_ms: now_ms(),
                    pos: Vec2::new(event.client_x() as f32, event.client_y() as f32),
                });
            });
            let _ =
                circle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.app.handle(InputEvent::Tap {
                    at_ms: now_ms(),
                    pos: Vec2::new(touch.client_x() as f32, touch.client_y() as f32),
                });
            });
            let _ = circle
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Handle) {
        // Menu and game-over both lead into a fresh session
        for id in ["play-button", "retry-button"] {
            on_click(document, id, game.clone(), |document, g| {
                g.audio.resume();
                g.audio.play_tone(650.0, 80, 0.25);
                hide_overlays(document);
                refresh_playfield(document, g);
                g.app.handle(InputEvent::StartRequested);
            });
        }

        for id in ["show-leaderboard-button", "gameover-leaderboard-button"] {
            on_click(document, id, game.clone(), |_, g| {
                g.app.handle(InputEvent::ViewLeaderboard);
            });
        }

        for id in ["back-to-menu-button", "leaderboard-back-button"] {
            on_click(document, id, game.clone(), |_, g| {
                g.app.handle(InputEvent::ReturnToMenu);
            });
        }

        on_click(document, "save-score-button", game, |document, g| {
            let name = name_input(document).map(|i| i.value()).unwrap_or_default();
            g.app.handle(InputEvent::SubmitScore(name));
            update_highscore_label(document, g.app.high_score());
            if let Some(area) = document.get_element_by_id("new-highscore-area") {
                let _ = area.class_list().add_1("hidden");
            }
            render_leaderboard(document, g);
        });
    }

    /// Register a click handler on a button by id (missing ids are skipped)
    fn on_click(
        document: &Document,
        id: &str,
        game: Handle,
        handler: impl Fn(&Document, &mut Game) + 'static,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut g = game.borrow_mut();
            handler(&document, &mut g);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Particle burst at (x, y); nodes remove themselves once the CSS
    /// animation has played out
    fn spawn_particles(document: &Document, x: f32, y: f32, color: &str) {
        let Some(field) = document.get_element_by_id("game") else {
            return;
        };
        for _ in 0..10 {
            let Ok(p) = document.create_element("div") else {
                continue;
            };
            p.set_class_name("particle");
            if let Some(html) = p.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("left", &format!("{x}px"));
                let _ = style.set_property("top", &format!("{y}px"));
                let _ = style.set_property("background", color);
                let dx = js_sys::Math::random() * 80.0 - 40.0;
                let dy = js_sys::Math::random() * 80.0 - 40.0;
                let _ = style.set_property("--dx", &format!("{dx:.0}px"));
                let _ = style.set_property("--dy", &format!("{dy:.0}px"));
            }
            let _ = field.append_child(&p);

            let node = p.clone();
            let cleanup = Closure::once_into_js(move || node.remove());
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cleanup.unchecked_ref(),
                    450,
                );
            }
        }
    }

    fn show_overlay(document: &Document, g: &Game, overlay: Overlay) {
        hide_overlays(document);
        if overlay == Overlay::Leaderboard {
            render_leaderboard(document, g);
        }
        let id = match overlay {
            Overlay::Menu => "menu-overlay",
            Overlay::GameOver => "gameover-overlay",
            Overlay::Leaderboard => "leaderboard-overlay",
        };
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().add_1("visible");
        }
    }

    fn hide_overlays(document: &Document) {
        for id in OVERLAY_IDS {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.class_list().remove_1("visible");
            }
        }
    }

    fn render_leaderboard(document: &Document, g: &Game) {
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_inner_html("");
        let entries = g.app.leaderboard();
        if entries.is_empty() {
            list.set_inner_html("<li>No scores yet. Be the first!</li>");
            return;
        }
        for (idx, entry) in entries.iter().enumerate() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!(
                    "{}. {} - {}",
                    idx + 1,
                    entry.name,
                    entry.score
                )));
                let _ = list.append_child(&li);
            }
        }
    }

    /// Pull the playfield size from the DOM into the engine
    fn refresh_playfield(document: &Document, g: &mut Game) {
        if let Some(field) = document.get_element_by_id("game") {
            let w = field.client_width() as f32;
            let h = field.client_height() as f32;
            if w > 0.0 && h > 0.0 {
                g.app.set_playfield(w, h);
            }
        }
    }

    fn update_highscore_label(document: &Document, high_score: u32) {
        set_text(document, "highscore", &format!("High Score: {high_score}"));
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let _ = html.style().set_property(property, value);
            }
        }
    }

    fn name_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("player-name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tap Dash (native) starting...");
    log::info!("Native mode is a headless smoke demo - run with `trunk serve` for the web version");

    demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a short scripted session against an in-memory store
#[cfg(not(target_arch = "wasm32"))]
fn demo_session() {
    use glam::Vec2;
    use tap_dash::sim::InputEvent;
    use tap_dash::{MemoryStore, TapDash};

    let mut app = TapDash::new(7, MemoryStore::default());
    app.set_playfield(480.0, 640.0);
    app.handle(InputEvent::StartRequested);

    let mut at_ms = 0.0;
    for _ in 0..12 {
        if !app.state().is_active() {
            break;
        }
        let pos = app.state().target.map(|t| t.pos).unwrap_or(Vec2::ZERO);
        app.handle(InputEvent::Tap { at_ms, pos });
        app.advance(100.0);
        at_ms += 100.0;
    }

    let session = app.state().session;
    println!(
        "demo session: score {} at level {} (combo x{})",
        session.score, session.level, session.combo
    );
}
