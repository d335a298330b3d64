//! Frank Eats the Universe entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build draws the scene mirror on a 2D canvas; the native build
//! runs a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use frank_eats::GameSession;
    use frank_eats::audio::AudioManager;
    use frank_eats::present::SceneMirror;
    use frank_eats::sim::{EntityKind, GamePhase, Keys};

    /// Assumed frame length before the first timestamp arrives (ms)
    const FIRST_FRAME_MS: f64 = 16.0;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        scene: SceneMirror,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d, viewport: Vec2) -> Self {
            Self {
                session: GameSession::new(seed, viewport),
                scene: SceneMirror::default(),
                audio: AudioManager::new(),
                ctx,
                last_time: 0.0,
            }
        }

        fn restart(&mut self, seed: u64) {
            let viewport = self.session.viewport;
            self.session = GameSession::new(seed, viewport);
            self.scene = SceneMirror::default();
            self.last_time = 0.0;
        }

        fn update(&mut self, time: f64) {
            let delta = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                FIRST_FRAME_MS
            };
            self.last_time = time;
            self.session.frame(delta as f32, &mut self.scene, &mut self.audio);
        }

        /// Draw the scene mirror, camera following the player
        fn render(&self) {
            let ctx = &self.ctx;
            let view = self.session.viewport;
            let camera = self.session.camera();
            let center = camera.center();

            ctx.set_fill_style_str("#05030f");
            ctx.fill_rect(0.0, 0.0, view.x as f64, view.y as f64);

            ctx.save();
            let _ = ctx.translate(view.x as f64 / 2.0, view.y as f64 / 2.0);
            let _ = ctx.scale(camera.zoom as f64, camera.zoom as f64);
            let _ = ctx.translate(-center.x as f64, -center.y as f64);

            for (_, sprite) in self.scene.iter() {
                let color = match sprite.kind {
                    EntityKind::Planet => "#5b7fb8",
                    EntityKind::TreasurePlanet => "#e0b84a",
                    EntityKind::Enemy => "#c0392b",
                    EntityKind::Projectile => "#ff7b5c",
                    EntityKind::Item => "#7fe0a0",
                };
                self.circle(sprite.pos, sprite.radius, color);
            }

            let player = &self.scene.player;
            let body = if player.flash { "#ff4040" } else { "#f2f2f2" };
            self.circle(player.pos, player.radius, body);
            let nose = player.pos + Vec2::from_angle(player.angle) * player.radius;
            ctx.set_stroke_style_str("#202020");
            ctx.set_line_width((player.radius * 0.15) as f64);
            ctx.begin_path();
            ctx.move_to(player.pos.x as f64, player.pos.y as f64);
            ctx.line_to(nose.x as f64, nose.y as f64);
            ctx.stroke();

            ctx.restore();
        }

        fn circle(&self, pos: Vec2, radius: f32, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.begin_path();
            let _ = self.ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
            self.ctx.fill();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;
            let player = &state.player;

            let set = |selector: &str, text: String| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&text));
                }
            };
            set("#hud-level .hud-value", player.level.to_string());
            set(
                "#hud-fullness .hud-value",
                format!("{:.1} / {:.0}", player.fullness, state.tuning.fullness_goal),
            );
            set(
                "#hud-fuel .hud-value",
                format!("{:.0}", player.jetpack.fuel()),
            );
            set("#hud-items .hud-value", player.items.len().to_string());
            let charge = player.charger().progress(player.charge_up_duration(&state.tuning));
            set("#hud-charge .hud-value", format!("{:.0}%", charge * 100.0));

            let banner = match state.phase {
                GamePhase::Playing => None,
                GamePhase::Victory | GamePhase::Ended => Some("victory"),
                GamePhase::GameOver => Some("game-over"),
            };
            for id in ["victory", "game-over"] {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if banner == Some(id) { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Frank Eats the Universe starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            ctx,
            Vec2::new(width as f32, height as f32),
        )));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_focus_loss(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);
        log::info!("Frank Eats the Universe running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let key = event.key();
                match key.as_str() {
                    "r" | "R" if g.session.state.phase != GamePhase::Playing => {
                        let seed = js_sys::Date::now() as u64;
                        g.restart(seed);
                        log::info!("Game restarted with seed: {}", seed);
                    }
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                    }
                    _ => {
                        if g.session.key(&key, true) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.key(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Release all keys when the page loses focus so nothing sticks
    fn setup_focus_loss(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.keys = Keys::default();
                    log::info!("Keys released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.keys = Keys::default();
                log::info!("Keys released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
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
    log::info!("Frank Eats the Universe (native) starting...");
    log::info!("Native mode runs a headless scripted session - use `trunk serve` for the web version");

    if let Err(e) = headless::run(std::env::args().nth(1)) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use glam::Vec2;

    use frank_eats::present::{LogAudio, SceneMirror};
    use frank_eats::sim::GamePhase;
    use frank_eats::{GameSession, Tuning};

    const SEED: u64 = 42;
    const FRAME_MS: f32 = 16.0;
    /// One simulated minute
    const FRAMES: u32 = 3750;

    /// Play a scripted minute, optionally with a JSON tuning override file
    pub fn run(tuning_path: Option<String>) -> Result<(), Box<dyn Error>> {
        let viewport = Vec2::new(1280.0, 720.0);
        let mut session = match tuning_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                log::info!("Loaded tuning overrides from {}", path);
                GameSession::with_tuning(SEED, Tuning::from_json(&json)?, viewport)?
            }
            None => GameSession::new(SEED, viewport),
        };
        let mut scene = SceneMirror::default();
        let mut audio = LogAudio::default();

        for frame in 0..FRAMES {
            script(&mut session, frame);
            session.frame(FRAME_MS, &mut scene, &mut audio);
            if session.state.phase != GamePhase::Playing {
                break;
            }
        }

        let state = &session.state;
        log::info!(
            "Finished after {:.1}s: phase {:?}, level {}, fuel {:.0}, {} entities on screen",
            state.time_ms / 1000.0,
            state.phase,
            state.player.level,
            state.player.jetpack.fuel(),
            scene.len()
        );
        log::info!("Stats: {}", serde_json::to_string(&state.player.stats)?);
        log::info!("Sounds played: {}", audio.played.len());
        if session.failed_ticks > 0 {
            log::warn!("{} ticks failed", session.failed_ticks);
        }
        Ok(())
    }

    /// Thrust in a widening spiral, charging every few seconds
    fn script(session: &mut GameSession, frame: u32) {
        let phase = frame % 400;
        session.key("w", phase < 300);
        session.key("d", phase % 50 < 10);
        session.key(" ", (300..375).contains(&phase));
    }
}
