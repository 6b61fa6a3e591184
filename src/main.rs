//! Gate Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gate_flap::consts::*;
    use gate_flap::renderer::{RenderState, build_scene, pipe_color};
    use gate_flap::sim::{GameEvent, GameSession, TickInput, Viewport, tick};
    use gate_flap::ui::{self, Labels};
    use gate_flap::Settings;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        settings: Settings,
        render_state: Option<RenderState>,
        input: TickInput,
        /// Cosmetic randomness, kept apart from the simulation RNG
        color_rng: Pcg32,
        /// Pipe colour of the last frame drawn while playing
        pipe_color: [f32; 4],
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: GameSession, settings: Settings, seed: u64) -> Self {
            let mut color_rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
            let pipe_color = pipe_color(&settings, &mut color_rng);
            Self {
                session,
                settings,
                render_state: None,
                input: TickInput::default(),
                color_rng,
                pipe_color,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Queue a pointer/touch press: flap while playing, restart once ended
        fn press(&mut self) {
            if self.session.is_playing() {
                self.input.impulse = true;
            } else {
                self.input.reset = true;
            }
        }

        /// One simulation tick per animation frame
        fn update(&mut self, time: f64) {
            let events = tick(&mut self.session, &self.input, TICK_UNITS);
            self.input.clear();

            for event in events {
                match event {
                    GameEvent::Ended { score, cause } => {
                        log::info!("Run ended by {:?}, score {}", cause, score)
                    }
                    GameEvent::Restarted => log::info!("Restarted"),
                    GameEvent::Scored { score } => log::debug!("Score {}", score),
                    GameEvent::Flapped => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame. Pipes keep their last colour once ended.
        fn render(&mut self) {
            if self.session.is_playing() {
                self.pipe_color = pipe_color(&self.settings, &mut self.color_rng);
            }
            let vertices = build_scene(&self.session, self.pipe_color);
            let viewport = self.session.viewport();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, viewport) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let numerals = self.settings.numerals;
            let labels = Labels::for_numerals(numerals);

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&ui::score_line(self.session.score(), numerals)));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over
            let ended = !self.session.is_playing();
            let class = if ended { "" } else { "hidden" };
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", class);
            }
            if ended {
                if let Some(el) = document.get_element_by_id("game-over-text") {
                    el.set_text_content(Some(labels.game_over));
                }
                if let Some(el) = document.get_element_by_id("total-score") {
                    el.set_text_content(Some(&ui::total_line(self.session.score(), numerals)));
                }
                if let Some(el) = document.get_element_by_id("play-again-btn") {
                    el.set_text_content(Some(labels.play_again));
                }
            }
        }

        /// Window was resized: new viewport for the simulation and the surface
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(viewport) = window_viewport() else {
                return;
            };
            if self.session.resize(viewport).is_err() {
                return;
            }
            let (w, h) = (viewport.width() as u32, viewport.height() as u32);
            canvas.set_width(w);
            canvas.set_height(h);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(w, h);
            }
        }
    }

    /// Viewport sized to a fraction of the browser window, in whole pixels
    fn window_viewport() -> Option<Viewport> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()? * VIEWPORT_WIDTH_FRACTION;
        let height = window.inner_height().ok()?.as_f64()? * VIEWPORT_HEIGHT_FRACTION;
        match Viewport::new(width.floor() as f32, height.floor() as f32) {
            Ok(viewport) => Some(viewport),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Gate Flap starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element #gameCanvas");
            return;
        };

        let Some(viewport) = window_viewport() else {
            log::error!("Window has no usable size");
            return;
        };
        let (width, height) = (viewport.width() as u32, viewport.height() as u32);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let session = match GameSession::new(seed, viewport) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game::new(session, Settings::load(), seed)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Gate Flap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Space flaps; it never restarts
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if g.session.is_playing() {
                        g.input.impulse = true;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press();
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gate Flap (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    if let Err(e) = headless::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with a simple flap policy, for smoke-testing tuning files
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use gate_flap::consts::TICK_UNITS;
    use gate_flap::sim::{GameEvent, GameSession, TickInput, Viewport, tick};
    use gate_flap::ui;
    use gate_flap::{Settings, Tuning};

    const MAX_TICKS: u64 = 60 * 60 * 5;

    /// Flap when the avatar sinks below the middle of the next gate
    fn should_flap(session: &GameSession) -> bool {
        let avatar = session.avatar();
        let target = session
            .obstacles()
            .iter()
            .find(|p| p.x() + p.width() > avatar.pos.x)
            .map(|p| (p.gate_top() + p.gate_bottom()) / 2.0)
            .unwrap_or(session.viewport().height() / 2.0);
        avatar.vel >= 0.0 && avatar.pos.y + avatar.size.y > target + 20.0
    }

    pub fn run(tuning_path: Option<String>) -> gate_flap::Result<()> {
        let tuning = match tuning_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| gate_flap::Error::InvalidTuning(format!("{path}: {e}")))?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut session = GameSession::with_tuning(seed, Viewport::new(800.0, 600.0)?, tuning)?;

        let mut input = TickInput::default();
        while session.is_playing() && session.ticks() < MAX_TICKS {
            input.impulse = should_flap(&session);
            for event in tick(&mut session, &input, TICK_UNITS) {
                if let GameEvent::Ended { cause, .. } = event {
                    log::info!("Autopilot crashed ({:?})", cause);
                }
            }
            input.clear();
        }

        let settings = Settings::load();
        log::info!(
            "Headless run finished after {} ticks: {}",
            session.ticks(),
            ui::total_line(session.score(), settings.numerals)
        );
        Ok(())
    }
}
