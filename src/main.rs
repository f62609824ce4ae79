//! Tile Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement};

    use tile_dash::audio::AudioManager;
    use tile_dash::consts::*;
    use tile_dash::renderer::{build_scene, RenderState};
    use tile_dash::sim::{tick, GameEvent, GamePhase, GameState, TickInput};
    use tile_dash::Settings;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        audio: AudioManager,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                state: GameState::new(seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                audio,
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
            }

            if !self.settings.particles {
                if let Some(world) = self.state.world.as_mut() {
                    world.particles.clear();
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

        /// Drain sim outputs into audio and DOM popups
        fn process_events(&mut self) {
            let camera_x = self.state.camera_x;
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play(cue),
                    GameEvent::ScorePopup { value, x, y } => {
                        if !self.settings.reduced_motion {
                            spawn_score_popup(value, x - camera_x, y);
                        }
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state);
                match render_state.render(&vertices, self.state.camera_x) {
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
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("{:06}", self.state.score)));
            }
            if let Some(el) = document.get_element_by_id("hud-coins") {
                el.set_text_content(Some(&format!("\u{d7}{:02}", self.state.coins)));
            }
            if let Some(el) = document.get_element_by_id("hud-lives") {
                el.set_text_content(Some(&format!("\u{d7}{:02}", self.state.lives)));
            }
            if let Some(el) = document.get_element_by_id("hud-time") {
                el.set_text_content(Some(&self.state.time_left.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            set_screen(&document, "screen-title", self.state.phase == GamePhase::Title);
            set_screen(&document, "screen-over", self.state.phase == GamePhase::GameOver);
            set_screen(&document, "screen-win", self.state.phase == GamePhase::Win);

            if self.state.phase == GamePhase::GameOver || self.state.phase == GamePhase::Win {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&format!("{:06}", self.state.score)));
                }
            }
        }
    }

    fn set_screen(document: &web_sys::Document, id: &str, on: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if on { "screen on" } else { "screen" });
        }
    }

    /// Floating score number, removed after its CSS animation has played
    fn spawn_score_popup(value: u32, screen_x: f32, screen_y: f32) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(container) = document.get_element_by_id("game") else {
            return;
        };
        let Ok(el) = document.create_element("div") else {
            return;
        };
        let _ = el.set_attribute("class", "pop");
        el.set_text_content(Some(&value.to_string()));
        if let Ok(el) = el.clone().dyn_into::<HtmlElement>() {
            let _ = el.style().set_property("left", &format!("{screen_x}px"));
            let _ = el.style().set_property("top", &format!("{screen_y}px"));
        }
        let _ = container.append_child(&el);

        let remove = Closure::once_into_js(move || {
            el.remove();
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                remove.unchecked_ref(),
                900,
            );
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tile Dash starting...");

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

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create device");
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_touch_buttons(game.clone());
        setup_mute_on_blur(game.clone());

        request_animation_frame(game);

        log::info!("Tile Dash running!");
    }

    fn apply_key(input: &mut TickInput, code: &str, down: bool) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => input.left = down,
            "ArrowRight" | "KeyD" => input.right = down,
            "ArrowUp" | "KeyW" | "Space" => {
                input.jump = down;
                if down {
                    input.start = true;
                }
            }
            "ShiftLeft" | "ShiftRight" => input.run = down,
            "Enter" => {
                if down {
                    input.start = true;
                }
            }
            _ => return false,
        }
        true
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if code == "KeyF" {
                    g.settings.show_fps = !g.settings.show_fps;
                    g.settings.save();
                    return;
                }
                if apply_key(&mut g.input, &code, true) {
                    event.prevent_default();
                    g.audio.resume();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if apply_key(&mut g.input, &event.code(), false) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click/tap starts from any menu screen
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.start = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire the on-screen touch buttons to held input flags
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let buttons: [(&str, fn(&mut TickInput, bool)); 4] = [
            ("bL", |input, down| input.left = down),
            ("bR", |input, down| input.right = down),
            ("bJump", |input, down| {
                input.jump = down;
                if down {
                    input.start = true;
                }
            }),
            ("bRun", |input, down| input.run = down),
        ];

        for (id, set) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    set(&mut g.input, true);
                    g.audio.resume();
                });
                let _ = btn.add_event_listener_with_callback(
                    "pointerdown",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            for release in ["pointerup", "pointerleave", "pointercancel"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                    event.prevent_default();
                    set(&mut game.borrow_mut().input, false);
                });
                let _ =
                    btn.add_event_listener_with_callback(release, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_mute_on_blur(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                // Drop held inputs so nothing sticks across focus loss
                g.input = TickInput::default();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        // Schedule the next frame first so one bad frame doesn't stop the loop
        request_animation_frame(game.clone());

        let mut g = game.borrow_mut();

        let dt = if g.last_time > 0.0 {
            ((time - g.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        g.last_time = time;

        g.update(dt, time);
        g.process_events();
        g.render();
        g.update_hud();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tile_dash::sim::{tick, GamePhase, GameState, TickInput};

    env_logger::init();
    log::info!("Tile Dash (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Drive a short scripted session as a sanity check
    let mut state = GameState::new(0xDA5D);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..TickInput::default()
        },
    );
    let input = TickInput {
        right: true,
        run: true,
        jump: true,
        ..TickInput::default()
    };
    for _ in 0..1800 {
        tick(&mut state, &input);
        state.drain_events();
        if state.phase == GamePhase::Win || state.phase == GamePhase::GameOver {
            break;
        }
    }
    log::info!(
        "Headless run finished: phase {:?}, score {}, coins {}, lives {}",
        state.phase,
        state.score,
        state.coins,
        state.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
