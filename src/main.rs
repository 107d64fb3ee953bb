//! COURIER.EXE entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use courier::consts::*;
    use courier::renderer::{DomView, RainRenderer, dom};
    use courier::sim::{GameState, TickInput, tick};
    use courier::ui::UiAction;
    use courier::{Settings, UiError};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        settings: Settings,
        dom: DomView,
        rain: Option<RainRenderer>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clicks apply once
                self.input.clear();
            }
        }

        /// Render the current frame
        fn render(&mut self, dt_ms: f64) {
            if let Err(e) = self.dom.render(&self.state, &self.settings) {
                log::warn!("DOM update failed: {}", e);
            }
            if let Some(rain) = self.rain.as_mut() {
                if self.settings.rain {
                    let intensity = self.settings.rain_intensity(self.state.city_state());
                    if let Err(e) = rain.render(dt_ms, intensity) {
                        log::warn!("Rain render failed: {}", e);
                    }
                }
            }
        }

        fn handle(&mut self, action: UiAction) {
            match action {
                UiAction::Game(command) => {
                    self.input.push(command);
                    return;
                }
                UiAction::ToggleRain => {
                    self.settings.rain = !self.settings.rain;
                    if !self.settings.rain {
                        if let Some(rain) = self.rain.as_ref() {
                            rain.clear();
                        }
                    }
                }
                UiAction::ToggleReducedMotion => {
                    self.settings.reduced_motion = !self.settings.reduced_motion;
                }
                UiAction::ToggleTelemetry => {
                    self.settings.show_telemetry = !self.settings.show_telemetry;
                }
                UiAction::CycleQuality => {
                    self.settings.quality = self.settings.quality.next();
                    if let Some(rain) = self.rain.as_mut() {
                        rain.set_quality(self.settings.quality);
                    }
                }
            }
            log::info!("Settings changed: {:?}", self.settings);
            self.settings.save();
        }
    }

    pub fn run() -> Result<(), UiError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("COURIER.EXE starting...");

        let window = web_sys::window().ok_or(UiError::NoWindow)?;
        let document = dom::document()?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("rain")
            .ok_or_else(|| UiError::MissingElement("rain".into()))?
            .dyn_into()
            .map_err(|_| UiError::MissingElement("rain".into()))?;
        canvas.set_width(window.inner_width()?.as_f64().unwrap_or(0.0) as u32);
        canvas.set_height(window.inner_height()?.as_f64().unwrap_or(0.0) as u32);

        // The game still works without the background
        let rain = match RainRenderer::new(canvas, settings.quality, seed) {
            Ok(rain) => Some(rain),
            Err(e) => {
                log::warn!("Rain disabled: {}", e);
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed),
            input: TickInput::default(),
            settings,
            dom: DomView::new(&document)?,
            rain,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_click_handler(&document, game.clone());
        setup_keyboard(&window, game.clone());
        setup_resize(&window, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("COURIER.EXE running!");
        Ok(())
    }

    /// Nearest ancestor (or self) carrying a data-action
    fn action_target(event: &MouseEvent) -> Option<Element> {
        let target: Element = event.target()?.dyn_into().ok()?;
        target.closest("[data-action]").ok()?
    }

    fn setup_click_handler(document: &Document, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(el) = action_target(&event) else {
                return;
            };
            if el.has_attribute("disabled") {
                return;
            }
            let Some(name) = el.get_attribute("data-action") else {
                return;
            };
            let value = el.get_attribute("data-value");
            match UiAction::parse(&name, value.as_deref()) {
                Some(action) => game.borrow_mut().handle(action),
                None => log::debug!("Unknown action {} {:?}", name, value),
            }
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(action) = UiAction::from_key(&event.key()) {
                game.borrow_mut().handle(action);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            if let Some(rain) = game.borrow_mut().rain.as_mut() {
                rain.resize(width as u32, height as u32);
            }
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

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_DT as f64 * 1000.0
            };
            g.last_time = time;

            g.update((dt_ms / 1000.0) as f32);
            g.render(dt_ms);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("COURIER.EXE (native) starting...");
    log::info!("The playable version runs in the browser - use `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    run_autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: deliver until every heart is restored
#[cfg(not(target_arch = "wasm32"))]
fn run_autoplay(seed: u64) {
    use courier::consts::{SIM_HZ, TOTAL_HEARTS};
    use courier::sim::{GameEvent, GameState, TickInput, next_commands, tick};

    /// Give up after ten simulated minutes
    const TICK_LIMIT: u64 = 10 * 60 * SIM_HZ as u64;

    let mut state = GameState::new(seed);
    let mut input = TickInput::default();
    log::info!("Autoplay with seed {} ({})", seed, state.city_state().as_str());

    while !state.hearts.is_full() && state.time_ticks < TICK_LIMIT {
        input.commands = next_commands(&state);
        tick(&mut state, &input);

        for event in &state.events {
            match event {
                GameEvent::DeliveryAccepted { id } => {
                    if let Some(session) = &state.session {
                        log::info!(
                            "Accepted {} ({}, {} {})",
                            id,
                            session.delivery.title,
                            session.delivery.difficulty.as_str(),
                            session.puzzle.kind().as_str()
                        );
                    }
                }
                GameEvent::DeliveryCompleted { id, hearts } => {
                    println!("Delivered {}: {}/{} hearts", id, hearts, TOTAL_HEARTS);
                }
                GameEvent::CityStateChanged { from, to } => {
                    println!("City {} -> {}", from.as_str(), to.as_str());
                }
                _ => {}
            }
        }
    }

    let seconds = state.time_ticks as f32 / SIM_HZ as f32;
    if state.hearts.is_full() {
        println!("City restored in {:.1}s of game time", seconds);
    } else {
        log::warn!("Autoplay gave up after {:.1}s", seconds);
    }
}
