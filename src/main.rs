//! Fable Dash entry point
//!
//! On the web this picks a game from `?game=`, wires DOM input to the
//! session, and runs the requestAnimationFrame loop. Natively it plays the
//! runners headless with the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use fable_dash::audio::{AudioManager, SoundEffect};
    use fable_dash::platform::{BrowserChannel, Delivery, FallbackAction, HostSignal, notify_host};
    use fable_dash::renderer::{RenderState, viewport_to_field};
    use fable_dash::{
        AnyGame, GameKind, GamePhase, HudSnapshot, InputAdapter, Key, MiniGame, Outcome, RawInput,
        Session, Settings,
    };

    /// Everything the frame loop and the listeners share
    struct App {
        kind: GameKind,
        session: Session<AnyGame>,
        input: InputAdapter,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        /// Set by the session's completion callback, consumed by the loop
        finished: Rc<Cell<Option<Outcome>>>,
    }

    impl App {
        fn new(kind: GameKind, seed: u64, settings: Settings) -> Self {
            let finished = Rc::new(Cell::new(None));
            let sink = finished.clone();
            let game = AnyGame::new(kind, seed);
            let field = game.field();
            let session = Session::new(
                game,
                Box::new(move |outcome: Outcome| sink.set(Some(outcome))),
            );
            let mut audio = AudioManager::new();
            audio.configure(&settings);
            Self {
                kind,
                session,
                input: InputAdapter::new(kind.input_mode(), field.x),
                render_state: None,
                audio,
                settings,
                finished,
            }
        }

        fn frame(&mut self, now_ms: f64) {
            let input = self.input.take();
            if input.start {
                self.audio.resume();
                set_hidden("end-screen", true);
                set_hidden("menu", true);
            }

            let report = self.session.frame(now_ms, &input);
            for event in &report.events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
            }
            if let Some(hud) = report.hud {
                update_hud(&hud);
            }
            if let Some(outcome) = self.finished.take() {
                show_end_screen(self.kind, outcome, self.session.game().snapshot().score);
            }

            self.render();
        }

        fn render(&mut self) {
            let Some(rs) = self.render_state.as_mut() else {
                return;
            };
            let game = self.session.game();
            rs.set_field(game.field());
            let vertices = game.draw(&self.settings.render_options());
            match rs.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = rs.size;
                    rs.resize(w, h);
                }
                Err(e) => log::warn!("Frame skipped: {e:?}"),
            }
        }

        /// Canvas laid out again (window resize, orientation change)
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let (client_w, client_h, width, height) = canvas_size(canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            self.session
                .game_mut()
                .set_container_size(client_w as f32, client_h as f32);
            self.input.set_field_width(self.session.game().field().x);
            if let Some(rs) = self.render_state.as_mut() {
                rs.resize(width, height);
            }
        }

        /// Tab hidden or window blurred: drop held input, don't count the gap
        fn suspend(&mut self) {
            self.input.release_all();
            self.session.pause_clock();
            if self.settings.mute_on_blur {
                self.audio.set_muted(true);
            }
        }

        fn wake(&mut self) {
            self.audio.set_muted(self.settings.muted);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// (css width, css height, device width, device height). The css size is
    /// passed through as laid out, only the surface is kept non-empty.
    fn canvas_size(canvas: &HtmlCanvasElement) -> (i32, i32, u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        (
            client_w,
            client_h,
            ((client_w as f64 * dpr) as u32).max(1),
            ((client_h as f64 * dpr) as u32).max(1),
        )
    }

    fn set_text(selector: &str, text: &str) {
        let Some(document) = document() else { return };
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        let Some(document) = document() else { return };
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn update_hud(hud: &HudSnapshot) {
        set_text("#hud-score .hud-value", &hud.score.to_string());
        set_text("#hud-time .hud-value", &hud.seconds_left.to_string());
        set_text(
            "#hud-progress .hud-value",
            &format!("{}%", hud.progress.round() as i32),
        );
        set_text("#hud-hint", hud.hint.unwrap_or(""));
        set_hidden("hud", hud.phase == GamePhase::Menu);
    }

    fn show_end_screen(kind: GameKind, outcome: Outcome, score: i64) {
        let title = match outcome {
            Outcome::Won => "You did it!",
            Outcome::Lost => "Oh no! Try again?",
        };
        set_text("#end-title", title);
        set_text("#end-game", kind.title());
        set_text("#end-score", &score.to_string());
        set_hidden("end-screen", false);
    }

    /// Tell the host, or fall back locally when nobody is listening
    fn signal_host(signal: HostSignal) {
        let Some(window) = web_sys::window() else { return };
        match notify_host(&BrowserChannel, signal) {
            Delivery::Delivered => {}
            Delivery::Fallback(FallbackAction::Reload) => {
                if let Err(e) = window.location().reload() {
                    log::warn!("Reload failed: {e:?}");
                }
            }
            Delivery::Fallback(FallbackAction::Close) => {
                if let Err(e) = window.close() {
                    log::warn!("Close failed: {e:?}");
                }
            }
        }
    }

    fn selected_game(window: &web_sys::Window) -> GameKind {
        let slug = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("game"));
        match slug.as_deref().map(GameKind::from_slug) {
            Some(Some(kind)) => kind,
            Some(None) => {
                log::warn!("Unknown game {slug:?}, playing {}", GameKind::ForestDash.title());
                GameKind::ForestDash
            }
            None => GameKind::ForestDash,
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger: {e}").into());
        }

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let kind = selected_game(&window);
        log::info!("Fable Dash starting: {}", kind.title());
        document.set_title(kind.title());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(kind, seed, Settings::load())));
        app.borrow_mut().resize(&canvas);
        log::info!("Game initialized with seed: {}", seed);

        let (_, _, width, height) = canvas_size(&canvas);
        let field = app.borrow().session.game().field();
        match init_renderer(&canvas, width, height, field).await {
            Ok(rs) => app.borrow_mut().render_state = Some(rs),
            Err(e) => log::error!("WebGPU unavailable, running without graphics: {e}"),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(&canvas, app.clone());

        set_hidden("menu", false);
        request_animation_frame(app);

        log::info!("Fable Dash running!");
        Ok(())
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        field: Vec2,
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, field)
            .await
            .map_err(|e| e.to_string())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };

        // Keyboard
        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                event.prevent_default();
                let raw = if down {
                    RawInput::KeyDown(key)
                } else {
                    RawInput::KeyUp(key)
                };
                app.borrow_mut().input.handle(raw);
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer (mouse, pen and touch), mapped into field coordinates
        for event_name in ["pointerdown", "pointermove", "pointerup", "pointercancel"] {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let bounds = target.get_bounding_client_rect();
                let mut app = app.borrow_mut();
                let field = app.session.game().field();
                let p = viewport_to_field(
                    field,
                    (bounds.width() as f32, bounds.height() as f32),
                    Vec2::new(
                        (event.client_x() as f64 - bounds.left()) as f32,
                        (event.client_y() as f64 - bounds.top()) as f32,
                    ),
                );
                let at_ms = event.time_stamp();
                let raw = match event_name {
                    "pointerdown" => {
                        let _ = target.set_pointer_capture(event.pointer_id());
                        app.audio.resume();
                        RawInput::PointerDown { x: p.x, y: p.y, at_ms }
                    }
                    "pointermove" => RawInput::PointerMove { x: p.x, y: p.y },
                    _ => RawInput::PointerUp { x: p.x, y: p.y, at_ms },
                };
                app.input.handle(raw);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keep touch drags from scrolling the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        let Some(document) = document() else { return };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        // Start and play again both go through the start intent
        for id in ["start-btn", "again-btn"] {
            let app = app.clone();
            on_click(id, move || app.borrow_mut().input.request_start());
        }
        {
            let app = app.clone();
            on_click("finish-btn", move || app.borrow_mut().input.request_finish());
        }
        on_click("done-btn", || signal_host(HostSignal::GameComplete));
        on_click("quit-btn", move || {
            app.borrow_mut().suspend();
            signal_host(HostSignal::GameQuit);
        });
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut app = app.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.suspend();
                    log::info!("Suspended (tab hidden)");
                } else {
                    app.wake();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur drops held keys so nothing stays pressed
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().suspend();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().wake();
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;

    use fable_dash::platform::{HostSignal, LogChannel, notify_host};
    use fable_dash::sim::{RunnerState, autopilot};
    use fable_dash::{MiniGame, Outcome, RunnerTuning, Session};

    env_logger::init();
    log::info!("Fable Dash (native) starting...");
    log::info!("Native mode is a headless autopilot demo - serve the wasm build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(7);

    for (name, tuning) in [
        ("Forest Dash", RunnerTuning::forest_dash()),
        ("Midnight Dash", RunnerTuning::midnight_dash()),
    ] {
        let outcome = Rc::new(Cell::new(None::<Outcome>));
        let sink = outcome.clone();
        let mut session = Session::new(
            RunnerState::new(tuning, seed),
            Box::new(move |o: Outcome| sink.set(Some(o))),
        );

        // Ten simulated minutes at 60 Hz is far past any session length
        let mut now_ms = 0.0;
        for _ in 0..36_000 {
            let input = autopilot(session.game());
            let report = session.frame(now_ms, &input);
            if let Some(hud) = report.hud {
                log::debug!("{name}: {hud:?}");
            }
            if outcome.get().is_some() {
                break;
            }
            now_ms += 1000.0 / 60.0;
        }

        let score = session.game().snapshot().score;
        match outcome.get() {
            Some(o) => {
                println!("{name}: {} with score {score} (seed {seed})", if o.won() { "won" } else { "lost" });
                notify_host(&LogChannel, HostSignal::GameComplete);
            }
            None => println!("{name}: unfinished after the time limit, score {score}"),
        }
    }
}
