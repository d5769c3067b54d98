//! Color Dash entry point
//!
//! Handles platform-specific initialization and drives the run loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent,
        PointerEvent,
    };

    use color_dash::platform::FrameToken;
    use color_dash::platform::web::RafScheduler;
    use color_dash::sim::{Difficulty, Player, RunConfig, Viewport, rng};
    use color_dash::{CoreError, RunLoop, Settings};

    const BACKGROUND: &str = "#0a0b0f";
    const PLAYER_COLORS: [&str; 4] = ["#ff5563", "#09ff00", "#22d3ee", "#f59e0b"];
    const OBSTACLE_COLORS: [&str; 4] = ["#ff5563", "#15ff00", "#22d3ee", "#f59e0b"];

    type Session = Rc<RefCell<RunLoop<RafScheduler>>>;

    fn show_screen(document: &Document, screen: &str) {
        for (id, visible) in [
            ("start-screen", screen == "start"),
            ("hud", screen == "play"),
            ("game-over", screen == "over"),
        ] {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    /// Screen shell: start / play / over, plus the live session if any
    struct Shell {
        document: Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        session: Option<Session>,
    }

    impl Shell {
        fn show_screen(&self, screen: &str) {
            show_screen(&self.document, screen);
        }

        fn selected_difficulty(&self) -> Difficulty {
            self.document
                .get_element_by_id("difficulty")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
                .and_then(|select| Difficulty::from_str(&select.value()))
                .unwrap_or(self.settings.difficulty)
        }

        /// Current surface as a viewport, and size the backing store to match
        fn measure(&self) -> Viewport {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let viewport = Viewport::from_surface(self.canvas.client_width() as f32, dpr as f32);
            self.apply_viewport(&viewport);
            viewport
        }

        fn apply_viewport(&self, viewport: &Viewport) {
            let (w, h) = viewport.buffer_size();
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }

        fn stop_session(&mut self) {
            if let Some(session) = self.session.take() {
                session.borrow_mut().stop();
            }
        }

        fn start_session(&mut self) {
            self.stop_session();

            let difficulty = self.selected_difficulty();
            if difficulty != self.settings.difficulty {
                self.settings.difficulty = difficulty;
                if let Err(e) = self.settings.save() {
                    log::warn!("Could not save settings: {e}");
                }
            }

            let viewport = self.measure();
            let seed = js_sys::Date::now() as u64;
            let document = self.document.clone();
            let run = RunLoop::new(
                RunConfig::new(difficulty),
                viewport,
                Box::new(rng::seeded(seed)),
                RafScheduler::new(),
                move |score| show_game_over(&document, score),
            );
            let session: Session = Rc::new(RefCell::new(run));

            let weak = Rc::downgrade(&session);
            let ctx = self.ctx.clone();
            let document = self.document.clone();
            session
                .borrow_mut()
                .scheduler_mut()
                .set_handler(Rc::new(move |token: FrameToken| {
                    let Some(session) = weak.upgrade() else {
                        return;
                    };
                    let mut run = session.borrow_mut();
                    match run.on_frame(token) {
                        Ok(_) => {
                            draw(&ctx, &run);
                            update_hud(&document, run.score());
                        }
                        // Run already halted and logged; back to the menu
                        Err(CoreError::FrameRequestFailed(_)) => show_screen(&document, "start"),
                        Err(_) => {}
                    }
                }));

            update_hud(&self.document, 0);
            if let Err(e) = session.borrow_mut().start() {
                log::error!("Could not start session: {e}");
                self.show_screen("start");
                return;
            }
            self.show_screen("play");
            self.session = Some(session);
            log::info!("Session started with seed: {}", seed);
        }

        fn cycle_color(&self) {
            if let Some(session) = &self.session {
                session.borrow_mut().cycle_color();
            }
        }

        fn resize(&self) {
            let Some(session) = &self.session else {
                return;
            };
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let mut run = session.borrow_mut();
            let viewport = run.resize(self.canvas.client_width() as f32, dpr as f32);
            self.apply_viewport(&viewport);
            draw(&self.ctx, &run);
        }
    }

    fn show_game_over(document: &Document, score: u32) {
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
        for (id, class) in [("hud", "hidden"), ("game-over", "")] {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn update_hud(document: &Document, score: u32) {
        if let Some(el) = document.get_element_by_id("hud-score") {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    /// Plain 2D canvas draw of the current state
    fn draw(ctx: &CanvasRenderingContext2d, run: &RunLoop<RafScheduler>) {
        let viewport = run.viewport();
        let state = run.state();
        let density = viewport.density_factor as f64;
        let _ = ctx.set_transform(density, 0.0, 0.0, density, 0.0, 0.0);

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        let player = Player::from_viewport(viewport);
        for obstacle in state.obstacles() {
            let rect = obstacle.rect(player.center.y);
            ctx.set_fill_style_str(OBSTACLE_COLORS[obstacle.color_index() % OBSTACLE_COLORS.len()]);
            ctx.fill_rect(
                rect.min.x as f64,
                rect.min.y as f64,
                rect.size.x as f64,
                rect.size.y as f64,
            );
        }

        ctx.set_fill_style_str(PLAYER_COLORS[state.active_color() % PLAYER_COLORS.len()]);
        ctx.begin_path();
        let _ = ctx.arc(
            player.center.x as f64,
            player.center.y as f64,
            player.radius as f64,
            0.0,
            TAU,
        );
        ctx.fill();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Color Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        if let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(settings.difficulty.as_str());
        }

        let shell = Rc::new(RefCell::new(Shell {
            document: document.clone(),
            canvas: canvas.clone(),
            ctx,
            settings,
            session: None,
        }));
        shell.borrow().show_screen("start");

        setup_buttons(&document, shell.clone());
        setup_input_handlers(&window, &canvas, shell.clone());

        log::info!("Color Dash ready");
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, shell: Rc<RefCell<Shell>>) {
        {
            let shell = shell.clone();
            on_click(document, "play-btn", move |_| shell.borrow_mut().start_session());
        }
        on_click(document, "retry-btn", move |_| {
            let mut shell = shell.borrow_mut();
            shell.stop_session();
            shell.show_screen("start");
        });
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        shell: Rc<RefCell<Shell>>,
    ) {
        // Space cycles color
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    shell.borrow().cycle_color();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap / click on the play surface cycles color
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                shell.borrow().cycle_color();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                shell.borrow().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the page tears the session down
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                shell.borrow_mut().stop_session();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
mod headless {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use color_dash::RunLoop;
    use color_dash::platform::ManualScheduler;
    use color_dash::sim::{Difficulty, Player, RunConfig, Viewport, rng};

    /// Queue the color cycles needed to match the nearest oncoming obstacle
    fn autoplay(run: &mut RunLoop<ManualScheduler>) {
        let player = Player::from_viewport(run.viewport());
        let state = run.state();
        let Some(next) = state
            .obstacles()
            .iter()
            .find(|o| !o.passed() && o.x + o.width >= player.center.x - player.radius)
        else {
            return;
        };
        let palette = run.config().palette_size;
        let cycles = (next.color_index() + palette - state.active_color()) % palette;
        for _ in 0..cycles {
            run.cycle_color();
        }
    }

    pub fn run(difficulty: Difficulty, frame_budget: u64) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        log::info!("Headless run: {} for {} frames, seed {}", difficulty.as_str(), frame_budget, seed);

        let final_score = Rc::new(Cell::new(None));
        let sink = final_score.clone();
        let mut run = RunLoop::new(
            RunConfig::new(difficulty),
            Viewport::default(),
            Box::new(rng::seeded(seed)),
            ManualScheduler::new(),
            move |score| sink.set(Some(score)),
        );
        if let Err(e) = run.start() {
            log::error!("{e}");
            return;
        }

        while let Some(token) = run.scheduler_mut().take_next() {
            autoplay(&mut run);
            if let Err(e) = run.on_frame(token) {
                log::error!("{e}");
                break;
            }
            if run.state().frame_count() >= frame_budget {
                run.stop();
            }
        }

        match final_score.get() {
            Some(score) => println!("Game over! Score: {score}"),
            None => println!(
                "Stopped after {} frames. Score: {}",
                run.state().frame_count(),
                run.score()
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Color Dash (native) starting...");
    log::info!("The playable version is the web build - run with `trunk serve`");

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|a| color_dash::Difficulty::from_str(&a))
        .unwrap_or_default();
    let frames = args.next().and_then(|a| a.parse().ok()).unwrap_or(10_000);

    headless::run(difficulty, frames);
}
