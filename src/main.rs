//! Fruit Slicer entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

    use fruit_slicer::audio::AudioManager;
    use fruit_slicer::platform::{PageState, PlatformError};
    use fruit_slicer::platform::web::{canvas_by_id, context_2d, document, resize_canvas, window};
    use fruit_slicer::renderer::CanvasPainter;
    use fruit_slicer::{FrameDriver, Settings};

    const CANVAS_ID: &str = "canvas";
    const BEGIN_BUTTON_ID: &str = "begin-btn";
    const LEVEL_BAR_SELECTOR: &str = ".level-bar";

    /// Everything the frame loop touches
    struct App {
        driver: FrameDriver,
        painter: CanvasPainter,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        document: Document,
        /// Pending animation frame request, if any
        raf_id: Option<i32>,
        page: PageState,
    }

    impl App {
        fn resize(&mut self) {
            let size = resize_canvas(&self.canvas, self.painter.context());
            let viewport = size.viewport();
            self.driver.set_viewport(viewport.width, viewport.height);
        }

        fn frame(&mut self, time: f64) {
            let frame = self.driver.frame(time);
            self.painter.paint(&frame.display);
            for event in &frame.events {
                self.audio.handle(event);
            }
            self.update_levels();
        }

        /// Push level meter heights into the shell's bars
        fn update_levels(&self) {
            let Ok(bars) = self.document.query_selector_all(LEVEL_BAR_SELECTOR) else {
                return;
            };
            let heights = self.driver.state().levels.display_heights();
            let opacity = if self.page.started { "1" } else { "0.25" };
            for (i, height) in heights.iter().enumerate() {
                let Some(bar) = bars
                    .item(i as u32)
                    .and_then(|n| n.dyn_into::<HtmlElement>().ok())
                else {
                    break;
                };
                let style = bar.style();
                let _ = style.set_property("height", &format!("{}px", height.round()));
                let _ = style.set_property("opacity", opacity);
            }
        }

        /// Returns false if playback had already begun
        fn begin(&mut self) -> bool {
            if !self.page.begin() {
                return false;
            }
            self.audio.activate();
            self.driver.play();
            if let Some(btn) = self.document.get_element_by_id(BEGIN_BUTTON_ID) {
                let _ = btn.class_list().add_1("hidden");
            }
            log::info!("Begin pressed");
            true
        }

        fn cancel_frame(&mut self) {
            if let Some(id) = self.raf_id.take() {
                if let Ok(window) = window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }
    }

    pub fn run() {
        match bootstrap() {
            Ok(app) => {
                {
                    let mut a = app.borrow_mut();
                    a.resize();
                    // Paint the idle scene once so the canvas isn't blank
                    a.frame(0.0);
                }
                log::info!("Fruit Slicer ready");
            }
            Err(e) => log::error!("Fruit Slicer inert: {}", e),
        }
    }

    fn bootstrap() -> Result<Rc<RefCell<App>>, PlatformError> {
        let document = document()?;
        let canvas = canvas_by_id(CANVAS_ID)?;
        let ctx: CanvasRenderingContext2d = context_2d(&canvas)?;

        let settings = Settings::load(&canvas);
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!(
            "Seed {}, quality {}, {} particles",
            seed,
            settings.quality.as_str(),
            settings.particles()
        );

        let app = Rc::new(RefCell::new(App {
            driver: FrameDriver::new(settings.clone(), seed),
            painter: CanvasPainter::new(ctx),
            audio: AudioManager::new(&settings, seed),
            canvas,
            document,
            raf_id: None,
            page: PageState::default(),
        }));

        setup_begin_button(app.clone());
        setup_handlers(app.clone())?;
        Ok(app)
    }

    fn setup_begin_button(app: Rc<RefCell<App>>) {
        let Some(btn) = app.borrow().document.get_element_by_id(BEGIN_BUTTON_ID) else {
            log::warn!("No #{} element; playback never starts", BEGIN_BUTTON_ID);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            if app.borrow_mut().begin() {
                request_animation_frame(app.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_handlers(app: Rc<RefCell<App>>) -> Result<(), PlatformError> {
        let window = window()?;
        let document = app.borrow().document.clone();

        // Resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    a.cancel_frame();
                    a.driver.pause();
                } else {
                    resume_playback(&app);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let "m" | "M" = event.key().as_str() {
                    let mut a = app.borrow_mut();
                    let muted = !a.audio.is_muted();
                    a.audio.set_muted(muted);
                    log::info!("Muted: {}", muted);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Teardown
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                a.cancel_frame();
                a.driver.pause();
                a.audio.close();
                a.page.page_hidden();
                log::info!("Torn down");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the back/forward cache
        {
            let closure =
                Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
                    if !app.borrow_mut().page.page_shown(event.persisted()) {
                        return;
                    }
                    app.borrow_mut().audio.activate();
                    log::info!("Restored from page cache");
                    resume_playback(&app);
                });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    /// Restart the frame loop if Begin was pressed and it isn't running
    fn resume_playback(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if !a.page.started || a.driver.is_playing() {
                return;
            }
            a.driver.play();
        }
        request_animation_frame(app.clone());
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Ok(window) = window() else { return };
        let handle = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.borrow_mut().raf_id = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            if !a.driver.is_playing() {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Fruit Slicer starting...");
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fruit_slicer::sim::SceneEvent;
    use fruit_slicer::{FrameDriver, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEFAULT_SECONDS: f64 = 12.0;

    env_logger::init();
    log::info!("Fruit Slicer (native) starting headless run...");

    let args: Vec<String> = std::env::args().collect();
    let settings = args
        .get(1)
        .map(|json| Settings::from_json(json))
        .unwrap_or_default();
    let seconds = match args.get(2).map(|s| s.parse::<f64>()) {
        Some(Ok(s)) if s.is_finite() && s > 0.0 => s,
        Some(_) => {
            log::warn!("Invalid duration, using {} s", DEFAULT_SECONDS);
            DEFAULT_SECONDS
        }
        None => DEFAULT_SECONDS,
    };
    let seed = settings.seed.unwrap_or(0);
    log::info!(
        "Seed {}, quality {}, {} s at 60 Hz",
        seed,
        settings.quality.as_str(),
        seconds
    );

    let mut driver = FrameDriver::new(settings, seed);
    driver.set_viewport(800.0, 600.0);
    driver.play();

    let frames = (seconds * 1000.0 / FRAME_MS).round() as u64;
    let mut spawned = 0u32;
    let mut slices = 0u32;
    let mut last_commands = 0usize;
    let mut simulated = 0.0f32;
    for i in 0..=frames {
        let frame = driver.frame(i as f64 * FRAME_MS);
        last_commands = frame.display.len();
        simulated += frame.dt;
        for event in &frame.events {
            match event {
                SceneEvent::FruitSpawned { .. } => spawned += 1,
                SceneEvent::SliceTriggered { fruit_id, pos } => {
                    slices += 1;
                    log::info!(
                        "Slice: fruit {} at ({:.1}, {:.1}), t = {:.2} s",
                        fruit_id,
                        pos.x,
                        pos.y,
                        driver.state().elapsed
                    );
                }
                SceneEvent::FruitRemoved { .. } => {}
            }
        }
    }

    println!(
        "{} frames ({:.2} s simulated): {} fruits spawned, {} slices, {} on screen, last frame {} draw commands",
        driver.frames(),
        simulated,
        spawned,
        slices,
        driver.state().fruits.len(),
        last_commands
    );
}
