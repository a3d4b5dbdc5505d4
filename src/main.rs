//! Survival Dodge entry point
//!
//! On the web: wires the canvas, pointer listeners and requestAnimationFrame
//! into a [`GameLoop`]. On native: plays one headless run with a stationary
//! player on a synthetic 60 Hz clock and reports the survival time.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use survival_dodge::game::{FrameHandle, FrameOutcome, FrameScheduler, GameLoop, GamePhase, RunId};
    use survival_dodge::platform::{PointerEvent, SurfaceMetrics};
    use survival_dodge::render::{build_frame, canvas::CanvasRenderer};
    use survival_dodge::{HighScores, Settings};

    type WebGame = GameLoop<WebFrames, HighScores>;

    /// requestAnimationFrame-backed scheduler
    struct WebFrames {
        game: Weak<RefCell<WebGame>>,
        renderer: Rc<CanvasRenderer>,
    }

    impl FrameScheduler for WebFrames {
        fn request_frame(&mut self, run: RunId) -> FrameHandle {
            let game = self.game.clone();
            let renderer = self.renderer.clone();
            let closure = Closure::once(move |time: f64| {
                on_animation_frame(&game, &renderer, run, time);
            });
            let handle = web_sys::window()
                .ok_or_else(|| JsValue::from_str("no window"))
                .and_then(|w| w.request_animation_frame(closure.as_ref().unchecked_ref()));
            closure.forget();
            match handle {
                Ok(id) => FrameHandle(id),
                Err(err) => {
                    log::error!("requestAnimationFrame failed: {err:?}");
                    FrameHandle(0)
                }
            }
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0);
            }
        }
    }

    fn on_animation_frame(game: &Weak<RefCell<WebGame>>, renderer: &CanvasRenderer, run: RunId, time: f64) {
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut g = game.borrow_mut();
        match g.on_frame(run, time) {
            FrameOutcome::Stale => {}
            FrameOutcome::Continue(_) => paint(&g, renderer),
            FrameOutcome::GameOver(record) => {
                paint(&g, renderer);
                set_text("final-score", &format!("{:.2}", record.score));
                set_hidden("start", false);
            }
        }
    }

    fn paint(game: &WebGame, renderer: &CanvasRenderer) {
        let commands = build_frame(game.state(), game.phase(), game.settings());
        if let Err(err) = renderer.draw(&commands) {
            log::warn!("Draw failed: {err:?}");
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn surface_of(canvas: &HtmlCanvasElement) -> SurfaceMetrics {
        let rect = canvas.get_bounding_client_rect();
        SurfaceMetrics::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        event
            .touches()
            .get(0)
            .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Survival Dodge starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let renderer = Rc::new(CanvasRenderer::new(canvas.clone())?);
        renderer.resize(window.device_pixel_ratio());

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Seed: {seed}");

        if let Some(input) = document
            .get_element_by_id("nickname")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&settings.nickname);
        }

        let game: Rc<RefCell<WebGame>> = Rc::new_cyclic(|weak| {
            let frames = WebFrames {
                game: weak.clone(),
                renderer: renderer.clone(),
            };
            RefCell::new(GameLoop::new(settings, seed, frames, HighScores::load()))
        });
        game.borrow_mut().set_surface(surface_of(&canvas));

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(&canvas, game.clone())?;
        setup_resize(&canvas, renderer.clone(), game.clone());
        setup_page_hide(game.clone());

        paint(&game.borrow(), &renderer);
        log::info!("Survival Dodge ready");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        // Mouse: absolute placement
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.set_surface(surface_of(&canvas_clone));
                g.on_pointer(PointerEvent::MouseMove {
                    x: event.client_x() as f32,
                    y: event.client_y() as f32,
                });
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: remember the gesture baseline
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().on_pointer(PointerEvent::TouchStart {
                    touch: first_touch(&event),
                });
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: relative drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.set_surface(surface_of(&canvas_clone));
                g.on_pointer(PointerEvent::TouchMove {
                    touch: first_touch(&event),
                });
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().on_pointer(PointerEvent::TouchEnd);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let Some(button) = document.get_element_by_id("start") else {
            log::warn!("No start button found");
            return Ok(());
        };

        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let nickname = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("nickname"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value().trim().to_string());

            let mut g = game.borrow_mut();
            if let Some(nickname) = nickname.filter(|n| !n.is_empty()) {
                if nickname != g.settings().nickname {
                    g.settings_mut().nickname = nickname;
                    g.settings().save();
                }
            }
            g.set_surface(surface_of(&canvas_clone));
            g.start();
            if g.phase() == GamePhase::Playing {
                set_hidden("start", true);
            }
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Navigating away ends the run without a score
    fn setup_page_hide(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().stop();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, renderer: Rc<CanvasRenderer>, game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let ratio = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            renderer.resize(ratio);
            let mut g = game.borrow_mut();
            g.set_surface(surface_of(&canvas_clone));
            if g.phase() != GamePhase::Playing {
                paint(&g, &renderer);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use survival_dodge::{FrameOutcome, GameLoop, HighScores, QueuedFrames, Settings};

    /// Synthetic refresh interval
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_RUN_MS: f64 = 10.0 * 60.0 * 1000.0;

    env_logger::init();
    log::info!("Survival Dodge (native) starting headless run...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {seed}");

    let mut game = GameLoop::new(settings, seed, QueuedFrames::new(), HighScores::load());
    game.start();

    let mut now = 0.0;
    while let Some((_, run)) = game.scheduler_mut().pop() {
        if let FrameOutcome::GameOver(record) = game.on_frame(run, now) {
            println!("{} survived {:.2}s", record.nickname, record.score);
            return;
        }
        now += FRAME_MS;
        if now > MAX_RUN_MS {
            game.stop();
            println!("Still alive after {:.0}s, stopping", MAX_RUN_MS / 1000.0);
            return;
        }
    }
}
