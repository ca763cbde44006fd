//! Hatch Countdown entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
        MouseEvent,
    };

    use hatch_countdown::Game;
    use hatch_countdown::assets::{Assets, ImageId, ImageSize};
    use hatch_countdown::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use hatch_countdown::persistence::LocalStorage;
    use hatch_countdown::platform::{InputEvent, Key, WebSink, dispatch};
    use hatch_countdown::renderer::CanvasRenderer;
    use hatch_countdown::sim::GamePhase;

    const CANVAS_ID: &str = "game";
    const ADMIN_SAVE_ID: &str = "admin-save";
    const ADMIN_CANCEL_ID: &str = "admin-cancel";

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        assets: Assets,
        renderer: CanvasRenderer,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hatch Countdown starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context query failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let now = js_sys::Date::now();
        let seed = now as u64;
        let game = Game::new(
            Box::new(LocalStorage::open()),
            Box::new(WebSink::new(&document)),
            now,
            seed,
        );
        log::info!("Session opened in {} (seed {})", game.phase().as_str(), seed);

        let app = Rc::new(RefCell::new(App {
            game,
            assets: Assets::new(),
            renderer: CanvasRenderer::new(ctx),
        }));

        for id in ImageId::ALL {
            load_image(app.clone(), id);
        }

        setup_click(&canvas, app.clone());
        setup_keyboard(&document, app.clone());
        setup_admin_buttons(&document, app.clone());

        request_animation_frame(app);

        log::info!("Hatch Countdown running!");
    }

    /// Start an image load; the slot settles on load or on error
    fn load_image(app: Rc<RefCell<App>>, id: ImageId) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Failed to create image for {}: {:?}", id.file_name(), e);
                app.borrow_mut().assets.settle(id, None);
                return;
            }
        };

        let onload = {
            let app = app.clone();
            let image = image.clone();
            Closure::<dyn FnMut()>::new(move || {
                let size = ImageSize {
                    width: image.natural_width() as f32,
                    height: image.natural_height() as f32,
                };
                let mut app = app.borrow_mut();
                app.renderer.set_image(id, image.clone());
                app.assets.settle(id, Some(size));
            })
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().assets.settle(id, None);
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        image.set_src(id.file_name());
    }

    fn setup_click(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            // Map from CSS pixels to the logical canvas
            let rect = canvas_clone.get_bounding_client_rect();
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return;
            }
            let x = (event.client_x() as f64 - rect.left()) * CANVAS_WIDTH as f64 / rect.width();
            let y = (event.client_y() as f64 - rect.top()) * CANVAS_HEIGHT as f64 / rect.height();
            let mut app = app.borrow_mut();
            dispatch(
                &mut app.game,
                InputEvent::Click {
                    x: x as f32,
                    y: y as f32,
                },
                js_sys::Date::now(),
            );
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = Key::from_dom(&event.key());
            let mut app = app.borrow_mut();
            // Keep space and backspace from scrolling or navigating while typing the code
            let typing = !app.game.admin_open() && app.game.phase() == GamePhase::CodeWindow;
            let consumed = dispatch(&mut app.game, InputEvent::Key(key), js_sys::Date::now());
            if consumed && typing && matches!(key, Key::Space | Key::Backspace) {
                event.prevent_default();
            }
        });
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_admin_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(button) = document.get_element_by_id(ADMIN_SAVE_ID) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let (countdown, keypad) = WebSink::read_admin_form(&document);
                let mut app = app.borrow_mut();
                dispatch(
                    &mut app.game,
                    InputEvent::AdminSave { countdown, keypad },
                    js_sys::Date::now(),
                );
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("#{} missing from page", ADMIN_SAVE_ID);
        }

        if let Some(button) = document.get_element_by_id(ADMIN_CANCEL_ID) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut app = app.borrow_mut();
                dispatch(&mut app.game, InputEvent::AdminCancel, js_sys::Date::now());
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("#{} missing from page", ADMIN_CANCEL_ID);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        {
            let mut app = app.borrow_mut();
            let App {
                game,
                assets,
                renderer,
            } = &mut *app;
            // Wall clock, not the rAF timestamp: the deadline is epoch based
            let list = game.frame(js_sys::Date::now(), assets);
            renderer.draw(&list);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hatch Countdown (native) starting...");
    log::info!("The display needs a browser - build for wasm32 and serve the page");

    println!("\nRunning headless session...");
    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one full run without a display: lead-in, countdown, code entry
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use hatch_countdown::Game;
    use hatch_countdown::assets::Assets;
    use hatch_countdown::persistence::MemoryStorage;
    use hatch_countdown::platform::{InputEvent, Key, RecordingSink, dispatch};
    use hatch_countdown::sim::{CORRECT_CODE, GamePhase};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let assets = Assets::none();
    let sink = RecordingSink::new();
    let mut now = 1_700_000_000_000.0;
    let mut game = Game::new(
        Box::new(MemoryStorage::new()),
        Box::new(sink.clone()),
        now,
        42,
    );

    // Lead-in: click through the intro, let the scroll land, skip the story
    while game.phase().is_lead_in() {
        dispatch(&mut game, InputEvent::Click { x: 400.0, y: 300.0 }, now);
        for _ in 0..30 {
            now += FRAME_MS;
            game.frame(now, &assets);
        }
    }
    println!("Run started: {}", game.clock().text());

    // Jump to the code window, rendering a frame on the way for the clock
    let code_window = game.settings().code_window_ms();
    now = game.end_time().unwrap_or(now) - code_window + 1.0;
    game.frame(now, &assets);
    println!("{} with {} on the clock", game.phase().as_str(), game.clock().text());

    for c in CORRECT_CODE.chars() {
        let key = if c == ' ' { Key::Space } else { Key::Digit(c) };
        dispatch(&mut game, InputEvent::Key(key), now);
    }
    dispatch(&mut game, InputEvent::Key(Key::Enter), now);

    let ok = game.phase() == GamePhase::Success;
    println!(
        "{} Code accepted, session ended in {} after {} frames ({} cues)",
        if ok { "✓" } else { "✗" },
        game.phase().as_str(),
        game.frame_count(),
        sink.events().len()
    );
}
