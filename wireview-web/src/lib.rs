/// Browser host for the wireframe viewer
///
/// `WebViewer` owns a canvas: it draws one frame per animation frame, turns
/// mouse drags into rotation and fetches OBJ text asynchronously. Call
/// `destroy()` (or let the JS wrapper be freed) to stop the loop and detach
/// every listener.
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::str::FromStr;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, Window};
use wireview_core::{Background, LoadCompletion, Rgb, Viewer, ViewerConfig};

pub mod fetch;
pub mod surface;

pub use surface::Canvas2dSurface;

struct Shared {
    viewer: Viewer,
    surface: Canvas2dSurface,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(MouseEvent)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            closure,
        })
    }

    fn detach(self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("could not remove {} listener: {err:?}", self.kind);
        }
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    window: Window,
    shared: Rc<RefCell<Shared>>,
    frame_callback: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Colors are `#rgb` / `#rrggbb`; the background may also be
    /// `"transparent"`. Missing values fall back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        wire_color: Option<String>,
        background_color: Option<String>,
        auto_rotate: Option<bool>,
    ) -> Result<WebViewer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

        let mut config = ViewerConfig::default();
        if let Some(color) = wire_color {
            config.wire_color = Rgb::from_str(&color).map_err(to_js)?;
        }
        if let Some(color) = background_color {
            config.background_color = Background::from_str(&color).map_err(to_js)?;
        }
        if let Some(auto_rotate) = auto_rotate {
            config.auto_rotate = auto_rotate;
        }

        let surface = Canvas2dSurface::new(window.clone(), canvas.clone())?;
        let shared = Rc::new(RefCell::new(Shared {
            viewer: Viewer::new(config),
            surface,
        }));

        let mut viewer = WebViewer {
            window,
            shared,
            frame_callback: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        };
        viewer.attach_listeners(canvas)?;
        viewer.start_loop();

        log::info!("wireview attached to canvas");
        Ok(viewer)
    }

    /// Fetch and show an OBJ file. A later call supersedes this one even if
    /// this one finishes last.
    pub fn load(&self, src: String) {
        let request = self.shared.borrow_mut().viewer.request_load(src);
        let shared = Rc::downgrade(&self.shared);
        let window = self.window.clone();

        spawn_local(async move {
            let result = fetch::fetch_text(&window, &request.source).await;
            complete(&shared, LoadCompletion::new(&request, result));
        });
    }

    /// Stop rendering and detach from the page. Safe to call more than once.
    pub fn destroy(&mut self) {
        if let Some(id) = self.frame_id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
        // Breaks the closure's reference to its own slot
        self.frame_callback.borrow_mut().take();

        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }
}

impl WebViewer {
    fn attach_listeners(&mut self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let canvas_target: &EventTarget = canvas.as_ref();
        let window_target: &EventTarget = self.window.as_ref();

        let shared = self.shared.clone();
        let mousedown = Closure::wrap(Box::new(move |event: MouseEvent| {
            shared
                .borrow_mut()
                .viewer
                .pointer_down(event.client_x() as f32, event.client_y() as f32);
        }) as Box<dyn FnMut(MouseEvent)>);
        self.listeners.push(Listener::attach(
            canvas_target.clone(),
            "mousedown",
            mousedown,
        )?);

        // Moves and releases are tracked on the window so a drag survives
        // leaving the canvas.
        let shared = self.shared.clone();
        let mousemove = Closure::wrap(Box::new(move |event: MouseEvent| {
            shared
                .borrow_mut()
                .viewer
                .pointer_move(event.client_x() as f32, event.client_y() as f32);
        }) as Box<dyn FnMut(MouseEvent)>);
        self.listeners.push(Listener::attach(
            window_target.clone(),
            "mousemove",
            mousemove,
        )?);

        let shared = self.shared.clone();
        let mouseup = Closure::wrap(Box::new(move |_event: MouseEvent| {
            shared.borrow_mut().viewer.pointer_up();
        }) as Box<dyn FnMut(MouseEvent)>);
        self.listeners
            .push(Listener::attach(window_target.clone(), "mouseup", mouseup)?);

        Ok(())
    }

    fn start_loop(&self) {
        let shared = self.shared.clone();
        let window = self.window.clone();
        let callback = self.frame_callback.clone();
        let frame_id = self.frame_id.clone();

        let closure = Closure::wrap(Box::new(move || {
            frame_id.set(None);
            {
                let mut state = shared.borrow_mut();
                let Shared { viewer, surface } = &mut *state;
                viewer.frame(surface);
            }
            request_frame(&window, &callback, &frame_id);
        }) as Box<dyn FnMut()>);

        *self.frame_callback.borrow_mut() = Some(closure);
        request_frame(&self.window, &self.frame_callback, &self.frame_id);
    }
}

impl Drop for WebViewer {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn request_frame(window: &Window, callback: &FrameCallback, frame_id: &Cell<Option<i32>>) {
    // Nothing is scheduled once the viewer has been destroyed
    if let Some(closure) = callback.borrow().as_ref() {
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => frame_id.set(Some(id)),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }
}

fn complete(shared: &Weak<RefCell<Shared>>, completion: LoadCompletion) {
    match shared.upgrade() {
        Some(shared) => {
            shared.borrow_mut().viewer.complete_load(completion);
        }
        None => log::debug!("viewer dropped before load {} finished", completion.token),
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Only fails when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}
