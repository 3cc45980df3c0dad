//! `web-sys` host for the scroll watcher.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, Window};

use scrolldir_common::error::{ScrolldirError, ScrolldirResult};
use scrolldir_model::{Direction, FlagValue};
use scrolldir_platform_core::{FlagTarget, ListenerId, ScrollViewport};
use scrolldir_watcher::{ScrollDirectionWatcher, WatcherOptions};

/// Watcher bound to a browser window and element.
pub type WebWatcher = ScrollDirectionWatcher<WindowViewport, ElementFlag>;

type ScrollHandler = Closure<dyn FnMut(Event)>;
type FrameHandler = Closure<dyn FnMut(f64)>;

fn js_error(context: &str, err: JsValue) -> ScrolldirError {
    ScrolldirError::platform(format!("{context}: {err:?}"))
}

/// A browser window as a scroll viewport.
///
/// The scroll and frame handlers are installed by [`WebScrollWatcher`]; a
/// viewport subscribes with its one handler, so the browser ignores a second
/// subscription of the same listener.
pub struct WindowViewport {
    window: Window,
    on_scroll: Option<ScrollHandler>,
    on_frame: Option<FrameHandler>,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            on_scroll: None,
            on_frame: None,
        }
    }

    /// The page's global `window`.
    pub fn global() -> ScrolldirResult<Self> {
        web_sys::window()
            .map(Self::new)
            .ok_or_else(|| ScrolldirError::platform("no global `window` exists"))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn install(&mut self, on_scroll: ScrollHandler, on_frame: FrameHandler) {
        self.on_scroll = Some(on_scroll);
        self.on_frame = Some(on_frame);
    }

    fn scroll_handler(&self) -> ScrolldirResult<&Function> {
        self.on_scroll
            .as_ref()
            .map(|c| c.as_ref().unchecked_ref())
            .ok_or_else(|| ScrolldirError::platform("scroll handler not installed"))
    }
}

impl ScrollViewport for WindowViewport {
    fn scroll_y(&self) -> f64 {
        match self.window.scroll_y() {
            Ok(y) if y != 0.0 => y,
            _ => self.window.page_y_offset().unwrap_or(0.0),
        }
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.window
            .document()
            .and_then(|d| d.body())
            .map(|body| body.offset_height() as f64)
            .unwrap_or(0.0)
    }

    fn add_scroll_listener(&mut self, _id: ListenerId) -> ScrolldirResult<()> {
        let handler = self.scroll_handler()?;
        self.window
            .add_event_listener_with_callback("scroll", handler)
            .map_err(|e| js_error("addEventListener(scroll)", e))
    }

    fn remove_scroll_listener(&mut self, _id: ListenerId) -> ScrolldirResult<()> {
        let handler = self.scroll_handler()?;
        self.window
            .remove_event_listener_with_callback("scroll", handler)
            .map_err(|e| js_error("removeEventListener(scroll)", e))
    }

    fn request_animation_frame(&mut self, _id: ListenerId) -> ScrolldirResult<()> {
        let handler = self
            .on_frame
            .as_ref()
            .ok_or_else(|| ScrolldirError::platform("frame handler not installed"))?;
        self.window
            .request_animation_frame(handler.as_ref().unchecked_ref())
            .map(|_| ())
            .map_err(|e| js_error("requestAnimationFrame", e))
    }
}

impl Drop for WindowViewport {
    fn drop(&mut self) {
        // A frame may still be queued; keep its handler callable. It finds
        // the watcher gone and returns.
        if let Some(on_frame) = self.on_frame.take() {
            on_frame.forget();
        }
    }
}

/// A DOM element carrying the flag attribute.
pub struct ElementFlag {
    element: Element,
}

impl ElementFlag {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// The document root (`<html>`).
    pub fn document_root() -> ScrolldirResult<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .map(Self::new)
            .ok_or_else(|| ScrolldirError::platform("document has no root element"))
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl FlagTarget for ElementFlag {
    fn set_flag(&mut self, name: &str, value: &str) -> ScrolldirResult<()> {
        self.element
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", e))
    }
}

/// A watcher wired into the page's event loop.
///
/// Callbacks run while the watcher is borrowed; calling back into this
/// handle from `on_tick` or `on_change` panics.
pub struct WebScrollWatcher {
    inner: Rc<RefCell<WebWatcher>>,
}

impl WebScrollWatcher {
    /// Bind a watcher to the global window and document root, then `init` it.
    pub fn attach(options: WatcherOptions<WindowViewport, ElementFlag>) -> ScrolldirResult<Self> {
        let watcher = ScrollDirectionWatcher::new(
            WindowViewport::global()?,
            ElementFlag::document_root()?,
        );
        let inner = Rc::new(RefCell::new(watcher));
        let (on_scroll, on_frame) = handlers(Rc::downgrade(&inner));
        inner.borrow_mut().viewport_mut().install(on_scroll, on_frame);

        let handle = Self { inner };
        handle.init(options)?;
        tracing::debug!(flag = %handle.flag(), "Scroll watcher attached to window");
        Ok(handle)
    }

    /// Re-apply options and subscribe again.
    ///
    /// Call [`off`](Self::off) before passing a replacement viewport.
    pub fn init(
        &self,
        mut options: WatcherOptions<WindowViewport, ElementFlag>,
    ) -> ScrolldirResult<()> {
        if let Some(viewport) = options.viewport.as_mut() {
            let (on_scroll, on_frame) = handlers(Rc::downgrade(&self.inner));
            viewport.install(on_scroll, on_frame);
        }
        self.inner.borrow_mut().init(options)
    }

    pub fn off(&self) -> ScrolldirResult<()> {
        self.inner.borrow_mut().off()
    }

    pub fn direction(&self) -> Direction {
        self.inner.borrow().direction()
    }

    pub fn flag(&self) -> FlagValue {
        self.inner.borrow().flag()
    }
}

impl Drop for WebScrollWatcher {
    fn drop(&mut self) {
        if let Ok(mut watcher) = self.inner.try_borrow_mut() {
            if watcher.is_active() {
                let _ = watcher.off();
            }
        }
    }
}

/// Build the scroll and frame handlers for a shared watcher.
///
/// Errors are thrown into JS once the watcher borrow has been released.
fn handlers(watcher: Weak<RefCell<WebWatcher>>) -> (ScrollHandler, FrameHandler) {
    let scroll_target = watcher.clone();
    let on_scroll = Closure::wrap(Box::new(move |event: Event| {
        let Some(inner) = scroll_target.upgrade() else {
            return;
        };
        let result = inner.borrow_mut().handle_scroll(event.time_stamp());
        if let Err(e) = result {
            wasm_bindgen::throw_str(&e.to_string());
        }
    }) as Box<dyn FnMut(Event)>);

    let on_frame = Closure::wrap(Box::new(move |_frame_time: f64| {
        let Some(inner) = watcher.upgrade() else {
            return;
        };
        let result = inner.borrow_mut().on_animation_frame();
        if let Err(e) = result {
            wasm_bindgen::throw_str(&e.to_string());
        }
    }) as Box<dyn FnMut(f64)>);

    (on_scroll, on_frame)
}
