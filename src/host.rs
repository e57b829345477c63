//! Browser entry point: mounts an [`EditorCore`] on a canvas and executes its actions.
//!
//! The host owns everything that needs a browser: DOM listeners, the 2D
//! context, `window.prompt`, `localStorage`, and spawning backend requests on
//! the page's event loop. Core state lives behind a `RefCell` that is never
//! borrowed across an `await` or across action dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent, TouchList,
};

use crate::config::{ConfigError, EditorConfig, PageData};
use crate::engine::{Action, EditorCore, NamePrompt};
use crate::geom::Point;
use crate::input::{self, PointerPhase, PointerSample, TouchPoint};
use crate::recent::{LocalStore, RecentNames};
use crate::render;
use crate::sync::TagClient;

/// Route `log` output to the browser console and report panics there.
///
/// `level` is a `log` level name such as `"debug"`; unknown names mean `info`.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    console_error_panic_hook::set_once();
    let level = level.parse().unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
}

struct Shared {
    core: RefCell<EditorCore>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    client: TagClient,
    store: Option<LocalStore>,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

/// A tag editor attached to one canvas.
#[wasm_bindgen]
pub struct FaceTagEditor {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl FaceTagEditor {
    /// Attach an editor to `canvas`.
    ///
    /// `page_json` holds the photo's filename, size, tags and known names.
    /// `config_json` may be empty to use the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string when the JSON is invalid, the canvas has no 2D
    /// context, or a listener cannot be registered.
    pub fn attach(canvas: HtmlCanvasElement, page_json: &str, config_json: &str) -> Result<FaceTagEditor, JsValue> {
        let page = PageData::from_json(page_json).map_err(to_js)?;
        let mut config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(to_js)?
        };
        if config.api_base.is_empty() {
            config.api_base = page_origin().unwrap_or_default();
        }

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        set_canvas_size(&canvas, page.width, page.height);

        let store = match LocalStore::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("recent names will not persist: {e}");
                None
            }
        };
        let recent = store.as_ref().map_or_else(RecentNames::new, |s| RecentNames::load(s, &config.storage_key));

        let client = TagClient::new(&config.api_base);
        let core = EditorCore::from_page(page, config, recent);
        log::info!(
            "tag editor attached to {} with {} tags, backend {}",
            core.src_filename,
            core.tags.len(),
            client.base_url()
        );

        let shared = Rc::new(Shared { core: RefCell::new(core), canvas, ctx, client, store });
        let mut editor = FaceTagEditor { shared, listeners: Vec::new() };
        editor.listen()?;
        dispatch(&editor.shared, vec![Action::RenderNeeded]);
        Ok(editor)
    }

    /// Remove every DOM listener. The editor stops reacting to input.
    pub fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(e) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {} listener: {e:?}", listener.kind);
            }
        }
    }

    /// The recent-names list, most recent first.
    #[must_use]
    pub fn recent_names(&self) -> Vec<String> {
        self.shared.core.borrow().recent.list().to_vec()
    }

    /// Redraw the overlay.
    pub fn render(&self) {
        dispatch(&self.shared, vec![Action::RenderNeeded]);
    }
}

impl Drop for FaceTagEditor {
    fn drop(&mut self) {
        self.detach();
    }
}

// =============================================================
// Listeners
// =============================================================

impl FaceTagEditor {
    fn listen(&mut self) -> Result<(), JsValue> {
        let canvas: EventTarget = self.shared.canvas.clone().into();
        let window: EventTarget = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?.into();

        // Release is heard on the window so a drag that leaves the canvas still ends.
        for (target, kind, phase) in [
            (&canvas, "mousedown", PointerPhase::Down),
            (&canvas, "mousemove", PointerPhase::Move),
            (&window, "mouseup", PointerPhase::Up),
        ] {
            let shared = Rc::clone(&self.shared);
            self.add(target, kind, move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let sample = PointerSample::Mouse {
                    client: Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
                };
                on_pointer(&shared, phase, &sample);
            })?;
        }

        for (kind, phase) in [
            ("touchstart", PointerPhase::Down),
            ("touchmove", PointerPhase::Move),
            ("touchend", PointerPhase::Up),
            ("touchcancel", PointerPhase::Up),
        ] {
            let shared = Rc::clone(&self.shared);
            self.add(&canvas, kind, move |event| {
                let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                // Lifted fingers are only listed in `changedTouches`.
                let list = match phase {
                    PointerPhase::Up => touch.changed_touches(),
                    PointerPhase::Down | PointerPhase::Move => touch.touches(),
                };
                let sample = PointerSample::Touch { touches: touch_points(&list) };
                on_pointer(&shared, phase, &sample);
            })?;
        }

        let shared = Rc::clone(&self.shared);
        self.add(&window, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if targets_text_entry(&event) {
                return;
            }
            let actions = shared.core.borrow_mut().on_key_down(&key.key());
            if !actions.is_empty() {
                event.prevent_default();
            }
            dispatch(&shared, actions);
        })?;

        Ok(())
    }

    fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener { target: target.clone(), kind, callback });
        Ok(())
    }
}

fn on_pointer(shared: &Rc<Shared>, phase: PointerPhase, sample: &PointerSample) {
    let rect = shared.canvas.get_bounding_client_rect();
    let origin = Point::new(rect.left(), rect.top());
    let actions = shared.core.borrow_mut().on_pointer(phase, sample, origin);
    dispatch(shared, actions);
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            id: t.identifier(),
            client: Point::new(f64::from(t.client_x()), f64::from(t.client_y())),
        })
        .collect()
}

fn targets_text_entry(event: &web_sys::Event) -> bool {
    event.target().is_some_and(|target| {
        target
            .dyn_ref::<HtmlElement>()
            .is_some_and(|el| input::is_text_entry(&el.tag_name(), el.is_content_editable()))
    })
}

// =============================================================
// Action dispatch
// =============================================================

fn dispatch(shared: &Rc<Shared>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => {
                let started_ms = js_sys::Date::now();
                if let Err(e) = render::render(&shared.ctx, &shared.core.borrow()) {
                    log::error!("render failed: {e:?}");
                }
                log::trace!("render took {:.1}ms", js_sys::Date::now() - started_ms);
            }
            Action::PromptName(prompt) => prompt_name(shared, prompt),
            Action::Send(request) => {
                let shared = Rc::clone(shared);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = shared.client.send(&request.call).await;
                    let actions = shared.core.borrow_mut().apply_reply(&request, result);
                    dispatch(&shared, actions);
                });
            }
            Action::RecentNamesChanged(list) => save_recent(shared, list),
        }
    }
}

fn prompt_name(shared: &Rc<Shared>, prompt: NamePrompt) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let message = {
        let core = shared.core.borrow();
        let question = match prompt {
            NamePrompt::NewTag => "Who is this?",
            NamePrompt::Rename { .. } => "New display name for this person:",
            NamePrompt::Retag { .. } => "Who is this really?",
        };
        let recent = core.recent.list();
        if recent.is_empty() {
            question.to_string()
        } else {
            format!("{question}\nRecent: {}", recent.join(", "))
        }
    };

    let raw = match window.prompt_with_message(&message) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::debug!("name prompt dismissed");
            return;
        }
        Err(e) => {
            log::warn!("name prompt failed: {e:?}");
            return;
        }
    };

    let submitted = shared.core.borrow_mut().submit_name(prompt, &raw);
    match submitted {
        Ok(actions) => dispatch(shared, actions),
        Err(e) => log::info!("edit aborted: {e}"),
    }
}

fn save_recent(shared: &Rc<Shared>, list: Vec<String>) {
    let Some(store) = shared.store.as_ref() else {
        return;
    };
    let key = shared.core.borrow().config.storage_key.clone();
    if let Err(e) = RecentNames::from_list(list).save(store, &key) {
        log::warn!("failed to persist recent names: {e}");
    }
}

// =============================================================
// Helpers
// =============================================================

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn set_canvas_size(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width.round() as u32);
    canvas.set_height(height.round() as u32);
}

fn page_origin() -> Option<String> {
    match web_sys::window()?.location().origin() {
        Ok(origin) => Some(origin),
        Err(e) => {
            log::warn!("page origin unavailable: {e:?}");
            None
        }
    }
}

fn to_js(e: ConfigError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
