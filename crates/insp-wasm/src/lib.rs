//! WASM bridge for Insp: drives the inspector from the page.
//!
//! Compiled via `wasm-pack build --target web`. The page glue owns the
//! real event listeners and forwards every event into `DomInspector`;
//! after each call it reads `wiring()` to attach or detach the capturing
//! click listener, the pointer move / up pair and the resize listener.

mod web_host;

pub use web_host::{WebHost, Wiring};

use insp_core::id::ElementId;
use insp_editor::tree::path_to;
use insp_editor::{
    Collaborators, ElementView, HeadlessHost, History, IdAllocator, Inspector, PropertiesPanel,
    TreeNode, TreeView,
};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ─── Collaborators backed by JS callbacks ────────────────────────────────

/// Tree view that forwards to `callback(kind, payload)`: `("rebuild",
/// treeJson)` and `("highlight", highlightJson | null)`.
struct JsTreeView {
    callback: Function,
    /// Last tree sent, for ancestor paths.
    tree: Vec<TreeNode>,
}

/// Highlighted node plus the identifiers from its top-level ancestor down
/// to it, so the page can expand collapsed branches.
#[derive(Serialize)]
struct Highlight {
    id: ElementId,
    path: Vec<ElementId>,
}

impl Highlight {
    fn new(tree: &[TreeNode], id: ElementId) -> Self {
        Self {
            id,
            path: path_to(tree, id),
        }
    }
}

/// Properties panel that forwards to `callback(kind, payload)`:
/// `("show", viewJson)` and `("hide", null)`.
struct JsPropertiesPanel {
    callback: Function,
}

fn notify(callback: &Function, kind: &str, payload: JsValue) {
    if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from_str(kind), &payload) {
        log::warn!("callback '{kind}' threw: {e:?}");
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json) => JsValue::from_str(&json),
        Err(e) => {
            log::error!("serialization failed: {e}");
            JsValue::NULL
        }
    }
}

impl TreeView for JsTreeView {
    fn rebuild(&mut self, tree: &[TreeNode]) {
        self.tree = tree.to_vec();
        notify(&self.callback, "rebuild", to_json(tree));
    }

    fn highlight(&mut self, id: Option<ElementId>) {
        let payload = id.map_or(JsValue::NULL, |id| to_json(&Highlight::new(&self.tree, id)));
        notify(&self.callback, "highlight", payload);
    }
}

impl PropertiesPanel for JsPropertiesPanel {
    fn show(&mut self, view: &ElementView) {
        notify(&self.callback, "show", to_json(view));
    }

    fn hide(&mut self) {
        notify(&self.callback, "hide", JsValue::NULL);
    }
}

// ─── Controller ──────────────────────────────────────────────────────────

/// The JS-facing inspector.
///
/// Coordinates are page coordinates (`pageX` / `pageY`).
#[wasm_bindgen]
pub struct DomInspector {
    inner: Inspector<WebHost>,
}

#[derive(Serialize)]
struct SelectionInfo<'a> {
    id: &'a str,
    editor: Option<&'static str>,
}

#[derive(Serialize)]
struct HistoryInfo {
    can_undo: bool,
    can_redo: bool,
}

#[wasm_bindgen]
impl DomInspector {
    /// Watch the element with id `root_id`. Either callback may be omitted;
    /// `history_capacity` of 0 disables undo / redo.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root_id: &str,
        tree_view: Option<Function>,
        properties: Option<Function>,
        history_capacity: Option<usize>,
    ) -> Result<DomInspector, JsValue> {
        install_hooks();

        let host = WebHost::new(root_id).map_err(|e| JsValue::from_str(&e))?;
        let mut collaborators = Collaborators::new();
        let capacity = history_capacity.unwrap_or(History::DEFAULT_CAPACITY);
        if capacity > 0 {
            collaborators = collaborators.with_history(History::with_capacity(capacity));
        }
        if let Some(callback) = tree_view {
            collaborators = collaborators.with_tree_view(JsTreeView {
                callback,
                tree: Vec::new(),
            });
        }
        if let Some(callback) = properties {
            collaborators = collaborators.with_properties(JsPropertiesPanel { callback });
        }
        log::info!("inspector attached to #{root_id}");
        Ok(Self {
            inner: Inspector::new(host, collaborators),
        })
    }

    // ─── Mode ────────────────────────────────────────────────────────────

    /// Flip inspection mode; returns the new mode.
    pub fn toggle(&mut self) -> bool {
        self.inner.toggle()
    }

    pub fn set_active(&mut self, active: bool) {
        self.inner.set_active(active);
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Listener wiring the glue should apply, as JSON.
    pub fn wiring(&self) -> String {
        serde_json::to_string(&self.inner.host().wiring).unwrap_or_else(|_| "{}".to_string())
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Captured click. Returns `true` when the glue should stop the event.
    pub fn click(&mut self, target: web_sys::Element) -> bool {
        self.inner.click(target)
    }

    pub fn dblclick(&mut self, target: web_sys::Element) -> bool {
        self.inner.double_click(target)
    }

    /// Pointer down anywhere; starts a drag when it lands on a handle.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_down_at(x, y)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_move(x, y)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up()
    }

    /// Window key press. `typing` is set when focus is in an editable
    /// element or form field.
    #[allow(clippy::too_many_arguments)]
    pub fn key_down(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        typing: bool,
    ) -> bool {
        self.inner.key_down(key, ctrl, shift, alt, meta, typing)
    }

    /// The element being edited as text lost focus.
    pub fn edit_blur(&mut self) -> bool {
        self.inner.edit_blur()
    }

    pub fn window_resized(&mut self) {
        self.inner.window_resized();
    }

    /// Tree view node clicked.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if id.is_empty() {
            self.inner.deselect();
            return true;
        }
        self.inner.select_by_id(ElementId::intern(id))
    }

    pub fn deselect(&mut self) {
        self.inner.deselect();
    }

    // ─── History and structure ───────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    pub fn add_row(&mut self) -> bool {
        self.inner.add_table_row()
    }

    pub fn add_column(&mut self) -> bool {
        self.inner.add_table_column()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// `{"id": ..., "editor": ...}` for the current selection, or `null`.
    pub fn selection_json(&self) -> String {
        let info = self.inner.selection().map(|s| SelectionInfo {
            id: s.id.as_str(),
            editor: s.editor.map(|k| k.name()),
        });
        serde_json::to_string(&info).unwrap_or_else(|_| "null".to_string())
    }

    pub fn history_json(&self) -> String {
        let info = HistoryInfo {
            can_undo: self.inner.history().is_some_and(History::can_undo),
            can_redo: self.inner.history().is_some_and(History::can_redo),
        };
        serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
    }
}

// ─── Standalone functions (no live page needed) ──────────────────────────

/// Parse a markup fragment, stamp identifiers and return its element tree.
/// Returns JSON `{"ok":true,"nodes":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn tree_json(markup: &str) -> String {
    match HeadlessHost::new(markup) {
        Ok(mut host) => {
            IdAllocator::new().stamp_all(&mut host);
            let nodes = insp_editor::tree::build_tree(&host);
            match serde_json::to_string(&nodes) {
                Ok(json) => format!(r#"{{"ok":true,"nodes":{json}}}"#),
                Err(e) => failure_json(&format!("Serialization error: {e}")),
            }
        }
        Err(e) => failure_json(&e),
    }
}

fn failure_json(error: &str) -> String {
    serde_json::json!({ "ok": false, "error": error }).to_string()
}

/// Set the console log level (`"error"`, `"warn"`, `"info"`, `"debug"`,
/// `"trace"`, `"off"`). Returns `false` for an unknown level.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

// ─── Console logger and panic hook ───────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn install_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static LOGGER: ConsoleLogger = ConsoleLogger;
        static SET_HOOKS: Once = Once::new();
        SET_HOOKS.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Insp WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}
