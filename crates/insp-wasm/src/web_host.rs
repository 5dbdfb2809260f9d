//! `Host` over the live browser DOM.
//!
//! Content is the watched root element; every chrome element (handle bars,
//! the resizer box, floating panels) lives outside it so `inner_html`
//! snapshots never carry chrome. Listener wiring is owned by the page glue:
//! the host only records what the inspector asked for in `Wiring`, and the
//! glue reads it back after each call.

use insp_core::css::class_tokens;
use insp_core::geometry::{Axis, Edge, Rect};
use insp_editor::{EditorKind, Handle, Host, Panel};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

/// Class carried by every floating tool panel.
pub const PANEL_CLASS: &str = "floating-panel";
/// Class toggled to hide a panel.
pub const HIDDEN_CLASS: &str = "hidden";
/// Id of the single box resizer overlay.
pub const RESIZER_BOX_ID: &str = "resizer-box";
/// Id of the container that holds every drawn handle bar.
pub const HANDLES_CONTAINER_ID: &str = "resize-handlers-container";

/// Selector matching any chrome element or its descendants.
const CHROME_SELECTOR: &str =
    ".floating-panel, #resizer-box, #resize-handlers-container, [class*='-resize-handler']";

/// Element id of a contextual panel.
pub fn panel_element_id(panel: Panel) -> &'static str {
    match panel {
        Panel::Table => "panel-table",
        Panel::Grid => "panel-grid",
        Panel::Flex => "panel-flex",
    }
}

/// Class of a drawn handle bar. Table bars keep the plain
/// `col-` / `row-resize-handler` names.
pub fn handle_class(owner: EditorKind, axis: Axis, index: usize) -> String {
    match (owner, axis) {
        (EditorKind::Table, Axis::Horizontal) => "col-resize-handler".to_string(),
        (EditorKind::Table, Axis::Vertical) => "row-resize-handler".to_string(),
        (EditorKind::Grid | EditorKind::Flex, Axis::Horizontal) => {
            format!("{}-resize-handler-col", owner.name())
        }
        (EditorKind::Grid | EditorKind::Flex, Axis::Vertical) => {
            format!("{}-resize-handler-row", owner.name())
        }
        (EditorKind::Resizer, _) => {
            let edge = Edge::from_index(index).map_or("edge", Edge::name);
            format!("box-resize-handler-{edge}")
        }
    }
}

/// Listener wiring the inspector currently wants. The page glue attaches
/// and detaches the real listeners to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wiring {
    pub click_capture: bool,
    pub pointer_capture: bool,
    pub resize: BTreeSet<EditorKind>,
}

pub struct WebHost {
    window: Window,
    document: Document,
    root: Element,
    handles: BTreeMap<EditorKind, Vec<Element>>,
    pub wiring: Wiring,
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("web host: {what} failed: {e:?}");
    }
}

/// `class` attribute value once `class` is removed, or `None` when no
/// token is left and the attribute should go.
fn class_without(value: &str, class: &str) -> Option<String> {
    let rest: Vec<&str> = class_tokens(value).filter(|c| *c != class).collect();
    (!rest.is_empty()).then(|| rest.join(" "))
}

impl WebHost {
    /// Watch the element with id `root_id`.
    pub fn new(root_id: &str) -> Result<Self, String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| format!("no element with id '{root_id}'"))?;
        Ok(Self {
            window,
            document,
            root,
            handles: BTreeMap::new(),
            wiring: Wiring::default(),
        })
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    /// Existing chrome element with `id`, created under `<body>` on first use.
    fn chrome_element(&self, id: &str) -> Option<Element> {
        if let Some(el) = self.document.get_element_by_id(id) {
            return Some(el);
        }
        let el = self.document.create_element("div").ok()?;
        el.set_id(id);
        self.body()?.append_child(&el).ok()?;
        Some(el)
    }

    fn place(el: &Element, rect: Rect) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        for (property, value) in [
            ("position", "absolute".to_string()),
            ("left", format!("{}px", rect.x)),
            ("top", format!("{}px", rect.y)),
            ("width", format!("{}px", rect.width)),
            ("height", format!("{}px", rect.height)),
        ] {
            report("style write", style.set_property(property, &value));
        }
    }
}

impl Host for WebHost {
    type Node = Element;

    // ─── Content tree ────────────────────────────────────────────────────

    fn content_root(&self) -> Element {
        self.root.clone()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn tag(&self, node: &Element) -> String {
        node.tag_name().to_lowercase()
    }

    fn attributes(&self, node: &Element) -> Vec<(String, String)> {
        node.get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .filter_map(|name| node.get_attribute(&name).map(|value| (name, value)))
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        report("set_attribute", node.set_attribute(name, value));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        report("add class", node.class_list().add_1(class));
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if !node.class_list().contains(class) {
            return;
        }
        match class_without(&node.class_name(), class) {
            Some(rest) => report("remove class", node.set_attribute("class", &rest)),
            None => report("remove class", node.remove_attribute("class")),
        }
    }

    fn direct_text(&self, node: &Element) -> Option<String> {
        let nodes = node.child_nodes();
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter(|n| n.node_type() == web_sys::Node::TEXT_NODE)
            .filter_map(|n| n.text_content())
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_element(&mut self, parent: &Element, tag: &str) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        parent.append_child(&el).ok()?;
        Some(el)
    }

    fn outer_markup(&self, node: &Element) -> String {
        node.outer_html()
    }

    fn snapshot(&self) -> String {
        self.root.inner_html()
    }

    fn restore(&mut self, markup: &str) {
        self.root.set_inner_html(markup);
    }

    fn set_editable(&mut self, node: &Element, editable: bool) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if editable {
            html.set_content_editable("true");
            report("focus", html.focus());
        } else {
            report("contenteditable", node.remove_attribute("contenteditable"));
        }
    }

    fn is_chrome(&self, node: &Element) -> bool {
        matches!(node.closest(CHROME_SELECTOR), Ok(Some(_)))
    }

    // ─── Rendering engine ────────────────────────────────────────────────

    fn computed_style(&self, node: &Element, property: &str) -> String {
        self.window
            .get_computed_style(node)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        if value.is_empty() {
            report("style removal", style.remove_property(property).map(|_| ()));
        } else {
            report("style write", style.set_property(property, value));
        }
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
    }

    fn offset_size(&self, node: &Element) -> (f32, f32) {
        node.dyn_ref::<HtmlElement>()
            .map(|h| (h.offset_width() as f32, h.offset_height() as f32))
            .unwrap_or_else(|| {
                let r = self.bounding_rect(node);
                (r.width, r.height)
            })
    }

    fn scroll_offset(&self) -> (f32, f32) {
        (
            self.window.scroll_x().unwrap_or(0.0) as f32,
            self.window.scroll_y().unwrap_or(0.0) as f32,
        )
    }

    // ─── Chrome ──────────────────────────────────────────────────────────

    fn draw_handles(&mut self, owner: EditorKind, handles: &[Handle]) {
        self.clear_handles(owner);
        let Some(container) = self.chrome_element(HANDLES_CONTAINER_ID) else {
            return;
        };
        let mut drawn = Vec::with_capacity(handles.len());
        for h in handles {
            let Ok(el) = self.document.create_element("div") else {
                continue;
            };
            el.set_class_name(&handle_class(owner, h.handle.axis, h.handle.index));
            report("data attribute", el.set_attribute("data-owner", owner.name()));
            report(
                "data attribute",
                el.set_attribute("data-index", &h.handle.index.to_string()),
            );
            Self::place(&el, h.rect);
            if container.append_child(&el).is_ok() {
                drawn.push(el);
            }
        }
        self.handles.insert(owner, drawn);
    }

    fn clear_handles(&mut self, owner: EditorKind) {
        for el in self.handles.remove(&owner).unwrap_or_default() {
            el.remove();
        }
    }

    fn show_resizer_box(&mut self, rect: Rect) {
        if let Some(el) = self.chrome_element(RESIZER_BOX_ID) {
            Self::place(&el, rect);
            report("show resizer", el.class_list().remove_1(HIDDEN_CLASS));
        }
    }

    fn hide_resizer_box(&mut self) {
        if let Some(el) = self.document.get_element_by_id(RESIZER_BOX_ID) {
            report("hide resizer", el.class_list().add_1(HIDDEN_CLASS));
        }
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        let Some(el) = self.document.get_element_by_id(panel_element_id(panel)) else {
            return;
        };
        let classes = el.class_list();
        let result = if visible {
            classes.remove_1(HIDDEN_CLASS)
        } else {
            classes.add_1(HIDDEN_CLASS)
        };
        report("panel visibility", result);
    }

    fn set_drag_cursor(&mut self, cursor: Option<&'static str>) {
        let Some(body) = self.body() else {
            return;
        };
        let style = body.style();
        match cursor {
            Some(cursor) => {
                report("cursor", style.set_property("cursor", cursor));
                report("user-select", style.set_property("user-select", "none"));
            }
            None => {
                report("cursor", style.remove_property("cursor").map(|_| ()));
                report("user-select", style.remove_property("user-select").map(|_| ()));
            }
        }
    }

    // ─── Listener wiring ─────────────────────────────────────────────────

    fn set_click_capture(&mut self, enabled: bool) {
        self.wiring.click_capture = enabled;
    }

    fn set_pointer_capture(&mut self, enabled: bool) {
        self.wiring.pointer_capture = enabled;
    }

    fn set_resize_listener(&mut self, owner: EditorKind, enabled: bool) {
        if enabled {
            self.wiring.resize.insert(owner);
        } else {
            self.wiring.resize.remove(&owner);
        }
    }
}
