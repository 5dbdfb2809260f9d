//! `Host` over an in-memory `Document`.
//!
//! Content lives under a `<main>` element; chrome that has to be clickable
//! (floating panels) is appended next to it, outside the snapshot. Drawn
//! handles, the resizer box, panel visibility and listener wiring are
//! recorded in `ChromeState` so callers can observe them.

use crate::drag::{EditorKind, Handle};
use crate::host::{Host, Panel};
use insp_core::css::format_px;
use insp_core::emitter::{emit_inner, emit_outer};
use insp_core::geometry::Rect;
use insp_core::layout::{LayoutMap, Viewport, resolve_layout};
use insp_core::model::Document;
use insp_core::parser::parse_fragment_into;
use insp_core::style::computed_value;
use insp_core::NodeIndex;
use std::collections::{BTreeMap, BTreeSet};

/// Class that marks floating tool panels.
pub const PANEL_CLASS: &str = "floating-panel";

/// Everything the inspector drew or wired, as last reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromeState {
    pub handles: BTreeMap<EditorKind, Vec<Handle>>,
    pub resizer_box: Option<Rect>,
    pub panels: BTreeSet<Panel>,
    pub cursor: Option<&'static str>,
    pub click_capture: bool,
    pub pointer_capture: bool,
    pub resize_listeners: BTreeSet<EditorKind>,
    pub editing: Option<NodeIndex>,
}

pub struct HeadlessHost {
    doc: Document,
    content: NodeIndex,
    viewport: Viewport,
    scroll: (f32, f32),
    layout: LayoutMap,
    pub chrome: ChromeState,
}

impl HeadlessHost {
    /// Build a host whose watched content is `markup`.
    pub fn new(markup: &str) -> Result<Self, String> {
        Self::with_viewport(markup, Viewport::default())
    }

    pub fn with_viewport(markup: &str, viewport: Viewport) -> Result<Self, String> {
        let mut doc = Document::new();
        let root = doc.root;
        let content = doc.append_element(root, "main");
        parse_fragment_into(&mut doc, content, markup)?;
        let mut host = Self {
            doc,
            content,
            viewport,
            scroll: (0.0, 0.0),
            layout: LayoutMap::new(),
            chrome: ChromeState::default(),
        };
        host.relayout();
        Ok(host)
    }

    /// Add a floating panel (chrome) after the content.
    pub fn add_panel(&mut self, markup: &str) -> Result<NodeIndex, String> {
        let root = self.doc.root;
        let panel = self.doc.append_element(root, "div");
        if let Some(el) = self.doc.element_mut(panel) {
            el.add_class(PANEL_CLASS);
        }
        parse_fragment_into(&mut self.doc, panel, markup)?;
        self.relayout();
        Ok(panel)
    }

    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.scroll = (x, y);
    }

    pub fn resize_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.relayout();
    }

    /// Content element whose `id` attribute is `dom_id`.
    pub fn by_dom_id(&self, dom_id: &str) -> Option<NodeIndex> {
        self.doc.get_element_by_dom_id(self.content, dom_id)
    }

    /// Convenience read of one inline style declaration.
    pub fn inline_style(&self, node: NodeIndex, property: &str) -> Option<String> {
        self.doc.element(node)?.style(property)
    }

    /// Type into an element being edited.
    pub fn type_text(&mut self, node: NodeIndex, text: &str) {
        self.doc.set_text(node, text);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = resolve_layout(&self.doc, self.viewport);
    }

    fn rect(&self, node: NodeIndex) -> Rect {
        self.layout.get(&node).copied().unwrap_or_default()
    }
}

impl Host for HeadlessHost {
    type Node = NodeIndex;

    fn content_root(&self) -> NodeIndex {
        self.content
    }

    fn parent(&self, node: &NodeIndex) -> Option<NodeIndex> {
        self.doc.parent(*node)
    }

    fn children(&self, node: &NodeIndex) -> Vec<NodeIndex> {
        self.doc.children(*node)
    }

    fn tag(&self, node: &NodeIndex) -> String {
        self.doc.tag(*node).unwrap_or_default().to_string()
    }

    fn attributes(&self, node: &NodeIndex) -> Vec<(String, String)> {
        self.doc
            .element(*node)
            .map(|e| e.attributes.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: &NodeIndex, name: &str) -> Option<String> {
        self.doc
            .element(*node)?
            .attribute(name)
            .map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeIndex, name: &str, value: &str) {
        if let Some(el) = self.doc.element_mut(*node) {
            el.set_attribute(name, value);
            self.relayout();
        }
    }

    fn has_class(&self, node: &NodeIndex, class: &str) -> bool {
        self.doc.element(*node).is_some_and(|e| e.has_class(class))
    }

    fn add_class(&mut self, node: &NodeIndex, class: &str) {
        if let Some(el) = self.doc.element_mut(*node) {
            el.add_class(class);
            self.relayout();
        }
    }

    fn remove_class(&mut self, node: &NodeIndex, class: &str) {
        if let Some(el) = self.doc.element_mut(*node) {
            el.remove_class(class);
            self.relayout();
        }
    }

    fn direct_text(&self, node: &NodeIndex) -> Option<String> {
        self.doc.direct_text(*node)
    }

    fn set_text(&mut self, node: &NodeIndex, text: &str) {
        if self.doc.is_element(*node) {
            self.doc.set_text(*node, text);
            self.relayout();
        }
    }

    fn append_element(&mut self, parent: &NodeIndex, tag: &str) -> Option<NodeIndex> {
        if !self.doc.contains(*parent) {
            return None;
        }
        let idx = self.doc.append_element(*parent, tag);
        self.relayout();
        Some(idx)
    }

    fn outer_markup(&self, node: &NodeIndex) -> String {
        emit_outer(&self.doc, *node)
    }

    fn snapshot(&self) -> String {
        emit_inner(&self.doc, self.content)
    }

    fn restore(&mut self, markup: &str) {
        self.doc.clear_children(self.content);
        if let Err(e) = parse_fragment_into(&mut self.doc, self.content, markup) {
            log::warn!("restored markup did not parse cleanly: {e}");
        }
        self.chrome.editing = None;
        self.relayout();
    }

    fn set_editable(&mut self, node: &NodeIndex, editable: bool) {
        if editable {
            self.chrome.editing = Some(*node);
        } else if self.chrome.editing == Some(*node) {
            self.chrome.editing = None;
        }
    }

    fn is_chrome(&self, node: &NodeIndex) -> bool {
        self.doc
            .closest(*node, |e| {
                e.has_class(PANEL_CLASS)
                    || e.attribute("id") == Some("resizer-box")
                    || e.classes().iter().any(|c| c.contains("-resize-handler"))
            })
            .is_some()
    }

    fn computed_style(&self, node: &NodeIndex, property: &str) -> String {
        match property {
            "width" => format_px(self.rect(*node).width),
            "height" => format_px(self.rect(*node).height),
            _ => computed_value(&self.doc, *node, property),
        }
    }

    fn set_style(&mut self, node: &NodeIndex, property: &str, value: &str) {
        if let Some(el) = self.doc.element_mut(*node) {
            el.set_style(property, value);
            self.relayout();
        }
    }

    fn bounding_rect(&self, node: &NodeIndex) -> Rect {
        self.rect(*node).translate(-self.scroll.0, -self.scroll.1)
    }

    fn offset_size(&self, node: &NodeIndex) -> (f32, f32) {
        let r = self.rect(*node);
        (r.width, r.height)
    }

    fn scroll_offset(&self) -> (f32, f32) {
        self.scroll
    }

    fn draw_handles(&mut self, owner: EditorKind, handles: &[Handle]) {
        self.chrome.handles.insert(owner, handles.to_vec());
    }

    fn clear_handles(&mut self, owner: EditorKind) {
        self.chrome.handles.remove(&owner);
    }

    fn show_resizer_box(&mut self, rect: Rect) {
        self.chrome.resizer_box = Some(rect);
    }

    fn hide_resizer_box(&mut self) {
        self.chrome.resizer_box = None;
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        if visible {
            self.chrome.panels.insert(panel);
        } else {
            self.chrome.panels.remove(&panel);
        }
    }

    fn set_drag_cursor(&mut self, cursor: Option<&'static str>) {
        self.chrome.cursor = cursor;
    }

    fn set_click_capture(&mut self, enabled: bool) {
        self.chrome.click_capture = enabled;
    }

    fn set_pointer_capture(&mut self, enabled: bool) {
        self.chrome.pointer_capture = enabled;
    }

    fn set_resize_listener(&mut self, owner: EditorKind, enabled: bool) {
        if enabled {
            self.chrome.resize_listeners.insert(owner);
        } else {
            self.chrome.resize_listeners.remove(&owner);
        }
    }
}
