//! The contract between the inspector and whatever renders the document.
//!
//! A `Host` is three things at once: the live content tree (navigation,
//! attributes, text, snapshots), the rendering engine (computed style and
//! measured boxes, the only source of layout truth) and the chrome layer
//! (handle overlays, the box resizer, contextual panels, listener wiring).
//! The browser bridge implements it over `web_sys`; `HeadlessHost`
//! implements it over an `insp_core::Document`.

use crate::drag::{EditorKind, Handle};
use insp_core::css::parse_px;
use insp_core::geometry::{Edge, Rect};
use insp_core::id::{ElementId, ID_ATTRIBUTE};
use insp_core::style::DisplayKind;
use serde::Serialize;
use std::fmt;

/// Class marking the currently inspected element.
pub const SELECTED_CLASS: &str = "inspector-selected";

/// Floating tool panels that follow the active editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Table,
    Grid,
    Flex,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Table, Panel::Grid, Panel::Flex];

    pub fn for_editor(kind: EditorKind) -> Option<Panel> {
        match kind {
            EditorKind::Table => Some(Panel::Table),
            EditorKind::Grid => Some(Panel::Grid),
            EditorKind::Flex => Some(Panel::Flex),
            EditorKind::Resizer => None,
        }
    }
}

pub trait Host {
    /// Handle to one live element. Handles are invalidated by `restore`.
    type Node: Clone + PartialEq + fmt::Debug;

    // ─── Content tree ────────────────────────────────────────────────────

    /// The watched container whose inner markup is snapshotted.
    fn content_root(&self) -> Self::Node;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    /// Lowercase tag name.
    fn tag(&self, node: &Self::Node) -> String;
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);
    /// First non-blank text node directly under `node`, trimmed.
    fn direct_text(&self, node: &Self::Node) -> Option<String>;
    /// Replace the content of `node` with plain text.
    fn set_text(&mut self, node: &Self::Node, text: &str);
    /// Append a new element as the last child of `parent`.
    fn append_element(&mut self, parent: &Self::Node, tag: &str) -> Option<Self::Node>;
    fn outer_markup(&self, node: &Self::Node) -> String;
    /// Serialized inner markup of the content root.
    fn snapshot(&self) -> String;
    /// Replace the content root's children with `markup`. Every node handle
    /// taken before the call is stale afterwards.
    fn restore(&mut self, markup: &str);
    fn set_editable(&mut self, node: &Self::Node, editable: bool);
    /// Whether `node` belongs to inspector chrome (panels, handles, the
    /// resizer box) rather than inspectable content.
    fn is_chrome(&self, node: &Self::Node) -> bool;

    // ─── Rendering engine ────────────────────────────────────────────────

    fn computed_style(&self, node: &Self::Node, property: &str) -> String;
    /// Write an inline style override; an empty value removes it.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);
    /// Border box in viewport coordinates.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    /// Rendered `(width, height)`, like `offsetWidth` / `offsetHeight`.
    fn offset_size(&self, node: &Self::Node) -> (f32, f32);
    fn scroll_offset(&self) -> (f32, f32);

    // ─── Chrome ──────────────────────────────────────────────────────────

    /// Replace the drawn handles of `owner`.
    fn draw_handles(&mut self, owner: EditorKind, handles: &[Handle]);
    fn clear_handles(&mut self, owner: EditorKind);
    fn show_resizer_box(&mut self, rect: Rect);
    fn hide_resizer_box(&mut self);
    fn set_panel_visible(&mut self, panel: Panel, visible: bool);
    fn set_drag_cursor(&mut self, cursor: Option<&'static str>);

    // ─── Listener wiring ─────────────────────────────────────────────────

    /// Document-wide capturing click interception.
    fn set_click_capture(&mut self, enabled: bool);
    /// Global pointer move / up listeners, attached only while dragging.
    fn set_pointer_capture(&mut self, enabled: bool);
    fn set_resize_listener(&mut self, owner: EditorKind, enabled: bool);

    // ─── Provided ────────────────────────────────────────────────────────

    /// Border box in page coordinates.
    fn page_rect(&self, node: &Self::Node) -> Rect {
        let (sx, sy) = self.scroll_offset();
        self.bounding_rect(node).translate(sx, sy)
    }

    /// Nearest inclusive ancestor inside the content root matching `pred`.
    fn closest(
        &self,
        node: &Self::Node,
        pred: impl Fn(&Self, &Self::Node) -> bool,
    ) -> Option<Self::Node>
    where
        Self: Sized,
    {
        let root = self.content_root();
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if n == root {
                return None;
            }
            if pred(self, &n) {
                return Some(n);
            }
            current = self.parent(&n);
        }
        None
    }

    /// Pre-order element walk below `node` (exclusive).
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            stack.extend(self.children(&n).into_iter().rev());
            out.push(n);
        }
        out
    }

    fn element_id(&self, node: &Self::Node) -> Option<ElementId> {
        self.attribute(node, ID_ATTRIBUTE)
            .filter(|v| !v.is_empty())
            .map(|v| ElementId::intern(&v))
    }

    /// Content element stamped with `id`.
    fn find_by_id(&self, id: ElementId) -> Option<Self::Node> {
        self.descendants(&self.content_root())
            .into_iter()
            .find(|n| self.element_id(n) == Some(id))
    }

    fn display(&self, node: &Self::Node) -> DisplayKind {
        DisplayKind::from_css(&self.computed_style(node, "display"))
    }

    fn padding(&self, node: &Self::Node, edge: Edge) -> f32 {
        parse_px(&self.computed_style(node, edge.padding_property())).unwrap_or(0.0)
    }

    fn offset_width(&self, node: &Self::Node) -> f32 {
        self.offset_size(node).0
    }

    fn offset_height(&self, node: &Self::Node) -> f32 {
        self.offset_size(node).1
    }
}
