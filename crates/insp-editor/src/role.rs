//! Layout role of a clicked element, deciding which editor takes it.

use crate::drag::EditorKind;
use crate::host::Host;
use insp_core::style::DisplayKind;

/// Recomputed on every selection from live computed style; never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutRole<N> {
    /// The element is, or sits inside, this table.
    Table(N),
    Grid,
    Flex,
    /// A direct child of a grid or flex container. Its box is sized by the
    /// parent's track handles, so it gets no editor of its own.
    Track,
    Generic,
}

impl<N> LayoutRole<N> {
    pub fn editor(&self) -> Option<EditorKind> {
        match self {
            LayoutRole::Table(_) => Some(EditorKind::Table),
            LayoutRole::Grid => Some(EditorKind::Grid),
            LayoutRole::Flex => Some(EditorKind::Flex),
            LayoutRole::Track => None,
            LayoutRole::Generic => Some(EditorKind::Resizer),
        }
    }
}

fn is_grid(kind: DisplayKind) -> bool {
    kind == DisplayKind::Grid
}

fn is_flex(kind: DisplayKind) -> bool {
    kind == DisplayKind::Flex
}

pub fn classify<H: Host>(host: &H, node: &H::Node) -> LayoutRole<H::Node> {
    if let Some(table) = host.closest(node, |h, n| h.tag(n) == "table") {
        return LayoutRole::Table(table);
    }
    let display = host.display(node);
    if is_grid(display) {
        return LayoutRole::Grid;
    }
    if is_flex(display) {
        return LayoutRole::Flex;
    }
    let parent_display = host.parent(node).map(|p| host.display(&p));
    if parent_display.is_some_and(|d| is_grid(d) || is_flex(d)) {
        return LayoutRole::Track;
    }
    LayoutRole::Generic
}

/// Whether `node` lays its children out top to bottom as a flex container.
pub fn is_column_flex<H: Host>(host: &H, node: &H::Node) -> bool {
    is_flex(host.display(node)) && host.computed_style(node, "flex-direction").starts_with("column")
}
