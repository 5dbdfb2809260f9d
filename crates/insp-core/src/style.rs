//! Computed style lookup for headless documents.
//!
//! Resolution order: the element's inline `style` declaration, then the
//! shorthand it belongs to (`padding`, `gap`), then a tiny user-agent sheet
//! keyed on utility classes (`flex`, `flex-col`, `grid`, `hidden`, ...) and
//! tag names. Box sizes (`width`, `height`) come from the layout resolver,
//! not from here.

use crate::css::parse_px;
use crate::geometry::Edge;
use crate::model::{Document, ElementData};
use petgraph::graph::NodeIndex;

/// Layout mode an element establishes for its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    None,
    Block,
    Inline,
    Flex,
    Grid,
    Table,
    TableRowGroup,
    TableRow,
    TableCell,
}

impl DisplayKind {
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "none" => DisplayKind::None,
            "flex" | "inline-flex" => DisplayKind::Flex,
            "grid" | "inline-grid" => DisplayKind::Grid,
            "table" | "inline-table" => DisplayKind::Table,
            "table-row-group" | "table-header-group" | "table-footer-group" => {
                DisplayKind::TableRowGroup
            }
            "table-row" => DisplayKind::TableRow,
            "table-cell" => DisplayKind::TableCell,
            "inline" => DisplayKind::Inline,
            _ => DisplayKind::Block,
        }
    }
}

fn ua_display(el: &ElementData) -> &'static str {
    // Utility classes win over tag defaults, like an author sheet would.
    if el.has_class("hidden") {
        return "none";
    }
    if el.has_class("grid") {
        return "grid";
    }
    if el.has_class("inline-grid") {
        return "inline-grid";
    }
    if el.has_class("flex") {
        return "flex";
    }
    if el.has_class("inline-flex") {
        return "inline-flex";
    }
    if el.has_class("block") {
        return "block";
    }
    if el.has_class("inline-block") {
        return "inline-block";
    }
    match el.tag.as_str() {
        "table" => "table",
        "thead" => "table-header-group",
        "tbody" => "table-row-group",
        "tfoot" => "table-footer-group",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "span" | "a" | "strong" | "em" | "b" | "i" | "code" | "label" => "inline",
        "script" | "style" | "link" | "meta" | "title" | "head" => "none",
        _ => "block",
    }
}

/// Computed value of `property` on element `idx`, or `""` when unknown.
pub fn computed_value(doc: &Document, idx: NodeIndex, property: &str) -> String {
    let Some(el) = doc.element(idx) else {
        return String::new();
    };
    if let Some(value) = el.style(property) {
        return value;
    }

    match property {
        "display" => ua_display(el).to_string(),
        "flex-direction" => {
            if el.has_class("flex-col") {
                "column".to_string()
            } else if el.has_class("flex-col-reverse") {
                "column-reverse".to_string()
            } else {
                "row".to_string()
            }
        }
        "position" => {
            if el.has_class("relative") {
                "relative".to_string()
            } else if el.has_class("absolute") {
                "absolute".to_string()
            } else if el.has_class("fixed") {
                "fixed".to_string()
            } else {
                "static".to_string()
            }
        }
        "table-layout" => "auto".to_string(),
        "grid-template-columns" | "grid-template-rows" => "none".to_string(),
        "column-gap" | "row-gap" => el.style("gap").unwrap_or_else(|| "normal".to_string()),
        "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => {
            let edge = match property {
                "padding-top" => Edge::Top,
                "padding-right" => Edge::Right,
                "padding-bottom" => Edge::Bottom,
                _ => Edge::Left,
            };
            el.style("padding")
                .and_then(|p| shorthand_side(&p, edge))
                .unwrap_or_else(|| "0px".to_string())
        }
        "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => "0px".to_string(),
        "border-top-width" | "border-right-width" | "border-bottom-width"
        | "border-left-width" => "0px".to_string(),
        "color" => "rgb(0, 0, 0)".to_string(),
        "background-color" => "rgba(0, 0, 0, 0)".to_string(),
        "background-image" => "none".to_string(),
        "font-size" => "16px".to_string(),
        "font-weight" => "400".to_string(),
        _ => String::new(),
    }
}

/// Pick one side out of a 1–4 value box shorthand.
pub fn shorthand_side(value: &str, edge: Edge) -> Option<String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let pick = match (parts.len(), edge) {
        (1, _) => 0,
        (2, Edge::Top | Edge::Bottom) => 0,
        (2, _) => 1,
        (3, Edge::Top) => 0,
        (3, Edge::Right | Edge::Left) => 1,
        (3, Edge::Bottom) => 2,
        (4, e) => e.index(),
        _ => return None,
    };
    parts.get(pick).map(|s| s.to_string())
}

/// Numeric computed padding of one side.
pub fn padding(doc: &Document, idx: NodeIndex, edge: Edge) -> f32 {
    parse_px(&computed_value(doc, idx, edge.padding_property())).unwrap_or(0.0)
}

pub fn display(doc: &Document, idx: NodeIndex) -> DisplayKind {
    DisplayKind::from_css(&computed_value(doc, idx, "display"))
}
