//! Headless box resolver.
//!
//! Produces a border-box `Rect` for every rendered element so that the
//! editors can be driven without a browser. It covers exactly what the
//! editors read back: block flow, tables (fixed layout, first row decides
//! column widths), flex rows and columns, and grids with pixel tracks and
//! gaps. Widths and heights are border-box; text contributes one line.

use crate::css::{parse_px, parse_track_list};
use crate::geometry::{Edge, Rect};
use crate::model::{Document, DomNode};
use crate::style::{DisplayKind, computed_value, display, padding};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Height contributed by a run of text.
pub const LINE_HEIGHT: f32 = 20.0;

/// The visible area the document is laid out into.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

pub type LayoutMap = HashMap<NodeIndex, Rect>;

/// Resolve every element's box.
pub fn resolve_layout(doc: &Document, viewport: Viewport) -> LayoutMap {
    let mut out = LayoutMap::new();
    let height = stack(doc, doc.root, 0.0, 0.0, viewport.width, 0.0, &mut out);
    out.insert(
        doc.root,
        Rect::new(0.0, 0.0, viewport.width, height.max(viewport.height)),
    );
    out
}

/// Explicit length of `property`, resolving percentages against `reference`.
fn explicit_length(doc: &Document, idx: NodeIndex, property: &str, reference: f32) -> Option<f32> {
    let value = doc.element(idx)?.style(property)?;
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        return parse_px(pct).map(|p| reference * p / 100.0);
    }
    if value.ends_with("px") || value.parse::<f32>().is_ok() {
        return parse_px(value);
    }
    None
}

fn gap(doc: &Document, idx: NodeIndex, property: &str) -> f32 {
    parse_px(&computed_value(doc, idx, property)).unwrap_or(0.0)
}

fn has_direct_text(doc: &Document, idx: NodeIndex) -> bool {
    doc.child_nodes(idx)
        .into_iter()
        .any(|c| matches!(doc.node(c), Some(DomNode::Text(t)) if !t.trim().is_empty()))
}

fn layout(doc: &Document, idx: NodeIndex, x: f32, y: f32, avail: f32, out: &mut LayoutMap) -> Rect {
    let kind = display(doc, idx);
    if kind == DisplayKind::None {
        let rect = Rect::new(x, y, 0.0, 0.0);
        out.insert(idx, rect);
        return rect;
    }

    let [top, right, bottom, left] = Edge::ALL.map(|e| padding(doc, idx, e));
    let width = explicit_length(doc, idx, "width", avail).unwrap_or(avail);
    let cx = x + left;
    let cy = y + top;
    let cw = (width - left - right).max(0.0);

    let mut width = width;
    let content_h = match kind {
        DisplayKind::Flex => {
            let direction = computed_value(doc, idx, "flex-direction");
            if direction.starts_with("column") {
                let g = gap(doc, idx, "row-gap");
                stack(doc, idx, cx, cy, cw, g, out)
            } else {
                let g = gap(doc, idx, "column-gap");
                flex_row(doc, idx, cx, cy, cw, g, out)
            }
        }
        DisplayKind::Grid => grid(doc, idx, cx, cy, cw, out),
        DisplayKind::Table => {
            let (h, columns_w) = table(doc, idx, cx, cy, cw, out);
            // Fully explicit columns decide the table's width.
            if let Some(columns_w) = columns_w {
                width = columns_w + left + right;
            }
            h
        }
        _ => stack(doc, idx, cx, cy, cw, 0.0, out),
    };
    let text_h = if has_direct_text(doc, idx) {
        LINE_HEIGHT
    } else {
        0.0
    };

    let height = explicit_length(doc, idx, "height", 0.0)
        .unwrap_or(content_h + text_h + top + bottom);
    let rect = Rect::new(x, y, width, height);
    out.insert(idx, rect);
    rect
}

/// Lay children out top to bottom; returns the used height.
fn stack(doc: &Document, idx: NodeIndex, x: f32, y: f32, w: f32, g: f32, out: &mut LayoutMap) -> f32 {
    let mut cursor = y;
    let mut first = true;
    for child in doc.children(idx) {
        if !first {
            cursor += g;
        }
        first = false;
        let r = layout(doc, child, x, cursor, w, out);
        cursor += r.height;
    }
    cursor - y
}

/// Lay children out left to right. Children without an explicit width
/// share the remaining space equally.
fn flex_row(doc: &Document, idx: NodeIndex, x: f32, y: f32, w: f32, g: f32, out: &mut LayoutMap) -> f32 {
    let children = doc.children(idx);
    if children.is_empty() {
        return 0.0;
    }
    let widths: Vec<Option<f32>> = children
        .iter()
        .map(|c| explicit_length(doc, *c, "width", w))
        .collect();
    let fixed: f32 = widths.iter().flatten().sum();
    let autos = widths.iter().filter(|w| w.is_none()).count();
    let gaps = g * (children.len() - 1) as f32;
    let share = if autos > 0 {
        ((w - fixed - gaps) / autos as f32).max(0.0)
    } else {
        0.0
    };

    let mut cursor = x;
    let mut height: f32 = 0.0;
    for (child, width) in children.iter().zip(widths) {
        let avail = if width.is_some() { w } else { share };
        let r = layout(doc, *child, cursor, y, avail, out);
        cursor += r.width + g;
        height = height.max(r.height);
    }
    height
}

fn grid(doc: &Document, idx: NodeIndex, x: f32, y: f32, w: f32, out: &mut LayoutMap) -> f32 {
    let columns: Vec<f32> = parse_track_list(&computed_value(doc, idx, "grid-template-columns"))
        .map(|t| t.to_vec())
        .unwrap_or_else(|_| vec![w]);
    let template_rows: Vec<f32> = parse_track_list(&computed_value(doc, idx, "grid-template-rows"))
        .map(|t| t.to_vec())
        .unwrap_or_default();
    let col_gap = gap(doc, idx, "column-gap");
    let row_gap = gap(doc, idx, "row-gap");
    let children = doc.children(idx);
    let ncols = columns.len().max(1);
    let nrows = children.len().div_ceil(ncols).max(template_rows.len());

    // First pass: natural heights at provisional positions.
    let mut rows: Vec<f32> = vec![0.0; nrows];
    for (i, child) in children.iter().enumerate() {
        let r = layout(doc, *child, x, y, columns[i % ncols], out);
        let row = i / ncols;
        rows[row] = rows[row].max(r.height);
    }
    for (row, size) in template_rows.iter().enumerate() {
        rows[row] = *size;
    }

    let col_offsets = offsets(&columns, col_gap);
    let row_offsets = offsets(&rows, row_gap);
    for (i, child) in children.iter().enumerate() {
        let (col, row) = (i % ncols, i / ncols);
        layout(doc, *child, x + col_offsets[col], y + row_offsets[row], columns[col], out);
    }

    rows.iter().sum::<f32>() + row_gap * nrows.saturating_sub(1) as f32
}

/// Start offset of each track given sizes and a uniform gap.
fn offsets(sizes: &[f32], g: f32) -> Vec<f32> {
    let mut acc = 0.0;
    sizes
        .iter()
        .map(|s| {
            let start = acc;
            acc += s + g;
            start
        })
        .collect()
}

/// Rows of a table in document order, looking through row groups.
pub fn table_rows(doc: &Document, table: NodeIndex) -> Vec<NodeIndex> {
    let mut rows = Vec::new();
    for child in doc.children(table) {
        match doc.tag(child) {
            Some("tr") => rows.push(child),
            Some("thead" | "tbody" | "tfoot") => rows.extend(
                doc.children(child)
                    .into_iter()
                    .filter(|r| doc.tag(*r) == Some("tr")),
            ),
            _ => {}
        }
    }
    rows
}

/// Cells (`td` / `th`) of a row.
pub fn row_cells(doc: &Document, row: NodeIndex) -> Vec<NodeIndex> {
    doc.children(row)
        .into_iter()
        .filter(|c| matches!(doc.tag(*c), Some("td" | "th")))
        .collect()
}

/// Returns the used height, plus the summed column widths when every
/// column width is explicit.
fn table(
    doc: &Document,
    idx: NodeIndex,
    x: f32,
    y: f32,
    w: f32,
    out: &mut LayoutMap,
) -> (f32, Option<f32>) {
    let rows = table_rows(doc, idx);
    let Some(first) = rows.first() else {
        return (0.0, None);
    };
    let ncols = rows.iter().map(|r| row_cells(doc, *r).len()).max().unwrap_or(0);
    if ncols == 0 {
        return (0.0, None);
    }

    // Fixed layout: the first row's explicit widths decide the columns.
    let first_cells = row_cells(doc, *first);
    let explicit: Vec<Option<f32>> = (0..ncols)
        .map(|i| {
            first_cells
                .get(i)
                .and_then(|c| explicit_length(doc, *c, "width", w))
        })
        .collect();
    let fixed: f32 = explicit.iter().flatten().sum();
    let autos = explicit.iter().filter(|e| e.is_none()).count();
    let share = if autos > 0 {
        ((w - fixed) / autos as f32).max(0.0)
    } else {
        0.0
    };
    let columns: Vec<f32> = explicit.iter().map(|e| e.unwrap_or(share)).collect();
    let table_w: f32 = columns.iter().sum();

    let mut cursor = y;
    for row in &rows {
        let cells = row_cells(doc, *row);
        let mut cx = x;
        let mut row_h = explicit_length(doc, *row, "height", 0.0).unwrap_or(0.0);
        for (i, cell) in cells.iter().enumerate() {
            let cw = columns.get(i).copied().unwrap_or(share);
            let r = layout(doc, *cell, cx, cursor, cw, out);
            row_h = row_h.max(r.height);
            cx += cw;
        }
        row_h = row_h.max(LINE_HEIGHT);
        let mut cx = x;
        for (i, cell) in cells.iter().enumerate() {
            let cw = columns.get(i).copied().unwrap_or(share);
            out.insert(*cell, Rect::new(cx, cursor, cw, row_h));
            cx += cw;
        }
        out.insert(*row, Rect::new(x, cursor, table_w, row_h));
        cursor += row_h;
    }

    // Row groups span their rows.
    for group in doc.children(idx) {
        if !matches!(doc.tag(group), Some("thead" | "tbody" | "tfoot")) {
            continue;
        }
        let spans: Vec<Rect> = doc
            .children(group)
            .into_iter()
            .filter_map(|r| out.get(&r).copied())
            .collect();
        let rect = match (spans.first(), spans.last()) {
            (Some(a), Some(b)) => Rect::new(x, a.y, table_w, b.bottom() - a.y),
            _ => Rect::new(x, cursor, table_w, 0.0),
        };
        out.insert(group, rect);
    }

    (cursor - y, (autos == 0).then_some(table_w))
}
