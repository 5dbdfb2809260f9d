//! Table editor.
//!
//! Selecting anything inside a table puts the whole table under edit. The
//! table is switched to fixed layout so explicit cell widths hold, then
//! gets one column handle per internal boundary of its first row and one
//! row handle under every row. A column drag resizes the two cells beside
//! the boundary in every row at once; a row drag sets one row's height.

use crate::drag::{
    DragSession, EditorKind, Handle, HandleRef, HandleSet, Lane, Lanes, SizeRule, boundary_offsets,
};
use crate::editor::{ContextEditor, hide_chrome, show_chrome};
use crate::host::Host;
use insp_core::css::format_px;
use insp_core::geometry::Axis;

pub const MIN_COLUMN_WIDTH: f32 = 40.0;
pub const MIN_ROW_HEIGHT: f32 = 30.0;

/// Text and classes of cells created by `add_row` / `add_column`.
pub const PLACEHOLDER_TEXT: &str = "New cell";
pub const BODY_CELL_CLASSES: &str = "px-6 py-4 border border-slate-300";
pub const HEADER_CELL_CLASSES: &str = "px-6 py-3 border border-slate-300";

/// Rows in document order, looking through `thead` / `tbody` / `tfoot`.
pub fn rows<H: Host>(host: &H, table: &H::Node) -> Vec<H::Node> {
    let mut out = Vec::new();
    for child in host.children(table) {
        match host.tag(&child).as_str() {
            "tr" => out.push(child),
            "thead" | "tbody" | "tfoot" => out.extend(
                host.children(&child)
                    .into_iter()
                    .filter(|r| host.tag(r) == "tr"),
            ),
            _ => {}
        }
    }
    out
}

pub fn cells<H: Host>(host: &H, row: &H::Node) -> Vec<H::Node> {
    host.children(row)
        .into_iter()
        .filter(|c| matches!(host.tag(c).as_str(), "td" | "th"))
        .collect()
}

pub struct TableEditor<H: Host> {
    table: Option<H::Node>,
    handles: HandleSet,
    /// Cells (or the row) written by the drag in progress, one per lane.
    dragging: Vec<(H::Node, Option<H::Node>)>,
}

impl<H: Host> Default for TableEditor<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> TableEditor<H> {
    pub fn new() -> Self {
        Self {
            table: None,
            handles: HandleSet::new(),
            dragging: Vec::new(),
        }
    }

    fn build_handles(&mut self, host: &H) {
        self.handles.clear();
        let Some(table) = &self.table else {
            return;
        };
        let container = host.page_rect(table);
        let rows = rows(host, table);

        let widths: Vec<f32> = rows
            .first()
            .map(|r| cells(host, r).iter().map(|c| host.offset_width(c)).collect())
            .unwrap_or_default();
        let internal = widths.len().saturating_sub(1);
        for (i, offset) in boundary_offsets(&widths, internal, 0.0).into_iter().enumerate() {
            self.handles
                .push(Handle::bar(EditorKind::Table, Axis::Horizontal, i, offset, container));
        }

        let heights: Vec<f32> = rows.iter().map(|r| host.offset_height(r)).collect();
        for (i, offset) in boundary_offsets(&heights, heights.len(), 0.0)
            .into_iter()
            .enumerate()
        {
            self.handles
                .push(Handle::bar(EditorKind::Table, Axis::Vertical, i, offset, container));
        }
    }

    fn redraw(&mut self, host: &mut H) {
        self.build_handles(host);
        host.draw_handles(EditorKind::Table, &self.handles);
    }

    /// Append a row of placeholder cells to the body (or the table itself
    /// when it has no body), one cell per first-row column.
    pub fn add_row(&mut self, host: &mut H) -> bool {
        let Some(table) = self.table.clone() else {
            return false;
        };
        let body = host
            .children(&table)
            .into_iter()
            .find(|c| host.tag(c) == "tbody")
            .unwrap_or_else(|| table.clone());
        let columns = rows(host, &table)
            .first()
            .map(|r| cells(host, r).len())
            .unwrap_or(0)
            .max(1);

        let Some(row) = host.append_element(&body, "tr") else {
            return false;
        };
        for _ in 0..columns {
            if let Some(cell) = host.append_element(&row, "td") {
                host.set_text(&cell, PLACEHOLDER_TEXT);
                host.set_attribute(&cell, "class", BODY_CELL_CLASSES);
            }
        }
        log::debug!("table: added row with {columns} cells");
        self.redraw(host);
        true
    }

    /// Append one placeholder cell to every row; header rows get a `th`.
    pub fn add_column(&mut self, host: &mut H) -> bool {
        let Some(table) = self.table.clone() else {
            return false;
        };
        let rows = rows(host, &table);
        if rows.is_empty() {
            return false;
        }
        for row in &rows {
            let header = host.parent(row).is_some_and(|p| host.tag(&p) == "thead");
            let tag = if header { "th" } else { "td" };
            let Some(cell) = host.append_element(row, tag) else {
                continue;
            };
            host.set_text(&cell, PLACEHOLDER_TEXT);
            if header {
                host.set_attribute(&cell, "class", HEADER_CELL_CLASSES);
                host.set_attribute(&cell, "scope", "col");
            } else {
                host.set_attribute(&cell, "class", BODY_CELL_CLASSES);
            }
        }
        log::debug!("table: added column to {} rows", rows.len());
        self.redraw(host);
        true
    }
}

impl<H: Host> ContextEditor<H> for TableEditor<H> {
    fn kind(&self) -> EditorKind {
        EditorKind::Table
    }

    fn target(&self) -> Option<&H::Node> {
        self.table.as_ref()
    }

    fn activate(&mut self, host: &mut H, target: H::Node) {
        host.set_style(&target, "table-layout", "fixed");
        self.table = Some(target);
        self.build_handles(host);
        show_chrome(host, EditorKind::Table, &self.handles);
    }

    fn deactivate(&mut self, host: &mut H) {
        if self.table.take().is_none() {
            return;
        }
        self.forget();
        hide_chrome(host, EditorKind::Table);
    }

    fn forget(&mut self) {
        self.table = None;
        self.handles.clear();
        self.dragging.clear();
    }

    fn relayout(&mut self, host: &mut H) {
        self.redraw(host);
    }

    fn handles(&self) -> &[Handle] {
        &self.handles
    }

    fn begin_drag(&mut self, host: &mut H, handle: HandleRef, pointer: f32) -> Option<DragSession> {
        let table = self.table.clone()?;
        let rows = rows(host, &table);
        self.dragging.clear();
        let mut lanes = Lanes::new();

        let rule = match handle.axis {
            Axis::Horizontal => {
                let i = handle.index;
                for row in &rows {
                    let cells = cells(host, row);
                    if let (Some(a), Some(b)) = (cells.get(i), cells.get(i + 1)) {
                        lanes.push(Lane::pair(host.offset_width(a), host.offset_width(b)));
                        self.dragging.push((a.clone(), Some(b.clone())));
                    }
                }
                SizeRule::reject_below(MIN_COLUMN_WIDTH)
            }
            Axis::Vertical => {
                let row = rows.get(handle.index)?;
                lanes.push(Lane::single(host.offset_height(row)));
                self.dragging.push((row.clone(), None));
                SizeRule::reject_below(MIN_ROW_HEIGHT)
            }
        };
        if lanes.is_empty() {
            return None;
        }
        Some(DragSession::new(handle, pointer, rule, lanes))
    }

    fn drag_to(&mut self, host: &mut H, session: &DragSession, pointer: f32) -> bool {
        let Some(sizes) = session.propose(pointer) else {
            log::trace!("table: frame rejected at {pointer}");
            return false;
        };
        let property = match session.handle.axis {
            Axis::Horizontal => "width",
            Axis::Vertical => "height",
        };
        for ((lead, trail), lane) in self.dragging.iter().zip(&sizes) {
            host.set_style(lead, property, &format_px(lane.lead));
            if let (Some(node), Some(size)) = (trail, lane.trail) {
                host.set_style(node, property, &format_px(size));
            }
        }
        self.redraw(host);
        true
    }

    fn end_drag(&mut self, host: &mut H) {
        self.dragging.clear();
        self.redraw(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"<table id="t"><thead><tr><th style="width: 100px">A</th><th style="width: 100px">B</th><th style="width: 100px">C</th></tr></thead><tbody><tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>"#;

    fn active() -> (HeadlessHost, TableEditor<HeadlessHost>) {
        let mut host = HeadlessHost::new(TABLE).unwrap();
        let table = host.by_dom_id("t").unwrap();
        let mut editor = TableEditor::new();
        editor.activate(&mut host, table);
        (host, editor)
    }

    #[test]
    fn activation_fixes_layout_and_places_handles() {
        let (host, editor) = active();
        let table = host.by_dom_id("t").unwrap();
        assert_eq!(host.inline_style(table, "table-layout").as_deref(), Some("fixed"));

        let cols: Vec<f32> = editor
            .handles()
            .iter()
            .filter(|h| h.handle.axis == Axis::Horizontal)
            .map(|h| h.rect.x)
            .collect();
        assert_eq!(cols, vec![96.0, 196.0]);
        let rows = editor
            .handles()
            .iter()
            .filter(|h| h.handle.axis == Axis::Vertical)
            .count();
        assert_eq!(rows, 2);
    }

    #[test]
    fn add_row_and_column_use_placeholders() {
        let (mut host, mut editor) = active();
        assert!(editor.add_row(&mut host));
        assert!(editor.add_column(&mut host));
        let table = host.by_dom_id("t").unwrap();
        let rows = rows(&host, &table);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| cells(&host, r).len() == 4));

        let header_cell = cells(&host, &rows[0])[3];
        assert_eq!(host.tag(&header_cell), "th");
        assert_eq!(host.attribute(&header_cell, "scope").as_deref(), Some("col"));
        let new_cell = cells(&host, &rows[2])[0];
        assert_eq!(host.direct_text(&new_cell).as_deref(), Some(PLACEHOLDER_TEXT));
        assert_eq!(
            host.attribute(&new_cell, "class").as_deref(),
            Some(BODY_CELL_CLASSES)
        );
        let row_handles = editor
            .handles()
            .iter()
            .filter(|h| h.handle.axis == Axis::Vertical)
            .count();
        assert_eq!(row_handles, 3);
    }

    #[test]
    fn row_drag_respects_floor() {
        let (mut host, mut editor) = active();
        let handle = editor.handles()[2].handle;
        assert_eq!(handle.axis, Axis::Vertical);
        let session = editor.begin_drag(&mut host, handle, 100.0).unwrap();
        assert!(editor.drag_to(&mut host, &session, 130.0));
        let table = host.by_dom_id("t").unwrap();
        let first = rows(&host, &table)[0];
        assert_eq!(host.inline_style(first, "height").as_deref(), Some("50px"));
        // The rendered 20px row shrunk by 25 is below the floor.
        assert!(!editor.drag_to(&mut host, &session, 75.0));
        assert_eq!(host.inline_style(first, "height").as_deref(), Some("50px"));
    }
}
