//! Grid editor.
//!
//! Works only on the element that itself declares grid display. Geometry
//! comes from the computed `grid-template-columns` / `grid-template-rows`
//! lists, which must be fully pixel-resolved: a list holding `fr`, `auto`,
//! `minmax()` or similar is treated as unsupported and that axis gets no
//! handles. Columns get one handle per internal boundary; rows get one per
//! track, the last pinned to the grid's bottom edge and resizing only the
//! final track.

use crate::drag::{
    DragSession, EditorKind, HANDLE_HALF, Handle, HandleRef, HandleSet, Lane, Lanes, SizeRule,
    boundary_offsets,
};
use crate::editor::{ContextEditor, hide_chrome, show_chrome};
use crate::host::Host;
use insp_core::css::{TrackList, format_track_list, parse_px, parse_track_list};
use insp_core::geometry::Axis;

pub const MIN_COLUMN_TRACK: f32 = 50.0;
pub const MIN_ROW_TRACK: f32 = 40.0;

fn template_property(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "grid-template-columns",
        Axis::Vertical => "grid-template-rows",
    }
}

fn gap_property(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "column-gap",
        Axis::Vertical => "row-gap",
    }
}

/// Column handle offsets from the grid's left edge.
pub fn column_handle_offsets(tracks: &[f32], gap: f32) -> Vec<f32> {
    boundary_offsets(tracks, tracks.len().saturating_sub(1), gap)
}

/// Row handle offsets from the grid's top edge: internal boundaries, then
/// the bottom edge of the grid.
pub fn row_handle_offsets(tracks: &[f32], gap: f32, grid_height: f32) -> Vec<f32> {
    if tracks.is_empty() {
        return Vec::new();
    }
    let mut out = boundary_offsets(tracks, tracks.len() - 1, gap);
    out.push(grid_height - HANDLE_HALF);
    out
}

pub struct GridEditor<H: Host> {
    grid: Option<H::Node>,
    /// Track counts read at activation. Resizes move handles, never add or
    /// remove them.
    columns: usize,
    rows: usize,
    handles: HandleSet,
    /// Working copy of the dragged axis' track list.
    tracks: TrackList,
}

impl<H: Host> Default for GridEditor<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> GridEditor<H> {
    pub fn new() -> Self {
        Self {
            grid: None,
            columns: 0,
            rows: 0,
            handles: HandleSet::new(),
            tracks: TrackList::new(),
        }
    }

    fn read_tracks(host: &H, grid: &H::Node, axis: Axis) -> Option<TrackList> {
        let value = host.computed_style(grid, template_property(axis));
        match parse_track_list(&value) {
            Ok(tracks) => Some(tracks),
            Err(e) => {
                log::warn!("grid: {} unusable: {e}", template_property(axis));
                None
            }
        }
    }

    fn gap(host: &H, grid: &H::Node, axis: Axis) -> f32 {
        parse_px(&host.computed_style(grid, gap_property(axis))).unwrap_or(0.0)
    }

    fn position_handles(&mut self, host: &H) {
        self.handles.clear();
        let Some(grid) = &self.grid else {
            return;
        };
        let rect = host.page_rect(grid);

        let tracks_of = |axis| parse_track_list(&host.computed_style(grid, template_property(axis)));

        if self.columns > 0
            && let Ok(tracks) = tracks_of(Axis::Horizontal)
        {
            let gap = Self::gap(host, grid, Axis::Horizontal);
            let offsets = column_handle_offsets(&tracks, gap);
            for (i, offset) in offsets.into_iter().take(self.columns).enumerate() {
                self.handles
                    .push(Handle::bar(EditorKind::Grid, Axis::Horizontal, i, offset, rect));
            }
        }

        if self.rows > 0
            && let Ok(tracks) = tracks_of(Axis::Vertical)
        {
            let gap = Self::gap(host, grid, Axis::Vertical);
            let offsets = row_handle_offsets(&tracks, gap, rect.height);
            for (i, offset) in offsets.into_iter().take(self.rows).enumerate() {
                self.handles
                    .push(Handle::bar(EditorKind::Grid, Axis::Vertical, i, offset, rect));
            }
        }
    }

    fn redraw(&mut self, host: &mut H) {
        self.position_handles(host);
        host.draw_handles(EditorKind::Grid, &self.handles);
    }
}

impl<H: Host> ContextEditor<H> for GridEditor<H> {
    fn kind(&self) -> EditorKind {
        EditorKind::Grid
    }

    fn target(&self) -> Option<&H::Node> {
        self.grid.as_ref()
    }

    fn activate(&mut self, host: &mut H, target: H::Node) {
        self.columns = Self::read_tracks(host, &target, Axis::Horizontal)
            .map(|t| t.len().saturating_sub(1))
            .unwrap_or(0);
        self.rows = Self::read_tracks(host, &target, Axis::Vertical)
            .map(|t| t.len())
            .unwrap_or(0);
        self.grid = Some(target);
        self.position_handles(host);
        show_chrome(host, EditorKind::Grid, &self.handles);
    }

    fn deactivate(&mut self, host: &mut H) {
        if self.grid.is_none() {
            return;
        }
        self.forget();
        hide_chrome(host, EditorKind::Grid);
    }

    fn forget(&mut self) {
        self.grid = None;
        self.columns = 0;
        self.rows = 0;
        self.handles.clear();
        self.tracks.clear();
    }

    fn relayout(&mut self, host: &mut H) {
        self.redraw(host);
    }

    fn handles(&self) -> &[Handle] {
        &self.handles
    }

    fn begin_drag(&mut self, host: &mut H, handle: HandleRef, pointer: f32) -> Option<DragSession> {
        let grid = self.grid.clone()?;
        let tracks = Self::read_tracks(host, &grid, handle.axis)?;
        let i = handle.index;
        let lead = *tracks.get(i)?;
        let (lane, rule) = match handle.axis {
            Axis::Horizontal => (
                Lane::pair(lead, *tracks.get(i + 1)?),
                SizeRule::reject_below(MIN_COLUMN_TRACK),
            ),
            // The bottom-edge handle has no neighbour below it.
            Axis::Vertical => (
                Lane {
                    lead,
                    trail: tracks.get(i + 1).copied(),
                },
                SizeRule::reject_below(MIN_ROW_TRACK),
            ),
        };
        self.tracks = tracks;
        let mut lanes = Lanes::new();
        lanes.push(lane);
        Some(DragSession::new(handle, pointer, rule, lanes))
    }

    fn drag_to(&mut self, host: &mut H, session: &DragSession, pointer: f32) -> bool {
        let Some(grid) = self.grid.clone() else {
            return false;
        };
        let Some(lane) = session.propose(pointer).and_then(|l| l.first().copied()) else {
            log::trace!("grid: frame rejected at {pointer}");
            return false;
        };
        let i = session.handle.index;
        if let Some(slot) = self.tracks.get_mut(i) {
            *slot = lane.lead;
        }
        if let (Some(size), Some(slot)) = (lane.trail, self.tracks.get_mut(i + 1)) {
            *slot = size;
        }
        host.set_style(
            &grid,
            template_property(session.handle.axis),
            &format_track_list(&self.tracks),
        );
        self.redraw(host);
        true
    }

    fn end_drag(&mut self, host: &mut H) {
        self.tracks.clear();
        self.redraw(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use pretty_assertions::assert_eq;

    #[test]
    fn handle_offsets_follow_tracks_and_gaps() {
        assert_eq!(column_handle_offsets(&[100.0, 100.0, 100.0], 20.0), vec![106.0, 226.0]);
        assert_eq!(row_handle_offsets(&[50.0, 60.0], 10.0, 120.0), vec![51.0, 116.0]);
        assert!(row_handle_offsets(&[], 0.0, 0.0).is_empty());
    }

    #[test]
    fn fractional_tracks_get_no_handles_on_that_axis() {
        let mut host = HeadlessHost::new(
            r#"<div id="g" style="display: grid; grid-template-columns: 1fr 2fr; grid-template-rows: 40px 40px"></div>"#,
        )
        .unwrap();
        let grid = host.by_dom_id("g").unwrap();
        let mut editor = GridEditor::new();
        editor.activate(&mut host, grid);
        assert!(editor.is_active());
        assert!(editor.handles().iter().all(|h| h.handle.axis == Axis::Vertical));
        assert_eq!(editor.handles().len(), 2);
    }

    #[test]
    fn column_drag_rewrites_whole_track_list() {
        let mut host = HeadlessHost::new(
            r#"<div id="g" style="display: grid; grid-template-columns: 100px 100px 100px; grid-template-rows: 50px"></div>"#,
        )
        .unwrap();
        let grid = host.by_dom_id("g").unwrap();
        let mut editor = GridEditor::new();
        editor.activate(&mut host, grid);
        let handle = editor.handles()[1].handle;
        let session = editor.begin_drag(&mut host, handle, 200.0).unwrap();
        assert!(editor.drag_to(&mut host, &session, 230.0));
        assert_eq!(
            host.inline_style(grid, "grid-template-columns").as_deref(),
            Some("100px 130px 70px")
        );
        // 70 - 30 = 40 is under the 50px floor: the frame is dropped.
        assert!(!editor.drag_to(&mut host, &session, 260.0));
        assert_eq!(
            host.inline_style(grid, "grid-template-columns").as_deref(),
            Some("100px 130px 70px")
        );
    }
}
