//! Integration tests: handle drags through the coordinator (insp-editor).
//!
//! Every drag goes pointer-down → moves → pointer-up on the inspector, the
//! way the page glue feeds it, and checks the written styles, the floors,
//! the history entry and the selection afterwards.

mod common;

use common::*;
use insp_core::{Axis, Edge};
use insp_editor::{ContextEditor, EditorKind};
use pretty_assertions::assert_eq;

// ─── Table ───────────────────────────────────────────────────────────────

#[test]
fn table_column_drag_moves_every_row_in_lockstep() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "north"));
    let boundary = handle(&inspector, EditorKind::Table, 0);
    assert_eq!(boundary.axis, Axis::Horizontal);

    drag(&mut inspector, boundary, &[30.0]);

    let table = node(&inspector, "sales");
    let host = inspector.host();
    for row in insp_editor::table::rows(host, &table) {
        let cells = insp_editor::table::cells(host, &row);
        assert_eq!(host.inline_style(cells[0], "width").as_deref(), Some("180px"));
        assert_eq!(host.inline_style(cells[1], "width").as_deref(), Some("70px"));
    }
}

#[test]
fn table_column_drag_rejects_whole_frame_under_floor() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "north"));
    let boundary = handle(&inspector, EditorKind::Table, 0);

    // 100 - 70 = 30 is under 40 for the right cell in every row: the last
    // accepted frame (+30) stays.
    drag(&mut inspector, boundary, &[30.0, 70.0]);
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("180px"));
    assert_eq!(style(&inspector, "north", "width").as_deref(), Some("180px"));

    // Exactly at the floor is accepted.
    let boundary = handle(&inspector, EditorKind::Table, 0);
    drag(&mut inspector, boundary, &[30.0]);
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("210px"));
}

#[test]
fn table_row_drag_sets_one_row() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "north"));
    // Column handles come first: two internal boundaries, then three rows.
    let row = handle(&inspector, EditorKind::Table, 3);
    assert_eq!((row.axis, row.index), (Axis::Vertical, 1));

    drag(&mut inspector, row, &[25.0]);
    let table = node(&inspector, "sales");
    let rows = insp_editor::table::rows(inspector.host(), &table);
    let heights: Vec<Option<String>> = rows
        .iter()
        .map(|r| inspector.host().inline_style(*r, "height"))
        .collect();
    assert_eq!(heights, vec![None, Some("45px".to_string()), None]);
}

#[test]
fn table_structure_edits_commit() {
    let (mut inspector, log) = inspector();
    assert!(!inspector.add_table_row());
    inspector.click(node(&inspector, "north"));
    let before = inspector.history().unwrap().past_len();

    assert!(inspector.add_table_row());
    assert!(inspector.add_table_column());
    assert_eq!(inspector.history().unwrap().past_len(), before + 2);
    assert_eq!(log.0.borrow().rebuilds, 3);

    let table = node(&inspector, "sales");
    let rows = insp_editor::table::rows(inspector.host(), &table);
    assert_eq!(rows.len(), 4);
    assert!(
        rows.iter()
            .all(|r| insp_editor::table::cells(inspector.host(), r).len() == 4)
    );
}

// ─── Grid ────────────────────────────────────────────────────────────────

#[test]
fn grid_internal_row_moves_two_tracks() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "cards"));
    let rows: Vec<_> = inspector
        .editors()
        .grid
        .handles()
        .iter()
        .filter(|h| h.handle.axis == Axis::Vertical)
        .map(|h| h.handle)
        .collect();
    assert_eq!(rows.len(), 2);

    drag(&mut inspector, rows[0], &[20.0]);
    assert_eq!(
        style(&inspector, "cards", "grid-template-rows").as_deref(),
        Some("120px 80px")
    );
}

#[test]
fn grid_terminal_row_moves_only_last_track() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "cards"));
    let last = inspector
        .editors()
        .grid
        .handles()
        .iter()
        .rfind(|h| h.handle.axis == Axis::Vertical)
        .unwrap()
        .handle;

    drag(&mut inspector, last, &[25.0]);
    assert_eq!(
        style(&inspector, "cards", "grid-template-rows").as_deref(),
        Some("100px 125px")
    );

    // 125 - 90 = 35 is under the 40px row floor.
    let last = handle(&inspector, EditorKind::Grid, 3);
    drag(&mut inspector, last, &[-90.0]);
    assert_eq!(
        style(&inspector, "cards", "grid-template-rows").as_deref(),
        Some("100px 125px")
    );
}

#[test]
fn grid_column_handles_sit_in_gaps() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "cards"));
    let cards = inspector.host().by_dom_id("cards").unwrap();
    let origin = insp_editor::Host::page_rect(inspector.host(), &cards).x;
    let xs: Vec<f32> = inspector
        .editors()
        .grid
        .handles()
        .iter()
        .filter(|h| h.handle.axis == Axis::Horizontal)
        .map(|h| h.rect.x - origin)
        .collect();
    assert_eq!(xs, vec![206.0, 426.0]);

    let h = handle(&inspector, EditorKind::Grid, 1);
    drag(&mut inspector, h, &[-40.0]);
    assert_eq!(
        style(&inspector, "cards", "grid-template-columns").as_deref(),
        Some("200px 160px 240px")
    );
}

// ─── Flex ────────────────────────────────────────────────────────────────

#[test]
fn flex_column_drag_writes_percentages() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "toolbar"));
    let h = handle(&inspector, EditorKind::Flex, 0);
    drag(&mut inspector, h, &[60.0]);
    assert_eq!(style(&inspector, "save", "width").as_deref(), Some("60%"));
    assert_eq!(style(&inspector, "load", "width").as_deref(), Some("40%"));
}

#[test]
fn flex_row_drag_writes_pixels() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "toolbar"));
    let row = handle(&inspector, EditorKind::Flex, 1);
    assert_eq!(row.axis, Axis::Vertical);

    drag(&mut inspector, row, &[15.0, -30.0]);
    // -30 leaves the toolbar at 30px, under the floor; +15 stays.
    assert_eq!(style(&inspector, "toolbar", "height").as_deref(), Some("75px"));
    assert_eq!(style(&inspector, "footer", "height").as_deref(), Some("45px"));
}

// ─── Box resizer ─────────────────────────────────────────────────────────

#[test]
fn resizer_padding_never_goes_negative() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "lede"));
    for edge in Edge::ALL {
        let h = handle(&inspector, EditorKind::Resizer, edge.index());
        for delta in [-500.0, 500.0] {
            drag(&mut inspector, h, &[delta]);
            let value = style(&inspector, "lede", edge.padding_property()).unwrap();
            let px = insp_core::parse_px(&value).unwrap();
            assert!(px >= 0.0, "{} went to {value}", edge.name());
        }
    }
}

#[test]
fn resizer_bottom_edge_grows_padding() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "lede"));
    let bottom = handle(&inspector, EditorKind::Resizer, Edge::Bottom.index());
    drag(&mut inspector, bottom, &[12.0]);
    assert_eq!(
        style(&inspector, "lede", "padding-bottom").as_deref(),
        Some("12px")
    );
    let lede = node(&inspector, "lede");
    let rect = insp_editor::Host::page_rect(inspector.host(), &lede);
    assert_eq!(inspector.host().chrome.resizer_box, Some(rect));
    assert_eq!(rect.height, 32.0);
}

// ─── Re-selection ────────────────────────────────────────────────────────

#[test]
fn track_editors_reselect_by_identifier_after_release() {
    let (mut inspector, log) = inspector();
    for (clicked, kind, index) in [
        ("north", EditorKind::Table, 0),
        ("cards", EditorKind::Grid, 0),
        ("toolbar", EditorKind::Flex, 0),
    ] {
        inspector.click(node(&inspector, clicked));
        let id = id_of(&inspector, clicked);
        let highlights_before = log.0.borrow().highlights.len();

        let h = handle(&inspector, kind, index);
        drag(&mut inspector, h, &[10.0]);

        let selection = inspector.selection().unwrap();
        assert_eq!(selection.id, id);
        assert_eq!(selection.element, node(&inspector, clicked));
        assert_eq!(inspector.active_editors(), vec![kind]);
        // Deselect (None) then select (Some(id)) ran again.
        let log = log.0.borrow();
        assert_eq!(
            &log.highlights[highlights_before..],
            &[None, Some(id)][..]
        );
    }
}

#[test]
fn resizer_keeps_selection_and_refreshes_properties() {
    let (mut inspector, log) = inspector();
    inspector.click(node(&inspector, "intro"));
    let highlights = log.0.borrow().highlights.len();
    let shown = log.0.borrow().shown.len();

    let right = handle(&inspector, EditorKind::Resizer, Edge::Right.index());
    drag(&mut inspector, right, &[8.0]);

    assert_eq!(inspector.selection().unwrap().element, node(&inspector, "intro"));
    let log = log.0.borrow();
    assert_eq!(log.highlights.len(), highlights);
    assert_eq!(log.shown.len(), shown + 1);
    assert_eq!(
        log.shown.last().unwrap().analysis.box_model.get("padding-right").map(String::as_str),
        Some("18px")
    );
}

#[test]
fn release_commits_once_and_keeps_marker_out_of_history() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "cards"));
    let h = handle(&inspector, EditorKind::Grid, 0);
    drag(&mut inspector, h, &[5.0, 10.0, 15.0]);

    let history = inspector.history().unwrap();
    assert_eq!(history.past_len(), 2);
    assert!(!history.current().unwrap().contains(insp_editor::SELECTED_CLASS));
    assert!(!inspector.is_dragging());
    assert!(!inspector.host().chrome.pointer_capture);
    assert_eq!(inspector.host().chrome.cursor, None);
}

#[test]
fn only_one_drag_at_a_time() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "cards"));
    let first = handle(&inspector, EditorKind::Grid, 0);
    let second = handle(&inspector, EditorKind::Grid, 1);
    assert!(inspector.pointer_down(first, 0.0, 0.0));
    assert!(inspector.host().chrome.pointer_capture);
    assert_eq!(inspector.host().chrome.cursor, Some("col-resize"));
    assert!(!inspector.pointer_down(second, 0.0, 0.0));
    assert!(inspector.pointer_up());
    assert!(!inspector.pointer_up());
    assert!(!inspector.pointer_move(50.0, 0.0));
}

#[test]
fn keys_do_not_interrupt_a_drag() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "north"));
    assert!(inspector.add_table_row());
    let before = inspector.history().unwrap().past_len();

    let boundary = handle(&inspector, EditorKind::Table, 0);
    assert!(inspector.pointer_down(boundary, 0.0, 0.0));
    assert!(inspector.pointer_move(30.0, 0.0));
    assert!(!inspector.key_down("Escape", false, false, false, false, false));
    assert!(!inspector.key_down("z", true, false, false, false, false));
    assert!(inspector.is_dragging());
    assert!(inspector.selection().is_some());

    assert!(inspector.pointer_up());
    assert_eq!(inspector.history().unwrap().past_len(), before + 1);
    assert!(inspector.undo());
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("150px"));
    assert!(inspector.redo());
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("180px"));
}

#[test]
fn leaving_inspection_mid_drag_records_the_last_frame() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "north"));
    let before = inspector.history().unwrap().past_len();

    let boundary = handle(&inspector, EditorKind::Table, 0);
    assert!(inspector.pointer_down(boundary, 0.0, 0.0));
    assert!(inspector.pointer_move(30.0, 0.0));
    inspector.set_active(false);

    assert!(!inspector.is_dragging());
    assert!(!inspector.host().chrome.pointer_capture);
    assert_eq!(inspector.host().chrome.cursor, None);
    assert_eq!(inspector.history().unwrap().past_len(), before + 1);
    assert!(inspector.history().unwrap().current().unwrap().contains("180px"));

    // Undo and redo now see the drag as one step.
    assert!(inspector.undo());
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("150px"));
    assert!(inspector.redo());
    assert_eq!(style(&inspector, "h-region", "width").as_deref(), Some("180px"));
}

#[test]
fn pointer_down_hit_tests_drawn_handles() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "lede"));
    let top = inspector.editors().resizer.handles()[Edge::Top.index()].rect;
    assert!(inspector.pointer_down_at(top.x + 4.0, top.y + 4.0));
    assert!(inspector.pointer_up());
    assert!(!inspector.pointer_down_at(-100.0, -100.0));
}

#[test]
fn window_resize_repositions_handles() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "lede"));
    // The section's 10px padding sits around the paragraph.
    assert_eq!(inspector.host().chrome.resizer_box.unwrap().width, 1004.0);
    inspector.host_mut().resize_viewport(insp_core::Viewport {
        width: 500.0,
        height: 400.0,
    });
    inspector.window_resized();
    let after = inspector.host().chrome.resizer_box.unwrap();
    assert_eq!(after.width, 480.0);
    let right = handle(&inspector, EditorKind::Resizer, Edge::Right.index());
    let drawn = inspector.editors().resizer.handles()[right.index].rect;
    assert_eq!(drawn.x, after.right() - 4.0);
}
