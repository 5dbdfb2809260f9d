//! Integration tests: selection state machine (insp-editor).
//!
//! Drives `Inspector<HeadlessHost>` over the demo page and checks which
//! editor each click activates, that editors never overlap, and what the
//! tree view and properties panel are told.

mod common;

use common::*;
use insp_editor::{ContextEditor, EditorKind, Host, Panel, SELECTED_CLASS};
use pretty_assertions::assert_eq;

// ─── Routing ─────────────────────────────────────────────────────────────

#[test]
fn cell_click_puts_whole_table_under_edit() {
    let (mut inspector, _) = inspector();
    let north = node(&inspector, "north");
    assert!(inspector.click(north));

    let selection = inspector.selection().unwrap();
    assert_eq!(selection.element, north);
    assert_eq!(selection.editor, Some(EditorKind::Table));
    assert_eq!(
        inspector.editors().table.target(),
        Some(&node(&inspector, "sales"))
    );
    assert_eq!(style(&inspector, "sales", "table-layout").as_deref(), Some("fixed"));
    assert!(inspector.host().chrome.panels.contains(&Panel::Table));
}

#[test]
fn containers_children_and_plain_boxes() {
    let (mut inspector, _) = inspector();
    let cases = [
        ("cards", Some(EditorKind::Grid)),
        ("card-a", None),
        ("toolbar", Some(EditorKind::Flex)),
        ("save", None),
        ("lede", Some(EditorKind::Resizer)),
        ("intro", Some(EditorKind::Resizer)),
    ];
    for (dom_id, expected) in cases {
        inspector.click(node(&inspector, dom_id));
        assert_eq!(
            inspector.selection().unwrap().editor,
            expected,
            "editor for #{dom_id}"
        );
        assert_eq!(
            inspector.active_editors(),
            expected.into_iter().collect::<Vec<_>>()
        );
    }
}

#[test]
fn at_most_one_editor_holds_handles() {
    let (mut inspector, _) = inspector();
    let sequence = [
        "north", "cards", "lede", "toolbar", "card-a", "h-region", "cards", "title", "stack",
        "footer", "north",
    ];
    for dom_id in sequence {
        inspector.click(node(&inspector, dom_id));
        assert!(inspector.active_editors().len() <= 1, "after #{dom_id}");
        let chrome = &inspector.host().chrome;
        assert!(chrome.handles.len() <= 1, "after #{dom_id}");
        assert!(chrome.panels.len() <= 1, "after #{dom_id}");
        let marked = inspector
            .host()
            .descendants(&inspector.host().content_root())
            .into_iter()
            .filter(|n| inspector.host().has_class(n, SELECTED_CLASS))
            .count();
        assert_eq!(marked, 1, "after #{dom_id}");
    }
}

#[test]
fn stack_of_rows_gets_row_handles_only_from_a_row() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "toolbar"));
    let axes: Vec<_> = inspector
        .editors()
        .flex
        .handles()
        .iter()
        .map(|h| h.handle.axis)
        .collect();
    assert_eq!(axes, vec![insp_core::Axis::Horizontal, insp_core::Axis::Vertical]);
}

// ─── Chrome and modes ────────────────────────────────────────────────────

#[test]
fn clicks_on_chrome_are_ignored() {
    let mut host = insp_editor::HeadlessHost::new(PAGE).unwrap();
    let panel = host.add_panel("<button>Add row</button>").unwrap();
    let button = host.children(&panel)[0];
    let mut inspector = insp_editor::Inspector::new(host, insp_editor::Collaborators::new());

    inspector.click(node(&inspector, "north"));
    assert!(!inspector.click(button));
    assert_eq!(inspector.selection().unwrap().element, node(&inspector, "north"));
    assert_eq!(inspector.active_editors(), vec![EditorKind::Table]);
}

#[test]
fn deactivating_clears_everything_and_stops_capturing() {
    let (mut inspector, log) = inspector();
    assert!(inspector.host().chrome.click_capture);
    inspector.click(node(&inspector, "cards"));

    assert!(!inspector.toggle());
    assert!(inspector.selection().is_none());
    assert!(inspector.active_editors().is_empty());
    assert!(!inspector.host().chrome.click_capture);
    assert!(inspector.host().chrome.handles.is_empty());
    assert_eq!(log.0.borrow().highlights.last(), Some(&None));
    assert!(!inspector.click(node(&inspector, "north")));

    assert!(inspector.toggle());
    assert!(inspector.click(node(&inspector, "north")));
}

#[test]
fn deselect_is_idempotent() {
    let (mut inspector, _) = inspector();
    inspector.deselect();
    inspector.click(node(&inspector, "lede"));
    inspector.deselect();
    inspector.deselect();
    assert!(inspector.selection().is_none());
    assert_eq!(inspector.host().chrome.resizer_box, None);
}

// ─── Collaborators ───────────────────────────────────────────────────────

#[test]
fn selection_notifies_tree_and_properties() {
    let (mut inspector, log) = inspector();
    assert_eq!(log.0.borrow().rebuilds, 1);
    assert_eq!(log.0.borrow().tree_sizes, vec![5]);

    let lede = id_of(&inspector, "lede");
    inspector.click(node(&inspector, "lede"));

    let log = log.0.borrow();
    assert_eq!(log.highlights.last(), Some(&Some(lede)));
    let view = log.shown.last().unwrap();
    assert_eq!(view.id, Some(lede));
    assert_eq!(view.analysis.tag, "p");
    assert_eq!(view.analysis.text.as_deref(), Some("Quarterly numbers"));
    assert!(view.markup.starts_with("<p id=\"lede\""));
}

#[test]
fn tree_selection_by_identifier() {
    let (mut inspector, _) = inspector();
    let cards = id_of(&inspector, "cards");
    assert!(inspector.select_by_id(cards));
    assert_eq!(inspector.selection().unwrap().id, cards);
    assert_eq!(inspector.active_editors(), vec![EditorKind::Grid]);

    assert!(!inspector.select_by_id(insp_core::ElementId::intern("inspector-id-9999")));
}

#[test]
fn escape_deselects_unless_typing() {
    let (mut inspector, _) = inspector();
    inspector.click(node(&inspector, "lede"));
    assert!(!inspector.key_down("Escape", false, false, false, false, true));
    assert!(inspector.selection().is_some());
    assert!(inspector.key_down("Escape", false, false, false, false, false));
    assert!(inspector.selection().is_none());
    assert!(!inspector.key_down("Escape", false, false, false, false, false));
}

#[test]
fn analyzer_can_be_replaced() {
    struct TagOnly;
    impl insp_editor::Analyzer<insp_editor::HeadlessHost> for TagOnly {
        fn analyze(
            &self,
            host: &insp_editor::HeadlessHost,
            node: &insp_core::NodeIndex,
        ) -> insp_editor::Analysis {
            insp_editor::Analysis {
                tag: host.tag(node).to_uppercase(),
                ..Default::default()
            }
        }
    }

    let recorder = Recorder::default();
    let collaborators = insp_editor::Collaborators::new()
        .with_properties(recorder.clone())
        .with_analyzer(TagOnly);
    let host = insp_editor::HeadlessHost::new(PAGE).unwrap();
    let mut inspector = insp_editor::Inspector::new(host, collaborators);
    inspector.click(node(&inspector, "title"));

    let log = recorder.0.borrow();
    let view = log.shown.last().unwrap();
    assert_eq!(view.analysis.tag, "H1");
    assert!(view.analysis.box_model.is_empty());
}
