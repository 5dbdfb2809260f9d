//! Shared fixtures: the demo page, a headless inspector over it, and
//! collaborators that record what they were told.

#![allow(dead_code)]

use insp_core::Axis;
use insp_core::id::ElementId;
use insp_core::NodeIndex;
use insp_editor::analysis::{ElementView, PropertiesPanel};
use insp_editor::drag::{EditorKind, HandleRef};
use insp_editor::tree::{TreeNode, TreeView};
use insp_editor::{Collaborators, HeadlessHost, History, Host, Inspector};
use std::cell::RefCell;
use std::rc::Rc;

pub const PAGE: &str = include_str!("../fixtures/page.html");

#[derive(Debug, Default)]
pub struct Log {
    pub rebuilds: usize,
    pub tree_sizes: Vec<usize>,
    pub highlights: Vec<Option<ElementId>>,
    pub shown: Vec<ElementView>,
    pub hides: usize,
}

#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Log>>);

impl TreeView for Recorder {
    fn rebuild(&mut self, tree: &[TreeNode]) {
        let mut log = self.0.borrow_mut();
        log.rebuilds += 1;
        log.tree_sizes.push(tree.len());
    }

    fn highlight(&mut self, id: Option<ElementId>) {
        self.0.borrow_mut().highlights.push(id);
    }
}

impl PropertiesPanel for Recorder {
    fn show(&mut self, view: &ElementView) {
        self.0.borrow_mut().shown.push(view.clone());
    }

    fn hide(&mut self) {
        self.0.borrow_mut().hides += 1;
    }
}

/// Inspector over the demo page with history, tree view and properties
/// panel attached, plus the shared log of collaborator calls.
pub fn inspector() -> (Inspector<HeadlessHost>, Recorder) {
    let host = HeadlessHost::new(PAGE).unwrap();
    let recorder = Recorder::default();
    let collaborators = Collaborators::new()
        .with_history(History::new())
        .with_tree_view(recorder.clone())
        .with_properties(recorder.clone());
    (Inspector::new(host, collaborators), recorder)
}

pub fn node(inspector: &Inspector<HeadlessHost>, dom_id: &str) -> NodeIndex {
    inspector.host().by_dom_id(dom_id).unwrap()
}

pub fn style(inspector: &Inspector<HeadlessHost>, dom_id: &str, property: &str) -> Option<String> {
    inspector
        .host()
        .inline_style(node(inspector, dom_id), property)
}

/// The `index`-th handle of `owner`, in creation order.
pub fn handle(inspector: &Inspector<HeadlessHost>, owner: EditorKind, index: usize) -> HandleRef {
    inspector.editors().get(owner).handles()[index].handle
}

/// Press `handle` at its centre, move through each offset in `deltas`
/// along its axis, then release.
pub fn drag(inspector: &mut Inspector<HeadlessHost>, handle: HandleRef, deltas: &[f32]) {
    let rect = inspector
        .editors()
        .get(handle.owner)
        .handles()
        .iter()
        .find(|h| h.handle == handle)
        .unwrap()
        .rect;
    let (x, y) = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
    assert!(inspector.pointer_down(handle, x, y));
    for delta in deltas {
        match handle.axis {
            Axis::Horizontal => inspector.pointer_move(x + delta, y),
            Axis::Vertical => inspector.pointer_move(x, y + delta),
        };
    }
    assert!(inspector.pointer_up());
}

pub fn id_of(inspector: &Inspector<HeadlessHost>, dom_id: &str) -> ElementId {
    let host = inspector.host();
    host.element_id(&node(inspector, dom_id)).unwrap()
}
