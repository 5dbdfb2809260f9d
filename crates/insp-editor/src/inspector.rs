//! The inspector coordinator.
//!
//! Owns the host, the one current selection, the four contextual editors
//! and the optional collaborators. Every input event the page receives is
//! fed in through a method here; nothing else activates or deactivates an
//! editor, so at most one editor holds handles at any time.
//!
//! Selection pipeline (`select`):
//! 1. deselect whatever was selected (idempotent),
//! 2. mark the element and make sure it has an identifier,
//! 3. classify its layout role and activate at most one editor,
//! 4. highlight it in the tree view and show it in the properties panel.
//!
//! After a track editor drag the element selected at pointer-down is
//! looked up again by identifier and pushed back through the pipeline.
//! After undo / redo every node handle is stale, so all derived state is
//! dropped and rebuilt from the restored content.

use crate::analysis::{Analyzer, ElementView, PropertiesPanel, StyleAnalyzer};
use crate::drag::{DragSession, EditorKind, HandleRef, handle_at};
use crate::editor::ContextEditor;
use crate::flex::FlexEditor;
use crate::grid::GridEditor;
use crate::history::History;
use crate::host::{Host, Panel, SELECTED_CLASS};
use crate::resizer::BoxResizer;
use crate::role::{LayoutRole, classify};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::table::TableEditor;
use crate::text_edit::{EditKey, TextEdit, classify_key, is_text_editable};
use crate::tree::{IdAllocator, TreeView, build_tree};
use insp_core::id::ElementId;

/// The inspected element.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<N> {
    pub element: N,
    pub id: ElementId,
    /// Editor activated for it; `None` for children of grid / flex
    /// containers.
    pub editor: Option<EditorKind>,
}

// ─── Editors ─────────────────────────────────────────────────────────────

pub struct Editors<H: Host> {
    pub table: TableEditor<H>,
    pub grid: GridEditor<H>,
    pub flex: FlexEditor<H>,
    pub resizer: BoxResizer<H>,
}

impl<H: Host> Default for Editors<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Editors<H> {
    pub fn new() -> Self {
        Self {
            table: TableEditor::new(),
            grid: GridEditor::new(),
            flex: FlexEditor::new(),
            resizer: BoxResizer::new(),
        }
    }

    pub fn get(&self, kind: EditorKind) -> &dyn ContextEditor<H> {
        match kind {
            EditorKind::Table => &self.table,
            EditorKind::Grid => &self.grid,
            EditorKind::Flex => &self.flex,
            EditorKind::Resizer => &self.resizer,
        }
    }

    pub fn get_mut(&mut self, kind: EditorKind) -> &mut dyn ContextEditor<H> {
        match kind {
            EditorKind::Table => &mut self.table,
            EditorKind::Grid => &mut self.grid,
            EditorKind::Flex => &mut self.flex,
            EditorKind::Resizer => &mut self.resizer,
        }
    }

    /// Editors currently holding a target.
    pub fn active(&self) -> Vec<EditorKind> {
        EditorKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_active())
            .collect()
    }
}

// ─── Collaborators ───────────────────────────────────────────────────────

/// Optional dependencies, fixed at construction. A missing one turns the
/// operations that need it into no-ops.
pub struct Collaborators<H: Host> {
    pub history: Option<History>,
    pub tree_view: Option<Box<dyn TreeView>>,
    pub properties: Option<Box<dyn PropertiesPanel>>,
    /// Replaces `StyleAnalyzer` when set.
    pub analyzer: Option<Box<dyn Analyzer<H>>>,
}

impl<H: Host> Default for Collaborators<H> {
    fn default() -> Self {
        Self {
            history: None,
            tree_view: None,
            properties: None,
            analyzer: None,
        }
    }
}

impl<H: Host> Collaborators<H> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_tree_view(mut self, view: impl TreeView + 'static) -> Self {
        self.tree_view = Some(Box::new(view));
        self
    }

    #[must_use]
    pub fn with_properties(mut self, panel: impl PropertiesPanel + 'static) -> Self {
        self.properties = Some(Box::new(panel));
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: impl Analyzer<H> + 'static) -> Self {
        self.analyzer = Some(Box::new(analyzer));
        self
    }
}

// ─── Inspector ───────────────────────────────────────────────────────────

pub struct Inspector<H: Host> {
    host: H,
    active: bool,
    selection: Option<Selection<H::Node>>,
    editors: Editors<H>,
    drag: Option<DragSession>,
    text_edit: Option<TextEdit<H::Node>>,
    ids: IdAllocator,
    history: Option<History>,
    tree_view: Option<Box<dyn TreeView>>,
    properties: Option<Box<dyn PropertiesPanel>>,
    analyzer: Box<dyn Analyzer<H>>,
}

/// Whether `node` lies strictly inside the content root.
fn in_content<H: Host>(host: &H, node: &H::Node) -> bool {
    let root = host.content_root();
    let mut current = host.parent(node);
    while let Some(n) = current {
        if n == root {
            return true;
        }
        current = host.parent(&n);
    }
    false
}

impl<H: Host> Inspector<H> {
    /// Stamp identifiers, build the tree, record the initial state and
    /// start in active mode.
    pub fn new(host: H, collaborators: Collaborators<H>) -> Self {
        let Collaborators {
            history,
            tree_view,
            properties,
            analyzer,
        } = collaborators;
        let mut inspector = Self {
            host,
            active: false,
            selection: None,
            editors: Editors::new(),
            drag: None,
            text_edit: None,
            ids: IdAllocator::new(),
            history,
            tree_view,
            properties,
            analyzer: analyzer.unwrap_or_else(|| Box::new(StyleAnalyzer)),
        };
        inspector.refresh_tree();
        inspector.commit();
        inspector.set_active(true);
        inspector
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access. Mutating content through it bypasses history.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection(&self) -> Option<&Selection<H::Node>> {
        self.selection.as_ref()
    }

    pub fn editors(&self) -> &Editors<H> {
        &self.editors
    }

    pub fn active_editors(&self) -> Vec<EditorKind> {
        self.editors.active()
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Element being edited as text, if any.
    pub fn editing(&self) -> Option<&H::Node> {
        self.text_edit.as_ref().map(|e| &e.target)
    }

    // ─── Mode ────────────────────────────────────────────────────────────

    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.host.set_click_capture(active);
        if !active {
            self.finish_text_edit(true);
            self.deselect();
        }
        log::debug!("inspector: {}", if active { "active" } else { "inactive" });
    }

    /// Flip the mode; returns the new one.
    pub fn toggle(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Feed a captured click. Returns whether the inspector consumed it;
    /// clicks on chrome, outside the content, or inside the element being
    /// edited as text pass through.
    pub fn click(&mut self, target: H::Node) -> bool {
        if !self.active || self.drag.is_some() {
            return false;
        }
        if self.host.is_chrome(&target) || !in_content(&self.host, &target) {
            return false;
        }
        if self.editing() == Some(&target) {
            return false;
        }
        self.finish_text_edit(true);
        self.select(target);
        true
    }

    /// Run the selection pipeline on `target`.
    pub fn select(&mut self, target: H::Node) {
        self.deselect();

        self.host.add_class(&target, SELECTED_CLASS);
        let id = self.ids.assign(&mut self.host, &target);
        let role = classify(&self.host, &target);
        let editor = role.editor();
        match role {
            LayoutRole::Table(table) => self.editors.table.activate(&mut self.host, table),
            LayoutRole::Grid => self.editors.grid.activate(&mut self.host, target.clone()),
            LayoutRole::Flex => self.editors.flex.activate(&mut self.host, target.clone()),
            LayoutRole::Generic => self.editors.resizer.activate(&mut self.host, target.clone()),
            LayoutRole::Track => {}
        }
        log::debug!(
            "inspector: selected <{}> {id} ({})",
            self.host.tag(&target),
            editor.map_or("none", EditorKind::name)
        );

        self.selection = Some(Selection {
            element: target,
            id,
            editor,
        });
        if let Some(view) = self.tree_view.as_mut() {
            view.highlight(Some(id));
        }
        self.show_properties();
    }

    /// Select the element stamped with `id`, e.g. from a tree view click.
    pub fn select_by_id(&mut self, id: ElementId) -> bool {
        if !self.active {
            return false;
        }
        match self.host.find_by_id(id) {
            Some(node) => {
                self.select(node);
                true
            }
            None => {
                log::warn!("inspector: no element with id {id}");
                false
            }
        }
    }

    /// Clear the selection, every editor and every contextual panel.
    /// Safe to call with nothing selected. A drag in progress is ended
    /// and recorded first.
    pub fn deselect(&mut self) {
        self.settle_drag();
        if let Some(selection) = self.selection.take() {
            self.host.remove_class(&selection.element, SELECTED_CLASS);
            log::debug!("inspector: deselected {}", selection.id);
        }
        for kind in EditorKind::ALL {
            self.editors.get_mut(kind).deactivate(&mut self.host);
        }
        for panel in Panel::ALL {
            self.host.set_panel_visible(panel, false);
        }
        if let Some(view) = self.tree_view.as_mut() {
            view.highlight(None);
        }
        if let Some(panel) = self.properties.as_mut() {
            panel.hide();
        }
    }

    fn show_properties(&mut self) {
        let (Some(selection), Some(panel)) = (&self.selection, self.properties.as_mut()) else {
            return;
        };
        let view = ElementView {
            id: Some(selection.id),
            markup: self.host.outer_markup(&selection.element),
            analysis: self.analyzer.analyze(&self.host, &selection.element),
        };
        panel.show(&view);
    }

    // ─── Drags ───────────────────────────────────────────────────────────

    /// Start dragging `handle` with the pointer at page position `(x, y)`.
    pub fn pointer_down(&mut self, handle: HandleRef, x: f32, y: f32) -> bool {
        if !self.active || self.drag.is_some() {
            return false;
        }
        let editor = self.editors.get_mut(handle.owner);
        if !editor.handles().iter().any(|h| h.handle == handle) {
            return false;
        }
        let Some(mut session) = editor.begin_drag(&mut self.host, handle, handle.axis.pick(x, y))
        else {
            return false;
        };
        if handle.owner.reselects_after_drag() {
            session.reselect = self.selection.as_ref().map(|s| s.id);
        }
        self.host.set_pointer_capture(true);
        self.host.set_drag_cursor(Some(handle.axis.cursor()));
        log::debug!("inspector: drag start {:?}", handle);
        self.drag = Some(session);
        true
    }

    /// Hit-test the active editors' handles and start a drag on a hit.
    pub fn pointer_down_at(&mut self, x: f32, y: f32) -> bool {
        let handles: Vec<_> = self
            .editors
            .active()
            .into_iter()
            .flat_map(|k| self.editors.get(k).handles().to_vec())
            .collect();
        match handle_at(&handles, x, y) {
            Some(handle) => self.pointer_down(handle, x, y),
            None => false,
        }
    }

    /// Apply one pointer frame. Returns whether styles were written.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(session) = &self.drag else {
            return false;
        };
        let pointer = session.handle.axis.pick(x, y);
        self.editors
            .get_mut(session.handle.owner)
            .drag_to(&mut self.host, session, pointer)
    }

    /// Release the drag: keep the last accepted frame, record it, then
    /// re-run the selection pipeline (track editors) or refresh the
    /// properties panel (box resizer).
    pub fn pointer_up(&mut self) -> bool {
        let Some(session) = self.settle_drag() else {
            return false;
        };
        if session.handle.owner.reselects_after_drag() {
            if let Some(id) = session.reselect {
                self.select_by_id(id);
            }
        } else {
            self.show_properties();
        }
        true
    }

    /// End the drag in progress. Its last accepted frame stays and is
    /// recorded.
    fn settle_drag(&mut self) -> Option<DragSession> {
        let session = self.drag.take()?;
        self.host.set_pointer_capture(false);
        self.host.set_drag_cursor(None);
        self.editors
            .get_mut(session.handle.owner)
            .end_drag(&mut self.host);
        self.commit();
        log::debug!("inspector: drag end {:?}", session.handle);
        Some(session)
    }

    /// Recompute handle positions after the viewport changed.
    pub fn window_resized(&mut self) {
        for kind in self.editors.active() {
            self.editors.get_mut(kind).relayout(&mut self.host);
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Record the current content. The selection marker is lifted for the
    /// capture so snapshots never carry it.
    pub fn commit(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        let marked = self.selection.as_ref().map(|s| s.element.clone());
        if let Some(node) = &marked {
            self.host.remove_class(node, SELECTED_CLASS);
        }
        let pushed = history.commit(&self.host);
        if let Some(node) = &marked {
            self.host.add_class(node, SELECTED_CLASS);
        }
        pushed
    }

    pub fn undo(&mut self) -> bool {
        self.settle_drag();
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        if !history.undo(&mut self.host) {
            return false;
        }
        self.reinitialize();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.settle_drag();
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        if !history.redo(&mut self.host) {
            return false;
        }
        self.reinitialize();
        true
    }

    /// Rebuild everything derived from the content after it was replaced.
    /// Held node handles are stale, so editors are told to forget rather
    /// than to deactivate.
    fn reinitialize(&mut self) {
        self.drag = None;
        self.text_edit = None;
        self.selection = None;
        for kind in EditorKind::ALL {
            self.editors.get_mut(kind).forget();
            self.host.clear_handles(kind);
            self.host.set_resize_listener(kind, false);
        }
        self.host.hide_resizer_box();
        for panel in Panel::ALL {
            self.host.set_panel_visible(panel, false);
        }
        self.host.set_pointer_capture(false);
        self.host.set_drag_cursor(None);

        let root = self.host.content_root();
        for node in self.host.descendants(&root) {
            if self.host.has_class(&node, SELECTED_CLASS) {
                self.host.remove_class(&node, SELECTED_CLASS);
            }
        }
        self.refresh_tree();
        if let Some(view) = self.tree_view.as_mut() {
            view.highlight(None);
        }
        if let Some(panel) = self.properties.as_mut() {
            panel.hide();
        }
        log::debug!("inspector: reinitialized after restore");
    }

    /// Stamp identifiers on new elements and rebuild the tree view.
    fn refresh_tree(&mut self) {
        self.ids.stamp_all(&mut self.host);
        if let Some(view) = self.tree_view.as_mut() {
            view.rebuild(&build_tree(&self.host));
        }
    }

    // ─── Table structure ─────────────────────────────────────────────────

    pub fn add_table_row(&mut self) -> bool {
        if !self.editors.table.add_row(&mut self.host) {
            return false;
        }
        self.refresh_tree();
        self.commit();
        true
    }

    pub fn add_table_column(&mut self) -> bool {
        if !self.editors.table.add_column(&mut self.host) {
            return false;
        }
        self.refresh_tree();
        self.commit();
        true
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// Start editing `target` as text. Clears the selection first.
    pub fn double_click(&mut self, target: H::Node) -> bool {
        if !self.active
            || self.host.is_chrome(&target)
            || !in_content(&self.host, &target)
            || !is_text_editable(&self.host, &target)
        {
            return false;
        }
        self.finish_text_edit(true);
        self.deselect();
        self.text_edit = Some(TextEdit::start(&mut self.host, target));
        true
    }

    /// Key press inside the edited element. Returns whether it ended the
    /// edit.
    pub fn edit_key(&mut self, key: &str, shift: bool) -> bool {
        if self.text_edit.is_none() {
            return false;
        }
        match classify_key(key, shift) {
            EditKey::Commit => self.finish_text_edit(true),
            EditKey::Cancel => self.finish_text_edit(false),
            EditKey::Continue => false,
        }
    }

    /// The edited element lost focus.
    pub fn edit_blur(&mut self) -> bool {
        self.finish_text_edit(true)
    }

    fn finish_text_edit(&mut self, record: bool) -> bool {
        let Some(edit) = self.text_edit.take() else {
            return false;
        };
        edit.finish(&mut self.host);
        if record {
            self.commit();
        }
        log::debug!("text edit: finished (recorded: {record})");
        true
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Window-level key press. `typing` is set when an editable element or
    /// form field has focus; shortcuts are ignored then. Returns whether
    /// the key was handled.
    pub fn key_down(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        typing: bool,
    ) -> bool {
        if self.text_edit.is_some() {
            return self.edit_key(key, shift);
        }
        // Keys never cancel a drag; only the release ends it.
        if typing || self.drag.is_some() {
            return false;
        }
        match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(ShortcutAction::Undo) => self.undo(),
            Some(ShortcutAction::Redo) => self.redo(),
            Some(ShortcutAction::Deselect) if self.selection.is_some() => {
                self.deselect();
                true
            }
            _ => false,
        }
    }
}
