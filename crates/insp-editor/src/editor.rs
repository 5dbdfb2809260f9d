//! The interface every contextual editor implements.

use crate::drag::{DragSession, EditorKind, Handle, HandleRef};
use crate::host::{Host, Panel};

/// A contextual editor: owns at most one target element and the handle set
/// drawn for it. Only the coordinator activates or deactivates editors.
pub trait ContextEditor<H: Host> {
    fn kind(&self) -> EditorKind;

    /// The element under edit, when active.
    fn target(&self) -> Option<&H::Node>;

    fn activate(&mut self, host: &mut H, target: H::Node);

    /// Remove handles, hide the panel and unwire. No-op when inactive.
    fn deactivate(&mut self, host: &mut H);

    /// Drop all state without touching the host. Used after the content
    /// was replaced and every held node is stale.
    fn forget(&mut self);

    /// Recompute handle positions from current layout and redraw them.
    fn relayout(&mut self, host: &mut H);

    fn handles(&self) -> &[Handle];

    /// Open a drag on `handle` with the pointer at `pointer` along the
    /// handle's axis. `None` when the handle is unknown or unusable.
    fn begin_drag(&mut self, host: &mut H, handle: HandleRef, pointer: f32) -> Option<DragSession>;

    /// Apply one pointer frame. Returns whether anything was written.
    fn drag_to(&mut self, host: &mut H, session: &DragSession, pointer: f32) -> bool;

    fn end_drag(&mut self, host: &mut H);

    fn is_active(&self) -> bool {
        self.target().is_some()
    }
}

/// Draw an editor's handles and wire its panel and resize listener.
pub(crate) fn show_chrome<H: Host>(host: &mut H, kind: EditorKind, handles: &[Handle]) {
    host.draw_handles(kind, handles);
    if let Some(panel) = Panel::for_editor(kind) {
        host.set_panel_visible(panel, true);
    }
    host.set_resize_listener(kind, true);
}

/// Undo `show_chrome`.
pub(crate) fn hide_chrome<H: Host>(host: &mut H, kind: EditorKind) {
    host.clear_handles(kind);
    if let Some(panel) = Panel::for_editor(kind) {
        host.set_panel_visible(panel, false);
    }
    host.set_resize_listener(kind, false);
}
