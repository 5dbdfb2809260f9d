//! Flex editor.
//!
//! Flex tracks cannot be queried the way grid tracks can, so handles sit
//! on the rendered right edge of every direct child but the last. Column
//! drags rewrite the two neighbouring children as percentages of the
//! container's width. When the container is itself one row of a column
//! flex stack, a second handle set between the stack's rows resizes
//! neighbouring rows in pixels.

use crate::drag::{
    DragSession, EditorKind, HANDLE_HALF, Handle, HandleRef, HandleSet, Lane, Lanes, SizeRule,
};
use crate::editor::{ContextEditor, hide_chrome, show_chrome};
use crate::host::Host;
use crate::role::is_column_flex;
use insp_core::css::{format_percent, format_px};
use insp_core::geometry::Axis;

pub const MIN_COLUMN_WIDTH: f32 = 50.0;
pub const MIN_ROW_HEIGHT: f32 = 40.0;

pub struct FlexEditor<H: Host> {
    container: Option<H::Node>,
    handles: HandleSet,
    /// The two siblings beside the boundary being dragged.
    dragging: Option<(H::Node, H::Node)>,
}

impl<H: Host> Default for FlexEditor<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> FlexEditor<H> {
    pub fn new() -> Self {
        Self {
            container: None,
            handles: HandleSet::new(),
            dragging: None,
        }
    }

    /// The column stack `container` is a row of, if any.
    fn stack(host: &H, container: &H::Node) -> Option<H::Node> {
        host.parent(container).filter(|p| is_column_flex(host, p))
    }

    /// Siblings on either side of boundary `index` along `axis`.
    fn pair(&self, host: &H, axis: Axis, index: usize) -> Option<(H::Node, H::Node)> {
        let container = self.container.as_ref()?;
        let owner = match axis {
            Axis::Horizontal => container.clone(),
            Axis::Vertical => Self::stack(host, container)?,
        };
        let children = host.children(&owner);
        Some((children.get(index)?.clone(), children.get(index + 1)?.clone()))
    }

    fn build_handles(&mut self, host: &H) {
        self.handles.clear();
        let Some(container) = &self.container else {
            return;
        };

        let rect = host.page_rect(container);
        let children = host.children(container);
        for (i, child) in children.iter().take(children.len().saturating_sub(1)).enumerate() {
            let offset = host.page_rect(child).right() - rect.x - HANDLE_HALF;
            self.handles
                .push(Handle::bar(EditorKind::Flex, Axis::Horizontal, i, offset, rect));
        }

        if let Some(stack) = Self::stack(host, container) {
            let stack_rect = host.page_rect(&stack);
            let rows = host.children(&stack);
            for (i, row) in rows.iter().take(rows.len().saturating_sub(1)).enumerate() {
                let offset = host.page_rect(row).bottom() - stack_rect.y - HANDLE_HALF;
                self.handles
                    .push(Handle::bar(EditorKind::Flex, Axis::Vertical, i, offset, stack_rect));
            }
        }
    }

    fn redraw(&mut self, host: &mut H) {
        self.build_handles(host);
        host.draw_handles(EditorKind::Flex, &self.handles);
    }
}

impl<H: Host> ContextEditor<H> for FlexEditor<H> {
    fn kind(&self) -> EditorKind {
        EditorKind::Flex
    }

    fn target(&self) -> Option<&H::Node> {
        self.container.as_ref()
    }

    fn activate(&mut self, host: &mut H, target: H::Node) {
        self.container = Some(target);
        self.build_handles(host);
        show_chrome(host, EditorKind::Flex, &self.handles);
    }

    fn deactivate(&mut self, host: &mut H) {
        if self.container.is_none() {
            return;
        }
        self.forget();
        hide_chrome(host, EditorKind::Flex);
    }

    fn forget(&mut self) {
        self.container = None;
        self.handles.clear();
        self.dragging = None;
    }

    fn relayout(&mut self, host: &mut H) {
        self.redraw(host);
    }

    fn handles(&self) -> &[Handle] {
        &self.handles
    }

    fn begin_drag(&mut self, host: &mut H, handle: HandleRef, pointer: f32) -> Option<DragSession> {
        let (lead, trail) = self.pair(host, handle.axis, handle.index)?;
        let (lane, rule) = match handle.axis {
            Axis::Horizontal => (
                Lane::pair(host.offset_width(&lead), host.offset_width(&trail)),
                SizeRule::reject_below(MIN_COLUMN_WIDTH),
            ),
            Axis::Vertical => (
                Lane::pair(host.offset_height(&lead), host.offset_height(&trail)),
                SizeRule::reject_below(MIN_ROW_HEIGHT),
            ),
        };
        self.dragging = Some((lead, trail));
        let mut lanes = Lanes::new();
        lanes.push(lane);
        Some(DragSession::new(handle, pointer, rule, lanes))
    }

    fn drag_to(&mut self, host: &mut H, session: &DragSession, pointer: f32) -> bool {
        let Some((lead, trail)) = self.dragging.clone() else {
            return false;
        };
        let Some(lane) = session.propose(pointer).and_then(|l| l.first().copied()) else {
            log::trace!("flex: frame rejected at {pointer}");
            return false;
        };
        let trail_size = lane.trail.unwrap_or_default();
        match session.handle.axis {
            Axis::Horizontal => {
                let Some(container) = self.container.clone() else {
                    return false;
                };
                let total = host.offset_width(&container);
                if total <= 0.0 {
                    return false;
                }
                host.set_style(&lead, "width", &format_percent(lane.lead * 100.0 / total));
                host.set_style(&trail, "width", &format_percent(trail_size * 100.0 / total));
            }
            Axis::Vertical => {
                host.set_style(&lead, "height", &format_px(lane.lead));
                host.set_style(&trail, "height", &format_px(trail_size));
            }
        }
        self.redraw(host);
        true
    }

    fn end_drag(&mut self, host: &mut H) {
        self.dragging = None;
        self.redraw(host);
    }
}
