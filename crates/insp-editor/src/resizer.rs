//! Generic box resizer.
//!
//! One overlay box tracks the selected element's page rect. Its four edge
//! handles change that side's padding, never the element's width or height.

use crate::drag::{
    DragSession, EditorKind, HANDLE_HALF, Handle, HandleRef, HandleSet, Lane, Lanes, SizeRule,
};
use crate::editor::ContextEditor;
use crate::host::Host;
use insp_core::css::format_px;
use insp_core::geometry::{Edge, Rect};

/// Square handle centred on the midpoint of `edge` of `bounds`.
fn edge_handle(bounds: Rect, edge: Edge) -> Handle {
    let (cx, cy) = match edge {
        Edge::Top => (bounds.x + bounds.width / 2.0, bounds.y),
        Edge::Right => (bounds.right(), bounds.y + bounds.height / 2.0),
        Edge::Bottom => (bounds.x + bounds.width / 2.0, bounds.bottom()),
        Edge::Left => (bounds.x, bounds.y + bounds.height / 2.0),
    };
    Handle {
        handle: HandleRef {
            owner: EditorKind::Resizer,
            axis: edge.axis(),
            index: edge.index(),
        },
        rect: Rect::new(
            cx - HANDLE_HALF,
            cy - HANDLE_HALF,
            HANDLE_HALF * 2.0,
            HANDLE_HALF * 2.0,
        ),
    }
}

pub struct BoxResizer<H: Host> {
    target: Option<H::Node>,
    handles: HandleSet,
    edge: Option<Edge>,
}

impl<H: Host> Default for BoxResizer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> BoxResizer<H> {
    pub fn new() -> Self {
        Self {
            target: None,
            handles: HandleSet::new(),
            edge: None,
        }
    }

    /// Move the box and its handles onto the target's current page rect.
    fn show(&mut self, host: &mut H) {
        self.handles.clear();
        let Some(target) = &self.target else {
            return;
        };
        let bounds = host.page_rect(target);
        self.handles
            .extend(Edge::ALL.into_iter().map(|e| edge_handle(bounds, e)));
        host.show_resizer_box(bounds);
        host.draw_handles(EditorKind::Resizer, &self.handles);
    }
}

impl<H: Host> ContextEditor<H> for BoxResizer<H> {
    fn kind(&self) -> EditorKind {
        EditorKind::Resizer
    }

    fn target(&self) -> Option<&H::Node> {
        self.target.as_ref()
    }

    fn activate(&mut self, host: &mut H, target: H::Node) {
        self.target = Some(target);
        self.show(host);
        host.set_resize_listener(EditorKind::Resizer, true);
    }

    fn deactivate(&mut self, host: &mut H) {
        if self.target.is_none() {
            return;
        }
        self.forget();
        host.hide_resizer_box();
        host.clear_handles(EditorKind::Resizer);
        host.set_resize_listener(EditorKind::Resizer, false);
    }

    fn forget(&mut self) {
        self.target = None;
        self.handles.clear();
        self.edge = None;
    }

    fn relayout(&mut self, host: &mut H) {
        self.show(host);
    }

    fn handles(&self) -> &[Handle] {
        &self.handles
    }

    fn begin_drag(&mut self, host: &mut H, handle: HandleRef, pointer: f32) -> Option<DragSession> {
        let target = self.target.as_ref()?;
        let edge = Edge::from_index(handle.index)?;
        let mut lanes = Lanes::new();
        lanes.push(Lane::single(host.padding(target, edge)));
        self.edge = Some(edge);
        Some(
            DragSession::new(handle, pointer, SizeRule::clamp_at(0.0), lanes)
                .with_sign(edge.growth_sign()),
        )
    }

    /// Writes padding only; the box catches up on release.
    fn drag_to(&mut self, host: &mut H, session: &DragSession, pointer: f32) -> bool {
        let (Some(target), Some(edge)) = (self.target.clone(), self.edge) else {
            return false;
        };
        let Some(lane) = session.propose(pointer).and_then(|l| l.first().copied()) else {
            return false;
        };
        log::trace!("resizer: {} padding {}", edge.name(), lane.lead);
        host.set_style(&target, edge.padding_property(), &format_px(lane.lead));
        true
    }

    fn end_drag(&mut self, host: &mut H) {
        self.edge = None;
        self.show(host);
    }
}
