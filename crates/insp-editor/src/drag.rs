//! Resize handles and the drag session shared by every contextual editor.
//!
//! All seven drag flavours (table columns / rows, grid columns / rows,
//! flex columns / rows, box edges) run through one `DragSession`: a
//! boundary identity, an axis, the pre-drag sizes of the one or two
//! tracks next to the boundary, and a `SizeRule` deciding what a proposed
//! size below the minimum does to the frame.

use insp_core::geometry::{Axis, Rect};
use insp_core::id::ElementId;
use serde::Serialize;
use smallvec::SmallVec;

/// Half the thickness of a handle bar; handles are centred on boundaries.
pub const HANDLE_HALF: f32 = 4.0;

/// The four mutually exclusive contextual editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Table,
    Grid,
    Flex,
    Resizer,
}

impl EditorKind {
    pub const ALL: [EditorKind; 4] = [
        EditorKind::Table,
        EditorKind::Grid,
        EditorKind::Flex,
        EditorKind::Resizer,
    ];

    /// Whether releasing a drag re-runs the selection pipeline.
    /// The box resizer keeps its element selected throughout.
    pub fn reselects_after_drag(self) -> bool {
        !matches!(self, EditorKind::Resizer)
    }

    pub fn name(self) -> &'static str {
        match self {
            EditorKind::Table => "table",
            EditorKind::Grid => "grid",
            EditorKind::Flex => "flex",
            EditorKind::Resizer => "resizer",
        }
    }
}

/// Identity of one handle: who owns it, which way it drags, and which
/// boundary (or, for the box resizer, which `Edge::index`) it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HandleRef {
    pub owner: EditorKind,
    pub axis: Axis,
    pub index: usize,
}

/// A handle as drawn: its identity plus its page-coordinate box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Handle {
    #[serde(flatten)]
    pub handle: HandleRef,
    pub rect: Rect,
}

impl Handle {
    /// A bar spanning `container` across `axis`, centred on `offset`
    /// (already shifted by `-HANDLE_HALF`) from the container's start.
    pub fn bar(owner: EditorKind, axis: Axis, index: usize, offset: f32, container: Rect) -> Self {
        let rect = match axis {
            Axis::Horizontal => Rect::new(
                container.x + offset,
                container.y,
                HANDLE_HALF * 2.0,
                container.height,
            ),
            Axis::Vertical => Rect::new(
                container.x,
                container.y + offset,
                container.width,
                HANDLE_HALF * 2.0,
            ),
        };
        Self {
            handle: HandleRef { owner, axis, index },
            rect,
        }
    }
}

/// Handles owned by one editor, in creation order.
pub type HandleSet = Vec<Handle>;

/// Hit-test a handle set; later handles win on overlap.
pub fn handle_at(handles: &[Handle], x: f32, y: f32) -> Option<HandleRef> {
    handles
        .iter()
        .rev()
        .find(|h| h.rect.contains(x, y))
        .map(|h| h.handle)
}

/// Offsets of the boundaries after each of `sizes[..count]`, minus
/// `HANDLE_HALF`. `gap` is the space between consecutive tracks; the
/// handle is centred in it.
pub fn boundary_offsets(sizes: &[f32], count: usize, gap: f32) -> Vec<f32> {
    let mut acc = 0.0;
    sizes
        .iter()
        .take(count)
        .map(|s| {
            acc += s;
            let offset = acc + gap / 2.0 - HANDLE_HALF;
            acc += gap;
            offset
        })
        .collect()
}

/// What happens when a proposed size falls below the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Underflow {
    /// Drop the whole frame; the last valid frame stays applied.
    Reject,
    /// Pin the size at the floor.
    Clamp,
}

/// Minimum-size policy of one drag flavour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRule {
    /// Smallest accepted size (inclusive).
    pub floor: f32,
    pub underflow: Underflow,
}

impl SizeRule {
    pub const fn reject_below(floor: f32) -> Self {
        Self {
            floor,
            underflow: Underflow::Reject,
        }
    }

    pub const fn clamp_at(floor: f32) -> Self {
        Self {
            floor,
            underflow: Underflow::Clamp,
        }
    }
}

/// The sizes on either side of one boundary, for one row of cells (tables)
/// or for the container itself (everything else). `trail` is `None` for a
/// one-sided boundary such as a grid's bottom edge or a padding edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub lead: f32,
    pub trail: Option<f32>,
}

impl Lane {
    pub const fn pair(lead: f32, trail: f32) -> Self {
        Self {
            lead,
            trail: Some(trail),
        }
    }

    pub const fn single(lead: f32) -> Self {
        Self { lead, trail: None }
    }
}

pub type Lanes = SmallVec<[Lane; 8]>;

/// Ephemeral state of the one drag in progress.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub handle: HandleRef,
    /// Pointer coordinate along `handle.axis` at pointer-down.
    pub origin: f32,
    /// `+1` when pointer motion along the axis grows `lead`, `-1` when it
    /// shrinks it.
    pub sign: f32,
    pub rule: SizeRule,
    /// Pre-drag sizes.
    pub start: Lanes,
    /// Element to re-select once the drag is released.
    pub reselect: Option<ElementId>,
}

impl DragSession {
    pub fn new(handle: HandleRef, origin: f32, rule: SizeRule, start: Lanes) -> Self {
        Self {
            handle,
            origin,
            sign: 1.0,
            rule,
            start,
            reselect: None,
        }
    }

    #[must_use]
    pub fn with_sign(mut self, sign: f32) -> Self {
        self.sign = sign;
        self
    }

    /// Sizes for every lane at pointer coordinate `pointer`, or `None`
    /// when the frame is rejected. Two-sided lanes move by equal and
    /// opposite amounts; all lanes are accepted or none are.
    pub fn propose(&self, pointer: f32) -> Option<Lanes> {
        let delta = (pointer - self.origin) * self.sign;
        let mut out = Lanes::new();
        for lane in &self.start {
            let lead = self.fit(lane.lead + delta)?;
            let trail = match lane.trail {
                Some(t) => Some(self.fit(t - delta)?),
                None => None,
            };
            out.push(Lane { lead, trail });
        }
        Some(out)
    }

    fn fit(&self, size: f32) -> Option<f32> {
        if size >= self.rule.floor {
            return Some(size);
        }
        match self.rule.underflow {
            Underflow::Reject => None,
            Underflow::Clamp => Some(self.rule.floor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn session(rule: SizeRule, start: Lanes) -> DragSession {
        let handle = HandleRef {
            owner: EditorKind::Table,
            axis: Axis::Horizontal,
            index: 0,
        };
        DragSession::new(handle, 100.0, rule, start)
    }

    #[test]
    fn two_sided_lanes_move_oppositely() {
        let s = session(
            SizeRule::reject_below(40.0),
            smallvec![Lane::pair(100.0, 80.0), Lane::pair(100.0, 80.0)],
        );
        let out = s.propose(130.0).unwrap();
        assert_eq!(out[0], Lane::pair(130.0, 50.0));
        assert_eq!(out[1], Lane::pair(130.0, 50.0));
    }

    #[test]
    fn one_lane_below_floor_rejects_all() {
        let s = session(
            SizeRule::reject_below(40.0),
            smallvec![Lane::pair(100.0, 200.0), Lane::pair(100.0, 60.0)],
        );
        assert!(s.propose(125.0).is_none());
        // Exactly at the floor is accepted.
        assert!(s.propose(120.0).is_some());
    }

    #[test]
    fn clamp_pins_at_floor_with_sign() {
        let s = session(SizeRule::clamp_at(0.0), smallvec![Lane::single(10.0)]).with_sign(-1.0);
        assert_eq!(s.propose(90.0).unwrap()[0], Lane::single(20.0));
        assert_eq!(s.propose(500.0).unwrap()[0], Lane::single(0.0));
    }

    #[test]
    fn offsets_center_handles_in_gaps() {
        assert_eq!(boundary_offsets(&[100.0, 200.0, 50.0], 2, 10.0), vec![101.0, 311.0]);
        assert_eq!(boundary_offsets(&[30.0, 30.0], 2, 0.0), vec![26.0, 56.0]);
    }

    #[test]
    fn hit_test_finds_bar() {
        let container = Rect::new(10.0, 10.0, 300.0, 100.0);
        let handles = vec![
            Handle::bar(EditorKind::Grid, Axis::Horizontal, 0, 96.0, container),
            Handle::bar(EditorKind::Grid, Axis::Vertical, 0, 46.0, container),
        ];
        assert_eq!(handle_at(&handles, 110.0, 20.0).map(|h| h.axis), Some(Axis::Horizontal));
        assert_eq!(handle_at(&handles, 200.0, 60.0).map(|h| h.axis), Some(Axis::Vertical));
        assert_eq!(handle_at(&handles, 200.0, 20.0), None);
    }
}
