//! Plain geometry shared by the layout resolver and the editors.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Shift by `(dx, dy)`, keeping the size.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// This box expressed relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Self {
        self.translate(-origin.x, -origin.y)
    }
}

/// Drag axis. `Horizontal` moves column boundaries, `Vertical` moves row
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Pick the coordinate this axis tracks.
    pub fn pick(self, x: f32, y: f32) -> f32 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }

    /// Cursor name shown while dragging along this axis.
    pub fn cursor(self) -> &'static str {
        match self {
            Axis::Horizontal => "col-resize",
            Axis::Vertical => "row-resize",
        }
    }
}

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    /// `+1` when moving the pointer along the axis grows this side's
    /// padding, `-1` when it shrinks it.
    pub fn growth_sign(self) -> f32 {
        match self {
            Edge::Right | Edge::Bottom => 1.0,
            Edge::Left | Edge::Top => -1.0,
        }
    }

    /// CSS longhand for this side's padding.
    pub fn padding_property(self) -> &'static str {
        match self {
            Edge::Top => "padding-top",
            Edge::Right => "padding-right",
            Edge::Bottom => "padding-bottom",
            Edge::Left => "padding-left",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }
}
