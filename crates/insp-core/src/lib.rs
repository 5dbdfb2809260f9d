pub mod css;
pub mod emitter;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod parser;
pub mod style;

pub use css::{TrackList, TrackListError, format_px, format_track_list, parse_px, parse_track_list};
pub use emitter::{emit_inner, emit_outer};
pub use geometry::{Axis, Edge, Rect};
pub use id::{ElementId, ID_ATTRIBUTE, ID_PREFIX};
pub use layout::{LINE_HEIGHT, LayoutMap, Viewport, resolve_layout};
pub use model::*;
pub use parser::{parse_fragment, parse_fragment_into};
pub use style::{DisplayKind, computed_value};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
