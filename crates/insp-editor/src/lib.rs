pub mod analysis;
pub mod drag;
pub mod editor;
pub mod flex;
pub mod grid;
pub mod headless;
pub mod history;
pub mod host;
pub mod inspector;
pub mod resizer;
pub mod role;
pub mod shortcuts;
pub mod table;
pub mod text_edit;
pub mod tree;

pub use analysis::{Analysis, Analyzer, ElementView, PropertiesPanel, StyleAnalyzer};
pub use drag::{DragSession, EditorKind, Handle, HandleRef, SizeRule};
pub use editor::ContextEditor;
pub use headless::{ChromeState, HeadlessHost};
pub use history::History;
pub use host::{Host, Panel, SELECTED_CLASS};
pub use inspector::{Collaborators, Editors, Inspector, Selection};
pub use role::LayoutRole;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tree::{IdAllocator, TreeNode, TreeView};
