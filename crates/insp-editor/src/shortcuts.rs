//! Window-level keyboard shortcuts.
//!
//! `meta` is ⌘ on macOS; `ctrl` plays the same role elsewhere. The caller
//! decides whether a key press reaches this map at all: presses made while
//! typing into editable content or form fields never do.

/// What an inspector shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Map a `KeyboardEvent.key` plus modifiers to an action. Alt is
    /// accepted and ignored.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;
        match (cmd, shift, key.to_ascii_lowercase().as_str()) {
            (true, false, "z") => Some(ShortcutAction::Undo),
            (true, true, "z") | (true, false, "y") => Some(ShortcutAction::Redo),
            (false, _, "escape") => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShortcutAction::*;

    #[test]
    fn command_key_on_either_platform() {
        for (ctrl, meta) in [(true, false), (false, true)] {
            assert_eq!(ShortcutMap::resolve("z", ctrl, false, false, meta), Some(Undo));
            assert_eq!(ShortcutMap::resolve("Z", ctrl, true, false, meta), Some(Redo));
            assert_eq!(ShortcutMap::resolve("y", ctrl, false, false, meta), Some(Redo));
        }
    }

    #[test]
    fn bare_keys() {
        assert_eq!(ShortcutMap::resolve("Escape", false, false, false, false), Some(Deselect));
        assert_eq!(ShortcutMap::resolve("Escape", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("Y", true, true, false, false), None);
    }
}
