//! Live inline text editing.

use crate::host::Host;

/// Tags whose text can be edited in place.
pub const TEXT_TAGS: [&str; 15] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "a", "span", "strong", "em", "button", "td",
    "th",
];

/// Whether a double click on `node` starts a text edit.
pub fn is_text_editable<H: Host>(host: &H, node: &H::Node) -> bool {
    TEXT_TAGS.contains(&host.tag(node).as_str())
        && host.closest(node, |h, n| h.tag(n) == "pre").is_none()
}

/// What a key press does to an edit in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// End the edit and record it.
    Commit,
    /// End the edit without recording it. The typed text stays.
    Cancel,
    /// Ordinary typing.
    Continue,
}

pub fn classify_key(key: &str, shift: bool) -> EditKey {
    match key {
        "Enter" if !shift => EditKey::Commit,
        "Escape" => EditKey::Cancel,
        _ => EditKey::Continue,
    }
}

/// The element currently made editable.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit<N> {
    pub target: N,
}

impl<N: Clone> TextEdit<N> {
    pub fn start<H: Host<Node = N>>(host: &mut H, target: N) -> Self {
        host.set_editable(&target, true);
        log::debug!("text edit: started on <{}>", host.tag(&target));
        Self { target }
    }

    pub fn finish<H: Host<Node = N>>(self, host: &mut H) {
        host.set_editable(&self.target, false);
    }
}
