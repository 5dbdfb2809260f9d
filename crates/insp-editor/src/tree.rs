//! Structural mirror of the watched content and the identifiers that tie
//! the two together.

use crate::host::Host;
use insp_core::id::{ElementId, ID_ATTRIBUTE};
use serde::Serialize;

/// Tags that never appear in the tree and never receive an identifier.
pub const IGNORED_TAGS: [&str; 5] = ["script", "style", "link", "meta", "title"];

/// Hands out `inspector-id-N` identifiers. Numbers only grow: after a
/// restore the allocator resumes above the highest number already in the
/// content, so an identifier is never given to two different elements.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip past an identifier already present in the content.
    pub fn observe(&mut self, id: ElementId) {
        if let Some(n) = id.sequence() {
            self.next = self.next.max(n + 1);
        }
    }

    /// Identifier of `node`, stamping a fresh one when it has none.
    pub fn assign<H: Host>(&mut self, host: &mut H, node: &H::Node) -> ElementId {
        if let Some(id) = host.element_id(node) {
            self.observe(id);
            return id;
        }
        let id = ElementId::numbered(self.next);
        self.next += 1;
        host.set_attribute(node, ID_ATTRIBUTE, id.as_str());
        id
    }

    /// Stamp every visible content element. Returns how many new
    /// identifiers were written.
    pub fn stamp_all<H: Host>(&mut self, host: &mut H) -> usize {
        let nodes: Vec<H::Node> = host
            .descendants(&host.content_root())
            .into_iter()
            .filter(|n| is_tree_element(host, n))
            .collect();
        for node in &nodes {
            if let Some(id) = host.element_id(node) {
                self.observe(id);
            }
        }
        let mut stamped = 0;
        for node in &nodes {
            if host.element_id(node).is_none() {
                self.assign(host, node);
                stamped += 1;
            }
        }
        stamped
    }
}

/// Whether `node` shows up in the tree at all.
pub fn is_tree_element<H: Host>(host: &H, node: &H::Node) -> bool {
    !IGNORED_TAGS.contains(&host.tag(node).as_str())
        && !host.is_chrome(node)
        && host
            .closest(node, |h, n| IGNORED_TAGS.contains(&h.tag(n).as_str()))
            .is_none()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: ElementId,
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

fn build_node<H: Host>(host: &H, node: &H::Node) -> Option<TreeNode> {
    if !is_tree_element(host, node) {
        return None;
    }
    let id = host.element_id(node)?;
    let children = host
        .children(node)
        .iter()
        .filter_map(|c| build_node(host, c))
        .collect();
    Some(TreeNode {
        id,
        tag: host.tag(node),
        children,
    })
}

/// Tree of the content root's element children. Elements without an
/// identifier are left out; run `IdAllocator::stamp_all` first.
pub fn build_tree<H: Host>(host: &H) -> Vec<TreeNode> {
    host.children(&host.content_root())
        .iter()
        .filter_map(|c| build_node(host, c))
        .collect()
}

/// Identifiers from a root down to `id`, inclusive. Empty when absent.
pub fn path_to(tree: &[TreeNode], id: ElementId) -> Vec<ElementId> {
    for node in tree {
        if node.id == id {
            return vec![id];
        }
        let mut path = path_to(&node.children, id);
        if !path.is_empty() {
            path.insert(0, node.id);
            return path;
        }
    }
    Vec::new()
}

/// Collaborator that renders the tree and its highlight.
pub trait TreeView {
    fn rebuild(&mut self, tree: &[TreeNode]);
    /// Highlight the node for `id`, or clear the highlight.
    fn highlight(&mut self, id: Option<ElementId>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use pretty_assertions::assert_eq;

    #[test]
    fn stamping_skips_ignored_tags_and_keeps_existing_ids() {
        let mut host = HeadlessHost::new(
            r#"<div><p data-inspector-id="inspector-id-7">a</p><script>x()</script></div><span>b</span>"#,
        )
        .unwrap();
        let mut ids = IdAllocator::new();
        assert_eq!(ids.stamp_all(&mut host), 2);
        assert_eq!(
            host.snapshot(),
            r#"<div data-inspector-id="inspector-id-8"><p data-inspector-id="inspector-id-7">a</p><script>x()</script></div><span data-inspector-id="inspector-id-9">b</span>"#
        );
        assert_eq!(ids.stamp_all(&mut host), 0);
    }

    #[test]
    fn tree_mirrors_content_and_finds_paths() {
        let mut host = HeadlessHost::new("<section><ul><li>a</li></ul></section><footer></footer>").unwrap();
        IdAllocator::new().stamp_all(&mut host);
        let tree = build_tree(&host);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].tag, "section");
        let li = tree[0].children[0].children[0].id;
        assert_eq!(
            path_to(&tree, li),
            vec![tree[0].id, tree[0].children[0].id, li]
        );
        assert!(path_to(&tree, ElementId::intern("nowhere")).is_empty());
    }
}
