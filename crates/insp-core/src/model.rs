//! Headless document tree.
//!
//! A minimal element/text tree used wherever no browser DOM is available
//! (native embedding, tests). Nodes live in a petgraph `StableDiGraph`
//! with parent→child edges; sibling order is kept explicitly because
//! stable graphs recycle indices after removals.

use crate::css::{class_tokens, format_style_attribute, parse_style_attribute};
use crate::id::{ElementId, ID_ATTRIBUTE};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// An element's tag and attributes. Attribute order is preserved so that
/// serialization is stable across snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| class_tokens(c).any(|t| t == class))
    }

    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| class_tokens(c).map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes = self.classes();
        classes.push(class.to_string());
        self.set_attribute("class", &classes.join(" "));
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let classes: Vec<String> = self.classes().into_iter().filter(|c| c != class).collect();
        if classes.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", &classes.join(" "));
        }
    }

    /// Value of one inline style declaration.
    pub fn style(&self, property: &str) -> Option<String> {
        let decls = parse_style_attribute(self.attribute("style")?);
        decls
            .into_iter()
            .find(|(n, _)| n == property)
            .map(|(_, v)| v)
    }

    /// Set (or with an empty value, remove) one inline style declaration.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut decls = self
            .attribute("style")
            .map(parse_style_attribute)
            .unwrap_or_default();
        let property = property.to_ascii_lowercase();
        if value.is_empty() {
            decls.retain(|(n, _)| *n != property);
        } else if let Some(slot) = decls.iter_mut().find(|(n, _)| *n == property) {
            slot.1 = value.to_string();
        } else {
            decls.push((property, value.to_string()));
        }

        if decls.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", &format_style_attribute(&decls));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    /// The document root. Never serialized itself.
    Root,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
    node: DomNode,
    /// Monotonic insertion stamp; sibling order is ascending stamp order.
    order: u64,
}

/// An ordered element tree.
#[derive(Debug, Clone)]
pub struct Document {
    graph: StableDiGraph<Slot, ()>,
    pub root: NodeIndex,
    next_order: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(Slot {
            node: DomNode::Root,
            order: 0,
        });
        Self {
            graph,
            root,
            next_order: 1,
        }
    }

    fn stamp(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Append a node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeIndex, node: DomNode) -> NodeIndex {
        let order = self.stamp();
        let idx = self.graph.add_node(Slot { node, order });
        self.graph.add_edge(parent, idx, ());
        idx
    }

    /// Append a fresh element with tag `tag`.
    pub fn append_element(&mut self, parent: NodeIndex, tag: &str) -> NodeIndex {
        self.append(parent, DomNode::Element(ElementData::new(tag)))
    }

    pub fn append_text(&mut self, parent: NodeIndex, text: &str) -> NodeIndex {
        self.append(parent, DomNode::Text(text.to_string()))
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&DomNode> {
        self.graph.node_weight(idx).map(|s| &s.node)
    }

    pub fn element(&self, idx: NodeIndex) -> Option<&ElementData> {
        match self.node(idx) {
            Some(DomNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, idx: NodeIndex) -> Option<&mut ElementData> {
        match self.graph.node_weight_mut(idx).map(|s| &mut s.node) {
            Some(DomNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self, idx: NodeIndex) -> bool {
        self.element(idx).is_some()
    }

    pub fn tag(&self, idx: NodeIndex) -> Option<&str> {
        self.element(idx).map(|e| e.tag.as_str())
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    /// Child nodes (elements and text) in document order.
    pub fn child_nodes(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.sort_by_key(|c| self.graph[*c].order);
        children
    }

    /// Element children in document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.child_nodes(idx)
            .into_iter()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, idx: NodeIndex) {
        for child in self.child_nodes(idx) {
            self.remove(child);
        }
        self.graph.remove_node(idx);
    }

    /// Drop every child of `idx`.
    pub fn clear_children(&mut self, idx: NodeIndex) {
        for child in self.child_nodes(idx) {
            self.remove(child);
        }
    }

    /// Replace all children of `idx` with a single text node.
    pub fn set_text(&mut self, idx: NodeIndex, text: &str) {
        self.clear_children(idx);
        if !text.is_empty() {
            self.append_text(idx, text);
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, idx: NodeIndex) -> String {
        let mut out = String::new();
        self.collect_text(idx, &mut out);
        out
    }

    fn collect_text(&self, idx: NodeIndex, out: &mut String) {
        if let Some(DomNode::Text(t)) = self.node(idx) {
            out.push_str(t);
            return;
        }
        for child in self.child_nodes(idx) {
            self.collect_text(child, out);
        }
    }

    /// First non-blank text node directly under `idx`, trimmed.
    pub fn direct_text(&self, idx: NodeIndex) -> Option<String> {
        self.child_nodes(idx).into_iter().find_map(|c| match self.node(c) {
            Some(DomNode::Text(t)) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => None,
        })
    }

    /// Nearest inclusive ancestor for which `pred` holds.
    pub fn closest(
        &self,
        idx: NodeIndex,
        mut pred: impl FnMut(&ElementData) -> bool,
    ) -> Option<NodeIndex> {
        let mut current = Some(idx);
        while let Some(node) = current {
            if let Some(el) = self.element(node)
                && pred(el)
            {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Pre-order walk of the element subtree below `idx` (exclusive).
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.collect_descendants(idx, &mut out);
        out
    }

    fn collect_descendants(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        for child in self.children(idx) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// First element below `idx` whose attribute `name` equals `value`.
    pub fn find_by_attribute(&self, idx: NodeIndex, name: &str, value: &str) -> Option<NodeIndex> {
        self.descendants(idx)
            .into_iter()
            .find(|d| self.element(*d).and_then(|e| e.attribute(name)) == Some(value))
    }

    /// Element below `idx` stamped with identifier `id`.
    pub fn find_by_id(&self, idx: NodeIndex, id: ElementId) -> Option<NodeIndex> {
        self.find_by_attribute(idx, ID_ATTRIBUTE, id.as_str())
    }

    /// Element below `idx` whose `id` attribute equals `dom_id`.
    pub fn get_element_by_dom_id(&self, idx: NodeIndex, dom_id: &str) -> Option<NodeIndex> {
        self.find_by_attribute(idx, "id", dom_id)
    }
}
