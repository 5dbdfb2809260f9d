//! Emitter: `Document` subtree → markup.
//!
//! The output of `emit_inner` is the snapshot format the history stack
//! stores. It round-trips through `parser::parse_fragment_into`.

use crate::model::{Document, DomNode, is_void_element};
use petgraph::graph::NodeIndex;
use std::fmt::Write;

/// Serialize the children of `idx` (the equivalent of `innerHTML`).
#[must_use]
pub fn emit_inner(doc: &Document, idx: NodeIndex) -> String {
    let mut out = String::with_capacity(256);
    for child in doc.child_nodes(idx) {
        emit_node(doc, child, &mut out);
    }
    out
}

/// Serialize `idx` itself (the equivalent of `outerHTML`).
#[must_use]
pub fn emit_outer(doc: &Document, idx: NodeIndex) -> String {
    let mut out = String::new();
    emit_node(doc, idx, &mut out);
    out
}

fn emit_node(doc: &Document, idx: NodeIndex, out: &mut String) {
    match doc.node(idx) {
        Some(DomNode::Text(text)) => {
            let raw = doc
                .parent(idx)
                .and_then(|p| doc.tag(p))
                .is_some_and(|t| t == "script" || t == "style");
            if raw {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        Some(DomNode::Element(el)) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attributes {
                let _ = write!(out, " {name}=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(&el.tag) {
                return;
            }
            for child in doc.child_nodes(idx) {
                emit_node(doc, child, out);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
        Some(DomNode::Root) => {
            for child in doc.child_nodes(idx) {
                emit_node(doc, child, out);
            }
        }
        None => {}
    }
}

fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
