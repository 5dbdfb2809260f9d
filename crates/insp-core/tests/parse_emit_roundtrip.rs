//! Integration tests: parse → emit → re-parse round-trip.
//!
//! Snapshots are `emit_inner` output, so restoring one must reproduce the
//! exact same markup.

use insp_core::emitter::emit_inner;
use insp_core::id::{ElementId, ID_ATTRIBUTE};
use insp_core::model::*;
use insp_core::parser::{parse_fragment, parse_fragment_into};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn assert_emit_is_fixed_point(input: &str) {
    let doc1 = parse_fragment(input).expect("first parse failed");
    let emitted = emit_inner(&doc1, doc1.root);
    let doc2 = parse_fragment(&emitted).expect("re-parse failed");
    let emitted2 = emit_inner(&doc2, doc2.root);
    assert_eq!(emitted, emitted2, "emit is not a fixed point for:\n{input}");
    assert_eq!(
        doc1.descendants(doc1.root).len(),
        doc2.descendants(doc2.root).len(),
        "element count changed after round-trip"
    );
}

// ─── Fixture-based tests ─────────────────────────────────────────────────

#[test]
fn roundtrip_dashboard_fixture() {
    assert_emit_is_fixed_point(include_str!("fixtures/dashboard.html"));
}

#[test]
fn roundtrip_keeps_script_bodies_raw() {
    let doc = parse_fragment(include_str!("fixtures/dashboard.html")).unwrap();
    let emitted = emit_inner(&doc, doc.root);
    assert!(emitted.contains("<script>if (a < b) { run(); }</script>"));
    assert!(!emitted.contains("hidden stuff"), "comments are dropped");
}

// ─── Identifier survival ─────────────────────────────────────────────────

#[test]
fn identifiers_survive_restore() {
    let mut doc = parse_fragment(include_str!("fixtures/dashboard.html")).unwrap();
    let sales = doc.get_element_by_dom_id(doc.root, "sales").unwrap();
    doc.element_mut(sales)
        .unwrap()
        .set_attribute(ID_ATTRIBUTE, "inspector-id-7");
    let snapshot = emit_inner(&doc, doc.root);

    let mut restored = Document::new();
    let root = restored.root;
    parse_fragment_into(&mut restored, root, &snapshot).unwrap();
    let found = restored
        .find_by_id(root, ElementId::intern("inspector-id-7"))
        .expect("id lost after restore");
    assert_eq!(restored.tag(found), Some("table"));
}

#[test]
fn restore_into_existing_container_replaces_nothing_else() {
    let mut doc = parse_fragment(r#"<main id="root"></main><aside>panel</aside>"#).unwrap();
    let main = doc.get_element_by_dom_id(doc.root, "root").unwrap();
    parse_fragment_into(&mut doc, main, "<p>a</p><p>b</p>").unwrap();
    assert_eq!(doc.children(main).len(), 2);
    assert_eq!(
        emit_inner(&doc, doc.root),
        r#"<main id="root"><p>a</p><p>b</p></main><aside>panel</aside>"#
    );
}

// ─── Attribute edge cases ────────────────────────────────────────────────

#[test]
fn roundtrip_quotes_and_ampersands_in_attributes() {
    assert_emit_is_fixed_point(r#"<a title='say "hi" &amp; go' href=/x?a=1&b=2>link</a>"#);
}

#[test]
fn roundtrip_void_and_self_closing() {
    let doc = parse_fragment(r#"<p>a<br/>b<img src="x.png"></p><div/>"#).unwrap();
    assert_eq!(
        emit_inner(&doc, doc.root),
        r#"<p>a<br>b<img src="x.png"></p><div></div>"#
    );
}
