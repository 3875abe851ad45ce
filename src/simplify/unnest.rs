//! Paragraph repair: un-nesting block-level elements out of `<p>`.
//!
//! HTML parsers will happily hand us paragraphs containing blocks that are
//! illegal there (a `<div>` inside a `<p>` from sloppy markup, or produced
//! by earlier unwrapping). Each offending paragraph is split into a
//! "before" paragraph, the extracted block promoted to a sibling, and an
//! "after" paragraph, dropping empty pieces; repeated until no illegal
//! nesting remains.

use crate::dom::{Document, NodeId};
use crate::text;

use super::tags::ILLEGAL_IN_PARAGRAPH;

/// Split paragraphs around illegally nested block children until none
/// remain. Terminates because every split strictly reduces nesting depth.
pub fn unnest_paragraphs(doc: &mut Document) {
    while let Some((paragraph, block)) = find_illegal(doc) {
        split_paragraph(doc, paragraph, block);
    }
}

fn find_illegal(doc: &Document) -> Option<(NodeId, NodeId)> {
    for node in doc.descendants(doc.body()) {
        if doc.tag(node) != Some("p") {
            continue;
        }
        for &child in doc.children(node) {
            if doc
                .tag(child)
                .is_some_and(|t| ILLEGAL_IN_PARAGRAPH.contains(t))
            {
                return Some((node, child));
            }
        }
    }
    None
}

/// Whether a set of nodes carries any content worth keeping.
fn has_content(doc: &Document, nodes: &[NodeId]) -> bool {
    nodes.iter().any(|&n| {
        doc.is_element(n) || !text::normalize(&doc.text(n)).is_empty()
    })
}

fn split_paragraph(doc: &mut Document, paragraph: NodeId, block: NodeId) {
    let Some(parent) = doc.parent(paragraph) else {
        return;
    };
    let Some(pos) = doc.position_in_parent(paragraph) else {
        return;
    };
    let children: Vec<NodeId> = doc.children(paragraph).to_vec();
    let Some(split_at) = children.iter().position(|&c| c == block) else {
        return;
    };
    let before: Vec<NodeId> = children[..split_at].to_vec();
    let after: Vec<NodeId> = children[split_at + 1..].to_vec();
    let attrs: Vec<(String, String)> = doc.attrs(paragraph).to_vec();

    doc.remove(paragraph);
    let mut insert_at = pos;

    if has_content(doc, &before) {
        let before_p = new_paragraph(doc, &attrs);
        for node in before {
            doc.append_child(before_p, node);
        }
        doc.insert_child_at(parent, insert_at, before_p);
        insert_at += 1;
    }

    doc.insert_child_at(parent, insert_at, block);
    insert_at += 1;

    if has_content(doc, &after) {
        let after_p = new_paragraph(doc, &attrs);
        for node in after {
            doc.append_child(after_p, node);
        }
        doc.insert_child_at(parent, insert_at, after_p);
    }
}

fn new_paragraph(doc: &mut Document, attrs: &[(String, String)]) -> NodeId {
    let p = doc.new_element("p");
    for (k, v) in attrs {
        doc.set_attr(p, k, v);
    }
    p
}
