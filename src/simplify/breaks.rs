//! Line-break conversion: `<br>` and `<hr>` become paragraph structure.
//!
//! A run of two or more `<br>` inside a paragraph marks an intended
//! paragraph boundary, so the paragraph is split there. A lone `<br>` is
//! only a soft wrap and becomes a space, inside paragraphs and between
//! bare text runs at container level alike. Longer runs at container
//! level are left for the wrap stage, which already breaks text runs on
//! them; the leftovers are then swept away.

use crate::dom::{Document, NodeId};
use crate::text;

/// Split paragraphs at `<br>` runs and soften lone breaks to spaces.
pub fn insert_paragraph_breaks(doc: &mut Document) {
    while let Some((element, run)) = find_break_run(doc) {
        apply_run(doc, element, &run);
    }
}

/// Remove `<br>` and `<hr>` elements that survived paragraph splitting.
/// Run after bare-text wrapping: until then they separate text runs.
pub fn remove_stray_breaks(doc: &mut Document) {
    let stray: Vec<NodeId> = doc
        .descendants(doc.body())
        .into_iter()
        .filter(|&n| matches!(doc.tag(n), Some("br" | "hr")))
        .collect();
    for node in stray {
        doc.remove(node);
    }
}

/// A maximal run of `<br>` elements (whitespace-only text between them
/// included) as child positions within one paragraph.
struct BreakRun {
    start: usize,
    end: usize,
    br_count: usize,
}

fn find_break_run(doc: &Document) -> Option<(NodeId, BreakRun)> {
    let mut elements = vec![doc.body()];
    elements.extend(doc.descendants(doc.body()));
    for node in elements {
        if !doc.is_element(node) {
            continue;
        }
        let in_paragraph = doc.tag(node) == Some("p");
        let children = doc.children(node);
        let mut from = 0;
        while let Some(offset) = children[from..]
            .iter()
            .position(|&c| doc.tag(c) == Some("br"))
        {
            let run = run_at(doc, children, from + offset);
            // Outside paragraphs only lone breaks are softened; longer
            // runs stay in place as wrap-stage boundaries.
            if in_paragraph || run.br_count == 1 {
                return Some((node, run));
            }
            from = run.end;
        }
    }
    None
}

/// The maximal break run starting at child position `start`.
fn run_at(doc: &Document, children: &[NodeId], start: usize) -> BreakRun {
    let mut end = start + 1;
    let mut br_count = 1;
    while end < children.len() {
        let c = children[end];
        if doc.tag(c) == Some("br") {
            br_count += 1;
            end += 1;
        } else if doc.is_text(c) && text::normalize(&doc.text(c)).is_empty() {
            end += 1;
        } else {
            break;
        }
    }
    // Trailing whitespace text after the last br is not part of the run.
    while end > start && doc.is_text(children[end - 1]) {
        end -= 1;
    }
    BreakRun { start, end, br_count }
}

fn apply_run(doc: &mut Document, element: NodeId, run: &BreakRun) {
    if run.br_count == 1 {
        let children = doc.children(element).to_vec();
        for &node in &children[run.start..run.end] {
            doc.remove(node);
        }
        let space = doc.new_text(" ");
        doc.insert_child_at(element, run.start, space);
        return;
    }
    split_at_run(doc, element, run);
}

fn split_at_run(doc: &mut Document, paragraph: NodeId, run: &BreakRun) {
    let Some(parent) = doc.parent(paragraph) else {
        return;
    };
    let Some(pos) = doc.position_in_parent(paragraph) else {
        return;
    };
    let children = doc.children(paragraph).to_vec();
    let before: Vec<NodeId> = children[..run.start].to_vec();
    let after: Vec<NodeId> = children[run.end..].to_vec();
    let attrs: Vec<(String, String)> = doc.attrs(paragraph).to_vec();

    doc.remove(paragraph);
    let mut insert_at = pos;

    for piece in [before, after] {
        if !has_content(doc, &piece) {
            continue;
        }
        let p = doc.new_element("p");
        for (k, v) in &attrs {
            doc.set_attr(p, k, v);
        }
        for node in piece {
            doc.append_child(p, node);
        }
        doc.insert_child_at(parent, insert_at, p);
        insert_at += 1;
    }
}

fn has_content(doc: &Document, nodes: &[NodeId]) -> bool {
    nodes
        .iter()
        .any(|&n| doc.is_element(n) || !text::normalize(&doc.text(n)).is_empty())
}
