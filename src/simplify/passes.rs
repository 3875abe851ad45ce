//! Structural rewrite passes.
//!
//! Each pass is an infallible, idempotent-per-stage rewrite over one
//! document. Passes take snapshots of the node lists they mutate and guard
//! against nodes detached by earlier edits in the same pass.

use crate::dom::{Document, NodeId};
use crate::scoring;
use crate::text;

use super::tags::{
    ALLOWED_ATTRIBUTES, BLACKLISTED_ELEMENTS, BLOCK_CONTAINERS, INLINE_ELEMENTS,
    KNOWN_ELEMENTS, LINK_DENSITY_CANDIDATES, NON_CONTAINER_BLOCKS,
};

/// Elements that carry no children but must survive emptiness pruning.
const VOID_KEEP: &[&str] = &["br", "hr", "img"];

/// Whether a node is still reachable from the document root.
fn attached(doc: &Document, mut id: NodeId) -> bool {
    loop {
        if id == doc.html() {
            return true;
        }
        match doc.parent(id) {
            Some(parent) => id = parent,
            None => return false,
        }
    }
}

/// Stage 1: drop every comment node.
pub fn remove_comments(doc: &mut Document) {
    let comments: Vec<NodeId> = doc
        .descendants(doc.html())
        .into_iter()
        .filter(|&n| doc.is_comment(n))
        .collect();
    for node in comments {
        doc.remove(node);
    }
}

/// Stage 2: strip all attributes except the allow-list. `style` and
/// `class` never survive.
pub fn strip_attributes(doc: &mut Document) {
    let mut nodes = doc.descendants(doc.html());
    nodes.push(doc.html());
    for node in nodes {
        if doc.is_element(node) {
            doc.retain_attrs(node, ALLOWED_ATTRIBUTES);
        }
    }
}

/// Stage 3: remove blacklisted elements wholesale, then prune block
/// subtrees whose link density exceeds `max_link_density`.
pub fn remove_blacklisted(doc: &mut Document, max_link_density: f64) {
    let nodes = doc.descendants(doc.html());
    for node in &nodes {
        if doc
            .tag(*node)
            .is_some_and(|t| BLACKLISTED_ELEMENTS.contains(t))
            && attached(doc, *node)
        {
            doc.remove(*node);
        }
    }

    for node in nodes {
        if !attached(doc, node) {
            continue;
        }
        if doc
            .tag(node)
            .is_some_and(|t| LINK_DENSITY_CANDIDATES.contains(t))
            && scoring::features(doc, node).link_density > max_link_density
        {
            doc.remove(node);
        }
    }
}

/// Stage 4: unwrap inline/formatting elements, keeping children.
pub fn unwrap_inline(doc: &mut Document) {
    for node in doc.descendants(doc.html()).into_iter().rev() {
        if doc.tag(node).is_some_and(|t| INLINE_ELEMENTS.contains(t)) {
            doc.unwrap(node);
        }
    }
}

/// Stage 5: transform special elements into plain-text equivalents.
///
/// `<q>` wraps its content in literal quote characters, `<sub>` prefixes
/// `_`, `<sup>` prefixes `^`; the wrapper tag is then unwrapped.
pub fn process_special(doc: &mut Document) {
    for node in doc.descendants(doc.html()).into_iter().rev() {
        match doc.tag(node) {
            Some("q") => {
                let open = doc.new_text("\"");
                let close = doc.new_text("\"");
                doc.insert_child_at(node, 0, open);
                doc.append_child(node, close);
                doc.unwrap(node);
            }
            Some("sub") => {
                let prefix = doc.new_text("_");
                doc.insert_child_at(node, 0, prefix);
                doc.unwrap(node);
            }
            Some("sup") => {
                let prefix = doc.new_text("^");
                doc.insert_child_at(node, 0, prefix);
                doc.unwrap(node);
            }
            _ => {}
        }
    }
}

/// Stage 6: unwrap every element outside the known vocabulary, bounding
/// the output to a fixed tag set.
pub fn enforce_vocabulary(doc: &mut Document) {
    for node in doc.descendants(doc.html()).into_iter().rev() {
        if doc.is_element(node) && doc.tag(node).is_some_and(|t| !KNOWN_ELEMENTS.contains(t)) {
            doc.unwrap(node);
        }
    }
}

/// Stage 7: merge adjacent text-node children into single text nodes.
pub fn consolidate_text(doc: &mut Document) {
    let mut elements: Vec<NodeId> = doc
        .descendants(doc.html())
        .into_iter()
        .filter(|&n| doc.is_element(n))
        .collect();
    elements.push(doc.html());

    for element in elements {
        let children: Vec<NodeId> = doc.children(element).to_vec();
        let mut run_head: Option<NodeId> = None;
        let mut merged = String::new();
        let mut to_remove: Vec<NodeId> = Vec::new();

        for child in children {
            if doc.is_text(child) {
                if let Some(head) = run_head {
                    merged.push_str(&doc.text(child));
                    to_remove.push(child);
                    doc.set_text(head, &merged);
                } else {
                    run_head = Some(child);
                    merged = doc.text(child);
                }
            } else {
                run_head = None;
                merged.clear();
            }
        }
        for node in to_remove {
            doc.remove(node);
        }
    }
}

/// Stage 8: remove text nodes and elements that are empty after
/// normalization, repeated to a fixpoint. `html`/`head`/`body` and void
/// elements are exempt.
pub fn remove_empty(doc: &mut Document) {
    loop {
        let mut changed = false;
        for node in doc.descendants(doc.html()).into_iter().rev() {
            if !attached(doc, node) {
                continue;
            }
            if node == doc.head() || node == doc.body() {
                continue;
            }
            let remove = if doc.is_text(node) {
                text::normalize(&doc.text(node)).is_empty()
            } else if doc.is_element(node) {
                doc.children(node).is_empty()
                    && !doc.tag(node).is_some_and(|t| VOID_KEEP.contains(&t))
            } else {
                false
            };
            if remove {
                doc.remove(node);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Stage 11a: wrap maximal runs of bare text that are direct children of a
/// block container in a new `<p>`.
pub fn wrap_bare_text(doc: &mut Document) {
    let containers: Vec<NodeId> = {
        let mut v: Vec<NodeId> = doc
            .descendants(doc.html())
            .into_iter()
            .filter(|&n| doc.tag(n).is_some_and(|t| BLOCK_CONTAINERS.contains(t)))
            .collect();
        v.push(doc.body());
        v
    };

    for container in containers {
        if !attached(doc, container) {
            continue;
        }
        loop {
            // One run per iteration: positions shift after each wrap.
            let children: Vec<NodeId> = doc.children(container).to_vec();
            let Some(start) = children.iter().position(|&c| {
                doc.is_text(c) && !text::normalize(&doc.text(c)).is_empty()
            }) else {
                break;
            };
            let mut end = start;
            while end + 1 < children.len() && doc.is_text(children[end + 1]) {
                end += 1;
            }
            let p = doc.new_element("p");
            doc.insert_child_at(container, start, p);
            for &child in &children[start..=end] {
                doc.append_child(p, child);
            }
        }
    }
}

/// Stage 11b: unwrap a paragraph that is the sole child of a
/// non-container block element.
pub fn unwrap_sole_paragraphs(doc: &mut Document) {
    for node in doc.descendants(doc.html()).into_iter().rev() {
        if !doc
            .tag(node)
            .is_some_and(|t| NON_CONTAINER_BLOCKS.contains(t))
        {
            continue;
        }
        let children = doc.children(node);
        if children.len() == 1 && doc.tag(children[0]) == Some("p") {
            doc.unwrap(children[0]);
        }
    }
}

/// Stage 12: normalize every remaining text node (Unicode fold, control
/// strip, whitespace collapse). Leading/trailing space is trimmed only at
/// the edges of the parent so separators next to element siblings survive.
pub fn normalize_text(doc: &mut Document) {
    let texts: Vec<NodeId> = doc
        .descendants(doc.html())
        .into_iter()
        .filter(|&n| doc.is_text(n))
        .collect();
    for node in texts {
        let Some(parent) = doc.parent(node) else {
            continue;
        };
        let mut normalized = text::fold_collapse(&doc.text(node));
        let siblings = doc.children(parent);
        if siblings.first() == Some(&node) {
            normalized = normalized.trim_start().to_string();
        }
        if siblings.last() == Some(&node) {
            normalized = normalized.trim_end().to_string();
        }
        doc.set_text(node, &normalized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn parse(html: &str) -> Document {
        #[allow(clippy::unwrap_used)]
        Document::parse(html).unwrap()
    }

    #[test]
    fn comments_are_removed() {
        let mut doc = parse("<div><!-- note --><p>keep</p></div>");
        remove_comments(&mut doc);
        let div = doc.select(doc.body(), "div")[0];
        assert_eq!(doc.inner_html(div), "<p>keep</p>");
    }

    #[test]
    fn attributes_outside_allow_list_are_stripped() {
        let mut doc = parse(r#"<p style="color:red" class="x" id="y">t</p><img src="a.jpg" alt="a" class="z">"#);
        strip_attributes(&mut doc);
        let p = doc.select(doc.body(), "p")[0];
        assert!(doc.attrs(p).is_empty());
        let img = doc.select(doc.body(), "img")[0];
        assert_eq!(doc.attr(img, "src"), Some("a.jpg"));
        assert_eq!(doc.attr(img, "alt"), Some("a"));
        assert_eq!(doc.attr(img, "class"), None);
    }

    #[test]
    fn blacklisted_elements_are_removed_wholesale() {
        let mut doc = parse("<div><script>x()</script><form><input></form><p>keep</p></div>");
        remove_blacklisted(&mut doc, 0.5);
        let div = doc.select(doc.body(), "div")[0];
        assert_eq!(doc.inner_html(div), "<p>keep</p>");
    }

    #[test]
    fn link_dense_subtrees_are_pruned() {
        let links = (0..10)
            .map(|i| format!("<a href='/{i}'>Link number {i}</a> "))
            .collect::<String>();
        let prose = "Meaningful article prose with many words in it. ".repeat(5);
        let html = format!("<div><ul>{links}</ul><p>{prose}</p></div>");
        let mut doc = parse(&html);
        remove_blacklisted(&mut doc, 0.5);
        assert!(doc.select(doc.body(), "ul").is_empty());
        assert_eq!(doc.select(doc.body(), "p").len(), 1);
    }

    #[test]
    fn inline_elements_are_unwrapped() {
        let mut doc = parse("<p>a <b>bold <i>nested</i></b> c</p>");
        unwrap_inline(&mut doc);
        let p = doc.select(doc.body(), "p")[0];
        assert_eq!(doc.text(p), "a bold nested c");
        assert!(doc.select(doc.body(), "b").is_empty());
        assert!(doc.select(doc.body(), "i").is_empty());
    }

    #[test]
    fn special_elements_become_text() {
        let mut doc = parse("<p><q>quoted</q> H<sub>2</sub>O x<sup>2</sup></p>");
        process_special(&mut doc);
        consolidate_text(&mut doc);
        let p = doc.select(doc.body(), "p")[0];
        assert_eq!(doc.text(p), "\"quoted\" H_2O x^2");
    }

    #[test]
    fn unknown_elements_are_unwrapped() {
        let mut doc = parse("<div><custom-widget>inner text</custom-widget></div>");
        enforce_vocabulary(&mut doc);
        let div = doc.select(doc.body(), "div")[0];
        assert_eq!(doc.inner_html(div), "inner text");
    }

    #[test]
    fn adjacent_text_nodes_are_consolidated() {
        let mut doc = parse("<p>a <b>x</b> b</p>");
        unwrap_inline(&mut doc);
        consolidate_text(&mut doc);
        let p = doc.select(doc.body(), "p")[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text(p), "a x b");
    }

    #[test]
    fn empty_nodes_are_removed_to_fixpoint() {
        let mut doc = parse("<div><section><p>   </p></section><p>keep</p></div>");
        remove_empty(&mut doc);
        // The whitespace paragraph goes, then its newly-empty section,
        // but the div still holds the second paragraph.
        assert!(doc.select(doc.body(), "section").is_empty());
        assert_eq!(doc.select(doc.body(), "p").len(), 1);
    }

    #[test]
    fn structural_nodes_survive_emptiness_pruning() {
        let mut doc = parse("<div> </div>");
        remove_empty(&mut doc);
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert_eq!(doc.tag(doc.head()), Some("head"));
        assert!(doc.select(doc.body(), "div").is_empty());
    }

    #[test]
    fn bare_text_is_wrapped_in_paragraphs() {
        let mut doc = parse("<div>bare text<p>already wrapped</p>more bare</div>");
        wrap_bare_text(&mut doc);
        let div = doc.select(doc.body(), "div")[0];
        let tags: Vec<&str> = doc
            .children(div)
            .iter()
            .filter_map(|&c| doc.tag(c))
            .collect();
        assert_eq!(tags, vec!["p", "p", "p"]);
    }

    #[test]
    fn sole_paragraph_in_list_item_is_unwrapped() {
        let mut doc = parse("<ul><li><p>only</p></li><li><p>a</p><p>b</p></li></ul>");
        unwrap_sole_paragraphs(&mut doc);
        let items = doc.select(doc.body(), "li");
        assert_eq!(doc.inner_html(items[0]), "only");
        // Two paragraphs stay wrapped.
        assert_eq!(doc.select(items[1], "p").len(), 2);
    }

    #[test]
    fn text_normalization_preserves_separators_next_to_elements() {
        let mut doc = parse("<p>  foo  <img src=\"x.jpg\">  bar  </p>");
        normalize_text(&mut doc);
        let p = doc.select(doc.body(), "p")[0];
        assert_eq!(doc.outer_html(p), "<p>foo <img src=\"x.jpg\"> bar</p>");
    }
}
