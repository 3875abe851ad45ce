//! Structural annotations stamped after the tree has settled.
//!
//! Content digests let callers detect changed blocks between two
//! extractions of the same page without diffing markup. Node indexes give
//! every element a stable dotted address for external references.

use sha2::{Digest, Sha256};

use crate::dom::{Document, NodeId};
use crate::text;

pub const DIGEST_ATTR: &str = "data-content-digest";
pub const INDEX_ATTR: &str = "data-node-index";

/// Leaf elements whose text is hashed directly. Headings, captions and
/// other leaves contribute nothing on their own.
const DIGEST_LEAF_TAGS: &[&str] = &["p", "li"];

/// Stamp `data-content-digest` on every element carrying content.
///
/// Paragraph and list-item leaves hash their normalized text. Interior
/// elements hash the concatenation of their children's digest strings, so
/// a change in any paragraph below propagates to the root. Elements with
/// nothing below them to digest get no attribute.
pub fn add_content_digests(doc: &mut Document) {
    digest_node(doc, doc.body());
}

fn digest_node(doc: &mut Document, node: NodeId) -> Option<String> {
    if !doc.is_element(node) {
        return None;
    }
    let mut child_digests = String::new();
    for child in doc.children(node).to_vec() {
        if let Some(d) = digest_node(doc, child) {
            child_digests.push_str(&d);
        }
    }

    let digest = if child_digests.is_empty() {
        if !doc.tag(node).is_some_and(|t| DIGEST_LEAF_TAGS.contains(&t)) {
            return None;
        }
        let normalized = text::normalize(&doc.text(node));
        if normalized.is_empty() {
            return None;
        }
        hex_sha256(normalized.as_bytes())
    } else {
        hex_sha256(child_digests.as_bytes())
    };
    doc.set_attr(node, DIGEST_ATTR, &digest);
    Some(digest)
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in out {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Stamp `data-node-index` on every element: the body is `0`, its n-th
/// element child is `0.n` (1-based), and so on down the tree.
pub fn add_node_indexes(doc: &mut Document) {
    index_node(doc, doc.body(), "0");
}

fn index_node(doc: &mut Document, node: NodeId, index: &str) {
    doc.set_attr(node, INDEX_ATTR, index);
    let elements: Vec<NodeId> = doc
        .children(node)
        .iter()
        .copied()
        .filter(|&c| doc.is_element(c))
        .collect();
    for (i, child) in elements.into_iter().enumerate() {
        let child_index = format!("{index}.{}", i + 1);
        index_node(doc, child, &child_index);
    }
}
