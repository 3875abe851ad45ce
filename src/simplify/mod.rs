//! The simplification pipeline.
//!
//! Runs a fixed sequence of structural passes over a parsed document and
//! produces minimal, canonical HTML: a closed element vocabulary, an
//! attribute allow-list, no comments, no empty nodes, every piece of prose
//! inside a paragraph, every text node normalized. The pipeline is
//! idempotent: feeding its output back through produces identical bytes.

mod annotate;
mod breaks;
mod passes;
pub mod tags;
mod unnest;

pub use annotate::{DIGEST_ATTR, INDEX_ATTR};

use crate::dom::Document;
use crate::options::Options;

/// Run the full pipeline over `doc` in place.
///
/// Stage order matters: unwrapping runs before vocabulary enforcement so
/// inline content is already flattened, and consolidation plus empty-node
/// removal re-run after the structural break and wrap stages so their
/// output is already in normal form.
pub fn simplify_document(doc: &mut Document, options: &Options) {
    passes::remove_comments(doc);
    passes::strip_attributes(doc);
    clear_head(doc);

    if options.remove_blacklist {
        passes::remove_blacklisted(doc, options.max_link_density);
    }
    if options.unwrap_elements {
        passes::unwrap_inline(doc);
    }
    if options.process_special {
        passes::process_special(doc);
    }
    passes::enforce_vocabulary(doc);
    if options.consolidate_text {
        passes::consolidate_text(doc);
    }
    if options.remove_empty {
        passes::remove_empty(doc);
    }
    if options.unnest_paragraphs {
        unnest::unnest_paragraphs(doc);
    }
    if options.insert_breaks {
        breaks::insert_paragraph_breaks(doc);
    }
    if options.wrap_bare_text {
        passes::wrap_bare_text(doc);
        passes::unwrap_sole_paragraphs(doc);
    }
    if options.insert_breaks {
        breaks::remove_stray_breaks(doc);
    }
    if options.consolidate_text {
        passes::consolidate_text(doc);
    }
    passes::normalize_text(doc);
    if options.remove_empty {
        passes::remove_empty(doc);
    }

    if options.add_content_digests {
        annotate::add_content_digests(doc);
    }
    if options.add_node_indexes {
        annotate::add_node_indexes(doc);
    }
}

/// Canonical output carries an empty head; titles and metadata belong to
/// metadata extraction, not the simplified body.
fn clear_head(doc: &mut Document) {
    let children = doc.children(doc.head()).to_vec();
    for child in children {
        doc.remove(child);
    }
}
