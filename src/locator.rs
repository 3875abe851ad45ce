//! Main-content locator.
//!
//! Generates candidate nodes from attribute patterns, semantic tags and
//! explicit focus markers, ranks them with the scoring engine, and falls
//! back to a full scan of generic containers, then to the document body.
//! Every tier is attempted only when the prior tier yields no result; the
//! final tier never fails because a body always exists post-parse.

use std::collections::HashMap;

use log::debug;

use crate::dom::{Document, NodeId};
use crate::options::Options;
use crate::patterns::FOCUS_ATTR;
use crate::scoring::{score, ScoredCandidate};

/// Selector producing the tier-1 candidate union: attribute-contains
/// patterns, semantic tags, well-known classes and the forced-focus marker.
const CANDIDATE_SELECTOR: &str = "[id*=content], [class*=content], [id*=article], \
     [class*=article], [id*=main], [class*=main], [id*=body], [class*=body], \
     [id*=entry], [class*=entry], article, main, .post, .hentry, [data-readable-focus]";

/// Locate the node most likely to hold the main article content.
///
/// Evaluation order is document order, so ties deterministically resolve
/// to the first-seen candidate.
#[must_use]
pub fn locate(doc: &Document, options: &Options) -> NodeId {
    debug_assert!(CANDIDATE_SELECTOR.contains(FOCUS_ATTR));

    // Nodes can appear in both tiers; score each subtree once per call.
    let mut scores: HashMap<NodeId, f64> = HashMap::new();

    // Tier 1: pattern/tag/marker candidates.
    let candidates = doc.select(doc.body(), CANDIDATE_SELECTOR);
    if let Some(best) = best_scoring(doc, &candidates, options, &mut scores) {
        if best.score > 0.0 {
            debug!("located main content via candidate tier (score {:.1})", best.score);
            return best.node;
        }
    }

    // Tier 2: any generic container with enough text.
    let containers: Vec<NodeId> = doc
        .select(doc.body(), "div, section")
        .into_iter()
        .filter(|&n| doc.text(n).chars().count() >= options.fallback_min_text_len)
        .collect();
    if let Some(best) = best_scoring(doc, &containers, options, &mut scores) {
        debug!("located main content via container scan (score {:.1})", best.score);
        return best.node;
    }

    // Tier 3: the body itself.
    debug!("no candidate qualified, falling back to body");
    doc.body()
}

/// Strict maximum over `nodes` in the given (document) order; the first
/// candidate wins ties.
fn best_scoring(
    doc: &Document,
    nodes: &[NodeId],
    options: &Options,
    scores: &mut HashMap<NodeId, f64>,
) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for &node in nodes {
        let s = *scores
            .entry(node)
            .or_insert_with(|| score(doc, node, &options.weights));
        match best {
            Some(current) if s <= current.score => {}
            _ => best = Some(ScoredCandidate { node, score: s }),
        }
    }
    best
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
    fn locates_article_tag() {
        let para = "Substantial article prose with plenty of words in it. ".repeat(5);
        let html = format!("<nav>Home About Contact</nav><article><p>{para}</p></article>");
        let doc = parse(&html);
        let found = locate(&doc, &Options::default());
        assert_eq!(doc.tag(found), Some("article"));
    }

    #[test]
    fn locates_content_id_over_sidebar() {
        let para = "Substantial article prose with plenty of words in it. ".repeat(5);
        let html = format!(
            r#"<div id="sidebar"><p>{para}</p></div><div id="content"><p>{para}</p></div>"#
        );
        let doc = parse(&html);
        let found = locate(&doc, &Options::default());
        assert_eq!(doc.attr(found, "id"), Some("content"));
    }

    #[test]
    fn forced_focus_marker_is_a_candidate() {
        let para = "Forced focus target with enough prose to score well. ".repeat(5);
        let html = format!(r#"<div data-readable-focus="1"><p>{para}</p></div>"#);
        let doc = parse(&html);
        let found = locate(&doc, &Options::default());
        assert_eq!(doc.attr(found, "data-readable-focus"), Some("1"));
    }

    #[test]
    fn tier2_scans_plain_divs() {
        // No content-keyword matches anywhere, but one div holds >100 chars.
        let para = "Plain prose that matches no keyword patterns at all but is long enough \
                    to qualify for the generic container scan tier of the locator.";
        let html = format!("<div><p>{para}</p></div>");
        let doc = parse(&html);
        let found = locate(&doc, &Options::default());
        assert_eq!(doc.tag(found), Some("div"));
    }

    #[test]
    fn tier3_returns_body_for_sparse_documents() {
        let doc = parse("<div><p>short</p></div>");
        let found = locate(&doc, &Options::default());
        assert_eq!(found, doc.body());
    }

    #[test]
    fn location_is_deterministic() {
        let para = "Identical content in two candidates for the tie case. ".repeat(4);
        let html = format!("<article><p>{para}</p></article><article><p>{para}</p></article>");
        let doc = parse(&html);
        let opts = Options::default();
        let a = locate(&doc, &opts);
        let b = locate(&doc, &opts);
        assert_eq!(a, b);
        // First-seen wins the tie.
        assert_eq!(a, doc.select(doc.body(), "article")[0]);
    }
}
