//! Density and scoring engine.
//!
//! Computes per-node statistical features (text/HTML ratio, paragraph,
//! sentence, word, heading, list and image densities, link density) and
//! combines them with tag-type and keyword adjustments into a single
//! content score. Scoring is a pure function of the node's current
//! subtree: degenerate input (empty text or HTML) yields 0.0, never an
//! error.

use crate::dom::{Document, NodeId};
use crate::options::ScoringWeights;
use crate::patterns::{matches_any, CONTENT_KEYWORDS, NON_CONTENT_KEYWORDS};
use crate::text::{count_sentences, count_words};

/// A candidate node paired with its computed score. Ephemeral: produced
/// and consumed within one locate call.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate {
    /// The candidate node.
    pub node: NodeId,
    /// Its content score.
    pub score: f64,
}

/// Raw statistical features of one node's subtree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityFeatures {
    /// Characters of descendant text.
    pub text_len: usize,
    /// Characters of serialized outer HTML.
    pub html_len: usize,
    /// text_len / html_len.
    pub text_density: f64,
    /// Paragraph descendants per 1000 characters of text.
    pub paragraph_density: f64,
    /// Sentences per 1000 characters of text.
    pub sentence_density: f64,
    /// Words per 100 characters of text.
    pub word_density: f64,
    /// Heading descendants per 1000 characters of text.
    pub heading_density: f64,
    /// List-item descendants per 1000 characters of text.
    pub list_density: f64,
    /// Image descendants per 1000 characters of text.
    pub image_density: f64,
    /// Fraction of text contributed by anchor elements.
    pub link_density: f64,
}

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Compute the raw density features for a node.
#[must_use]
pub fn features(doc: &Document, node: NodeId) -> DensityFeatures {
    let text = doc.text(node);
    let text_len = text.chars().count();
    let html_len = doc.outer_html(node).chars().count();
    if text_len == 0 || html_len == 0 {
        return DensityFeatures {
            text_len,
            html_len,
            ..DensityFeatures::default()
        };
    }

    let mut paragraphs = 0usize;
    let mut headings = 0usize;
    let mut list_items = 0usize;
    let mut images = 0usize;
    let mut anchor_text_len = 0usize;
    for desc in doc.descendants(node) {
        match doc.tag(desc) {
            Some("p") => paragraphs += 1,
            Some("li") => list_items += 1,
            Some("img") => images += 1,
            Some("a") => anchor_text_len += doc.text(desc).chars().count(),
            Some(tag) if HEADING_TAGS.contains(&tag) => headings += 1,
            _ => {}
        }
    }

    let text_f = text_len as f64;
    DensityFeatures {
        text_len,
        html_len,
        text_density: text_f / html_len as f64,
        paragraph_density: paragraphs as f64 / text_f * 1000.0,
        sentence_density: count_sentences(&text) as f64 / text_f * 1000.0,
        word_density: count_words(&text) as f64 / text_f * 100.0,
        heading_density: headings as f64 / text_f * 1000.0,
        list_density: list_items as f64 / text_f * 1000.0,
        image_density: images as f64 / text_f * 1000.0,
        link_density: (anchor_text_len.min(text_len)) as f64 / text_f,
    }
}

/// Flat bonus for tags that typically hold (or never hold) article content.
#[must_use]
pub fn tag_bonus(tag: Option<&str>) -> f64 {
    match tag {
        Some("article" | "section" | "div" | "main") => 10.0,
        Some("p" | "pre" | "td") => 5.0,
        Some("blockquote" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li") => 3.0,
        Some("form" | "aside" | "footer" | "header" | "nav") => -10.0,
        _ => 0.0,
    }
}

/// Keyword-based boost from the node's id and class attributes.
///
/// Starts at 1.0; content keywords in the id add `id_keyword_boost`, in
/// the class add `class_keyword_boost`; any non-content keyword match in
/// either halves the result (multiplies by `non_content_penalty`).
#[must_use]
pub fn content_boost(doc: &Document, node: NodeId, weights: &ScoringWeights) -> f64 {
    let id = doc.attr(node, "id").unwrap_or_default();
    let class = doc.attr(node, "class").unwrap_or_default();

    let mut boost = 1.0;
    if matches_any(id, CONTENT_KEYWORDS) {
        boost += weights.id_keyword_boost;
    }
    if matches_any(class, CONTENT_KEYWORDS) {
        boost += weights.class_keyword_boost;
    }
    if matches_any(id, NON_CONTENT_KEYWORDS) || matches_any(class, NON_CONTENT_KEYWORDS) {
        boost *= weights.non_content_penalty;
    }
    boost
}

/// Score a node's subtree as article content.
///
/// Deterministic for a given subtree; higher is more article-like.
#[must_use]
pub fn score(doc: &Document, node: NodeId, weights: &ScoringWeights) -> f64 {
    let f = features(doc, node);
    if f.text_len == 0 || f.html_len == 0 {
        return 0.0;
    }

    let boost = content_boost(doc, node, weights);
    let density = (f.text_density * weights.text_density
        + f.paragraph_density * weights.paragraph_density
        + f.sentence_density * weights.sentence_density
        + f.word_density * weights.word_density)
        * boost;

    let link_density_score = 1.0 - f.link_density;

    let p_children = doc
        .children(node)
        .iter()
        .filter(|&&c| doc.tag(c) == Some("p"))
        .count();

    let rich_figures = doc
        .descendants(node)
        .into_iter()
        .filter(|&d| {
            doc.tag(d) == Some("figure")
                && !doc.select(d, "img").is_empty()
                && !doc.select(d, "figcaption").is_empty()
        })
        .count();

    density * link_density_score
        + f.heading_density * weights.heading_density
        + f.list_density * weights.list_density
        + f.image_density * weights.image_density
        + tag_bonus(doc.tag(node))
        + weights.paragraph_child_bonus * p_children as f64
        + weights.figure_bonus * rich_figures as f64
}
