//! Generic scored-selector extraction.
//!
//! Metadata extractors (title, byline, date) all share the same shape:
//! try a list of selectors in confidence order and pool the evidence per
//! distinct text value. This module provides that primitive; choosing the
//! selectors is the caller's business.

use std::collections::HashMap;

use crate::dom::Document;
use crate::error::Result;
use crate::text;

/// A candidate selector with the confidence its matches contribute.
#[derive(Debug, Clone)]
pub struct SelectorHint<'a> {
    pub selector: &'a str,
    pub confidence: f64,
}

impl<'a> SelectorHint<'a> {
    #[must_use]
    pub fn new(selector: &'a str, confidence: f64) -> Self {
        Self { selector, confidence }
    }
}

/// Pooled evidence for one distinct normalized text value.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMatch {
    /// Sum of the confidences of every selector occurrence that produced
    /// this text.
    pub score: f64,
    /// Selectors that matched, in hint order, deduplicated.
    pub matched_selectors: Vec<String>,
}

/// Extract candidate element texts from `html` using scored selectors.
///
/// Each hint's matches contribute their normalized text (optionally
/// post-processed) to the result map, accumulating confidence per distinct
/// value. Empty texts are discarded. The caller picks the winner, usually
/// the entry with the highest score.
pub fn extract_element(
    html: &str,
    hints: &[SelectorHint<'_>],
    post_process: Option<&dyn Fn(&str) -> String>,
) -> Result<HashMap<String, ElementMatch>> {
    let doc = Document::parse(html)?;
    let mut out: HashMap<String, ElementMatch> = HashMap::new();

    for hint in hints {
        for node in doc.select(doc.html(), hint.selector) {
            let mut value = text::normalize(&doc.text(node));
            if let Some(f) = post_process {
                value = f(&value);
            }
            if value.is_empty() {
                continue;
            }
            let entry = out.entry(value).or_insert_with(|| ElementMatch {
                score: 0.0,
                matched_selectors: Vec::new(),
            });
            entry.score += hint.confidence;
            if !entry
                .matched_selectors
                .iter()
                .any(|s| s == hint.selector)
            {
                entry.matched_selectors.push(hint.selector.to_string());
            }
        }
    }
    Ok(out)
}
