//! Text normalization and tokenization.
//!
//! Pure string functions with no DOM dependency: Unicode folding,
//! control-character stripping, whitespace collapsing, and the sentence
//! and word tokenizers the scoring engine counts with.

use unicode_normalization::UnicodeNormalization;

use crate::patterns::{ABBREVIATIONS, WHITESPACE_RUN};

/// Fold typographic symbols that NFKC leaves alone into their ASCII
/// equivalents. NFKC already handles ellipsis, NBSP and fullwidth forms.
fn fold_symbol(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => '\'',
        '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
        other => other,
    }
}

/// Normalize a text fragment: NFKC fold, symbol fold, control-character
/// strip, whitespace collapse, trim.
///
/// This is the normalization applied to every text node at the end of the
/// simplification pipeline and to leaf text before digesting, so identical
/// visible text always produces identical bytes.
#[must_use]
pub fn normalize(text: &str) -> String {
    fold_collapse(text).trim().to_string()
}

/// Like [`normalize`] but without trimming, for text nodes whose leading or
/// trailing space separates them from element siblings.
#[must_use]
pub fn fold_collapse(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .map(fold_symbol)
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    WHITESPACE_RUN.replace_all(&folded, " ").to_string()
}

/// Collapse whitespace runs to single spaces without any Unicode folding.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").to_string()
}

/// Count words: whitespace-separated runs.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count sentences: punctuation-terminated runs.
///
/// Periods belonging to known abbreviations are removed before counting so
/// "Dr. Smith arrived." is one sentence, not two.
#[must_use]
pub fn count_sentences(text: &str) -> usize {
    let mut stripped = text.to_string();
    for abbr in ABBREVIATIONS {
        let bare = &abbr[..abbr.len() - 1];
        stripped = stripped.replace(abbr, bare);
    }

    let mut count = 0;
    let mut in_sentence = false;
    for c in stripped.chars() {
        match c {
            '.' | '!' | '?' => {
                if in_sentence {
                    count += 1;
                    in_sentence = false;
                }
            }
            c if c.is_whitespace() => {}
            _ => in_sentence = true,
        }
    }
    // A trailing unterminated run still counts as a sentence.
    if in_sentence {
        count += 1;
    }
    count
}
