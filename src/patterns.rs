//! Keyword tables and compiled patterns used across scoring and location.
//!
//! All tables are built once at startup using `LazyLock`. Keyword matching
//! is substring-based and case-insensitive: a plain ordered slice plus a
//! lowercase scan is easier to test exhaustively than regex alternation.

use std::sync::LazyLock;

use regex::Regex;

/// id/class substrings that indicate main content.
pub static CONTENT_KEYWORDS: &[&str] = &[
    "article", "content", "entry", "hentry", "main", "page", "pagination", "post", "text",
    "blog", "story", "body", "section", "readable",
];

/// id/class substrings that indicate boilerplate, navigation or ads.
pub static NON_CONTENT_KEYWORDS: &[&str] = &[
    "combx", "comment", "com-", "contact", "foot", "footer", "footnote", "masthead", "media",
    "meta", "outbrain", "promo", "related", "scroll", "shoutbox", "sidebar", "sponsor",
    "shopping", "tags", "tool", "widget", "nav", "menu", "header", "ad", "advertisement",
    "banner", "social", "share", "sharing", "login", "signup",
];

/// Abbreviations whose trailing period must not terminate a sentence.
pub static ABBREVIATIONS: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "St.", "Jr.", "Sr."];

/// Attribute marking a node as the forced main-content focus.
pub const FOCUS_ATTR: &str = "data-readable-focus";

/// Matches runs of whitespace for collapsing.
pub static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[ \t\r\n\x0b\x0c\u{a0}]+").expect("WHITESPACE_RUN regex")
});

/// Returns true when `value` contains any of the given keywords
/// (case-insensitive substring match).
#[must_use]
pub fn matches_any(value: &str, keywords: &[&str]) -> bool {
    if value.is_empty() {
        return false;
    }
    let lower = value.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_keywords_match_substrings() {
        assert!(matches_any("article-body", CONTENT_KEYWORDS));
        assert!(matches_any("MainContent", CONTENT_KEYWORDS));
        assert!(matches_any("post", CONTENT_KEYWORDS));
        assert!(!matches_any("wrapper", CONTENT_KEYWORDS));
    }

    #[test]
    fn non_content_keywords_match_boilerplate() {
        assert!(matches_any("site-footer", NON_CONTENT_KEYWORDS));
        assert!(matches_any("NavBar", NON_CONTENT_KEYWORDS));
        assert!(matches_any("social-share", NON_CONTENT_KEYWORDS));
        assert!(!matches_any("storytext", NON_CONTENT_KEYWORDS));
    }

    #[test]
    fn empty_value_matches_nothing() {
        assert!(!matches_any("", CONTENT_KEYWORDS));
        assert!(!matches_any("", NON_CONTENT_KEYWORDS));
    }

    #[test]
    fn whitespace_run_collapses_mixed_whitespace() {
        let out = WHITESPACE_RUN.replace_all("a \t\n b\u{a0}c", " ");
        assert_eq!(out, "a b c");
    }
}
