//! Tag sets driving the simplification passes.
//!
//! The output vocabulary is closed: anything outside `KNOWN_ELEMENTS` is
//! unwrapped to its text by the vocabulary pass.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements removed wholesale with their subtrees: forms, media,
/// scripting, embedding and navigation.
pub static BLACKLISTED_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "applet", "aside", "audio", "button", "canvas", "datalist", "dialog", "embed",
        "fieldset", "footer", "form", "frame", "frameset", "header", "iframe", "input",
        "label", "legend", "link", "map", "menu", "meta", "meter", "nav", "noscript",
        "object", "optgroup", "option", "output", "param", "progress", "script", "select",
        "slot", "source", "style", "svg", "template", "textarea", "track", "video",
    ]
    .into_iter()
    .collect()
});

/// Inline and formatting elements unwrapped while keeping their children.
pub static INLINE_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i",
        "ins", "kbd", "mark", "s", "samp", "small", "span", "strike", "strong", "time",
        "tt", "u", "var",
    ]
    .into_iter()
    .collect()
});

/// The closed output vocabulary. Everything else is unwrapped.
pub static KNOWN_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "html", "head", "body", "article", "section", "main", "div", "p", "pre",
        "blockquote", "address", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
        "dl", "dt", "dd", "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption",
        "figure", "figcaption", "img", "br", "hr",
    ]
    .into_iter()
    .collect()
});

/// Block elements that may not be nested inside a paragraph.
pub static ILLEGAL_IN_PARAGRAPH: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "address", "article", "aside", "blockquote", "div", "dl", "figure", "figcaption",
        "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre",
        "section", "table", "ul",
    ]
    .into_iter()
    .collect()
});

/// Containers whose direct bare text is wrapped in a paragraph.
pub static BLOCK_CONTAINERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["body", "div", "article", "section", "main"].into_iter().collect()
});

/// Whitelisted blocks that are not containers: a paragraph that is their
/// sole child is unwrapped so single-paragraph blocks keep flat text flow.
pub static NON_CONTAINER_BLOCKS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "address", "blockquote", "caption", "dd", "dt", "figcaption", "h1", "h2", "h3",
        "h4", "h5", "h6", "li", "pre", "td", "th",
    ]
    .into_iter()
    .collect()
});

/// Block candidates for link-density pruning. Inline anchors themselves are
/// exempt, otherwise every link would prune itself.
pub static LINK_DENSITY_CANDIDATES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["div", "section", "ul", "ol", "dl", "table"].into_iter().collect()
});

/// Attributes surviving the attribute-stripping pass. The annotation
/// attributes are stamped after stripping, so they are not listed here.
pub static ALLOWED_ATTRIBUTES: &[&str] = &["src", "alt", "colspan", "rowspan"];
