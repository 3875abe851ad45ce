//! CSS-subset selector matching over the arena document.
//!
//! Supported grammar: type selectors, `#id`, `.class`, attribute-contains
//! `[attr*=value]`, bare attribute `[attr]`, descendant (space) and child
//! (`>`) combinators, and comma-separated lists. This is the selector
//! vocabulary the locator and pipeline need; it is deliberately not a full
//! CSS engine.

use super::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Tag(String),
    Id(String),
    Class(String),
    AttrExists(String),
    AttrContains(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone)]
struct Compound {
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone)]
struct Chain {
    /// Compounds left-to-right; combinator `i` sits before compound `i+1`.
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    chains: Vec<Chain>,
}

impl Selector {
    /// Parse a selector list. Returns `None` on empty or unsupported syntax.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut chains = Vec::new();
        for part in input.split(',') {
            chains.push(parse_chain(part.trim())?);
        }
        if chains.is_empty() {
            return None;
        }
        Some(Self { chains })
    }

    /// Matching descendants of `root`, in document order, deduplicated.
    #[must_use]
    pub fn select(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for node in doc.descendants(root) {
            if !doc.is_element(node) {
                continue;
            }
            if self
                .chains
                .iter()
                .any(|chain| chain_matches(chain, doc, root, node))
            {
                out.push(node);
            }
        }
        out
    }

    /// Whether a single node matches this selector, scoped under `root`.
    #[must_use]
    pub fn matches(&self, doc: &Document, root: NodeId, node: NodeId) -> bool {
        doc.is_element(node)
            && self
                .chains
                .iter()
                .any(|chain| chain_matches(chain, doc, root, node))
    }
}

fn chain_matches(chain: &Chain, doc: &Document, root: NodeId, node: NodeId) -> bool {
    let last = chain.compounds.len() - 1;
    if !compound_matches(&chain.compounds[last], doc, node) {
        return false;
    }
    matches_upward(chain, last, doc, root, node)
}

/// Walk combinators right-to-left, matching ancestors of `node` against the
/// remaining compounds. `node` already matches compound `idx`.
fn matches_upward(chain: &Chain, idx: usize, doc: &Document, root: NodeId, node: NodeId) -> bool {
    if idx == 0 {
        return true;
    }
    let combinator = chain.combinators[idx - 1];
    let target = &chain.compounds[idx - 1];
    let mut current = node;
    loop {
        let Some(parent) = doc.parent(current) else {
            return false;
        };
        if compound_matches(target, doc, parent) && matches_upward(chain, idx - 1, doc, root, parent)
        {
            return true;
        }
        if combinator == Combinator::Child || parent == root {
            return false;
        }
        current = parent;
    }
}

fn compound_matches(compound: &Compound, doc: &Document, node: NodeId) -> bool {
    compound.conditions.iter().all(|cond| match cond {
        Condition::Tag(tag) => doc.tag(node) == Some(tag.as_str()),
        Condition::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
        Condition::Class(class) => doc
            .attr(node, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class)),
        Condition::AttrExists(name) => doc.attr(node, name).is_some(),
        Condition::AttrContains(name, value) => {
            doc.attr(node, name).is_some_and(|v| v.contains(value.as_str()))
        }
    })
}

fn parse_chain(input: &str) -> Option<Chain> {
    if input.is_empty() {
        return None;
    }
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    // Tokenize on whitespace, treating '>' as its own token.
    let spaced = input.replace('>', " > ");
    let mut pending: Option<Combinator> = None;
    for token in spaced.split_whitespace() {
        if token == ">" {
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(token)?;
        if !compounds.is_empty() {
            combinators.push(pending.unwrap_or(Combinator::Descendant));
        }
        compounds.push(compound);
        pending = None;
    }
    if compounds.is_empty() || pending.is_some() {
        return None;
    }
    Some(Chain {
        compounds,
        combinators,
    })
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut conditions = Vec::new();
    let mut rest = token;

    // Leading type selector.
    if let Some(end) = rest.find(['#', '.', '[']) {
        if end > 0 {
            if &rest[..end] != "*" {
                conditions.push(Condition::Tag(rest[..end].to_lowercase()));
            }
            rest = &rest[end..];
        }
    } else if !rest.is_empty() {
        if rest != "*" {
            conditions.push(Condition::Tag(rest.to_lowercase()));
        }
        rest = "";
    }

    while !rest.is_empty() {
        let (head, tail) = rest.split_at(1);
        match head {
            "#" | "." => {
                let end = tail.find(['#', '.', '[']).unwrap_or(tail.len());
                let name = &tail[..end];
                if name.is_empty() {
                    return None;
                }
                if head == "#" {
                    conditions.push(Condition::Id(name.to_string()));
                } else {
                    conditions.push(Condition::Class(name.to_string()));
                }
                rest = &tail[end..];
            }
            "[" => {
                let close = tail.find(']')?;
                let body = &tail[..close];
                if let Some((name, value)) = body.split_once("*=") {
                    let value = value.trim_matches(['"', '\'']);
                    conditions.push(Condition::AttrContains(
                        name.trim().to_lowercase(),
                        value.to_string(),
                    ));
                } else {
                    conditions.push(Condition::AttrExists(body.trim().to_lowercase()));
                }
                rest = &tail[close + 1..];
            }
            _ => return None,
        }
    }

    if conditions.is_empty() {
        // Bare "*" universal selector.
        return Some(Compound {
            conditions: Vec::new(),
        });
    }
    Some(Compound { conditions })
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    fn parse_doc(html: &str) -> Document {
        #[allow(clippy::unwrap_used)]
        Document::parse(html).unwrap()
    }

    #[test]
    fn type_selector_matches_in_document_order() {
        let doc = parse_doc("<div><p>1</p><span></span><p>2</p></div>");
        let found = doc.select(doc.body(), "p");
        assert_eq!(found.len(), 2);
        assert_eq!(doc.text(found[0]), "1");
        assert_eq!(doc.text(found[1]), "2");
    }

    #[test]
    fn id_and_class_selectors() {
        let doc = parse_doc(r#"<div id="main" class="post hentry">x</div><div class="posting">y</div>"#);
        assert_eq!(doc.select(doc.body(), "#main").len(), 1);
        assert_eq!(doc.select(doc.body(), ".post").len(), 1);
        assert_eq!(doc.select(doc.body(), ".hentry").len(), 1);
        // Class matching is word-exact, not substring.
        assert_eq!(doc.select(doc.body(), "div.post").len(), 1);
    }

    #[test]
    fn attribute_contains_selector() {
        let doc = parse_doc(r#"<div id="article-body">a</div><div id="sidebar">b</div>"#);
        let found = doc.select(doc.body(), r#"[id*="article"]"#);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text(found[0]), "a");
        // Unquoted value works too.
        assert_eq!(doc.select(doc.body(), "[id*=article]").len(), 1);
    }

    #[test]
    fn bare_attribute_selector() {
        let doc = parse_doc(r#"<div data-readable-focus="1">a</div><div>b</div>"#);
        let found = doc.select(doc.body(), "[data-readable-focus]");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn descendant_combinator() {
        let doc = parse_doc("<div><section><p>in</p></section></div><p>out</p>");
        let found = doc.select(doc.body(), "div p");
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text(found[0]), "in");
    }

    #[test]
    fn child_combinator_is_strict() {
        let doc = parse_doc("<div><p>direct</p><section><p>nested</p></section></div>");
        let found = doc.select(doc.body(), "div > p");
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text(found[0]), "direct");
    }

    #[test]
    fn comma_list_unions_in_document_order() {
        let doc = parse_doc("<article>a</article><main>b</main>");
        let found = doc.select(doc.body(), "article, main");
        assert_eq!(found.len(), 2);
        assert_eq!(doc.tag(found[0]), Some("article"));
        assert_eq!(doc.tag(found[1]), Some("main"));
    }

    #[test]
    fn compound_tag_and_class() {
        let doc = parse_doc(r#"<p class="lead">a</p><div class="lead">b</div>"#);
        let found = doc.select(doc.body(), "p.lead");
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text(found[0]), "a");
    }

    #[test]
    fn invalid_selector_yields_no_matches() {
        let doc = parse_doc("<p>x</p>");
        assert!(doc.select(doc.body(), "").is_empty());
        assert!(doc.select(doc.body(), "p >").is_empty());
    }
}
