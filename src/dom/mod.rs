//! Document model adapter.
//!
//! Parsing is delegated to `dom_query` (html5ever underneath), which is
//! lenient: it auto-closes and auto-wraps malformed markup and only the
//! complete absence of a document structure is treated as a parse failure.
//! The parsed tree is then converted into an owned arena of nodes addressed
//! by [`NodeId`], with explicit parent/child edges, so that remove, replace
//! and unwrap are well-defined structural edits instead of aliasing hazards.
//!
//! All mutation operations are synchronous and immediately visible to
//! subsequent queries on the same [`Document`].

mod select;

pub use select::Selector;

use tendril::StrTendril;

use crate::error::{Error, Result};

/// Handle addressing one node inside a [`Document`] arena.
///
/// Ids are only meaningful for the document that produced them. Detached
/// nodes keep their slot until the document is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a node: element, text or comment.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Element with lowercase tag name and insertion-ordered attributes.
    Element {
        /// Lowercase tag name.
        tag: String,
        /// Attribute pairs in insertion order.
        attrs: Vec<(String, String)>,
    },
    /// Text content, entity-decoded at parse time.
    Text(String),
    /// Comment node. Dropped by the first simplification pass.
    Comment(String),
}

#[derive(Debug, Clone)]
struct TreeNode {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Void elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// An owned, mutable HTML tree.
///
/// Invariant after [`Document::parse`]: exactly one `html` element holding
/// `head` and `body` children, in that order.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<TreeNode>,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Parse an HTML string into an owned document tree.
    ///
    /// The underlying parser is lenient; merely malformed nesting never
    /// fails. `Error::Parse` is returned when no document structure can be
    /// recovered at all, `Error::Structure` when the parse produced a tree
    /// without a body.
    pub fn parse(html: &str) -> Result<Self> {
        let src = dom_query::Document::from(html);
        let html_sel = src.select("html");
        let Some(html_node) = html_sel.nodes().first() else {
            return Err(Error::Parse("no html element could be recovered".into()));
        };

        let mut doc = Self {
            nodes: Vec::new(),
            html: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        let root = doc.convert(html_node, None);
        doc.html = root;

        let mut head = None;
        let mut body = None;
        for &child in doc.children(root) {
            match doc.tag(child) {
                Some("head") if head.is_none() => head = Some(child),
                Some("body") if body.is_none() => body = Some(child),
                _ => {}
            }
        }
        doc.head = match head {
            Some(id) => id,
            None => {
                let id = doc.new_element("head");
                doc.insert_child_at(root, 0, id);
                id
            }
        };
        doc.body = body.ok_or_else(|| Error::Structure("parse produced no body".into()))?;
        Ok(doc)
    }

    fn convert(&mut self, node: &dom_query::NodeRef, parent: Option<NodeId>) -> NodeId {
        let data = if node.is_element() {
            let tag = node
                .node_name()
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| "div".to_string());
            let attrs = node
                .attrs()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            NodeData::Element { tag, attrs }
        } else if node.is_text() {
            // The parser hands text back as a shared tendril; the arena
            // takes one flattened owned copy.
            let text: StrTendril = node.text();
            NodeData::Text(text.to_string())
        } else {
            NodeData::Comment(String::new())
        };

        let id = self.push(data, parent);
        if node.is_element() {
            for child in node.children() {
                let child_id = self.convert(&child, Some(id));
                self.nodes[id.0].children.push(child_id);
            }
        }
        id
    }

    fn push(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });
        id
    }

    // === Structure accessors ===

    /// Root `html` element.
    #[must_use]
    pub fn html(&self) -> NodeId {
        self.html
    }

    /// The `head` element.
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `body` element. Always present post-parse.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Node payload.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Lowercase tag name, or `None` for text/comment nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element { .. })
    }

    /// Whether the node is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Text(_))
    }

    /// Whether the node is a comment.
    #[must_use]
    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Comment(_))
    }

    /// Parent node, `None` for the root or detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// All nodes under `id` in document (pre-)order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    // === Attributes ===

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// All attribute pairs in insertion order.
    #[must_use]
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Set or replace an attribute. No-op on non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            if let Some(pair) = attrs.iter_mut().find(|(k, _)| k == name) {
                pair.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            attrs.retain(|(k, _)| k != name);
        }
    }

    /// Drop every attribute whose name is not in `allowed`.
    pub fn retain_attrs(&mut self, id: NodeId, allowed: &[&str]) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            attrs.retain(|(k, _)| allowed.contains(&k.as_str()));
        }
    }

    // === Text and serialization ===

    /// Concatenated descendant text.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut out = StrTendril::new();
        self.collect_text(id, &mut out);
        out.to_string()
    }

    fn collect_text(&self, id: NodeId, out: &mut StrTendril) {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => out.push_slice(t),
            NodeData::Element { .. } => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            NodeData::Comment(_) => {}
        }
    }

    /// Serialized HTML of the node and its subtree.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialized HTML of the node's children only.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize the whole document (from the `html` element down).
    #[must_use]
    pub fn serialize(&self) -> String {
        self.outer_html(self.html)
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => out.push_str(&escape_text(t)),
            NodeData::Comment(_) => {}
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    // === Selection ===

    /// Select descendants of `root` matching a CSS selector.
    ///
    /// Supported: type selectors, `#id`, `.class`, `[attr*=value]`,
    /// descendant (space) and child (`>`) combinators, comma lists.
    /// Results are in document order, deduplicated.
    #[must_use]
    pub fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        Selector::parse(selector).map_or_else(Vec::new, |sel| sel.select(self, root))
    }

    // === Mutation ===

    /// Create a new detached element.
    pub fn new_element(&mut self, tag: &str) -> NodeId {
        self.push(
            NodeData::Element {
                tag: tag.to_lowercase(),
                attrs: Vec::new(),
            },
            None,
        )
    }

    /// Create a new detached text node.
    pub fn new_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()), None)
    }

    /// Replace the content of a text node. No-op on non-text nodes.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(t) = &mut self.nodes[id.0].data {
            *t = text.to_string();
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at `index` within `parent`'s children.
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let len = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.insert(index.min(len), child);
    }

    /// Position of `id` within its parent's child list.
    #[must_use]
    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Detach a node from its parent. The subtree stays intact and can be
    /// re-inserted elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Remove a node and its subtree from the tree.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Splice a node's children into its parent at the node's position and
    /// drop the node itself. No-op on the root.
    pub fn unwrap(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let Some(pos) = self.position_in_parent(id) else {
            return;
        };
        let children: Vec<NodeId> = self.children(id).to_vec();
        self.detach(id);
        for (i, child) in children.into_iter().enumerate() {
            self.insert_child_at(parent, pos + i, child);
        }
    }

    /// Parse an HTML fragment into this document's arena and return the
    /// resulting top-level detached nodes.
    pub fn parse_fragment(&mut self, fragment: &str) -> Vec<NodeId> {
        let wrapped = format!("<html><head></head><body>{fragment}</body></html>");
        let src = dom_query::Document::from(wrapped.as_str());
        let body_sel = src.select("body");
        let Some(body) = body_sel.nodes().first() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for child in body.children() {
            let id = self.convert(&child, None);
            out.push(id);
        }
        out
    }

    /// Replace a node with a parsed HTML fragment.
    pub fn replace_with(&mut self, id: NodeId, fragment: &str) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let Some(pos) = self.position_in_parent(id) else {
            return;
        };
        self.detach(id);
        let nodes = self.parse_fragment(fragment);
        for (i, node) in nodes.into_iter().enumerate() {
            self.insert_child_at(parent, pos + i, node);
        }
    }

    /// Insert a parsed HTML fragment immediately before a node.
    pub fn insert_before(&mut self, id: NodeId, fragment: &str) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let nodes = self.parse_fragment(fragment);
        for node in nodes {
            let Some(pos) = self.position_in_parent(id) else {
                return;
            };
            self.insert_child_at(parent, pos, node);
        }
    }

    /// Insert a parsed HTML fragment immediately after a node.
    pub fn insert_after(&mut self, id: NodeId, fragment: &str) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let nodes = self.parse_fragment(fragment);
        let mut anchor = id;
        for node in nodes {
            let Some(pos) = self.position_in_parent(anchor) else {
                return;
            };
            self.insert_child_at(parent, pos + 1, node);
            anchor = node;
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
