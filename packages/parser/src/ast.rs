use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Byte range in the source text a node was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Handle to a node stored in a [`SyntaxTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Markup node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element(Element),
    Text(Text),
    Expression(ExpressionContainer),
}

/// Tag-like markup node (`<button id="a">…</button>`, `<br/>`, `<>…</>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Empty for fragments
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<NodeId>,
    pub self_closing: bool,
    pub parent: Option<NodeId>,
    /// Whole element, `None` when synthesized
    pub span: Option<Span>,
    /// `<tag …>` or `<tag …/>`
    pub open_tag: Option<Span>,
    /// Whitespace between the last attribute and `>`/`/>`
    pub open_tag_padding: String,
    /// `</tag>`
    pub close_tag: Option<Span>,
}

/// Name/value pair on an opening tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Empty for spreads
    pub name: String,
    pub value: AttrValue,
    /// Whitespace preceding the attribute
    pub leading: String,
    /// `None` once the attribute is rewritten
    pub span: Option<Span>,
}

/// Attribute value forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AttrValue {
    /// `disabled`
    Presence,
    /// `class="btn"` / `class='btn'`
    Quoted { value: String, quote: char },
    /// `count={3}`; holds the text between the braces
    Expression { source: String },
    /// `{...rest}`; holds the text after the dots
    Spread { source: String },
}

/// Literal text between tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub parent: Option<NodeId>,
    pub span: Option<Span>,
}

/// `{…}` child; markup found inside it is parsed into `embedded`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContainer {
    /// Text between the braces
    pub source: String,
    pub embedded: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub span: Option<Span>,
}

impl Attribute {
    /// New attribute with no source position
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Self {
            name: name.into(),
            value,
            leading: " ".to_string(),
            span: None,
        }
    }

    pub fn is_spread(&self) -> bool {
        matches!(self.value, AttrValue::Spread { .. })
    }

    /// Literal string value of the attribute, if it has one.
    ///
    /// Accepts `name="x"`, `name='x'` and `name={"x"}`.
    pub fn literal_string(&self) -> Option<String> {
        match &self.value {
            AttrValue::Quoted { value, .. } => Some(value.clone()),
            AttrValue::Expression { source } => string_literal(source),
            _ => None,
        }
    }
}

/// Unquote a JavaScript string literal (`"a"`, `'a'`), ignoring surrounding whitespace
pub fn string_literal(source: &str) -> Option<String> {
    let trimmed = source.trim();
    if trimmed.len() < 2 {
        return None;
    }
    let quote = trimmed.chars().next()?;
    if (quote != '"' && quote != '\'') || !trimmed.ends_with(quote) {
        return None;
    }

    let body = &trimmed[1..trimmed.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let code = u32::from_str_radix(&hex, 16).ok()?;
                    out.push(char::from_u32(code)?);
                }
                other => out.push(other),
            },
            c if c == quote => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

/// Parsed source text: an arena of markup nodes plus the text they came from.
///
/// The tree is a snapshot. Once the text it was parsed from changes, callers
/// must parse again rather than keep using it.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    dirty: HashSet<NodeId>,
}

impl SyntaxTree {
    pub(crate) fn new(source: String) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            roots: Vec::new(),
            dirty: HashSet::new(),
        }
    }

    pub(crate) fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// Original text the tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level markup found in the module code, in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0) {
            Some(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Mutable element access; marks the element dirty
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Element(element)) => {
                self.dirty.insert(id);
                Some(element)
            }
            _ => None,
        }
    }

    /// Add a node to the arena without attaching it anywhere
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Mark a node as modified so the printer re-serializes it
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Child nodes of an element, or the embedded roots of an expression
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0) {
            Some(Node::Element(element)) => &element.children,
            Some(Node::Expression(expr)) => &expr.embedded,
            _ => &[],
        }
    }

    /// Replace an element's attribute list
    pub fn set_attributes(&mut self, id: NodeId, attributes: Vec<Attribute>) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.attributes = attributes;
                true
            }
            None => false,
        }
    }

    /// Replace every child of an element with new nodes
    pub fn replace_children(&mut self, id: NodeId, nodes: Vec<Node>) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let mut children = Vec::with_capacity(nodes.len());
        for node in nodes {
            let child = self.alloc(node);
            self.set_parent(child, id);
            children.push(child);
        }
        if let Some(element) = self.element_mut(id) {
            element.children = children;
            element.self_closing = false;
        }
        true
    }

    /// Insert a node into an element's child list at `index` (clamped)
    pub fn insert_child(&mut self, parent: NodeId, index: usize, node: Node) -> Option<NodeId> {
        self.element(parent)?;
        let child = self.alloc(node);
        self.set_parent(child, parent);
        let element = self.element_mut(parent)?;
        let index = index.min(element.children.len());
        element.children.insert(index, child);
        element.self_closing = false;
        Some(child)
    }

    pub(crate) fn replace_node(&mut self, id: NodeId, node: Node) {
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = node;
        }
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        match self.nodes.get_mut(id.0) {
            Some(Node::Element(element)) => element.parent = Some(parent),
            Some(Node::Text(text)) => text.parent = Some(parent),
            Some(Node::Expression(expr)) => expr.parent = Some(parent),
            None => {}
        }
    }

    /// Every element in document order (pre-order, embedded markup included)
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if matches!(self.node(id), Some(Node::Element(_))) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl Element {
    /// New element with no source position
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
            parent: None,
            span: None,
            open_tag: None,
            open_tag_padding: String::new(),
            close_tag: None,
        }
    }

    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    /// First attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Literal value of the first `id` attribute
    pub fn id(&self) -> Option<String> {
        self.attribute("id").and_then(Attribute::literal_string)
    }

    /// Whether the element was a self-closing tag when parsed
    pub fn was_self_closing(&self) -> bool {
        self.span.is_some() && self.close_tag.is_none()
    }
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent: None,
            span: None,
        }
    }
}

impl ExpressionContainer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            embedded: Vec::new(),
            parent: None,
            span: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_unquoting() {
        assert_eq!(string_literal(r#""abc""#), Some("abc".to_string()));
        assert_eq!(string_literal(" 'a\\'b' "), Some("a'b".to_string()));
        assert_eq!(string_literal(r#""line\nbreak""#), Some("line\nbreak".to_string()));
        assert_eq!(string_literal(r#""A""#), Some("A".to_string()));
        assert_eq!(string_literal("abc"), None);
        assert_eq!(string_literal(r#""a" + "b""#), None);
    }

    #[test]
    fn test_literal_string_forms() {
        let quoted = Attribute::new(
            "id",
            AttrValue::Quoted {
                value: "x".to_string(),
                quote: '"',
            },
        );
        let expr = Attribute::new(
            "id",
            AttrValue::Expression {
                source: "'x'".to_string(),
            },
        );
        let other = Attribute::new(
            "id",
            AttrValue::Expression {
                source: "makeId()".to_string(),
            },
        );

        assert_eq!(quoted.literal_string().as_deref(), Some("x"));
        assert_eq!(expr.literal_string().as_deref(), Some("x"));
        assert_eq!(other.literal_string(), None);
    }

    #[test]
    fn test_insert_child_clears_self_closing() {
        let mut tree = SyntaxTree::new(String::new());
        let root = tree.alloc(Node::Element(Element::new("div")));
        tree.push_root(root);

        let child = tree
            .insert_child(root, 10, Node::Text(Text::new("hi")))
            .unwrap();

        let element = tree.element(root).unwrap();
        assert_eq!(element.children, vec![child]);
        assert!(!element.self_closing);
        assert!(tree.is_dirty(root));
        assert_eq!(tree.elements(), vec![root]);
    }
}
