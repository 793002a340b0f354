use crate::ast::*;
use crate::serializer::serialize_attribute;

/// Lossless serializer that preserves original formatting using spans
///
/// This serializer enables minimal-diff editing:
/// 1. Parse source → tree with spans
/// 2. Edit the tree (attributes, children)
/// 3. Serialize → everything untouched is copied from the source
///
/// Strategy:
/// - Code between markup roots is copied verbatim
/// - Clean opening tags are copied verbatim; dirty ones are rebuilt from
///   their attributes, reusing each untouched attribute's original text
/// - Children always cover an element's interior, so clean children
///   reproduce it exactly and new children are serialized in place
pub struct LosslessSerializer<'a> {
    tree: &'a SyntaxTree,
}

impl<'a> LosslessSerializer<'a> {
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self { tree }
    }

    /// Serialize the whole module
    pub fn serialize(&self) -> String {
        let source = self.tree.source();
        let mut output = String::with_capacity(source.len());
        let mut last_end = 0;

        for &root in self.tree.roots() {
            let Some(span) = self.node_span(root) else {
                continue;
            };
            output.push_str(&source[last_end..span.start]);
            self.serialize_node(root, &mut output);
            last_end = span.end;
        }

        output.push_str(&source[last_end..]);
        output
    }

    /// Serialize a single node (and its subtree)
    pub fn serialize_node(&self, id: NodeId, output: &mut String) {
        match self.tree.node(id) {
            Some(Node::Element(element)) => self.serialize_element(id, element, output),
            Some(Node::Text(text)) => match text.span {
                Some(span) => output.push_str(self.slice(span)),
                None => output.push_str(&text.content),
            },
            Some(Node::Expression(expr)) => self.serialize_expression(expr, output),
            None => {}
        }
    }

    fn serialize_element(&self, id: NodeId, element: &Element, output: &mut String) {
        match element.open_tag {
            Some(span) if !self.tree.is_dirty(id) => output.push_str(self.slice(span)),
            _ => self.serialize_open_tag(element, output),
        }

        if element.self_closing {
            return;
        }

        for &child in &element.children {
            self.serialize_node(child, output);
        }

        match element.close_tag {
            Some(span) => output.push_str(self.slice(span)),
            None => {
                output.push_str("</");
                output.push_str(&element.tag);
                output.push('>');
            }
        }
    }

    fn serialize_open_tag(&self, element: &Element, output: &mut String) {
        output.push('<');
        output.push_str(&element.tag);

        for attr in &element.attributes {
            output.push_str(&attr.leading);
            match attr.span {
                Some(span) => output.push_str(self.slice(span)),
                None => output.push_str(&serialize_attribute(attr)),
            }
        }

        if element.self_closing {
            if element.open_tag.is_some() {
                output.push_str(&element.open_tag_padding);
            } else {
                output.push(' ');
            }
            output.push_str("/>");
        } else {
            // A tag that gained children drops the padding it had before `/>`
            if !element.was_self_closing() {
                output.push_str(&element.open_tag_padding);
            }
            output.push('>');
        }
    }

    fn serialize_expression(&self, expr: &ExpressionContainer, output: &mut String) {
        let Some(span) = expr.span else {
            output.push('{');
            output.push_str(&expr.source);
            output.push('}');
            return;
        };

        let mut last_end = span.start;
        for &child in &expr.embedded {
            let Some(child_span) = self.node_span(child) else {
                continue;
            };
            output.push_str(&self.tree.source()[last_end..child_span.start]);
            self.serialize_node(child, output);
            last_end = child_span.end;
        }
        output.push_str(&self.tree.source()[last_end..span.end]);
    }

    fn node_span(&self, id: NodeId) -> Option<Span> {
        match self.tree.node(id)? {
            Node::Element(element) => element.span,
            Node::Text(text) => text.span,
            Node::Expression(expr) => expr.span,
        }
    }

    fn slice(&self, span: Span) -> &'a str {
        &self.tree.source()[span.start..span.end]
    }
}

/// Print a tree back to source text, copying every untouched region verbatim
pub fn print(tree: &SyntaxTree) -> String {
    LosslessSerializer::new(tree).serialize()
}
