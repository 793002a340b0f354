use screenweave_parser::ast::*;

/// What a visitor wants the walk to do after visiting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Descend into children
    Continue,
    /// Move on to the next sibling
    SkipChildren,
    /// End the whole walk
    Stop,
}

/// Visitor pattern for traversing a syntax tree in document order
///
/// This trait provides default implementations that walk the entire tree,
/// including markup embedded in `{…}` expression children. Override specific
/// visit_* methods to act on nodes; return [`Walk::Stop`] to end early.
pub trait Visitor: Sized {
    fn visit_element(&mut self, _tree: &SyntaxTree, _id: NodeId, _element: &Element) -> Walk {
        Walk::Continue
    }

    fn visit_text(&mut self, _tree: &SyntaxTree, _id: NodeId, _text: &Text) {
        // Leaf node, no children to walk
    }

    fn visit_expression(
        &mut self,
        _tree: &SyntaxTree,
        _id: NodeId,
        _expr: &ExpressionContainer,
    ) -> Walk {
        Walk::Continue
    }
}

/// Walk every root of the tree; returns [`Walk::Stop`] if the visitor stopped early
pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &SyntaxTree) -> Walk {
    for &root in tree.roots() {
        if walk_node(visitor, tree, root) == Walk::Stop {
            return Walk::Stop;
        }
    }
    Walk::Continue
}

/// Walk a node and its subtree (pre-order)
pub fn walk_node<V: Visitor>(visitor: &mut V, tree: &SyntaxTree, id: NodeId) -> Walk {
    let flow = match tree.node(id) {
        Some(Node::Element(element)) => visitor.visit_element(tree, id, element),
        Some(Node::Text(text)) => {
            visitor.visit_text(tree, id, text);
            Walk::SkipChildren
        }
        Some(Node::Expression(expr)) => visitor.visit_expression(tree, id, expr),
        None => Walk::SkipChildren,
    };

    match flow {
        Walk::Stop => Walk::Stop,
        Walk::SkipChildren => Walk::Continue,
        Walk::Continue => {
            for &child in tree.children(id) {
                if walk_node(visitor, tree, child) == Walk::Stop {
                    return Walk::Stop;
                }
            }
            Walk::Continue
        }
    }
}

/// Collect the ids of every element matching `predicate`, in document order
pub fn collect_elements<F>(tree: &SyntaxTree, predicate: F) -> Vec<NodeId>
where
    F: FnMut(&Element) -> bool,
{
    struct Collector<F> {
        predicate: F,
        found: Vec<NodeId>,
    }

    impl<F: FnMut(&Element) -> bool> Visitor for Collector<F> {
        fn visit_element(&mut self, _tree: &SyntaxTree, id: NodeId, element: &Element) -> Walk {
            if (self.predicate)(element) {
                self.found.push(id);
            }
            Walk::Continue
        }
    }

    let mut collector = Collector {
        predicate,
        found: Vec::new(),
    };
    walk_tree(&mut collector, tree);
    collector.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenweave_parser::parse;

    struct TagCollector {
        tags: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl Visitor for TagCollector {
        fn visit_element(&mut self, _tree: &SyntaxTree, _id: NodeId, element: &Element) -> Walk {
            self.tags.push(element.tag.clone());
            if self.stop_at == Some(element.tag.as_str()) {
                Walk::Stop
            } else {
                Walk::Continue
            }
        }
    }

    #[test]
    fn test_walk_is_document_order() {
        let tree = parse("const v = <a><b><c/></b>{x && <d/>}<e/></a>; const w = <f/>;").unwrap();
        let mut visitor = TagCollector {
            tags: Vec::new(),
            stop_at: None,
        };

        assert_eq!(walk_tree(&mut visitor, &tree), Walk::Continue);
        assert_eq!(visitor.tags, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_walk_stops_early() {
        let tree = parse("const v = <a><b/><c/></a>;").unwrap();
        let mut visitor = TagCollector {
            tags: Vec::new(),
            stop_at: Some("b"),
        };

        assert_eq!(walk_tree(&mut visitor, &tree), Walk::Stop);
        assert_eq!(visitor.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_collect_elements() {
        let tree = parse("const v = <div><button/><span/><button/></div>;").unwrap();
        let buttons = collect_elements(&tree, |e| e.tag == "button");
        assert_eq!(buttons.len(), 2);
    }
}
