//! Find elements by their literal `id` attribute.

use screenweave_common::{collect_elements, walk_tree, Visitor, Walk};
use screenweave_parser::ast::{Element, NodeId, SyntaxTree};

/// Whether any `id` attribute on the element is the literal string `id`
pub fn has_literal_id(element: &Element, id: &str) -> bool {
    element
        .attributes
        .iter()
        .any(|attr| attr.name == "id" && attr.literal_string().as_deref() == Some(id))
}

/// First element, in document order, carrying `id`
pub fn find_by_id(tree: &SyntaxTree, id: &str) -> Option<NodeId> {
    struct Finder<'a> {
        id: &'a str,
        found: Option<NodeId>,
    }

    impl Visitor for Finder<'_> {
        fn visit_element(&mut self, _tree: &SyntaxTree, node: NodeId, element: &Element) -> Walk {
            if has_literal_id(element, self.id) {
                self.found = Some(node);
                return Walk::Stop;
            }
            Walk::Continue
        }
    }

    let mut finder = Finder { id, found: None };
    walk_tree(&mut finder, tree);
    finder.found
}

/// Every element carrying `id`, in document order
pub fn find_all_by_id(tree: &SyntaxTree, id: &str) -> Vec<NodeId> {
    collect_elements(tree, |element| has_literal_id(element, id))
}

/// The `n`-th (zero-based) element whose tag is one of `tags`
pub fn find_nth_in_vocabulary<'a, I>(tree: &SyntaxTree, tags: I, n: usize) -> Option<NodeId>
where
    I: IntoIterator<Item = &'a str>,
{
    let tags: Vec<&str> = tags.into_iter().collect();
    collect_elements(tree, |element| tags.contains(&element.tag.as_str()))
        .get(n)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenweave_parser::parse;

    #[test]
    fn test_first_document_order_match_wins() {
        let tree = parse(
            r#"const v = <div>
  <section><button id="dup" class="first"/></section>
  <button id="dup" class="second"/>
</div>;"#,
        )
        .unwrap();

        let found = find_by_id(&tree, "dup").unwrap();
        let element = tree.element(found).unwrap();
        assert_eq!(
            element.attribute("class").and_then(|a| a.literal_string()).as_deref(),
            Some("first")
        );
        assert_eq!(find_all_by_id(&tree, "dup").len(), 2);
    }

    #[test]
    fn test_literal_forms_only() {
        let tree = parse(r#"const v = <div><a id={"x"}/><b id={makeId()}/></div>;"#).unwrap();

        let found = find_by_id(&tree, "x").unwrap();
        assert_eq!(tree.element(found).unwrap().tag, "a");
        assert!(find_by_id(&tree, "makeId()").is_none());
        assert!(find_by_id(&tree, "missing").is_none());
    }

    #[test]
    fn test_finds_embedded_markup() {
        let tree = parse(r#"const v = <ul>{ok && <li id="in"/>}</ul>;"#).unwrap();
        assert!(find_by_id(&tree, "in").is_some());
    }

    #[test]
    fn test_find_nth_in_vocabulary() {
        let tree = parse("const v = <div><button/><span/><a/><button/></div>;").unwrap();

        let second = find_nth_in_vocabulary(&tree, ["button", "a"], 1).unwrap();
        assert_eq!(tree.element(second).unwrap().tag, "a");
        assert!(find_nth_in_vocabulary(&tree, ["button"], 2).is_none());
    }
}
