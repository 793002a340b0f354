//! Attribute merge and extraction.
//!
//! Properties travel in both directions between a component's property map and
//! the attributes written on its element:
//!
//! | value              | attribute text                              |
//! |--------------------|---------------------------------------------|
//! | `Bool(true)`       | `disabled`                                  |
//! | `Bool(false)`      | `disabled={false}`                          |
//! | `Number(3.0)`      | `count={3}`                                 |
//! | event handler text | `onClick={() => go()}`                      |
//! | `String`           | `class="btn"` / `title='say "hi"'`          |
//! | `Structured`       | `style={{"color":"red"}}`                   |
//!
//! `children` is not an attribute: it becomes the element's text content.

use crate::props::{format_number, parse_number, PropValue, Properties};
use screenweave_parser::ast::{string_literal, AttrValue, Attribute, Node, NodeId, SyntaxTree, Text};
use screenweave_parser::serializer::{needs_expression, quote_string};
use screenweave_parser::{is_valid_name, tokenize, validate_expression, ExpressionContainer, Token};
use tracing::debug;
use serde::Serialize;

pub const ID_ATTRIBUTE: &str = "id";
pub const CHILDREN_PROPERTY: &str = "children";
pub const DEFAULT_EVENT_PREFIX: &str = "on";

/// What a merge changed on the element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// Existing attributes rewritten in place
    pub changed: Vec<String>,
    /// Attributes appended after the existing ones
    pub added: Vec<String>,
    pub children_replaced: bool,
    pub duplicate_ids_removed: usize,
}

impl MergeOutcome {
    /// Whether the merge left the element's text untouched
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
            && self.added.is_empty()
            && !self.children_replaced
            && self.duplicate_ids_removed == 0
    }
}

/// Encodes property values as attribute values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCodec {
    event_prefix: String,
}

impl Default for AttributeCodec {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_PREFIX)
    }
}

impl AttributeCodec {
    pub fn new(event_prefix: impl Into<String>) -> Self {
        Self {
            event_prefix: event_prefix.into(),
        }
    }

    pub fn event_prefix(&self) -> &str {
        &self.event_prefix
    }

    /// Attribute value for a property
    pub fn encode(&self, name: &str, value: &PropValue) -> AttrValue {
        match value {
            PropValue::Bool(true) => AttrValue::Presence,
            PropValue::Bool(false) => AttrValue::Expression {
                source: "false".to_string(),
            },
            PropValue::Number(n) => AttrValue::Expression {
                source: format_number(*n),
            },
            PropValue::String(text) if self.is_event_handler(name, text) => AttrValue::Expression {
                source: text.trim().to_string(),
            },
            PropValue::String(text) => encode_string(text),
            PropValue::Structured(json) => AttrValue::Expression {
                source: serde_json::to_string(json).unwrap_or_else(|_| "null".to_string()),
            },
        }
    }

    /// Event handlers are written as code rather than as a string
    pub fn is_event_handler(&self, name: &str, text: &str) -> bool {
        name.starts_with(&self.event_prefix)
            && (text.contains("=>") || mentions_function(text))
            && validate_expression(text).is_ok()
    }

    /// Merge `incoming` into the element's attributes and children.
    ///
    /// Returns `None` when `element` is not an element of the tree.
    pub fn merge_properties(
        &self,
        tree: &mut SyntaxTree,
        element: NodeId,
        incoming: &Properties,
    ) -> Option<MergeOutcome> {
        let current = tree.element(element)?.attributes.clone();
        let mut outcome = MergeOutcome::default();
        let mut attributes = Vec::with_capacity(current.len() + incoming.len());
        let mut seen_id = false;

        for attr in current.iter() {
            if attr.name == ID_ATTRIBUTE {
                if seen_id {
                    outcome.duplicate_ids_removed += 1;
                } else {
                    seen_id = true;
                    attributes.push(attr.clone());
                }
                continue;
            }

            let replacement = match incoming.get(&attr.name) {
                Some(value) if !attr.is_spread() && attr.name != CHILDREN_PROPERTY => {
                    if decode_value(&attr.value).as_ref() == Some(value) {
                        None
                    } else {
                        Some(self.encode(&attr.name, value))
                    }
                }
                _ => None,
            };

            match replacement {
                Some(value) => {
                    outcome.changed.push(attr.name.clone());
                    attributes.push(Attribute {
                        name: attr.name.clone(),
                        value,
                        leading: attr.leading.clone(),
                        span: None,
                    });
                }
                None => attributes.push(attr.clone()),
            }
        }

        for (name, value) in incoming.iter() {
            if name == ID_ATTRIBUTE || name == CHILDREN_PROPERTY {
                continue;
            }
            if current.iter().any(|attr| attr.name == name) {
                continue;
            }
            if !is_valid_name(name) {
                debug!(name, "skipping property that is not an attribute name");
                continue;
            }
            outcome.added.push(name.to_string());
            attributes.push(Attribute::new(name, self.encode(name, value)));
        }

        if !outcome.changed.is_empty() || !outcome.added.is_empty() || outcome.duplicate_ids_removed > 0 {
            tree.set_attributes(element, attributes);
        }

        if let Some(value) = incoming.get(CHILDREN_PROPERTY) {
            let text = value.to_text();
            let existing = children_text(tree, element).unwrap_or_default();
            if existing != text.trim() {
                tree.replace_children(element, children_nodes(&text));
                outcome.children_replaced = true;
            }
        }

        Some(outcome)
    }
}

/// Merge with the default event prefix
pub fn merge_properties(tree: &mut SyntaxTree, element: NodeId, incoming: &Properties) -> Option<MergeOutcome> {
    AttributeCodec::default().merge_properties(tree, element, incoming)
}

/// Read an element's properties back out of its attributes and text children.
///
/// `id` and spread attributes are not properties. When an attribute name
/// repeats, the first occurrence is used.
pub fn extract_properties(tree: &SyntaxTree, element: NodeId) -> Properties {
    let mut props = Properties::new();
    let Some(el) = tree.element(element) else {
        return props;
    };

    for attr in &el.attributes {
        if attr.name == ID_ATTRIBUTE || props.contains_key(&attr.name) {
            continue;
        }
        if let Some(value) = decode_value(&attr.value) {
            props.insert(attr.name.clone(), value);
        }
    }

    if let Some(text) = children_text(tree, element) {
        if !text.is_empty() {
            props.insert(CHILDREN_PROPERTY, text);
        }
    }

    props
}

/// Property value held by an attribute; `None` for spreads
pub fn decode_value(value: &AttrValue) -> Option<PropValue> {
    match value {
        AttrValue::Presence => Some(PropValue::Bool(true)),
        AttrValue::Quoted { value, .. } => Some(PropValue::String(value.clone())),
        AttrValue::Expression { source } => Some(decode_expression(source)),
        AttrValue::Spread { .. } => None,
    }
}

/// Interpret expression source without evaluating it
pub fn decode_expression(source: &str) -> PropValue {
    let trimmed = source.trim();
    match trimmed {
        "true" => return PropValue::Bool(true),
        "false" => return PropValue::Bool(false),
        _ => {}
    }

    if let Some(n) = parse_number(trimmed) {
        return PropValue::Number(n);
    }
    if let Some(s) = string_literal(trimmed) {
        return PropValue::String(s);
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed == "null" {
        if let Ok(json) = serde_json::from_str(trimmed) {
            return PropValue::Structured(json);
        }
    }

    PropValue::String(trimmed.to_string())
}

fn encode_string(text: &str) -> AttrValue {
    if !text.contains('"') {
        AttrValue::Quoted {
            value: text.to_string(),
            quote: '"',
        }
    } else if !text.contains('\'') {
        AttrValue::Quoted {
            value: text.to_string(),
            quote: '\'',
        }
    } else {
        AttrValue::Expression {
            source: quote_string(text),
        }
    }
}

fn mentions_function(text: &str) -> bool {
    tokenize(text)
        .iter()
        .any(|(token, _)| *token == Token::Ident("function"))
}

/// Concatenated, trimmed text of an element's direct text children
/// (string-literal expressions included); `None` if it has no such children
fn children_text(tree: &SyntaxTree, element: NodeId) -> Option<String> {
    let mut text = String::new();
    let mut found = false;

    for &child in tree.children(element) {
        match tree.node(child) {
            Some(Node::Text(t)) => {
                text.push_str(&t.content);
                found = true;
            }
            Some(Node::Expression(expr)) => {
                if let Some(s) = string_literal(&expr.source) {
                    text.push_str(&s);
                    found = true;
                }
            }
            _ => {}
        }
    }

    found.then(|| text.trim().to_string())
}

/// Child nodes carrying `text`
pub(crate) fn children_nodes(text: &str) -> Vec<Node> {
    if text.is_empty() {
        Vec::new()
    } else if needs_expression(text) {
        vec![Node::Expression(ExpressionContainer::new(quote_string(text)))]
    } else {
        vec![Node::Text(Text::new(text))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenweave_parser::{parse, print};
    use serde_json::json;

    fn merged(source: &str, incoming: Properties) -> (String, MergeOutcome) {
        let mut tree = parse(source).unwrap();
        let element = tree.elements()[0];
        let outcome = merge_properties(&mut tree, element, &incoming).unwrap();
        (print(&tree), outcome)
    }

    fn props(source: &str) -> Properties {
        let tree = parse(source).unwrap();
        extract_properties(&tree, tree.elements()[0])
    }

    #[test]
    fn test_merge_skips_names_that_are_not_attributes() {
        let source = r#"const v = <button id="b">Go</button>;"#;
        let incoming: Properties = [("my label", PropValue::from("x"))].into_iter().collect();

        let (text, outcome) = merged(source, incoming);
        assert_eq!(text, source);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_encode_values() {
        let codec = AttributeCodec::default();
        let render = |name: &str, value: PropValue| {
            screenweave_parser::serialize_attribute(&Attribute::new(name, codec.encode(name, &value)))
        };

        assert_eq!(render("disabled", true.into()), "disabled");
        assert_eq!(render("disabled", false.into()), "disabled={false}");
        assert_eq!(render("count", 3.into()), "count={3}");
        assert_eq!(render("ratio", 0.25.into()), "ratio={0.25}");
        assert_eq!(render("class", "btn".into()), r#"class="btn""#);
        assert_eq!(render("title", r#"say "hi""#.into()), r#"title='say "hi"'"#);
        assert_eq!(render("title", r#"it's "x""#.into()), r#"title={"it's \"x\""}"#);
        assert_eq!(
            render("onClick", "() => console.log('x')".into()),
            "onClick={() => console.log('x')}"
        );
        assert_eq!(
            render("style", json!({"color": "red"}).into()),
            r#"style={{"color":"red"}}"#
        );
    }

    #[test]
    fn test_event_handler_detection() {
        let codec = AttributeCodec::default();
        assert!(codec.is_event_handler("onClick", "function () { go(); }"));
        assert!(!codec.is_event_handler("onClick", "go"));
        assert!(!codec.is_event_handler("title", "() => x"));
        // Unbalanced code is kept as a string
        assert!(!codec.is_event_handler("onClick", "() => { go("));
        assert!(!codec.is_event_handler("onClick", "functional => }"));

        let custom = AttributeCodec::new("handle");
        assert!(custom.is_event_handler("handleTap", "() => tap()"));
        assert!(!custom.is_event_handler("onTap", "() => tap()"));
    }

    #[test]
    fn test_merge_preserves_unmatched_attributes() {
        let (text, outcome) = merged(
            r#"const v = <button id="x"  a={1} b={2}>Go</button>;"#,
            [("b", 3)].into_iter().collect(),
        );

        assert_eq!(text, r#"const v = <button id="x"  a={1} b={3}>Go</button>;"#);
        assert_eq!(outcome.changed, vec!["b"]);
        assert!(outcome.added.is_empty());
    }

    #[test]
    fn test_merge_equal_value_is_noop() {
        let source = r#"const v = <button id="x" class='btn' disabled count={ 3 }>Go</button>;"#;
        let incoming: Properties = [
            ("class", PropValue::from("btn")),
            ("disabled", PropValue::from(true)),
            ("count", PropValue::from(3)),
            ("children", PropValue::from("Go")),
        ]
        .into_iter()
        .collect();

        let (text, outcome) = merged(source, incoming);
        assert_eq!(text, source);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_merge_appends_new_attributes_in_order() {
        let (text, outcome) = merged(
            "const v = <button/>;",
            [("class", PropValue::from("btn")), ("disabled", PropValue::from(false))]
                .into_iter()
                .collect(),
        );

        assert_eq!(text, r#"const v = <button class="btn" disabled={false}/>;"#);
        assert_eq!(outcome.added, vec!["class", "disabled"]);
    }

    #[test]
    fn test_merge_never_takes_incoming_id() {
        let (text, _) = merged(
            r#"const v = <button id="keep"></button>;"#,
            [("id", "other")].into_iter().collect(),
        );
        assert_eq!(text, r#"const v = <button id="keep"></button>;"#);
    }

    #[test]
    fn test_merge_drops_duplicate_ids() {
        let (text, outcome) = merged(
            r#"const v = <button id="x" class="a" id="x"></button>;"#,
            Properties::new(),
        );

        assert_eq!(text, r#"const v = <button id="x" class="a"></button>;"#);
        assert_eq!(outcome.duplicate_ids_removed, 1);
        assert_eq!(text.matches("id=").count(), 1);
    }

    #[test]
    fn test_merge_children() {
        let (text, outcome) = merged(
            "const v = <button />;",
            [("children", "Save")].into_iter().collect(),
        );
        assert_eq!(text, "const v = <button>Save</button>;");
        assert!(outcome.children_replaced);

        let (text, _) = merged(
            "const v = <button>Old <b>bold</b></button>;",
            [("children", "a < b")].into_iter().collect(),
        );
        assert_eq!(text, r#"const v = <button>{"a < b"}</button>;"#);
    }

    #[test]
    fn test_merge_spread_is_retained() {
        let (text, _) = merged(
            "const v = <button {...rest} a={1}/>;",
            [("a", 2)].into_iter().collect(),
        );
        assert_eq!(text, "const v = <button {...rest} a={2}/>;");
    }

    #[test]
    fn test_extract_properties() {
        let extracted = props(
            r#"const v = <button id="b1" {...rest} class="btn" disabled hidden={false}
                n={4.5} label={'hi'} style={{"a": [1, 2]}} onClick={() => go()} other={x + 1}>
                  Click {"me"}
               </button>;"#,
        );

        assert_eq!(extracted.get("id"), None);
        assert_eq!(extracted.get("class"), Some(&PropValue::from("btn")));
        assert_eq!(extracted.get("disabled"), Some(&PropValue::Bool(true)));
        assert_eq!(extracted.get("hidden"), Some(&PropValue::Bool(false)));
        assert_eq!(extracted.get("n"), Some(&PropValue::Number(4.5)));
        assert_eq!(extracted.get("label"), Some(&PropValue::from("hi")));
        assert_eq!(
            extracted.get("style"),
            Some(&PropValue::Structured(json!({"a": [1, 2]})))
        );
        assert_eq!(extracted.get("onClick"), Some(&PropValue::from("() => go()")));
        assert_eq!(extracted.get("other"), Some(&PropValue::from("x + 1")));
        assert_eq!(extracted.get("children"), Some(&PropValue::from("Click me")));
        assert_eq!(extracted.len(), 9);
    }

    #[test]
    fn test_extract_non_json_object_falls_back_to_source() {
        let extracted = props("const v = <div style={{ color: 'red' }} />;");
        assert_eq!(
            extracted.get("style"),
            Some(&PropValue::from("{ color: 'red' }"))
        );
    }

    #[test]
    fn test_whitespace_only_children_are_not_a_property() {
        let extracted = props("const v = <div>\n   \n</div>;");
        assert!(extracted.get("children").is_none());
    }

    #[test]
    fn test_explicit_false_survives_merge_and_extract() {
        let mut tree = parse("const v = <button disabled>Go</button>;").unwrap();
        let element = tree.elements()[0];
        merge_properties(&mut tree, element, &[("disabled", false)].into_iter().collect());

        let reparsed = parse(&print(&tree)).unwrap();
        let extracted = extract_properties(&reparsed, reparsed.elements()[0]);
        assert_eq!(extracted.get("disabled"), Some(&PropValue::Bool(false)));
    }
}
