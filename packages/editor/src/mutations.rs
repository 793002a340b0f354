//! # Tree Mutations
//!
//! Semantic edits applied to a freshly parsed [`SyntaxTree`]. Each mutation
//! only marks the nodes it touches dirty, so printing the tree afterwards
//! leaves every other byte of the source alone.
//!
//! ### InsertComponent
//! - Appends the component's element as the last child of the first root
//!   element
//! - Indentation follows the existing sibling layout
//! - Fails if the module contains no markup to insert into
//!
//! ### MergeProperties
//! - Locates the element by literal id (first match wins)
//! - Fails if no element carries the id; the tree is left unchanged
//!
//! Insert and merge reject property names that would not read back as a
//! single attribute name.
//!
//! ### AnchorId
//! - Writes a generated id onto the n-th vocabulary element
//! - An existing non-literal `id` attribute is overwritten in place

use crate::attributes::{children_nodes, AttributeCodec, MergeOutcome, CHILDREN_PROPERTY, ID_ATTRIBUTE};
use crate::discovery::{ComponentNode, ComponentVocabulary};
use crate::locator::{find_by_id, find_nth_in_vocabulary};
use crate::props::Properties;
use screenweave_parser::ast::{AttrValue, Attribute, Element, Node, NodeId, SyntaxTree, Text};
use screenweave_parser::is_valid_name;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a component's markup to the screen
    InsertComponent { component: ComponentNode },

    /// Merge a property set into the element carrying `component_id`
    MergeProperties {
        component_id: String,
        properties: Properties,
    },

    /// Write a generated id into the text
    AnchorId { ordinal: usize, id: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("No element to insert into")]
    NoInsertionPoint,

    #[error("No vocabulary element at position {0}")]
    AnchorNotFound(usize),

    #[error("Invalid property name: {0:?}")]
    InvalidPropertyName(String),
}

/// What a mutation did
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    Inserted { node: NodeId },
    Merged(MergeOutcome),
    Anchored { node: NodeId },
}

/// Settings mutations need to turn components into markup
#[derive(Debug, Clone, Default)]
pub struct EditContext {
    pub vocabulary: ComponentVocabulary,
    pub codec: AttributeCodec,
}

impl Mutation {
    /// Apply the mutation to a tree
    pub fn apply(&self, tree: &mut SyntaxTree, ctx: &EditContext) -> Result<MutationResult, MutationError> {
        match self {
            Mutation::InsertComponent { component } => {
                check_property_names(&component.properties)?;
                Self::apply_insert(tree, ctx, component)
            }

            Mutation::MergeProperties {
                component_id,
                properties,
            } => {
                check_property_names(properties)?;
                let node = find_by_id(tree, component_id)
                    .ok_or_else(|| MutationError::NodeNotFound(component_id.clone()))?;
                ctx.codec
                    .merge_properties(tree, node, properties)
                    .map(MutationResult::Merged)
                    .ok_or_else(|| MutationError::NodeNotFound(component_id.clone()))
            }

            Mutation::AnchorId { ordinal, id } => Self::apply_anchor(tree, ctx, *ordinal, id),
        }
    }

    fn apply_insert(
        tree: &mut SyntaxTree,
        ctx: &EditContext,
        component: &ComponentNode,
    ) -> Result<MutationResult, MutationError> {
        let tag = ctx
            .vocabulary
            .tag_for_type(&component.type_tag)
            .ok_or_else(|| MutationError::UnknownComponentType(component.type_tag.clone()))?;

        let parent = tree
            .roots()
            .iter()
            .copied()
            .find(|&root| tree.element(root).is_some())
            .ok_or(MutationError::NoInsertionPoint)?;

        let mut element = Element::new(tag);
        element.attributes.push(Attribute::new(
            ID_ATTRIBUTE,
            AttrValue::Quoted {
                value: component.id.clone(),
                quote: '"',
            },
        ));
        for (name, value) in component.properties.iter() {
            if name == ID_ATTRIBUTE || name == CHILDREN_PROPERTY {
                continue;
            }
            element
                .attributes
                .push(Attribute::new(name, ctx.codec.encode(name, value)));
        }

        let (mut index, indent) = insertion_point(tree, parent);
        if let Some(indent) = indent {
            tree.insert_child(parent, index, Node::Text(Text::new(indent)));
            index += 1;
        }
        let node = tree
            .insert_child(parent, index, Node::Element(element))
            .ok_or(MutationError::NoInsertionPoint)?;

        if let Some(children) = component.properties.get(CHILDREN_PROPERTY) {
            let nodes = children_nodes(&children.to_text());
            if !nodes.is_empty() {
                tree.replace_children(node, nodes);
            }
        }

        Ok(MutationResult::Inserted { node })
    }

    fn apply_anchor(
        tree: &mut SyntaxTree,
        ctx: &EditContext,
        ordinal: usize,
        id: &str,
    ) -> Result<MutationResult, MutationError> {
        let node = find_nth_in_vocabulary(tree, ctx.vocabulary.tags(), ordinal)
            .ok_or(MutationError::AnchorNotFound(ordinal))?;
        let element = tree
            .element_mut(node)
            .ok_or(MutationError::AnchorNotFound(ordinal))?;

        let value = AttrValue::Quoted {
            value: id.to_string(),
            quote: '"',
        };
        match element.attributes.iter_mut().find(|attr| attr.name == ID_ATTRIBUTE) {
            Some(attr) => {
                attr.value = value;
                attr.span = None;
            }
            None => element.attributes.insert(0, Attribute::new(ID_ATTRIBUTE, value)),
        }

        Ok(MutationResult::Anchored { node })
    }
}

/// Child index for a new last child, plus the whitespace to put before it.
///
/// When the parent's children are laid out one per line, the new child gets
/// the same line break and indent as the last existing sibling and goes before
/// the trailing whitespace that precedes the closing tag.
/// Every property must print as one attribute name
pub fn check_property_names(properties: &Properties) -> Result<(), MutationError> {
    match properties.keys().find(|name| !is_valid_name(name)) {
        Some(name) => Err(MutationError::InvalidPropertyName(name.to_string())),
        None => Ok(()),
    }
}

fn insertion_point(tree: &SyntaxTree, parent: NodeId) -> (usize, Option<String>) {
    let children = tree.children(parent);
    let whitespace = |node: NodeId| match tree.node(node) {
        Some(Node::Text(text)) if text.content.trim().is_empty() && text.content.contains('\n') => {
            Some(text.content.clone())
        }
        _ => None,
    };

    let Some(&last) = children.last() else {
        return (0, None);
    };
    let Some(trailing) = whitespace(last) else {
        return (children.len(), None);
    };

    let sibling_indent = children
        .windows(2)
        .rev()
        .find(|pair| matches!(tree.node(pair[1]), Some(Node::Element(_) | Node::Expression(_))))
        .and_then(|pair| whitespace(pair[0]));

    // No sibling to copy from: indent one level past the closing tag
    let indent = sibling_indent.unwrap_or_else(|| format!("{}  ", trailing));

    (children.len() - 1, Some(indent))
}
