//! Whole-tree component discovery.

use crate::attributes::extract_properties;
use crate::props::Properties;
use screenweave_common::collect_elements;
use screenweave_parser::ast::SyntaxTree;
use screenweave_parser::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Where a component's id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum IdOrigin {
    /// Literally present in the source text
    Source,
    /// Generated for the `ordinal`-th vocabulary element, which has no id in
    /// the text yet
    Generated { ordinal: usize },
}

/// A component the canvas and property grid work with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: String,
    pub type_tag: String,
    pub properties: Properties,
    pub origin: IdOrigin,
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            properties,
            origin: IdOrigin::Source,
        }
    }

    /// Whether the id is written in the source text
    pub fn is_anchored(&self) -> bool {
        self.origin == IdOrigin::Source
    }
}

/// Maps component type tags (`Button`) to element tag names (`button`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentVocabulary {
    entries: Vec<(String, String)>,
}

impl Default for ComponentVocabulary {
    fn default() -> Self {
        Self {
            entries: vec![("Button".to_string(), "button".to_string())],
        }
    }
}

impl ComponentVocabulary {
    /// Vocabulary with no entries
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add or replace the mapping for `type_tag`
    pub fn register(&mut self, type_tag: impl Into<String>, tag_name: impl Into<String>) {
        let type_tag = type_tag.into();
        let tag_name = tag_name.into();
        match self.entries.iter_mut().find(|(t, _)| *t == type_tag) {
            Some(entry) => entry.1 = tag_name,
            None => self.entries.push((type_tag, tag_name)),
        }
    }

    /// Built-in entries plus `extra`, which wins on conflicts
    pub fn with_entries(extra: &BTreeMap<String, String>) -> Self {
        let mut vocabulary = Self::default();
        for (type_tag, tag_name) in extra {
            vocabulary.register(type_tag.clone(), tag_name.clone());
        }
        vocabulary
    }

    pub fn tag_for_type(&self, type_tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == type_tag)
            .map(|(_, tag)| tag.as_str())
    }

    pub fn type_for_tag(&self, tag_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, tag)| tag == tag_name)
            .map(|(t, _)| t.as_str())
    }

    pub fn contains_tag(&self, tag_name: &str) -> bool {
        self.type_for_tag(tag_name).is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, tag)| tag.as_str())
    }

    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }
}

/// Every vocabulary element in the tree as a component, in document order.
///
/// Elements without a literal id get one from `ids` and are marked
/// [`IdOrigin::Generated`]. When several elements share an id only the first
/// is kept.
pub fn discover_components(
    tree: &SyntaxTree,
    vocabulary: &ComponentVocabulary,
    ids: &mut IdGenerator,
) -> Vec<ComponentNode> {
    let elements = collect_elements(tree, |element| vocabulary.contains_tag(&element.tag));

    ids.reserve(
        tree.elements()
            .into_iter()
            .filter_map(|node| tree.element(node).and_then(|e| e.id())),
    );

    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(elements.len());

    for (ordinal, node) in elements.into_iter().enumerate() {
        let Some(element) = tree.element(node) else {
            continue;
        };
        let Some(type_tag) = vocabulary.type_for_tag(&element.tag) else {
            continue;
        };
        let properties = extract_properties(tree, node);

        let (id, origin) = match element.id() {
            Some(id) => (id, IdOrigin::Source),
            None => (ids.new_id(), IdOrigin::Generated { ordinal }),
        };

        if !seen.insert(id.clone()) {
            debug!(id = %id, ordinal, "dropping component with duplicate id");
            continue;
        }

        components.push(ComponentNode {
            id,
            type_tag: type_tag.to_string(),
            properties,
            origin,
        });
    }

    debug!(count = components.len(), "discovered components");
    components
}
