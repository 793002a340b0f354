//! # Screenweave Editor
//!
//! Component-level editing of screen source text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: source text ⇄ SyntaxTree            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: components over the tree            │
//! │  - Locate elements by literal id            │
//! │  - Merge/extract properties ⇄ attributes    │
//! │  - Discover components in document order    │
//! │  - Apply mutations, commit valid text only  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: screens, views, sync coordinator │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Source text is the truth**: trees are parsed per edit and thrown away
//! 2. **Minimal diffs**: only touched nodes are re-printed
//! 3. **Identity lives in the text**: a component is found by its `id` attribute
//!
//! ## Usage
//!
//! ```rust,ignore
//! use screenweave_editor::{Document, EditContext, Mutation};
//!
//! let mut doc = Document::from_source(source)?;
//! doc.apply(
//!     Mutation::MergeProperties {
//!         component_id: "comp-1a2b-1".to_string(),
//!         properties: [("disabled", true)].into_iter().collect(),
//!     },
//!     &EditContext::default(),
//! )?;
//! println!("{}", doc.source());
//! ```

pub mod attributes;
pub mod discovery;
pub mod document;
pub mod errors;
pub mod locator;
pub mod mutations;
pub mod props;

pub use attributes::{
    extract_properties, merge_properties, AttributeCodec, MergeOutcome, CHILDREN_PROPERTY,
    DEFAULT_EVENT_PREFIX, ID_ATTRIBUTE,
};
pub use discovery::{discover_components, ComponentNode, ComponentVocabulary, IdOrigin};
pub use document::Document;
pub use errors::EditorError;
pub use locator::{find_all_by_id, find_by_id, find_nth_in_vocabulary};
pub use mutations::{check_property_names, EditContext, Mutation, MutationError, MutationResult};
pub use props::{EditorKind, PropValue, Properties};
