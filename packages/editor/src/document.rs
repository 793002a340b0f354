//! # Document Handle
//!
//! A Document holds the last accepted source text of one screen. Every edit
//! parses that text afresh, mutates the tree, prints it and re-parses the
//! result before committing, so the held text is always valid.
//!
//! ```text
//! source ──parse──▶ tree ──mutations──▶ tree' ──print──▶ source' ──parse──▶ commit
//! ```

use crate::discovery::{discover_components, ComponentNode, ComponentVocabulary};
use crate::mutations::{EditContext, Mutation, MutationResult};
use crate::EditorError;
use screenweave_parser::ast::SyntaxTree;
use screenweave_parser::{parse, print, IdGenerator};
use tracing::{debug, warn};

/// Last known-good source text of a screen
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source: String,
    /// Increments on each committed change
    version: u64,
}

impl Document {
    /// Create a document, rejecting text that does not parse
    pub fn from_source(source: impl Into<String>) -> Result<Self, EditorError> {
        let source = source.into();
        parse(&source)?;
        Ok(Self { source, version: 0 })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Fresh tree for the current text
    pub fn tree(&self) -> Result<SyntaxTree, EditorError> {
        Ok(parse(&self.source)?)
    }

    /// Components in the current text
    pub fn components(
        &self,
        vocabulary: &ComponentVocabulary,
        ids: &mut IdGenerator,
    ) -> Result<Vec<ComponentNode>, EditorError> {
        Ok(discover_components(&self.tree()?, vocabulary, ids))
    }

    /// Apply a single mutation
    pub fn apply(&mut self, mutation: Mutation, ctx: &EditContext) -> Result<MutationResult, EditorError> {
        let mut tree = self.tree()?;
        let result = mutation.apply(&mut tree, ctx)?;
        self.commit_tree(&tree)?;
        Ok(result)
    }

    /// Apply mutations in order to one fresh tree and commit the printed text.
    ///
    /// All or nothing: if any mutation fails, or the printed text would not
    /// parse, the document keeps its current text.
    pub fn apply_all(
        &mut self,
        mutations: &[Mutation],
        ctx: &EditContext,
    ) -> Result<Vec<MutationResult>, EditorError> {
        let mut tree = self.tree()?;
        let results = mutations
            .iter()
            .map(|mutation| mutation.apply(&mut tree, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        self.commit_tree(&tree)?;
        Ok(results)
    }

    /// Replace the text wholesale (free-text editing).
    ///
    /// Returns `Ok(false)` when `text` equals the current text.
    pub fn replace_source(&mut self, text: &str) -> Result<bool, EditorError> {
        if text == self.source {
            return Ok(false);
        }
        parse(text)?;
        self.commit(text.to_string());
        Ok(true)
    }

    fn commit_tree(&mut self, tree: &SyntaxTree) -> Result<(), EditorError> {
        if !tree.has_changes() {
            debug!(version = self.version, "edit left the document unchanged");
            return Ok(());
        }

        let printed = print(tree);
        if let Err(err) = parse(&printed) {
            warn!(error = %err, "edited text does not parse; keeping previous text");
            return Err(EditorError::InvalidOutput(err));
        }

        self.commit(printed);
        Ok(())
    }

    fn commit(&mut self, source: String) {
        if source != self.source {
            self.source = source;
            self.version += 1;
            debug!(version = self.version, "committed document text");
        }
    }
}
