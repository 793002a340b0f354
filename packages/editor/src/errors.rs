//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] screenweave_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    /// An edit printed text that no longer parses; nothing was committed
    #[error("Edited text failed to parse: {0}")]
    InvalidOutput(screenweave_parser::ParseError),
}
