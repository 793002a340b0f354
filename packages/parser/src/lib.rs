//! # screenweave parser
//!
//! Codec between screen source text and a markup syntax tree.
//!
//! ```text
//! source text ──parse──▶ SyntaxTree (arena, spans) ──print──▶ source text
//! ```
//!
//! `print(parse(s))` reproduces `s` byte-for-byte; edited nodes are the only
//! regions whose formatting may change.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod lossless_serializer;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{AttrValue, Attribute, Element, ExpressionContainer, Node, NodeId, Span, SyntaxTree, Text};
pub use error::{ParseError, ParseResult};
#[cfg(feature = "pretty-errors")]
pub use error::format_error;
pub use id_generator::IdGenerator;
pub use lossless_serializer::{print, LosslessSerializer};
pub use parser::{is_valid_name, parse, validate_expression, Parser};
pub use serializer::{serialize_attribute, Serializer};
pub use tokenizer::{tokenize, Token};
