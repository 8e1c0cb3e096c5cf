//! HTML tag trees: tokenizer, tree builder, character references, and serialization.
//!
//! This is the parsing side of the sanitizer. It favors predictable behavior on hostile input
//! over HTML5 conformance; see the tokenizer module docs for the exact rules.

pub mod entities;
pub mod serialize;

mod dom_builder;
mod tokenizer;
mod types;

pub use crate::dom_builder::{MAX_NESTING_DEPTH, build_dom};
pub use crate::entities::{
    CharacterReferenceError, CharacterReferenceErrorKind, decode_entities,
    normalize_character_references,
};
pub use crate::serialize::to_html;
pub use crate::tokenizer::{is_raw_text_element, is_void_element, tokenize};
pub use crate::types::{Node, Token};

/// Parse an HTML fragment or document into a tree rooted at a [`Node::Document`].
pub fn parse(input: &str) -> Node {
    build_dom(tokenize(input))
}
