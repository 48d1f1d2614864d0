//! Kinetext markup (engine-agnostic)
//!
//! Document model and parser for the Kinetext tag markup language:
//! `{tag attr="v"}...{/tag}` blocks around plain text, `{{` and `<<` escapes,
//! and single-line `<...>` rich-text passthrough spans that are copied into
//! the output untouched.

pub mod error;
pub mod node;
pub mod parser;

pub use error::MarkupError;
pub use node::{Attribute, Attributes, Node, RichTextNode, TagNode, TextNode};
pub use parser::parse;

/// Markup parser result type
pub type Result<T> = core::result::Result<T, MarkupError>;
