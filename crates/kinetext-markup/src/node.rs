//! Document model produced by the parser.
//!
//! The tree is acyclic and exclusively owned by the parse result; nodes are
//! plain serde-friendly data with no behavior beyond attribute lookup.

use serde::{Deserialize, Serialize};

/// One `name=value` pair on a tag. Bare tokens (`{wait 0.5}`) are stored as
/// positional attributes with an empty name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Ordered attribute list of a tag occurrence.
///
/// Order is preserved so positional lookup works; named lookup is
/// case-insensitive to match handler alias resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Look up a named attribute value (case-insensitive, first match wins).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| !a.name.is_empty() && a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Look up the nth bare (unnamed) token.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.items
            .iter()
            .filter(|a| a.name.is_empty())
            .nth(index)
            .map(|a| a.value.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter()
    }
}

/// A tag occurrence: name, attributes, and the ordered children it wraps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TagNode {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl TagNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }
}

/// An immutable literal run of visible text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub literal: String,
}

/// A verbatim passthrough span (`<...>` including the angle brackets).
/// Invisible to reveal timing and effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RichTextNode {
    pub literal: String,
}

/// A node in the parsed document tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Tag(TagNode),
    Text(TextNode),
    RichText(RichTextNode),
}
