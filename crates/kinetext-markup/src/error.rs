//! Error types for the markup parser

use serde::{Deserialize, Serialize};

/// Error raised while parsing markup text.
///
/// Offsets are character positions into the input (not byte offsets), which is
/// what authoring tools want for caret placement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarkupError {
    /// A `{` opened a tag token but the input ended before the matching `}`
    #[error("unterminated tag at offset {offset}")]
    UnterminatedTag { offset: usize },

    /// A tag token carried no name, e.g. `{}` or `{   }`
    #[error("empty tag at offset {offset}")]
    EmptyTag { offset: usize },

    /// A closing tag did not match the innermost open tag
    #[error("closing tag '{found}' at offset {offset} does not match open tag '{expected}'")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        offset: usize,
    },

    /// A closing tag appeared with no tag open
    #[error("closing tag '{name}' at offset {offset} has no matching open tag")]
    UnexpectedClosingTag { name: String, offset: usize },

    /// Input ended while one or more tags were still open
    #[error("tag '{name}' was never closed")]
    UnclosedTag { name: String },
}

impl MarkupError {
    /// Character offset the error points at, if it has one
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnterminatedTag { offset }
            | Self::EmptyTag { offset }
            | Self::MismatchedClosingTag { offset, .. }
            | Self::UnexpectedClosingTag { offset, .. } => Some(*offset),
            Self::UnclosedTag { .. } => None,
        }
    }
}
