//! Error types for the timeline compiler and playback runtime

use serde::{Deserialize, Serialize};

use kinetext_markup::MarkupError;

/// Comprehensive error type for build and playback operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EngineError {
    /// Markup failed to parse
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// A tag is missing a parameter its handler requires
    #[error("tag '{tag}' is missing required parameter '{parameter}'")]
    MissingParameter { tag: String, parameter: String },

    /// A tag parameter was present but unusable
    #[error("tag '{tag}' parameter '{parameter}' is invalid: {reason}")]
    InvalidParameter {
        tag: String,
        parameter: String,
        reason: String,
    },

    /// A composite modifier tag produced no usable effects
    #[error("composite tag '{tag}' produced no effects")]
    EmptyComposite { tag: String },

    /// A public API was called with an out-of-range input
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl EngineError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Markup(_) => "markup",
            Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::EmptyComposite { .. } => "configuration",
            Self::InvalidArgument { .. } => "argument",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
