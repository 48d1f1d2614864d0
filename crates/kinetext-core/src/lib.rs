//! Kinetext core (engine-agnostic)
//!
//! Compiles tag markup into a character reveal timeline plus time-scoped
//! effect spans, then steps that timeline per frame: each visible character's
//! transform, color, and material state is recomputed from its bound effects
//! and forwarded to an abstract render target. This crate owns the compiler
//! and the stepper; parsing lives in `kinetext-markup` and the concrete
//! renderer behind [`RenderTarget`] is supplied by the host.

pub mod builder;
pub mod character;
pub mod clock;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod instruction;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod strategy;

// Re-exports for consumers (adapters)
pub use builder::{BuildResult, TimelineBuilder};
pub use character::{
    CharacterDescriptor, EffectId, ModifierBinding, ModifierSpan, Span, TagId, TagOccurrence,
};
pub use clock::RevealClock;
pub use config::EngineConfig;
pub use effect::{
    ColorEffect, EffectContext, EffectInstance, EffectTable, MaterialEffect, Subsystem,
    TransformEffect,
};
pub use engine::Engine;
pub use error::EngineError;
pub use handler::{
    CompositeEffectFactory, EffectFactory, HandlerRegistry, PlaybackAction, PlaybackControl,
    ScopeView, TagHandler,
};
pub use instruction::{Instruction, RevealCallback};
pub use output::RenderTarget;
pub use pipeline::{CharacterFrame, Pipeline, PipelineSegment};
pub use session::{PlaybackSession, SessionState};
pub use state::{ColorState, GroupPivot, MaterialState, TransformState, MIN_VISIBLE_ALPHA};
pub use strategy::{is_word_char, BatchStrategy, FixedCharacterCount, FixedWordCount};

pub use kinetext_markup::{MarkupError, Node, TagNode};

/// Kinetext result type
pub type Result<T> = core::result::Result<T, EngineError>;
