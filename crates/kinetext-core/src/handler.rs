//! Tag handlers and the alias registry that resolves them.
//!
//! Handler kinds form a closed union: a tag either steers playback, emits one
//! effect, or emits a group of effects. Resolution happens once at build time
//! through a case-insensitive alias table; unknown names resolve to nothing
//! and the builder treats them as transparent pass-through.

use std::collections::HashMap;
use std::rc::Rc;

use kinetext_markup::TagNode;

use crate::instruction::{Instruction, RevealCallback};
use crate::effect::EffectInstance;
use crate::strategy::BatchStrategy;
use crate::Result;

/// Read-only view of the builder scope a playback-control handler runs in.
pub struct ScopeView<'a> {
    /// Per-character duration currently in effect.
    pub duration: f32,
    /// Batching strategy currently in effect; source for `create_child`.
    pub strategy: &'a dyn BatchStrategy,
    /// Named reveal callbacks registered on the engine.
    pub callbacks: &'a HashMap<String, RevealCallback>,
}

/// What a playback-control tag does to the instruction stream and to the
/// scope its children are built under. Fields left `None` inherit.
#[derive(Default)]
pub struct PlaybackAction {
    /// Instructions appended before the tag's children are walked.
    pub instructions: Vec<Instruction>,
    /// Override of the per-character reveal duration.
    pub duration: Option<f32>,
    /// Override of the reveal callback.
    pub callback: Option<RevealCallback>,
    /// Override of the batching strategy.
    pub strategy: Option<Box<dyn BatchStrategy>>,
}

/// Handler that alters the instruction stream and/or reveal pacing scope.
pub trait PlaybackControl {
    fn enter(&self, tag: &TagNode, scope: &ScopeView<'_>) -> Result<PlaybackAction>;
}

/// Handler that instantiates exactly one effect per tag occurrence.
pub trait EffectFactory {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance>;
}

/// Handler that instantiates a group of effects per tag occurrence.
/// Producing zero effects is a configuration error.
pub trait CompositeEffectFactory {
    fn instantiate(&self, tag: &TagNode) -> Result<Vec<EffectInstance>>;
}

/// The closed set of tag handler capabilities.
pub enum TagHandler {
    PlaybackControl(Box<dyn PlaybackControl>),
    CharacterModifier(Box<dyn EffectFactory>),
    CompositeModifier(Box<dyn CompositeEffectFactory>),
}

/// Case-insensitive alias table from tag names to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, Rc<TagHandler>>,
}

impl HandlerRegistry {
    /// An empty registry; tags resolve to pass-through until populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with all built-in handlers registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_builtins(&mut registry);
        registry
    }

    /// Register a handler under one or more aliases.
    pub fn register(&mut self, handler: TagHandler, aliases: &[&str]) {
        let handler = Rc::new(handler);
        for alias in aliases {
            self.entries
                .insert(alias.to_lowercase(), Rc::clone(&handler));
        }
    }

    /// Resolve a tag name; `None` means transparent pass-through.
    pub fn resolve(&self, name: &str) -> Option<Rc<TagHandler>> {
        self.entries.get(&name.to_lowercase()).cloned()
    }

    /// All registered aliases.
    pub fn aliases(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;
    impl PlaybackControl for Nop {
        fn enter(&self, _tag: &TagNode, _scope: &ScopeView<'_>) -> Result<PlaybackAction> {
            Ok(PlaybackAction::default())
        }
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let mut registry = HandlerRegistry::new();
        registry.register(TagHandler::PlaybackControl(Box::new(Nop)), &["Wait", "w"]);
        assert!(registry.resolve("wait").is_some());
        assert!(registry.resolve("WAIT").is_some());
        assert!(registry.resolve("W").is_some());
        assert!(registry.resolve("pause").is_none());
    }

    #[test]
    fn test_aliases_share_one_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register(TagHandler::PlaybackControl(Box::new(Nop)), &["a", "b"]);
        let a = registry.resolve("a").unwrap();
        let b = registry.resolve("b").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
