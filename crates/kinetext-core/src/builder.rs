//! Timeline builder: walks the parsed tree into flat playback buffers.
//!
//! Scope values (per-character duration, reveal callback, batching strategy)
//! are explicit stacks pushed and popped around each tag's children. Spans are
//! resolved in two passes: the walk records [start, end) ranges as subtrees
//! complete, and a containment pass afterwards assigns every character its
//! owning tags and modifier bindings, since a span's end is unknown while the
//! walk is still inside it.

use std::collections::HashMap;

use tracing::{debug, warn};

use kinetext_markup::{Node, TagNode};

use crate::character::{
    CharacterDescriptor, EffectId, ModifierBinding, ModifierSpan, Span, TagId, TagOccurrence,
};
use crate::config::EngineConfig;
use crate::effect::EffectTable;
use crate::error::EngineError;
use crate::handler::{HandlerRegistry, ScopeView, TagHandler};
use crate::instruction::{Instruction, RevealCallback};
use crate::strategy::{is_word_char, BatchStrategy, FixedCharacterCount};
use crate::Result;

/// Everything a build produces; the parsed tree is no longer needed once this
/// exists.
#[derive(Debug)]
pub struct BuildResult {
    /// Flattened text, including rich-text passthrough spans.
    pub plain_text: String,
    /// One descriptor per revealable character, in reveal order.
    pub characters: Vec<CharacterDescriptor>,
    /// The linear instruction stream.
    pub instructions: Vec<Instruction>,
    /// Every tag occurrence with its completed span, in declaration order.
    pub tags: Vec<TagOccurrence>,
    /// Effect instances created during the walk.
    pub effects: EffectTable,
    /// One span per effect instance, sorted by tag declaration order.
    pub modifier_spans: Vec<ModifierSpan>,
    modifiers_by_tag: HashMap<String, Vec<EffectId>>,
}

impl BuildResult {
    /// Effects emitted by occurrences of the named tag (case-insensitive).
    pub fn modifiers_by_tag(&self, name: &str) -> &[EffectId] {
        self.modifiers_by_tag
            .get(&name.to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    #[inline]
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// The character span an effect instance is scoped to.
    pub fn span_for(&self, effect: EffectId) -> Option<Span> {
        self.modifier_spans
            .iter()
            .find(|s| s.effect == effect)
            .map(|s| s.span)
    }

    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.get(id.0 as usize).map(|t| t.name.as_str())
    }
}

/// Recursive tree walker producing a [`BuildResult`].
pub struct TimelineBuilder<'a> {
    registry: &'a HandlerRegistry,
    callbacks: &'a HashMap<String, RevealCallback>,

    plain_text: String,
    characters: Vec<CharacterDescriptor>,
    instructions: Vec<Instruction>,
    tags: Vec<TagOccurrence>,
    effects: EffectTable,
    modifier_spans: Vec<ModifierSpan>,

    durations: Vec<f32>,
    reveal_callbacks: Vec<Option<RevealCallback>>,
    strategies: Vec<Box<dyn BatchStrategy>>,
    prev_literal: Option<char>,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(
        registry: &'a HandlerRegistry,
        callbacks: &'a HashMap<String, RevealCallback>,
        config: &EngineConfig,
    ) -> Self {
        let top_strategy: Box<dyn BatchStrategy> = Box::new(FixedCharacterCount::default());
        Self {
            registry,
            callbacks,
            plain_text: String::new(),
            characters: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
            effects: EffectTable::new(),
            modifier_spans: Vec::new(),
            durations: vec![config.default_duration],
            reveal_callbacks: vec![None],
            strategies: vec![top_strategy],
            prev_literal: None,
        }
    }

    /// Walk the tree and produce the flattened build outputs.
    pub fn build(mut self, nodes: &[Node]) -> Result<BuildResult> {
        for node in nodes {
            self.walk(node)?;
        }
        self.resolve_ownership();

        let mut modifiers_by_tag: HashMap<String, Vec<EffectId>> = HashMap::new();
        for span in &self.modifier_spans {
            if let Some(tag) = self.tags.get(span.tag.0 as usize) {
                modifiers_by_tag
                    .entry(tag.name.to_lowercase())
                    .or_default()
                    .push(span.effect);
            }
        }

        debug!(
            "timeline built: {} characters, {} instructions, {} tags, {} effects",
            self.characters.len(),
            self.instructions.len(),
            self.tags.len(),
            self.effects.len()
        );

        Ok(BuildResult {
            plain_text: self.plain_text,
            characters: self.characters,
            instructions: self.instructions,
            tags: self.tags,
            effects: self.effects,
            modifier_spans: self.modifier_spans,
            modifiers_by_tag,
        })
    }

    fn walk(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Text(text) => {
                self.emit_text(&text.literal);
                Ok(())
            }
            Node::RichText(rich) => {
                // Verbatim passthrough: present in the text, invisible to
                // reveal timing and effects.
                self.plain_text.push_str(&rich.literal);
                Ok(())
            }
            Node::Tag(tag) => self.walk_tag(tag),
        }
    }

    fn emit_text(&mut self, literal: &str) {
        for c in literal.chars() {
            let index = self.characters.len();
            let word_start = is_word_char(c) && !self.prev_literal.map(is_word_char).unwrap_or(false);

            let strategy = self.strategies.last_mut().unwrap();
            let timed = strategy.is_timed(c, word_start);
            strategy.advance(c, word_start);

            let duration = if timed {
                *self.durations.last().unwrap()
            } else {
                0.0
            };
            self.characters.push(CharacterDescriptor::stub(index, c));
            self.instructions.push(Instruction::Reveal {
                index,
                duration,
                callback: self.reveal_callbacks.last().unwrap().clone(),
            });
            self.plain_text.push(c);
            self.prev_literal = Some(c);
        }
    }

    fn walk_tag(&mut self, tag: &TagNode) -> Result<()> {
        let tag_id = TagId(self.tags.len() as u32);
        let span_start = self.characters.len();
        self.tags.push(TagOccurrence {
            id: tag_id,
            name: tag.name.clone(),
            span: Span::new(span_start, span_start),
        });

        let handler = self.registry.resolve(&tag.name);
        let mut emitted: Vec<EffectId> = Vec::new();
        let mut pushed_duration = false;
        let mut pushed_callback = false;
        let mut pushed_strategy = false;

        match handler.as_deref() {
            None => {
                warn!("unknown tag '{}' treated as pass-through", tag.name);
            }
            Some(TagHandler::PlaybackControl(control)) => {
                let action = {
                    let scope = ScopeView {
                        duration: *self.durations.last().unwrap(),
                        strategy: self.strategies.last().unwrap().as_ref(),
                        callbacks: self.callbacks,
                    };
                    control.enter(tag, &scope)?
                };
                self.instructions.extend(action.instructions);
                if let Some(duration) = action.duration {
                    self.durations.push(duration);
                    pushed_duration = true;
                }
                if let Some(callback) = action.callback {
                    self.reveal_callbacks.push(Some(callback));
                    pushed_callback = true;
                }
                if let Some(strategy) = action.strategy {
                    self.strategies.push(strategy);
                    pushed_strategy = true;
                }
            }
            Some(TagHandler::CharacterModifier(factory)) => {
                // A visual effect never alters reveal pacing; children see the
                // inherited scope unchanged.
                let effect = factory.instantiate(tag)?;
                emitted.push(self.effects.insert(effect));
            }
            Some(TagHandler::CompositeModifier(factory)) => {
                let effects = factory.instantiate(tag)?;
                if effects.is_empty() {
                    return Err(EngineError::EmptyComposite {
                        tag: tag.name.clone(),
                    });
                }
                for effect in effects {
                    emitted.push(self.effects.insert(effect));
                }
            }
        }

        for child in &tag.children {
            self.walk(child)?;
        }

        if pushed_strategy {
            self.strategies.pop();
        }
        if pushed_callback {
            self.reveal_callbacks.pop();
        }
        if pushed_duration {
            self.durations.pop();
        }

        let span = Span::new(span_start, self.characters.len());
        self.tags[tag_id.0 as usize].span = span;
        for effect in emitted {
            self.modifier_spans.push(ModifierSpan {
                tag: tag_id,
                effect,
                span,
            });
        }
        Ok(())
    }

    /// Second pass: assign owning tags and modifier bindings by containment.
    /// Spans are only complete once the walk has finished, but character
    /// indices were stable throughout, so a full scan here is exact.
    fn resolve_ownership(&mut self) {
        // Declaration (nesting) order, not subtree-completion order.
        self.modifier_spans.sort_by_key(|s| (s.tag, s.effect));

        for descriptor in &mut self.characters {
            for tag in &self.tags {
                if tag.span.contains(descriptor.index) {
                    descriptor.owning_tags.push(tag.id);
                }
            }
            for span in &self.modifier_spans {
                if span.span.contains(descriptor.index) {
                    descriptor.bindings.push(ModifierBinding {
                        tag: span.tag,
                        effect: span.effect,
                    });
                }
            }
        }
    }
}
