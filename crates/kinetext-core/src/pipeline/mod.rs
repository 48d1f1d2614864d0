//! Per-frame character animation pipeline.
//!
//! One segment per enabled subsystem, applied in registration order. Each
//! segment owns a pooled, arena-indexed scratch state per character; slots are
//! reset in place every frame and the arenas grow geometrically, never shrink,
//! and never reallocate per frame.

pub mod color;
pub mod material;
pub mod transform;

pub use color::ColorSegment;
pub use material::MaterialSegment;
pub use transform::TransformSegment;

use crate::builder::BuildResult;
use crate::character::{EffectId, Span};
use crate::config::EngineConfig;
use crate::effect::{EffectContext, Subsystem};
use crate::output::RenderTarget;

/// Per-character, per-frame inputs shared by all segments.
#[derive(Clone, Copy, Debug)]
pub struct CharacterFrame {
    pub index: usize,
    pub literal: char,
    /// Seconds since this character's reveal (monotonic, 0 if unrevealed).
    pub elapsed: f32,
    /// Seconds since the session started.
    pub total_elapsed: f32,
}

/// One subsystem's stage of the pipeline.
pub trait PipelineSegment {
    fn subsystem(&self) -> Subsystem;

    /// Animate one character and forward the result to the target.
    fn process(
        &mut self,
        frame: &CharacterFrame,
        result: &BuildResult,
        target: &mut dyn RenderTarget,
    );
}

/// Grow a pooled arena so `index` is addressable. Capacity doubles from a
/// floor of `min_capacity`; existing slots keep their contents.
pub(crate) fn ensure_slot<T: Default + Clone>(
    pool: &mut Vec<T>,
    index: usize,
    min_capacity: usize,
) {
    if index < pool.len() {
        return;
    }
    let mut len = pool.len().max(min_capacity.max(1));
    while len <= index {
        len *= 2;
    }
    pool.resize(len, T::default());
}

/// Context an effect sees for one (character, binding) pair.
pub(crate) fn effect_context(
    frame: &CharacterFrame,
    result: &BuildResult,
    effect: EffectId,
) -> EffectContext {
    EffectContext {
        index: frame.index,
        literal: frame.literal,
        elapsed: frame.elapsed,
        total_elapsed: frame.total_elapsed,
        span: result
            .span_for(effect)
            .unwrap_or_else(|| Span::new(frame.index, frame.index + 1)),
    }
}

/// The ordered segment chain built once per playback session.
pub struct Pipeline {
    segments: Vec<Box<dyn PipelineSegment>>,
}

impl Pipeline {
    /// Build segments for the config's enabled subsystems, in config order.
    pub fn new(config: &EngineConfig) -> Self {
        let mut segments: Vec<Box<dyn PipelineSegment>> = Vec::new();
        for subsystem in &config.subsystems {
            match subsystem {
                Subsystem::Transform => {
                    segments.push(Box::new(TransformSegment::new(config.min_pool_capacity)))
                }
                Subsystem::Color => {
                    segments.push(Box::new(ColorSegment::new(config.min_pool_capacity)))
                }
                Subsystem::Material => {
                    segments.push(Box::new(MaterialSegment::new(config.min_pool_capacity)))
                }
            }
        }
        Self { segments }
    }

    /// Animate one visible character through every segment.
    pub fn animate(
        &mut self,
        index: usize,
        elapsed: f32,
        total_elapsed: f32,
        result: &BuildResult,
        target: &mut dyn RenderTarget,
    ) {
        let literal = match result.characters.get(index) {
            Some(descriptor) => descriptor.literal,
            None => return,
        };
        let frame = CharacterFrame {
            index,
            literal,
            elapsed,
            total_elapsed,
        };
        for segment in &mut self.segments {
            segment.process(&frame, result, target);
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
