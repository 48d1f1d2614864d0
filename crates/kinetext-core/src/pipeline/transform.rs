//! Transform pipeline segment.

use crate::builder::BuildResult;
use crate::effect::{EffectInstance, Subsystem};
use crate::output::RenderTarget;
use crate::pipeline::{effect_context, ensure_slot, CharacterFrame, PipelineSegment};
use crate::state::TransformState;

/// Applies transform effects in binding order onto one pooled state per
/// character. Untouched characters are not forwarded.
pub struct TransformSegment {
    pool: Vec<TransformState>,
    min_capacity: usize,
}

impl TransformSegment {
    pub fn new(min_capacity: usize) -> Self {
        Self {
            pool: Vec::new(),
            min_capacity,
        }
    }
}

impl PipelineSegment for TransformSegment {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Transform
    }

    fn process(
        &mut self,
        frame: &CharacterFrame,
        result: &BuildResult,
        target: &mut dyn RenderTarget,
    ) {
        let descriptor = match result.characters.get(frame.index) {
            Some(descriptor) => descriptor,
            None => return,
        };
        ensure_slot(&mut self.pool, frame.index, self.min_capacity);
        let state = &mut self.pool[frame.index];
        state.reset();

        for binding in &descriptor.bindings {
            if let Some(EffectInstance::Transform(effect)) = result.effects.get(binding.effect) {
                let ctx = effect_context(frame, result, binding.effect);
                effect.apply(&ctx, state);
            }
        }

        if state.is_touched() {
            target.apply_transform(frame.index, state);
        }
    }
}
