//! Material pipeline segment.

use crate::builder::BuildResult;
use crate::effect::{EffectInstance, Subsystem};
use crate::output::RenderTarget;
use crate::pipeline::{effect_context, ensure_slot, CharacterFrame, PipelineSegment};
use crate::state::MaterialState;

/// Collects named numeric overrides; forwards only when something was set.
pub struct MaterialSegment {
    pool: Vec<MaterialState>,
    min_capacity: usize,
}

impl MaterialSegment {
    pub fn new(min_capacity: usize) -> Self {
        Self {
            pool: Vec::new(),
            min_capacity,
        }
    }
}

impl PipelineSegment for MaterialSegment {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Material
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
            if let Some(EffectInstance::Material(effect)) = result.effects.get(binding.effect) {
                let ctx = effect_context(frame, result, binding.effect);
                effect.apply(&ctx, state);
            }
        }

        if !state.is_empty() {
            target.apply_material(frame.index, state);
        }
    }
}
