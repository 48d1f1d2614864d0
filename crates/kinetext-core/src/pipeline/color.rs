//! Color pipeline segment.

use crate::builder::BuildResult;
use crate::effect::{EffectInstance, Subsystem};
use crate::output::RenderTarget;
use crate::pipeline::{effect_context, ensure_slot, CharacterFrame, PipelineSegment};
use crate::state::ColorState;

/// Always recomputes and always forwards, even with no bound effects.
///
/// The per-character alpha floor is a monotonically non-decreasing watermark:
/// once a character has been shown at some alpha it never reports lower in a
/// later frame, so revealed characters cannot flicker invisible.
pub struct ColorSegment {
    pool: Vec<ColorState>,
    alpha_floor: Vec<f32>,
    min_capacity: usize,
}

impl ColorSegment {
    pub fn new(min_capacity: usize) -> Self {
        Self {
            pool: Vec::new(),
            alpha_floor: Vec::new(),
            min_capacity,
        }
    }

}

impl PipelineSegment for ColorSegment {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Color
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
        ensure_slot(&mut self.alpha_floor, frame.index, self.min_capacity);

        let floor = self.alpha_floor[frame.index];
        let reported = {
            let state = &mut self.pool[frame.index];
            state.reset(floor);

            for binding in &descriptor.bindings {
                if let Some(EffectInstance::Color(effect)) = result.effects.get(binding.effect) {
                    let ctx = effect_context(frame, result, binding.effect);
                    effect.apply(&ctx, state);
                }
            }

            let reported = state.a.max(floor);
            state.a = reported;
            reported
        };
        self.alpha_floor[frame.index] = reported;

        target.apply_color(frame.index, &self.pool[frame.index]);
    }
}
