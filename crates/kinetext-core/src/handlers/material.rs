//! Built-in material effects: named numeric ramps.

use kinetext_markup::TagNode;

use crate::effect::{EffectContext, EffectInstance, MaterialEffect};
use crate::handler::EffectFactory;
use crate::handlers::{optional_f32, strictly_positive};
use crate::state::MaterialState;
use crate::Result;

/// Ramp a named numeric override from `from` to `to` over `duration` seconds
/// after reveal: `{glow param=glow_power to=2 duration=1}`.
pub struct GlowEffect {
    parameter: String,
    from: f32,
    to: f32,
    duration: f32,
}

impl MaterialEffect for GlowEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut MaterialState) {
        let t = (ctx.elapsed / self.duration).clamp(0.0, 1.0);
        state.set(&self.parameter, self.from + (self.to - self.from) * t);
    }
}

pub(crate) fn glow_effect(tag: &TagNode) -> Result<EffectInstance> {
    let parameter = tag
        .attributes
        .get("param")
        .or_else(|| tag.attributes.get("parameter"))
        .unwrap_or("glow_power")
        .to_string();
    Ok(EffectInstance::Material(Box::new(GlowEffect {
        parameter,
        from: optional_f32(tag, "from", 0.0)?,
        to: optional_f32(tag, "to", 1.0)?,
        duration: strictly_positive(tag, "duration", optional_f32(tag, "duration", 1.0)?)?,
    })))
}

pub struct GlowHandler;

impl EffectFactory for GlowHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        glow_effect(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Span;

    #[test]
    fn test_glow_ramps_and_clamps() {
        let effect = GlowEffect {
            parameter: "glow_power".to_string(),
            from: 0.0,
            to: 2.0,
            duration: 1.0,
        };
        let ctx = |elapsed: f32| EffectContext {
            index: 0,
            literal: 'x',
            elapsed,
            total_elapsed: elapsed,
            span: Span::new(0, 1),
        };

        let mut state = MaterialState::default();
        effect.apply(&ctx(0.5), &mut state);
        assert_eq!(state.get("glow_power"), Some(1.0));

        state.reset();
        effect.apply(&ctx(3.0), &mut state);
        assert_eq!(state.get("glow_power"), Some(2.0));
    }
}
