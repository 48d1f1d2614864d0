//! Built-in transform effects: wave, shake, spin, pop.

use kinetext_markup::TagNode;

use crate::effect::{EffectContext, EffectInstance, TransformEffect};
use crate::handlers::{optional_f32, strictly_positive};
use crate::handler::EffectFactory;
use crate::state::TransformState;
use crate::Result;

/// Vertical sine travel, phase-shifted per character.
pub struct WaveEffect {
    amplitude: f32,
    frequency: f32,
    speed: f32,
}

impl TransformEffect for WaveEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut TransformState) {
        let phase = ctx.elapsed * self.speed + ctx.index as f32 * self.frequency;
        state.translate(0.0, phase.sin() * self.amplitude);
    }
}

pub(crate) fn wave_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Transform(Box::new(WaveEffect {
        amplitude: optional_f32(tag, "amplitude", 4.0)?,
        frequency: optional_f32(tag, "frequency", 0.6)?,
        speed: optional_f32(tag, "speed", 6.0)?,
    })))
}

pub struct WaveHandler;

impl EffectFactory for WaveHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        wave_effect(tag)
    }
}

/// Deterministic positional jitter; the hash keeps playback reproducible
/// frame to frame without a random source.
pub struct ShakeEffect {
    amplitude: f32,
    rate: f32,
}

fn jitter(index: u32, tick: u32, salt: u32) -> f32 {
    let mut h = index.wrapping_mul(0x9E37_79B1) ^ tick.wrapping_mul(0x85EB_CA77) ^ salt;
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    ((h & 0xFFFF) as f32 / 32767.5) - 1.0
}

impl TransformEffect for ShakeEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut TransformState) {
        let tick = (ctx.elapsed * self.rate) as u32;
        let dx = jitter(ctx.index as u32, tick, 0x27D4_EB2F);
        let dy = jitter(ctx.index as u32, tick, 0x1656_67B1);
        state.translate(dx * self.amplitude, dy * self.amplitude);
    }
}

pub(crate) fn shake_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Transform(Box::new(ShakeEffect {
        amplitude: optional_f32(tag, "amplitude", 2.0)?,
        rate: optional_f32(tag, "rate", 25.0)?,
    })))
}

pub struct ShakeHandler;

impl EffectFactory for ShakeHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        shake_effect(tag)
    }
}

/// Continuous rotation about the owning span's shared centroid.
pub struct SpinEffect {
    /// Degrees per second.
    speed: f32,
}

impl TransformEffect for SpinEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut TransformState) {
        state.rotate(ctx.elapsed * self.speed);
        state.set_group_pivot(ctx.span.into());
    }
}

pub(crate) fn spin_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Transform(Box::new(SpinEffect {
        speed: optional_f32(tag, "speed", 90.0)?,
    })))
}

pub struct SpinHandler;

impl EffectFactory for SpinHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        spin_effect(tag)
    }
}

/// Scale-in from zero over `duration` seconds after reveal, eased out.
pub struct PopEffect {
    duration: f32,
}

impl TransformEffect for PopEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut TransformState) {
        let t = (ctx.elapsed / self.duration).clamp(0.0, 1.0);
        let s = t * (2.0 - t);
        state.scale(s, s);
    }
}

pub(crate) fn pop_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Transform(Box::new(PopEffect {
        duration: strictly_positive(tag, "duration", optional_f32(tag, "duration", 0.25)?)?,
    })))
}

pub struct PopHandler;

impl EffectFactory for PopHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        pop_effect(tag)
    }
}
