//! Built-in color effects: fade-in, tint, rainbow.

use kinetext_markup::TagNode;

use crate::effect::{ColorEffect, EffectContext, EffectInstance};
use crate::error::EngineError;
use crate::handler::EffectFactory;
use crate::handlers::{optional_f32, strictly_positive};
use crate::state::ColorState;
use crate::Result;

/// Alpha ramp from 0 to 1 over `duration` seconds after reveal.
pub struct FadeInEffect {
    duration: f32,
}

impl ColorEffect for FadeInEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut ColorState) {
        let t = (ctx.elapsed / self.duration).clamp(0.0, 1.0);
        state.set_alpha(t);
    }
}

pub(crate) fn fade_in_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Color(Box::new(FadeInEffect {
        duration: strictly_positive(tag, "duration", optional_f32(tag, "duration", 0.5)?)?,
    })))
}

pub struct FadeInHandler;

impl EffectFactory for FadeInHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        fade_in_effect(tag)
    }
}

/// Constant RGB replacement: `{color value=#ff8800}`.
pub struct TintEffect {
    r: f32,
    g: f32,
    b: f32,
}

impl ColorEffect for TintEffect {
    fn apply(&self, _ctx: &EffectContext, state: &mut ColorState) {
        state.set_rgb(self.r, self.g, self.b);
    }
}

fn parse_hex_color(raw: &str) -> Option<(f32, f32, f32)> {
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some((
        ((v >> 16) & 0xFF) as f32 / 255.0,
        ((v >> 8) & 0xFF) as f32 / 255.0,
        (v & 0xFF) as f32 / 255.0,
    ))
}

pub(crate) fn tint_effect(tag: &TagNode) -> Result<EffectInstance> {
    let raw = tag
        .attributes
        .get("value")
        .or_else(|| tag.attributes.positional(0))
        .ok_or_else(|| EngineError::MissingParameter {
            tag: tag.name.clone(),
            parameter: "value".to_string(),
        })?;
    let (r, g, b) = parse_hex_color(raw).ok_or_else(|| EngineError::InvalidParameter {
        tag: tag.name.clone(),
        parameter: "value".to_string(),
        reason: format!("expected a #RRGGBB color, got '{}'", raw),
    })?;
    Ok(EffectInstance::Color(Box::new(TintEffect { r, g, b })))
}

pub struct TintHandler;

impl EffectFactory for TintHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        tint_effect(tag)
    }
}

/// Hue cycle across time and character index.
pub struct RainbowEffect {
    speed: f32,
    spread: f32,
}

fn hue_to_rgb(h: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    }
}

impl ColorEffect for RainbowEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut ColorState) {
        let hue = ctx.elapsed * self.speed + ctx.index as f32 * self.spread;
        let (r, g, b) = hue_to_rgb(hue);
        state.set_rgb(r, g, b);
    }
}

pub(crate) fn rainbow_effect(tag: &TagNode) -> Result<EffectInstance> {
    Ok(EffectInstance::Color(Box::new(RainbowEffect {
        speed: optional_f32(tag, "speed", 0.5)?,
        spread: optional_f32(tag, "spread", 0.1)?,
    })))
}

pub struct RainbowHandler;

impl EffectFactory for RainbowHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<EffectInstance> {
        rainbow_effect(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Span;

    fn ctx(elapsed: f32) -> EffectContext {
        EffectContext {
            index: 0,
            literal: 'x',
            elapsed,
            total_elapsed: elapsed,
            span: Span::new(0, 1),
        }
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(parse_hex_color("#ff0000"), Some((1.0, 0.0, 0.0)));
        assert_eq!(parse_hex_color("00ff00"), Some((0.0, 1.0, 0.0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_fade_in_saturates_at_one() {
        let effect = FadeInEffect { duration: 1.0 };
        let mut state = ColorState::default();

        effect.apply(&ctx(0.25), &mut state);
        assert_eq!(state.a, 0.25);

        effect.apply(&ctx(5.0), &mut state);
        assert_eq!(state.a, 1.0);
        assert!(!state.override_rgb);
    }

    #[test]
    fn test_tint_overrides_rgb() {
        let effect = TintEffect {
            r: 0.5,
            g: 0.25,
            b: 1.0,
        };
        let mut state = ColorState::default();
        effect.apply(&ctx(0.0), &mut state);
        assert!(state.override_rgb);
        assert_eq!((state.r, state.g, state.b), (0.5, 0.25, 1.0));
    }

    #[test]
    fn test_hue_wheel_endpoints() {
        assert_eq!(hue_to_rgb(0.0), (1.0, 0.0, 0.0));
        let (r, g, b) = hue_to_rgb(1.0 / 3.0);
        assert!(r < 0.01 && g > 0.99 && b < 0.01);
    }
}
