//! Built-in tag handlers.
//!
//! Pacing controls live in [`pacing`], per-subsystem effects in
//! [`transform`], [`color`], and [`material`]. All of them are registered
//! under their aliases by [`register_builtins`].

pub mod color;
pub mod material;
pub mod pacing;
pub mod transform;

use kinetext_markup::TagNode;

use crate::error::EngineError;
use crate::handler::{HandlerRegistry, TagHandler};
use crate::Result;

/// Register every built-in handler under its aliases.
pub fn register_builtins(registry: &mut HandlerRegistry) {
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::WaitHandler)),
        &["wait", "pause"],
    );
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::CharByCharHandler)),
        &["charbychar", "cbc"],
    );
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::WordByWordHandler)),
        &["wordbyword", "wbw"],
    );
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::BatchHandler)),
        &["batch"],
    );
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::PaceHandler)),
        &["pace"],
    );
    registry.register(
        TagHandler::PlaybackControl(Box::new(pacing::EventHandler)),
        &["event"],
    );

    registry.register(
        TagHandler::CharacterModifier(Box::new(transform::WaveHandler)),
        &["wave"],
    );
    registry.register(
        TagHandler::CharacterModifier(Box::new(transform::ShakeHandler)),
        &["shake"],
    );
    registry.register(
        TagHandler::CharacterModifier(Box::new(transform::SpinHandler)),
        &["spin"],
    );
    registry.register(
        TagHandler::CharacterModifier(Box::new(transform::PopHandler)),
        &["pop"],
    );

    registry.register(
        TagHandler::CharacterModifier(Box::new(color::FadeInHandler)),
        &["fadein", "fade"],
    );
    registry.register(
        TagHandler::CharacterModifier(Box::new(color::TintHandler)),
        &["color", "tint"],
    );
    registry.register(
        TagHandler::CharacterModifier(Box::new(color::RainbowHandler)),
        &["rainbow"],
    );

    registry.register(
        TagHandler::CharacterModifier(Box::new(material::GlowHandler)),
        &["glow"],
    );

    registry.register(
        TagHandler::CompositeModifier(Box::new(ComboHandler)),
        &["combo", "stack"],
    );
}

/// Composite handler stacking several built-in effects from one tag:
/// `{combo effects="wave,rainbow" amplitude=2}`. Each listed effect reads its
/// parameters from the same attribute set; unknown names are skipped.
pub struct ComboHandler;

impl crate::handler::CompositeEffectFactory for ComboHandler {
    fn instantiate(&self, tag: &TagNode) -> Result<Vec<crate::effect::EffectInstance>> {
        let list = tag
            .attributes
            .get("effects")
            .or_else(|| tag.attributes.positional(0))
            .ok_or_else(|| EngineError::MissingParameter {
                tag: tag.name.clone(),
                parameter: "effects".to_string(),
            })?;

        let mut effects = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_lowercase().as_str() {
                "wave" => effects.push(transform::wave_effect(tag)?),
                "shake" => effects.push(transform::shake_effect(tag)?),
                "spin" => effects.push(transform::spin_effect(tag)?),
                "pop" => effects.push(transform::pop_effect(tag)?),
                "fadein" | "fade" => effects.push(color::fade_in_effect(tag)?),
                "color" | "tint" => effects.push(color::tint_effect(tag)?),
                "rainbow" => effects.push(color::rainbow_effect(tag)?),
                "glow" => effects.push(material::glow_effect(tag)?),
                other => {
                    tracing::warn!("combo tag '{}' skipping unknown effect '{}'", tag.name, other);
                }
            }
        }

        if effects.is_empty() {
            return Err(EngineError::EmptyComposite {
                tag: tag.name.clone(),
            });
        }
        Ok(effects)
    }
}

/// Named attribute lookup with an optional positional fallback.
fn lookup<'a>(tag: &'a TagNode, name: &str, positional: Option<usize>) -> Option<&'a str> {
    tag.attributes
        .get(name)
        .or_else(|| positional.and_then(|i| tag.attributes.positional(i)))
}

fn parse_f32(tag: &TagNode, name: &str, raw: &str) -> Result<f32> {
    raw.parse::<f32>()
        .map_err(|e| EngineError::InvalidParameter {
            tag: tag.name.clone(),
            parameter: name.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn required_f32(tag: &TagNode, name: &str, positional: Option<usize>) -> Result<f32> {
    let raw = lookup(tag, name, positional).ok_or_else(|| EngineError::MissingParameter {
        tag: tag.name.clone(),
        parameter: name.to_string(),
    })?;
    parse_f32(tag, name, raw)
}

pub(crate) fn optional_f32(tag: &TagNode, name: &str, default: f32) -> Result<f32> {
    match tag.attributes.get(name) {
        Some(raw) => parse_f32(tag, name, raw),
        None => Ok(default),
    }
}

pub(crate) fn required_u32(tag: &TagNode, name: &str) -> Result<u32> {
    let raw = tag
        .attributes
        .get(name)
        .ok_or_else(|| EngineError::MissingParameter {
            tag: tag.name.clone(),
            parameter: name.to_string(),
        })?;
    raw.parse::<u32>()
        .map_err(|e| EngineError::InvalidParameter {
            tag: tag.name.clone(),
            parameter: name.to_string(),
            reason: e.to_string(),
        })
}

/// Durations must not run backward.
pub(crate) fn non_negative(tag: &TagNode, name: &str, value: f32) -> Result<f32> {
    if value < 0.0 || !value.is_finite() {
        return Err(EngineError::InvalidParameter {
            tag: tag.name.clone(),
            parameter: name.to_string(),
            reason: format!("must be a non-negative number, got {}", value),
        });
    }
    Ok(value)
}

/// Ramp lengths must be strictly positive to avoid division by zero.
pub(crate) fn strictly_positive(tag: &TagNode, name: &str, value: f32) -> Result<f32> {
    if value <= 0.0 || !value.is_finite() {
        return Err(EngineError::InvalidParameter {
            tag: tag.name.clone(),
            parameter: name.to_string(),
            reason: format!("must be a positive number, got {}", value),
        });
    }
    Ok(value)
}
