mod common;

use approx::assert_relative_eq;

use common::RecordingTarget;
use kinetext_core::{
    ColorEffect, ColorState, EffectContext, EffectFactory, EffectInstance, Engine, TagHandler,
    TagNode, TransformEffect, TransformState, MIN_VISIBLE_ALPHA,
};

#[test]
fn test_untouched_transform_is_not_forwarded() {
    let engine = Engine::default();
    let result = engine.compile("AB").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    assert!(target.transforms.is_empty());
    assert!(target.materials.is_empty());
    // Color is always recomputed and always forwarded.
    assert_eq!(target.colors.len(), 2);
}

#[test]
fn test_color_baseline_is_white_with_minimum_alpha() {
    let engine = Engine::default();
    let result = engine.compile("A").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    let color = target.color_of(0).unwrap();
    assert_eq!((color.r, color.g, color.b), (1.0, 1.0, 1.0));
    assert_relative_eq!(color.a, MIN_VISIBLE_ALPHA);
    assert!(!color.override_rgb);
}

#[test]
fn test_wave_touches_transform_and_is_forwarded() {
    let engine = Engine::default();
    let result = engine.compile("{wave}A{/wave}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    assert!(target.transform_of(0).is_some());
}

#[test]
fn test_spin_reports_group_pivot_for_its_span() {
    let engine = Engine::default();
    let result = engine.compile("{spin}AB{/spin}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    for index in 0..2 {
        let pivot = target.transform_of(index).unwrap().pivot.unwrap();
        assert_eq!((pivot.start, pivot.end), (0, 2));
    }
}

#[test]
fn test_tint_overrides_rgb() {
    let engine = Engine::default();
    let result = engine.compile("{color value=#ff0000}A{/color}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    let color = target.color_of(0).unwrap();
    assert!(color.override_rgb);
    assert_eq!((color.r, color.g, color.b), (1.0, 0.0, 0.0));
}

#[test]
fn test_material_forwarded_only_inside_span() {
    let engine = Engine::default();
    let result = engine.compile("{glow to=2 duration=1}A{/glow}B").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.5, &mut target).unwrap();
    let material = target.material_of(0).unwrap();
    assert_relative_eq!(material.get("glow_power").unwrap(), 1.0);
    assert!(target.material_of(1).is_none());
}

#[test]
fn test_fade_alpha_advances_with_reveal_clock() {
    let engine = Engine::default();
    let result = engine.compile("{fadein duration=1}A{/fadein}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    assert_relative_eq!(target.color_of(0).unwrap().a, 0.0);

    session.update(0.25, &mut target).unwrap();
    assert_relative_eq!(target.color_of(0).unwrap().a, 0.25);

    session.update(0.25, &mut target).unwrap();
    assert_relative_eq!(target.color_of(0).unwrap().a, 0.5);
}

#[test]
fn test_pool_handles_long_text() {
    let engine = Engine::default();
    let text: String = std::iter::repeat('x').take(40).collect();
    let result = engine.compile(&format!("{{wave}}{}{{/wave}}", text)).unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    assert_eq!(target.visible, 40);
    assert_eq!(target.colors.len(), 40);
    assert_eq!(target.transforms.len(), 40);
}

/// Doubles the horizontal scale.
struct DoubleScale;

impl TransformEffect for DoubleScale {
    fn apply(&self, _ctx: &EffectContext, state: &mut TransformState) {
        state.scale(2.0, 1.0);
    }
}

struct DoubleScaleHandler;

impl EffectFactory for DoubleScaleHandler {
    fn instantiate(&self, _tag: &TagNode) -> kinetext_core::Result<EffectInstance> {
        Ok(EffectInstance::Transform(Box::new(DoubleScale)))
    }
}

/// Shifts right by the scale accumulated so far; order-sensitive on purpose.
struct ShiftByScale;

impl TransformEffect for ShiftByScale {
    fn apply(&self, _ctx: &EffectContext, state: &mut TransformState) {
        let dx = state.scale_x;
        state.translate(dx, 0.0);
    }
}

struct ShiftByScaleHandler;

impl EffectFactory for ShiftByScaleHandler {
    fn instantiate(&self, _tag: &TagNode) -> kinetext_core::Result<EffectInstance> {
        Ok(EffectInstance::Transform(Box::new(ShiftByScale)))
    }
}

#[test]
fn test_effects_apply_onto_one_state_in_binding_order() {
    let mut engine = Engine::default();
    engine.registry_mut().register(
        TagHandler::CharacterModifier(Box::new(DoubleScaleHandler)),
        &["grow"],
    );
    engine.registry_mut().register(
        TagHandler::CharacterModifier(Box::new(ShiftByScaleHandler)),
        &["shift"],
    );

    let result = engine.compile("{grow}{shift}X{/shift}{/grow}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    let state = target.transform_of(0).unwrap();
    // grow ran first (outer declaration), so shift saw scale_x == 2.
    assert_eq!(state.scale_x, 2.0);
    assert_eq!(state.offset_x, 2.0);
}

/// Alpha that decays over time; exists to exercise the monotonic floor.
struct Flicker;

impl ColorEffect for Flicker {
    fn apply(&self, ctx: &EffectContext, state: &mut ColorState) {
        state.set_alpha(1.0 - ctx.elapsed);
    }
}

struct FlickerHandler;

impl EffectFactory for FlickerHandler {
    fn instantiate(&self, _tag: &TagNode) -> kinetext_core::Result<EffectInstance> {
        Ok(EffectInstance::Color(Box::new(Flicker)))
    }
}

#[test]
fn test_alpha_floor_prevents_regression() {
    let mut engine = Engine::default();
    engine.registry_mut().register(
        TagHandler::CharacterModifier(Box::new(FlickerHandler)),
        &["flicker"],
    );

    let result = engine.compile("{flicker}A{/flicker}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    // First frame shows full alpha and raises the floor to 1.
    session.update(0.0, &mut target).unwrap();
    assert_relative_eq!(target.color_of(0).unwrap().a, 1.0);

    // The effect now computes lower values, but the floor holds.
    let mut last = 1.0f32;
    for _ in 0..4 {
        session.update(0.25, &mut target).unwrap();
        let alpha = target.color_of(0).unwrap().a;
        assert!(alpha >= last);
        last = alpha;
    }
    assert_relative_eq!(last, 1.0);
}

#[test]
fn test_alpha_is_monotonic_across_frames_with_fade() {
    let engine = Engine::default();
    let result = engine.compile("{fadein duration=1}A{/fadein}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let mut last = 0.0f32;
    for _ in 0..8 {
        session.update(0.25, &mut target).unwrap();
        let alpha = target.color_of(0).unwrap().a;
        assert!(alpha >= last);
        last = alpha;
    }
    assert_relative_eq!(last, 1.0);
}
