//! Per-character, per-subsystem animated state.
//!
//! These are the pooled scratch values the pipeline resets in place each frame
//! and hands to effects, then forwards to the render target.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::character::Span;

/// Smallest alpha a revealed character may report; keeps fully-revealed text
/// from disappearing when no color effect has pushed the floor yet.
pub const MIN_VISIBLE_ALPHA: f32 = 1.0 / 255.0;

/// Range of characters sharing a rotation/scale pivot at their common centroid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPivot {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for GroupPivot {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// Positional state of one character: offset, rotation, non-uniform scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub offset_x: f32,
    pub offset_y: f32,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub pivot: Option<GroupPivot>,
    touched: bool,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            pivot: None,
            touched: false,
        }
    }
}

impl TransformState {
    /// Reset to identity, keeping the slot allocated.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
        self.touched = true;
    }

    #[inline]
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
        self.touched = true;
    }

    #[inline]
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.scale_x *= sx;
        self.scale_y *= sy;
        self.touched = true;
    }

    #[inline]
    pub fn set_group_pivot(&mut self, pivot: GroupPivot) {
        self.pivot = Some(pivot);
        self.touched = true;
    }

    /// Whether any effect wrote to this state since the last reset.
    #[inline]
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    #[inline]
    pub fn mark_touched(&mut self) {
        self.touched = true;
    }
}

/// Color state of one character, channels in 0..=1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorState {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// When set, the effect fully replaced RGB rather than modulating alpha.
    pub override_rgb: bool,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: MIN_VISIBLE_ALPHA,
            override_rgb: false,
        }
    }
}

impl ColorState {
    /// Reset to the per-frame baseline: white RGB, alpha raised to the
    /// character's floor.
    pub fn reset(&mut self, alpha_floor: f32) {
        self.r = 1.0;
        self.g = 1.0;
        self.b = 1.0;
        self.a = alpha_floor.max(MIN_VISIBLE_ALPHA);
        self.override_rgb = false;
    }

    #[inline]
    pub fn set_alpha(&mut self, alpha: f32) {
        self.a = alpha.clamp(0.0, 1.0);
    }

    /// Replace RGB outright, leaving alpha alone.
    #[inline]
    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.r = r.clamp(0.0, 1.0);
        self.g = g.clamp(0.0, 1.0);
        self.b = b.clamp(0.0, 1.0);
        self.override_rgb = true;
    }
}

/// Named numeric shader-style overrides for one character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialState {
    overrides: HashMap<String, f32>,
}

impl MaterialState {
    /// Clear all overrides, keeping allocated capacity.
    pub fn reset(&mut self) {
        self.overrides.clear();
    }

    #[inline]
    pub fn set(&mut self, name: &str, value: f32) {
        self.overrides.insert(name.to_string(), value);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.overrides.get(name).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
