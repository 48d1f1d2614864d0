//! Effect instances and the per-subsystem traits they implement.
//!
//! An effect instance is created once per tag occurrence from that
//! occurrence's attributes and applied to every character in its span each
//! frame; it carries no per-character state of its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::Span;
use crate::state::{ColorState, MaterialState, TransformState};

/// An independently pluggable animation domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subsystem {
    Transform,
    Color,
    Material,
}

impl Subsystem {
    /// Get the name of this subsystem
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Color => "color",
            Self::Material => "material",
        }
    }
}

/// Everything an effect may read when animating one character on one frame.
#[derive(Clone, Debug)]
pub struct EffectContext {
    /// Character index in the flattened buffer.
    pub index: usize,
    /// The literal character being animated.
    pub literal: char,
    /// Seconds since this character was revealed (0 if unrevealed).
    pub elapsed: f32,
    /// Seconds since the session started.
    pub total_elapsed: f32,
    /// The span of the tag occurrence that owns this effect.
    pub span: Span,
}

/// Effect animating position, rotation, and scale.
pub trait TransformEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut TransformState);
}

/// Effect animating color; default behavior touches alpha only, RGB override
/// is opt-in via [`ColorState::set_rgb`].
pub trait ColorEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut ColorState);
}

/// Effect writing named numeric overrides.
pub trait MaterialEffect {
    fn apply(&self, ctx: &EffectContext, state: &mut MaterialState);
}

/// A concrete effect instance, tagged by the subsystem it animates.
pub enum EffectInstance {
    Transform(Box<dyn TransformEffect>),
    Color(Box<dyn ColorEffect>),
    Material(Box<dyn MaterialEffect>),
}

impl EffectInstance {
    #[inline]
    pub fn subsystem(&self) -> Subsystem {
        match self {
            Self::Transform(_) => Subsystem::Transform,
            Self::Color(_) => Subsystem::Color,
            Self::Material(_) => Subsystem::Material,
        }
    }
}

impl fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EffectInstance")
            .field(&self.subsystem().name())
            .finish()
    }
}

/// Build-owned table of effect instances, indexed by [`EffectId`].
///
/// [`EffectId`]: crate::character::EffectId
#[derive(Debug, Default)]
pub struct EffectTable {
    items: Vec<EffectInstance>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect: EffectInstance) -> crate::character::EffectId {
        let id = crate::character::EffectId(self.items.len() as u32);
        self.items.push(effect);
        id
    }

    #[inline]
    pub fn get(&self, id: crate::character::EffectId) -> Option<&EffectInstance> {
        self.items.get(id.0 as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.items.iter()
    }
}
