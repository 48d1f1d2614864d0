//! Per-character reveal timestamps.

use serde::{Deserialize, Serialize};

/// Records when each character first became visible and the largest elapsed
/// value already reported for it, so effect-relative time never runs backward.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RevealClock {
    stamps: Vec<Option<f32>>,
    max_elapsed: Vec<f32>,
}

impl RevealClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stamps: Vec::with_capacity(capacity),
            max_elapsed: Vec::with_capacity(capacity),
        }
    }

    fn ensure(&mut self, index: usize) {
        if index >= self.stamps.len() {
            self.stamps.resize(index + 1, None);
            self.max_elapsed.resize(index + 1, 0.0);
        }
    }

    /// Stamp a character's reveal time. First write wins; returns whether the
    /// stamp was taken.
    pub fn stamp(&mut self, index: usize, at: f32) -> bool {
        self.ensure(index);
        if self.stamps[index].is_some() {
            return false;
        }
        self.stamps[index] = Some(at);
        true
    }

    #[inline]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.stamps.get(index).copied().flatten().is_some()
    }

    #[inline]
    pub fn reveal_time(&self, index: usize) -> Option<f32> {
        self.stamps.get(index).copied().flatten()
    }

    /// Seconds since the character's reveal, clamped to never decrease across
    /// calls. Unrevealed characters report 0.
    pub fn elapsed_since_reveal(&mut self, index: usize, now: f32) -> f32 {
        let stamp = match self.stamps.get(index).copied().flatten() {
            Some(stamp) => stamp,
            None => return 0.0,
        };
        let elapsed = (now - stamp).max(0.0).max(self.max_elapsed[index]);
        self.max_elapsed[index] = elapsed;
        elapsed
    }
}
