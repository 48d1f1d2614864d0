//! Output contract toward the host's text renderer.
//!
//! The core never touches mesh or material data directly; it forwards plain
//! state through this trait and the adapter decides what to do with it. The
//! per-subsystem hooks default to no-ops so an adapter only implements the
//! subsystems it can apply.

use crate::state::{ColorState, MaterialState, TransformState};

/// Abstract sink the playback session renders into.
pub trait RenderTarget {
    /// Replace the full text, including rich-text passthrough spans.
    fn set_text(&mut self, text: &str);

    /// Number of characters currently revealed (high-water mark).
    fn set_visible_count(&mut self, count: usize);

    /// Reset per-frame state before characters are animated.
    fn begin_frame(&mut self) {}

    fn apply_transform(&mut self, index: usize, state: &TransformState) {
        let _ = (index, state);
    }

    fn apply_color(&mut self, index: usize, state: &ColorState) {
        let _ = (index, state);
    }

    fn apply_material(&mut self, index: usize, state: &MaterialState) {
        let _ = (index, state);
    }

    /// Commit the frame after all characters were animated.
    fn finalize_update(&mut self) {}
}
