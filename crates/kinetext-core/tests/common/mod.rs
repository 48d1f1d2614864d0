#![allow(dead_code)]

use kinetext_core::{ColorState, MaterialState, RenderTarget, TransformState};

/// Render target double that records everything the session forwards.
/// Per-frame applies are cleared on `begin_frame` so assertions always see
/// the latest frame only.
#[derive(Default)]
pub struct RecordingTarget {
    pub text: String,
    pub visible: usize,
    pub frames_begun: usize,
    pub frames_finalized: usize,
    pub transforms: Vec<(usize, TransformState)>,
    pub colors: Vec<(usize, ColorState)>,
    pub materials: Vec<(usize, MaterialState)>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform_of(&self, index: usize) -> Option<&TransformState> {
        self.transforms
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, s)| s)
    }

    pub fn color_of(&self, index: usize) -> Option<&ColorState> {
        self.colors
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, s)| s)
    }

    pub fn material_of(&self, index: usize) -> Option<&MaterialState> {
        self.materials
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, s)| s)
    }
}

impl RenderTarget for RecordingTarget {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_visible_count(&mut self, count: usize) {
        self.visible = count;
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
        self.transforms.clear();
        self.colors.clear();
        self.materials.clear();
    }

    fn apply_transform(&mut self, index: usize, state: &TransformState) {
        self.transforms.push((index, state.clone()));
    }

    fn apply_color(&mut self, index: usize, state: &ColorState) {
        self.colors.push((index, state.clone()));
    }

    fn apply_material(&mut self, index: usize, state: &MaterialState) {
        self.materials.push((index, state.clone()));
    }

    fn finalize_update(&mut self) {
        self.frames_finalized += 1;
    }
}
