//! Playback session: steps wall-clock time against the instruction stream and
//! drives the animation pipeline each frame.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::BuildResult;
use crate::clock::RevealClock;
use crate::error::EngineError;
use crate::instruction::{Instruction, RevealCallback};
use crate::output::RenderTarget;
use crate::pipeline::Pipeline;
use crate::Result;

/// Lifecycle state of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Created but not yet attached to a target
    Building,
    /// Instructions remain to be consumed
    Active,
    /// Instructions exhausted; bound effects keep the session stepping
    Draining,
    /// Nothing left to do
    Complete,
}

impl SessionState {
    /// Get the name of this session state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Active => "active",
            Self::Draining => "draining",
            Self::Complete => "complete",
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Active | Self::Draining)
    }
}

/// A running reveal timeline over one build result.
///
/// Single-threaded and synchronous: `update` performs all work before
/// returning, once per host tick.
pub struct PlaybackSession {
    result: BuildResult,
    pipeline: Pipeline,
    state: SessionState,

    /// Next instruction to consume.
    cursor: usize,
    /// Total elapsed time at the current instruction's start; fractional
    /// progress into the instruction is `elapsed - instruction_start`.
    instruction_start: f32,
    /// Total elapsed session time.
    elapsed: f32,
    /// Visible high-water mark.
    visible: usize,
    clock: RevealClock,
}

impl PlaybackSession {
    pub(crate) fn new(result: BuildResult, pipeline: Pipeline) -> Self {
        let capacity = result.character_count();
        Self {
            result,
            pipeline,
            state: SessionState::Building,
            cursor: 0,
            instruction_start: 0.0,
            elapsed: 0.0,
            visible: 0,
            clock: RevealClock::with_capacity(capacity),
        }
    }

    /// Push the initial text and zero visible count to the target.
    pub(crate) fn begin(&mut self, target: &mut dyn RenderTarget) {
        target.set_text(&self.result.plain_text);
        target.set_visible_count(0);
        self.refresh_state();
        debug!(
            "session started: {} instructions, {} effects",
            self.result.instructions.len(),
            self.result.effects.len()
        );
    }

    /// Total elapsed session time in seconds.
    #[inline]
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    /// Number of characters revealed so far (high-water mark).
    #[inline]
    pub fn visible_characters(&self) -> usize {
        self.visible
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[inline]
    pub fn build_result(&self) -> &BuildResult {
        &self.result
    }

    /// Step the session by `delta_time` seconds and re-render into `target`.
    /// Returns whether the session is complete.
    pub fn update(&mut self, delta_time: f32, target: &mut dyn RenderTarget) -> Result<bool> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(EngineError::InvalidArgument {
                reason: format!("delta_time must be finite and >= 0, got {}", delta_time),
            });
        }

        // A finished session still re-renders its final frame.
        if self.state.is_complete() {
            self.render(target);
            return Ok(true);
        }

        self.elapsed += delta_time;
        self.consume_instructions();
        self.refresh_state();
        self.render(target);
        Ok(self.is_complete())
    }

    /// Reveal a character directly, outside the instruction stream.
    ///
    /// Idempotent for the high-water mark and the clock stamp; the callback
    /// fires on every call, including repeats for an already-visible index.
    pub fn reveal_character(
        &mut self,
        index: usize,
        callback: Option<&RevealCallback>,
    ) -> Result<()> {
        if index >= self.result.character_count() {
            return Err(EngineError::InvalidArgument {
                reason: format!(
                    "character index {} out of range (have {})",
                    index,
                    self.result.character_count()
                ),
            });
        }
        self.visible = self.visible.max(index + 1);
        self.clock.stamp(index, self.elapsed);
        if let Some(callback) = callback {
            callback(index);
        }
        self.refresh_state();
        Ok(())
    }

    /// Consume every instruction whose end the accumulated time has reached.
    /// Zero-duration instructions trailing a consumed one are consumed in the
    /// same call.
    fn consume_instructions(&mut self) {
        while self.cursor < self.result.instructions.len() {
            let instruction = self.result.instructions[self.cursor].clone();
            let end = self.instruction_start + instruction.duration();
            if self.elapsed < end {
                break;
            }
            if let Instruction::Reveal {
                index, callback, ..
            } = instruction
            {
                self.visible = self.visible.max(index + 1);
                // Reveal time is the instruction's start, not its end.
                self.clock.stamp(index, self.instruction_start);
                if let Some(callback) = callback {
                    callback(index);
                }
            }
            self.instruction_start = end;
            self.cursor += 1;
        }
    }

    /// Complete only once instructions are exhausted and either no effects
    /// exist or nothing was ever revealed; otherwise sessions with bound
    /// effects keep stepping so continuous effects animate.
    fn refresh_state(&mut self) {
        self.state = if self.cursor < self.result.instructions.len() {
            SessionState::Active
        } else if self.result.has_effects() && self.visible > 0 {
            SessionState::Draining
        } else {
            SessionState::Complete
        };
    }

    fn render(&mut self, target: &mut dyn RenderTarget) {
        target.begin_frame();
        target.set_visible_count(self.visible);
        for index in 0..self.visible {
            let elapsed = self.clock.elapsed_since_reveal(index, self.elapsed);
            self.pipeline
                .animate(index, elapsed, self.elapsed, &self.result, target);
        }
        target.finalize_update();
    }
}
