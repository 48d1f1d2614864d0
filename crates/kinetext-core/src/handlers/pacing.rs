//! Playback-control handlers: delays, pacing, batching, reveal events.

use kinetext_markup::TagNode;

use crate::error::EngineError;
use crate::handler::{PlaybackAction, PlaybackControl, ScopeView};
use crate::handlers::{non_negative, required_f32, required_u32};
use crate::instruction::Instruction;
use crate::strategy::{BatchStrategy, FixedCharacterCount, FixedWordCount};
use crate::Result;

/// `{wait 0.5}` / `{pause duration=0.5}`: insert a pure delay before the
/// tag's children reveal. Leaves pacing, batching, and callbacks inherited.
pub struct WaitHandler;

impl PlaybackControl for WaitHandler {
    fn enter(&self, tag: &TagNode, _scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let duration = non_negative(tag, "duration", required_f32(tag, "duration", Some(0))?)?;
        Ok(PlaybackAction {
            instructions: vec![Instruction::Wait { duration }],
            ..PlaybackAction::default()
        })
    }
}

/// `{charbychar duration=0.1}`: reveal every character on its own timed step.
pub struct CharByCharHandler;

impl PlaybackControl for CharByCharHandler {
    fn enter(&self, tag: &TagNode, _scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let duration = non_negative(tag, "duration", required_f32(tag, "duration", Some(0))?)?;
        Ok(PlaybackAction {
            duration: Some(duration),
            strategy: Some(Box::new(FixedCharacterCount::default())),
            ..PlaybackAction::default()
        })
    }
}

/// `{wordbyword duration=0.2}`: one timed step at the start of every word.
pub struct WordByWordHandler;

impl PlaybackControl for WordByWordHandler {
    fn enter(&self, tag: &TagNode, _scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let duration = non_negative(tag, "duration", required_f32(tag, "duration", Some(0))?)?;
        Ok(PlaybackAction {
            duration: Some(duration),
            strategy: Some(Box::new(FixedWordCount::new(1)?)),
            ..PlaybackAction::default()
        })
    }
}

/// `{batch chars=3 duration=0.2}` or `{batch words=2 duration=0.4}`: one
/// timed step per n characters or per n words.
pub struct BatchHandler;

impl PlaybackControl for BatchHandler {
    fn enter(&self, tag: &TagNode, _scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let chars = tag.attributes.get("chars").is_some();
        let words = tag.attributes.get("words").is_some();

        let strategy: Box<dyn BatchStrategy> = match (chars, words) {
            (true, true) => {
                return Err(EngineError::InvalidParameter {
                    tag: tag.name.clone(),
                    parameter: "words".to_string(),
                    reason: "'chars' and 'words' are mutually exclusive".to_string(),
                })
            }
            (true, false) => {
                let n = required_u32(tag, "chars")?;
                Box::new(FixedCharacterCount::new(n).map_err(|_| batch_size_error(tag, "chars"))?)
            }
            (false, true) => {
                let n = required_u32(tag, "words")?;
                Box::new(FixedWordCount::new(n).map_err(|_| batch_size_error(tag, "words"))?)
            }
            (false, false) => {
                return Err(EngineError::MissingParameter {
                    tag: tag.name.clone(),
                    parameter: "chars".to_string(),
                })
            }
        };

        let duration = match tag.attributes.get("duration") {
            Some(_) => Some(non_negative(
                tag,
                "duration",
                required_f32(tag, "duration", None)?,
            )?),
            None => None,
        };

        Ok(PlaybackAction {
            duration,
            strategy: Some(strategy),
            ..PlaybackAction::default()
        })
    }
}

fn batch_size_error(tag: &TagNode, parameter: &str) -> EngineError {
    EngineError::InvalidParameter {
        tag: tag.name.clone(),
        parameter: parameter.to_string(),
        reason: "batch size must be at least 1".to_string(),
    }
}

/// `{pace duration=0.05}`: override only the per-character duration; the
/// active strategy keeps counting through a shared-progress child.
pub struct PaceHandler;

impl PlaybackControl for PaceHandler {
    fn enter(&self, tag: &TagNode, scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let duration = non_negative(tag, "duration", required_f32(tag, "duration", Some(0))?)?;
        Ok(PlaybackAction {
            duration: Some(duration),
            strategy: Some(scope.strategy.create_child()),
            ..PlaybackAction::default()
        })
    }
}

/// `{event name="beep"}`: fire a host-registered callback for every reveal
/// in the tag's subtree.
pub struct EventHandler;

impl PlaybackControl for EventHandler {
    fn enter(&self, tag: &TagNode, scope: &ScopeView<'_>) -> Result<PlaybackAction> {
        let name = tag
            .attributes
            .get("name")
            .or_else(|| tag.attributes.positional(0))
            .ok_or_else(|| EngineError::MissingParameter {
                tag: tag.name.clone(),
                parameter: "name".to_string(),
            })?;
        let callback = scope
            .callbacks
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::InvalidParameter {
                tag: tag.name.clone(),
                parameter: "name".to_string(),
                reason: format!("no reveal callback registered as '{}'", name),
            })?;
        Ok(PlaybackAction {
            callback: Some(callback),
            ..PlaybackAction::default()
        })
    }
}
