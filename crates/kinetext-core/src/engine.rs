//! Engine: configuration, handler registry, and the parse → build → play
//! entry points.

use std::collections::HashMap;

use tracing::debug;

use kinetext_markup::Node;

use crate::builder::{BuildResult, TimelineBuilder};
use crate::config::EngineConfig;
use crate::handler::HandlerRegistry;
use crate::instruction::RevealCallback;
use crate::output::RenderTarget;
use crate::pipeline::Pipeline;
use crate::session::PlaybackSession;
use crate::Result;

/// Owns the pieces shared across builds: config, tag handlers, and the named
/// reveal callbacks hosts register for `{event}` tags.
pub struct Engine {
    config: EngineConfig,
    registry: HandlerRegistry,
    callbacks: HashMap<String, RevealCallback>,
}

impl Engine {
    /// Create a new engine with the built-in handler set.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::with_builtins(),
            callbacks: HashMap::new(),
        }
    }

    /// Create an engine with a caller-supplied handler registry.
    pub fn with_registry(config: EngineConfig, registry: HandlerRegistry) -> Self {
        Self {
            config,
            registry,
            callbacks: HashMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Register a named reveal callback for `{event name=...}` tags.
    pub fn register_callback(&mut self, name: &str, callback: RevealCallback) {
        self.callbacks.insert(name.to_string(), callback);
    }

    /// Parse markup text into a document tree.
    pub fn parse(&self, markup: &str) -> Result<Vec<Node>> {
        Ok(kinetext_markup::parse(markup)?)
    }

    /// Compile a parsed tree into playback buffers.
    pub fn build(&self, nodes: &[Node]) -> Result<BuildResult> {
        TimelineBuilder::new(&self.registry, &self.callbacks, &self.config).build(nodes)
    }

    /// Parse and build in one step.
    pub fn compile(&self, markup: &str) -> Result<BuildResult> {
        let nodes = self.parse(markup)?;
        self.build(&nodes)
    }

    /// Start playback of a build result against a render target.
    pub fn start(&self, result: BuildResult, target: &mut dyn RenderTarget) -> PlaybackSession {
        debug!("starting session over {} characters", result.character_count());
        let pipeline = Pipeline::new(&self.config);
        let mut session = PlaybackSession::new(result, pipeline);
        session.begin(target);
        session
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
