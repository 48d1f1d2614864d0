//! Core configuration for kinetext-core.

use serde::{Deserialize, Serialize};

use crate::effect::Subsystem;
use crate::Result;

/// Configuration for engine defaults and pipeline sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Enabled animation subsystems, in pipeline application order.
    pub subsystems: Vec<Subsystem>,

    /// Per-character reveal duration inherited at the top of the tag tree.
    pub default_duration: f32,

    /// Minimum capacity of pooled per-character state arenas.
    pub min_pool_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            subsystems: vec![Subsystem::Transform, Subsystem::Color, Subsystem::Material],
            default_duration: 0.0,
            min_pool_capacity: 4,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_all_subsystems() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.subsystems.len(), 3);
        assert_eq!(cfg.default_duration, 0.0);
        assert_eq!(cfg.min_pool_capacity, 4);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = EngineConfig {
            subsystems: vec![Subsystem::Color],
            default_duration: 0.05,
            min_pool_capacity: 8,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), cfg);
    }
}
