//! Editor configuration.
//!
//! Constants that shape gesture and clipboard behavior. Hosts may ship a JSON
//! file; every field is optional and falls back to the default below.

use serde::{Deserialize, Serialize};

/// Which node a screen point resolves to when containers overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaycastTargeting {
    /// Topmost visual hit (the outermost node under the pointer).
    #[default]
    Shallowest,
    /// Innermost hit; pierces container layers.
    Deepest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Offset applied on both axes to every pasted node. Default: **10**.
    pub paste_offset: f64,

    /// Arrow-key nudge distance. Default: **1**.
    pub nudge_step: f64,

    /// Arrow-key nudge distance while Shift is held. Default: **10**.
    pub nudge_step_large: f64,

    /// Floor for width/height during resize. Default: **1**.
    pub min_size: f64,

    /// Pointer-move raycasts are coalesced to at most one per interval. Default: **30ms**.
    pub raycast_interval_ms: u64,

    /// Initial width/height of a node created by insert-by-drag. Default: **1**.
    pub insert_size: f64,

    /// Targeting used while Meta is not held.
    pub default_raycast_targeting: RaycastTargeting,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            paste_offset: 10.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            min_size: 1.0,
            raycast_interval_ms: 30,
            insert_size: 1.0,
            default_raycast_targeting: RaycastTargeting::Shallowest,
        }
    }
}

impl EditorConfig {
    /// Load a configuration from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    /// Returns the serde error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "paste_offset": 24 }"#).unwrap();
        assert_eq!(config.paste_offset, 24.0);
        assert_eq!(config.nudge_step, 1.0);
        assert_eq!(config.raycast_interval_ms, 30);
        assert_eq!(config.default_raycast_targeting, RaycastTargeting::Shallowest);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(EditorConfig::from_json(r#"{ "min_size": "big" }"#).is_err());
    }
}
