//! Core configuration for choreo-timeline-core.

use serde::{Deserialize, Serialize};

/// Default location the engine is fetched from when it is not already loaded.
pub const DEFAULT_ENGINE_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/gsap/2.0.2/TweenMax.min.js";

/// Tweening engine bootstrap settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Load the engine on demand when it is not available.
    pub auto_inject: bool,
    pub auto_inject_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_inject: true,
            auto_inject_url: DEFAULT_ENGINE_URL.to_string(),
        }
    }
}

/// Top-level configuration. Keep this minimal; expand without breaking API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "engine": { "auto_inject": false } }"#).unwrap();
        assert!(!cfg.engine.auto_inject);
        assert_eq!(cfg.engine.auto_inject_url, DEFAULT_ENGINE_URL);

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }
}
