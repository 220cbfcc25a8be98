//! # Engine Configuration
//!
//! All tuning constants for shot generation, fatigue/confidence and odds
//! live here so they can be swapped per run.
//!
//! ## Usage
//! ```rust
//! use tennis_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let fast_courts = EngineConfig::serve_dominant();
//! assert!(fast_courts.generator.ace_probability > config.generator.ace_probability);
//! ```

mod dynamics_config;
mod generator_config;
mod odds_config;

pub use dynamics_config::DynamicsConfig;
pub use generator_config::GeneratorConfig;
pub use odds_config::OddsConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{MatchError, ValidationError};

/// Env var naming a JSON/YAML config file that overrides the defaults.
pub const ENGINE_CONFIG_PATH_ENV: &str = "TENNIS_ENGINE_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub generator: GeneratorConfig,
    pub dynamics: DynamicsConfig,
    pub odds: OddsConfig,
    /// Hard stop for a single match (default: 1_000_000 events)
    pub max_events: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            dynamics: DynamicsConfig::default(),
            odds: OddsConfig::default(),
            max_events: 1_000_000,
        }
    }
}

impl EngineConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Fast-court tuning: more aces, shorter rallies.
    pub fn serve_dominant() -> Self {
        let mut cfg = Self::default();
        cfg.generator.ace_probability = 0.12;
        cfg.generator.serve_speed_base = 115.0;
        cfg.generator.outcome_bands = [0.70, 0.84, 0.92, 0.97, 0.985];
        cfg
    }

    /// Small event cap and no landing zones, for fast tests.
    pub fn test() -> Self {
        let mut cfg = Self::default();
        cfg.generator.track_location = false;
        cfg.max_events = 200_000;
        cfg
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.generator.validate().map_err(ValidationError::InvalidConfig)?;
        self.dynamics.validate().map_err(ValidationError::InvalidConfig)?;
        self.odds.validate().map_err(ValidationError::InvalidConfig)?;
        if self.max_events == 0 {
            return Err(ValidationError::InvalidConfig("max_events must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self, MatchError> {
        let cfg: Self = serde_json::from_str(content)
            .map_err(|e| MatchError::Config(format!("invalid JSON engine config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> Result<Self, MatchError> {
        let cfg: Self = serde_yaml::from_str(content)
            .map_err(|e| MatchError::Config(format!("invalid YAML engine config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MatchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MatchError::Config(format!("failed to read {}: {e}", path.display())))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(MatchError::Config(format!(
                "unsupported config extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Config named by `TENNIS_ENGINE_CONFIG_PATH`, or `None` when unset/blank.
    pub fn from_env() -> Result<Option<Self>, MatchError> {
        Self::from_env_value(std::env::var(ENGINE_CONFIG_PATH_ENV).ok().as_deref())
    }

    /// `from_env` with the variable's value passed in.
    pub fn from_env_value(value: Option<&str>) -> Result<Option<Self>, MatchError> {
        let Some(path) = value.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        debug!(path, "loading engine config from {ENGINE_CONFIG_PATH_ENV}");
        Self::load(path)
            .map(Some)
            .map_err(|e| MatchError::Config(format!("{ENGINE_CONFIG_PATH_ENV}='{path}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::realistic().validate().is_ok());
        assert!(EngineConfig::serve_dominant().validate().is_ok());
        assert!(EngineConfig::test().validate().is_ok());
    }

    #[test]
    fn test_rejects_descending_bands() {
        let mut cfg = EngineConfig::default();
        cfg.generator.outcome_bands = [0.9, 0.8, 0.95, 0.98, 0.99];
        assert!(matches!(cfg.validate(), Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_feature_window_wider_than_momentum_window() {
        let mut cfg = EngineConfig::default();
        cfg.odds.feature_window = 11;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{"generator":{"ace_probability":0.2}}"#).unwrap();
        assert_eq!(cfg.generator.ace_probability, 0.2);
        assert_eq!(cfg.generator.second_serve_factor, 1.1);
        assert_eq!(cfg.odds, OddsConfig::default());
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "dynamics:\n  confidence_delta: 0.05\nmax_events: 5000").unwrap();

        let cfg = EngineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.dynamics.confidence_delta, 0.05);
        assert_eq!(cfg.max_events, 5000);
    }

    #[test]
    fn test_env_value_blank_means_unset() {
        assert_eq!(EngineConfig::from_env_value(None).unwrap(), None);
        assert_eq!(EngineConfig::from_env_value(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_env_value_is_loaded_and_validated() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"odds": {{"ceiling_odds": 50.0}}}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cfg = EngineConfig::from_env_value(Some(&path)).unwrap().unwrap();
        assert_eq!(cfg.odds.ceiling_odds, 50.0);

        let mut bad = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(bad, r#"{{"odds": {{"momentum_window": 0}}}}"#).unwrap();
        let path = bad.path().to_str().unwrap().to_string();
        let err = EngineConfig::from_env_value(Some(&path)).unwrap_err();
        assert!(err.to_string().contains(ENGINE_CONFIG_PATH_ENV));

        let err = EngineConfig::from_env_value(Some("/nonexistent/tennis.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tennis.yaml"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(EngineConfig::load(file.path()), Err(MatchError::Config(_))));
    }
}
