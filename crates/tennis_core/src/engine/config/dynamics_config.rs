//! Fatigue / confidence parameters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Striker fatigue gain per shot (default: 0.01)
    pub fatigue_per_shot: f64,
    /// Multiplier for serves and smashes (default: 2.0)
    pub heavy_shot_multiplier: f64,
    /// Non-striker fatigue recovery per shot (default: 0.005)
    pub fatigue_recovery: f64,
    /// Confidence swing per completed point (default: 0.02)
    pub confidence_delta: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            fatigue_per_shot: 0.01,
            heavy_shot_multiplier: 2.0,
            fatigue_recovery: 0.005,
            confidence_delta: 0.02,
        }
    }
}

impl DynamicsConfig {
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("fatigue_per_shot", self.fatigue_per_shot),
            ("heavy_shot_multiplier", self.heavy_shot_multiplier),
            ("fatigue_recovery", self.fatigue_recovery),
            ("confidence_delta", self.confidence_delta),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}
