//! Static player attributes and per-match dynamic state.
//!
//! `PlayerAttributes` never changes during a match. Fatigue and confidence
//! live in `PlayerDynamics`, owned by the match state and addressed by
//! player index.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::events::{AccuracyClass, ShotType};
use crate::error::ValidationError;

/// Normalized rally shot distribution (serves excluded, weights sum to 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ShotType, f64>", into = "BTreeMap<ShotType, f64>")]
pub struct ShotPreferences {
    weights: BTreeMap<ShotType, f64>,
}

impl ShotPreferences {
    pub fn new(raw: BTreeMap<ShotType, f64>) -> Result<Self, ValidationError> {
        if let Some(serve) = raw.keys().find(|s| s.is_serve()) {
            return Err(ValidationError::InvalidPreferences(format!(
                "{} is handled separately and cannot carry a rally weight",
                serve.name()
            )));
        }
        if let Some((shot, weight)) = raw.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(ValidationError::InvalidPreferences(format!(
                "weight for {} must be a non-negative number, got {}",
                shot.name(),
                weight
            )));
        }

        let total: f64 = raw.values().sum();
        if total <= 0.0 {
            return Err(ValidationError::InvalidPreferences(
                "at least one rally shot needs a positive weight".to_string(),
            ));
        }

        let weights = raw.into_iter().map(|(shot, w)| (shot, w / total)).collect();
        Ok(Self { weights })
    }

    pub fn weight(&self, shot: ShotType) -> f64 {
        self.weights.get(&shot).copied().unwrap_or(0.0)
    }

    /// Rally shot types paired with their weights, in `ShotType::RALLY` order.
    pub fn weighted_shots(&self) -> impl Iterator<Item = (ShotType, f64)> + '_ {
        ShotType::RALLY.iter().map(move |&shot| (shot, self.weight(shot)))
    }
}

impl Default for ShotPreferences {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (ShotType::Forehand, 0.3),
            (ShotType::Backhand, 0.3),
            (ShotType::VolleyForehand, 0.05),
            (ShotType::VolleyBackhand, 0.05),
            (ShotType::Smash, 0.05),
            (ShotType::SliceForehand, 0.1),
            (ShotType::SliceBackhand, 0.1),
            (ShotType::DropshotForehand, 0.025),
            (ShotType::DropshotBackhand, 0.025),
        ]);
        Self { weights }
    }
}

impl JsonSchema for ShotPreferences {
    fn schema_name() -> String {
        "ShotPreferences".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <BTreeMap<ShotType, f64>>::json_schema(gen)
    }
}

impl TryFrom<BTreeMap<ShotType, f64>> for ShotPreferences {
    type Error = ValidationError;

    fn try_from(raw: BTreeMap<ShotType, f64>) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ShotPreferences> for BTreeMap<ShotType, f64> {
    fn from(prefs: ShotPreferences) -> Self {
        prefs.weights
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerAttributes {
    pub name: String,
    /// Probability a first serve lands (0.0-1.0).
    pub serve_accuracy: f64,
    pub groundstroke_accuracy: f64,
    pub volley_accuracy: f64,
    /// 0-100
    pub speed: f64,
    /// 0-100
    pub stamina: f64,
    /// 0-100
    pub mental_strength: f64,
    #[serde(default)]
    pub shot_preferences: ShotPreferences,
    /// Head-to-head wins keyed by opponent name.
    #[serde(default)]
    pub wins_vs_opponents: BTreeMap<String, u32>,
}

impl PlayerAttributes {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let unit = |attribute: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidAttribute { attribute, value, expected: "0.0..=1.0" })
            }
        };
        let rating = |attribute: &'static str, value: f64| {
            if (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidAttribute { attribute, value, expected: "0..=100" })
            }
        };

        unit("serve_accuracy", self.serve_accuracy)?;
        unit("groundstroke_accuracy", self.groundstroke_accuracy)?;
        unit("volley_accuracy", self.volley_accuracy)?;
        rating("speed", self.speed)?;
        rating("stamina", self.stamina)?;
        rating("mental_strength", self.mental_strength)?;
        Ok(())
    }

    pub fn accuracy(&self, class: AccuracyClass) -> f64 {
        match class {
            AccuracyClass::Serve => self.serve_accuracy,
            AccuracyClass::Volley => self.volley_accuracy,
            AccuracyClass::Groundstroke => self.groundstroke_accuracy,
        }
    }

    /// Average of serve and groundstroke accuracy.
    pub fn base_strength(&self) -> f64 {
        (self.serve_accuracy + self.groundstroke_accuracy) / 2.0
    }

    pub fn wins_vs(&self, opponent: &str) -> u32 {
        self.wins_vs_opponents.get(opponent).copied().unwrap_or(0)
    }
}

/// Per-match mutable player state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerDynamics {
    /// 0.0 (fresh) to 1.0 (exhausted)
    pub fatigue: f64,
    /// 0.0 to 1.0, neutral 0.5
    pub confidence: f64,
}

impl Default for PlayerDynamics {
    fn default() -> Self {
        Self { fatigue: 0.0, confidence: 0.5 }
    }
}
