//! Fatigue & confidence updates applied after every shot.
//!
//! Fatigue grows for the striker (twice as fast on serves and smashes) and
//! recovers slightly for the other player. Confidence moves only when a point
//! ends: the winner gains what the loser gives up. Both stay in [0, 1].
//!
//! These values are recorded on the match state and exposed to the predictor;
//! they are not fed back into shot accuracy.

use super::config::DynamicsConfig;
use crate::models::{PlayerDynamics, TennisEvent};

#[derive(Debug, Clone, Default)]
pub struct DynamicsModel {
    config: DynamicsConfig,
}

impl DynamicsModel {
    pub fn new(config: DynamicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    pub fn apply(&self, dynamics: &mut [PlayerDynamics; 2], event: &TennisEvent) {
        let striker = event.player;
        let other = 1 - striker;

        let mut increment = self.config.fatigue_per_shot;
        if event.shot.shot_type.is_heavy() {
            increment *= self.config.heavy_shot_multiplier;
        }
        dynamics[striker].fatigue = clamp_unit(dynamics[striker].fatigue + increment);
        dynamics[other].fatigue = clamp_unit(dynamics[other].fatigue - self.config.fatigue_recovery);

        if let Some(winner) = event.point_winner() {
            let delta = self.config.confidence_delta;
            dynamics[winner].confidence = clamp_unit(dynamics[winner].confidence + delta);
            dynamics[1 - winner].confidence = clamp_unit(dynamics[1 - winner].confidence - delta);
        }
    }
}

#[inline]
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
