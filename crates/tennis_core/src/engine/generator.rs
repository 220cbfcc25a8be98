//! Stochastic shot/event generator.
//!
//! One call to [`EventGenerator::next_event`] produces one shot. A point
//! starts with a serve sequence (first and, if needed, second serve folded
//! into a single event) and continues with alternating rally shots until an
//! outcome other than in-play is drawn.
//!
//! Rally outcomes use a single uniform draw against ascending thresholds
//! `accuracy x edge` for the configured band edges, in the order in-play,
//! winner, forced error, unforced error, net, with everything above the last
//! edge out.
//!
//! All randomness comes from the injected `R: Rng`; the same seed and inputs
//! reproduce the same event sequence.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use super::config::GeneratorConfig;
use super::state::ScoreSnapshot;
use crate::error::ValidationError;
use crate::models::{
    CourtLocation, PlayerAttributes, Shot, ShotOutcome, ShotType, TennisEvent,
};

/// Rally speed multiplier per shot type.
fn speed_multiplier(shot_type: ShotType) -> f64 {
    match shot_type {
        ShotType::Forehand => 1.2,
        ShotType::Backhand => 1.1,
        ShotType::VolleyForehand | ShotType::VolleyBackhand => 0.9,
        ShotType::Smash => 1.5,
        ShotType::SliceForehand | ShotType::SliceBackhand => 0.85,
        ShotType::DropshotForehand | ShotType::DropshotBackhand => 0.6,
        ShotType::ServeFirst | ShotType::ServeSecond => 1.0,
    }
}

pub struct EventGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
    config: GeneratorConfig,
    speed_noise: Normal<f64>,
    /// Player due to strike next in the rally; `None` means the next shot is a serve.
    rally_striker: Option<usize>,
}

impl EventGenerator<ChaCha8Rng> {
    /// Deterministic generator seeded from a single integer.
    pub fn seeded(seed: u64, config: GeneratorConfig) -> Result<Self, ValidationError> {
        Self::new(ChaCha8Rng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> EventGenerator<R> {
    pub fn new(rng: R, config: GeneratorConfig) -> Result<Self, ValidationError> {
        config.validate().map_err(ValidationError::InvalidConfig)?;
        let speed_noise = Normal::new(0.0, config.speed_std_dev)
            .map_err(|e| ValidationError::InvalidConfig(format!("speed_std_dev: {e}")))?;
        Ok(Self { rng, config, speed_noise, rally_striker: None })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce the next shot given the current score and both players' attributes.
    pub fn next_event(
        &mut self,
        snapshot: &ScoreSnapshot,
        players: &[PlayerAttributes; 2],
        is_decisive_point: bool,
    ) -> TennisEvent {
        let event = match self.rally_striker {
            None => self.serve(snapshot.server, &players[snapshot.server]),
            Some(striker) => self.rally_shot(striker, &players[striker]),
        };

        self.rally_striker = if event.ends_point() { None } else { Some(1 - event.player) };
        TennisEvent { is_decisive_point, ..event }
    }

    // ========== Serve ==========

    fn serve(&mut self, server: usize, attrs: &PlayerAttributes) -> TennisEvent {
        let first_in = self.rng.gen::<f64>() < attrs.serve_accuracy;

        let (shot_type, outcome) = if first_in {
            let outcome = if self.rng.gen::<f64>() < self.config.ace_probability {
                ShotOutcome::Ace
            } else {
                ShotOutcome::InPlay
            };
            (ShotType::ServeFirst, outcome)
        } else {
            let second_in = (attrs.serve_accuracy * self.config.second_serve_factor).min(1.0);
            let outcome = if self.rng.gen::<f64>() < second_in {
                ShotOutcome::InPlay
            } else {
                ShotOutcome::DoubleFault
            };
            (ShotType::ServeSecond, outcome)
        };

        let mean = self.config.serve_speed_base + self.config.serve_speed_per_point * attrs.speed;
        let shot = self.ball(shot_type, mean, self.config.serve_spin_range);
        TennisEvent { player: server, shot, outcome, is_decisive_point: false }
    }

    // ========== Rally ==========

    fn rally_shot(&mut self, striker: usize, attrs: &PlayerAttributes) -> TennisEvent {
        let shot_type = self.choose_shot(attrs);
        let accuracy = attrs.accuracy(shot_type.accuracy_class());
        let outcome = self.resolve_outcome(accuracy);

        let mean = self.config.rally_speed_factor * attrs.speed * speed_multiplier(shot_type);
        let shot = self.ball(shot_type, mean, self.config.rally_spin_range);
        TennisEvent { player: striker, shot, outcome, is_decisive_point: false }
    }

    fn choose_shot(&mut self, attrs: &PlayerAttributes) -> ShotType {
        let (shots, weights): (Vec<ShotType>, Vec<f64>) =
            attrs.shot_preferences.weighted_shots().unzip();
        match WeightedIndex::new(&weights) {
            Ok(dist) => shots[dist.sample(&mut self.rng)],
            Err(_) => ShotType::Forehand,
        }
    }

    fn resolve_outcome(&mut self, accuracy: f64) -> ShotOutcome {
        const ORDER: [ShotOutcome; 5] = [
            ShotOutcome::InPlay,
            ShotOutcome::Winner,
            ShotOutcome::ForcedError,
            ShotOutcome::UnforcedError,
            ShotOutcome::Net,
        ];

        let roll = self.rng.gen::<f64>();
        self.config
            .outcome_bands
            .iter()
            .zip(ORDER)
            .find(|(edge, _)| roll < accuracy * **edge)
            .map(|(_, outcome)| outcome)
            .unwrap_or(ShotOutcome::Out)
    }

    fn ball(&mut self, shot_type: ShotType, mean_speed: f64, spin_range: (f64, f64)) -> Shot {
        let ball_speed = (mean_speed + self.speed_noise.sample(&mut self.rng))
            .clamp(self.config.min_ball_speed, self.config.max_ball_speed);
        let ball_spin = self.rng.gen_range(spin_range.0..=spin_range.1);
        let location = if self.config.track_location {
            CourtLocation::ALL.choose(&mut self.rng).copied()
        } else {
            None
        };
        Shot { shot_type, ball_speed, ball_spin, location }
    }
}
