//! Simulation Driver
//!
//! One iteration = one generated event, one scoreboard update, one
//! predictor call and one odds computation, in that order. The loop stops
//! when the scoreboard reports the match over.
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use tennis_core::engine::{EngineConfig, MatchSetup, MatchSimulation};
//! use tennis_core::predictor::StrengthModel;
//!
//! let setup = MatchSetup::demo();
//! let sim = MatchSimulation::seeded(setup, &EngineConfig::test(), 42, Arc::new(StrengthModel::default()))
//!     .unwrap();
//! let report = sim.run().unwrap();
//! assert_eq!(report.set_score[report.winner], 3);
//! ```

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::EngineConfig;
use super::dynamics::DynamicsModel;
use super::generator::EventGenerator;
use super::scoring::Scoreboard;
use super::sink::{EventRecord, EventSink, MatchOutcome};
use super::state::{ScoreSnapshot, SetRecord};
use crate::error::{MatchError, MissingFeatureError, Result};
use crate::models::{
    MatchContext, MatchFormat, MatchFormatSpec, MatchStatistics, PlayerAttributes,
    ShotPreferences, TennisEvent,
};
use crate::odds::{MarketOdds, OddsCalculator};
use crate::predictor::{FeatureSnapshot, WinProbabilityModel};

// ============================================
// MatchSetup
// ============================================

/// Immutable inputs for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSetup {
    #[serde(default)]
    pub format: MatchFormat,
    pub players: [PlayerAttributes; 2],
    #[serde(default)]
    pub context: MatchContext,
}

impl MatchSetup {
    pub fn validate(&self) -> Result<()> {
        for player in &self.players {
            player.validate()?;
        }
        Ok(())
    }

    /// Two evenly matched baseline players on an outdoor hard court.
    pub fn demo() -> Self {
        let player = |name: &str, opponent: &str, serve: f64, ground: f64, speed: f64, h2h: u32| {
            PlayerAttributes {
                name: name.to_string(),
                serve_accuracy: serve,
                groundstroke_accuracy: ground,
                volley_accuracy: 0.7,
                speed,
                stamina: 88.0,
                mental_strength: 90.0,
                shot_preferences: ShotPreferences::default(),
                wins_vs_opponents: BTreeMap::from([(opponent.to_string(), h2h)]),
            }
        };
        Self {
            format: MatchFormat::grand_slam(),
            players: [
                player("Roger", "Novak", 0.70, 0.75, 85.0, 23),
                player("Novak", "Roger", 0.65, 0.80, 90.0, 27),
            ],
            context: MatchContext::default(),
        }
    }
}

// ============================================
// MatchReport
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchReport {
    pub schema_version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub players: [String; 2],
    pub format: MatchFormatSpec,
    pub winner: usize,
    pub winner_name: String,
    pub set_score: [u32; 2],
    pub sets: Vec<SetRecord>,
    pub total_points: u32,
    pub total_events: u64,
    pub statistics: MatchStatistics,
    pub final_win_probability: f64,
    pub final_odds: MarketOdds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventRecord>>,
}

// ============================================
// MatchSimulation
// ============================================

pub struct MatchSimulation<R: Rng = ChaCha8Rng> {
    setup: MatchSetup,
    seed: Option<u64>,
    scoreboard: Scoreboard,
    generator: EventGenerator<R>,
    predictor: Arc<dyn WinProbabilityModel>,
    odds: OddsCalculator,
    recent: VecDeque<TennisEvent>,
    momentum_window: usize,
    feature_window: usize,
    max_events: u64,
    events_processed: u64,
    sinks: Vec<Box<dyn EventSink>>,
    event_log: Option<Vec<EventRecord>>,
    last: Option<(f64, MarketOdds)>,
    /// Set when the predictor fails after an event was already scored.
    failure: Option<MissingFeatureError>,
}

impl MatchSimulation<ChaCha8Rng> {
    /// Deterministic match: the same seed and inputs replay the same events.
    pub fn seeded(
        setup: MatchSetup,
        config: &EngineConfig,
        seed: u64,
        predictor: Arc<dyn WinProbabilityModel>,
    ) -> Result<Self> {
        let mut sim = Self::with_rng(setup, config, ChaCha8Rng::seed_from_u64(seed), predictor)?;
        sim.seed = Some(seed);
        Ok(sim)
    }
}

impl<R: Rng> MatchSimulation<R> {
    pub fn with_rng(
        setup: MatchSetup,
        config: &EngineConfig,
        rng: R,
        predictor: Arc<dyn WinProbabilityModel>,
    ) -> Result<Self> {
        config.validate()?;
        setup.validate()?;

        let generator = EventGenerator::new(rng, config.generator.clone())?;
        let scoreboard = Scoreboard::with_dynamics(
            setup.format.clone(),
            DynamicsModel::new(config.dynamics.clone()),
        );

        Ok(Self {
            setup,
            seed: None,
            scoreboard,
            generator,
            predictor,
            odds: OddsCalculator::new(config.odds.clone()),
            recent: VecDeque::with_capacity(config.odds.momentum_window),
            momentum_window: config.odds.momentum_window,
            feature_window: config.odds.feature_window,
            max_events: config.max_events,
            events_processed: 0,
            sinks: Vec::new(),
            event_log: None,
            last: None,
            failure: None,
        })
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        debug!(sink = sink.name(), "sink attached");
        self.sinks.push(sink);
    }

    /// Keep every `EventRecord` for the final report.
    pub fn record_events(&mut self, enabled: bool) {
        self.event_log = if enabled { Some(Vec::new()) } else { None };
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn is_match_over(&self) -> bool {
        self.scoreboard.is_match_over()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Most recent events, oldest first (bounded by the momentum window).
    pub fn recent_events(&self) -> impl Iterator<Item = &TennisEvent> {
        self.recent.iter()
    }

    fn features(&mut self, score: &ScoreSnapshot) -> FeatureSnapshot {
        let recent = self.recent.make_contiguous();
        FeatureSnapshot::capture(score, &self.setup.players, &self.setup.context, recent, self.feature_window)
    }

    fn predict(&self, features: &FeatureSnapshot) -> std::result::Result<f64, MissingFeatureError> {
        let raw = self.predictor.predict(features)?;
        if raw.is_nan() {
            warn!("predictor returned NaN, using 0.5");
            return Ok(0.5);
        }
        if !(0.0..=1.0).contains(&raw) {
            warn!(probability = raw, "predictor output outside [0, 1], clamping");
        }
        Ok(raw.clamp(0.0, 1.0))
    }

    /// Advance the match by exactly one event.
    ///
    /// A predictor failure halts the simulation: the failing event stays
    /// scored and every later call returns the same error.
    pub fn step(&mut self) -> Result<EventRecord> {
        if let Some(err) = &self.failure {
            return Err(err.clone().into());
        }
        if self.scoreboard.is_match_over() {
            return Err(MatchError::MatchAlreadyOver);
        }
        if self.events_processed >= self.max_events {
            return Err(MatchError::EventLimitExceeded { limit: self.max_events });
        }
        if self.events_processed == 0 {
            let opening = self.scoreboard.get_score_snapshot();
            let features = self.features(&opening);
            for sink in &mut self.sinks {
                sink.on_match_start(&features);
            }
        }

        // 1. Event
        let before = self.scoreboard.get_score_snapshot();
        let decisive = self.scoreboard.is_decisive_point();
        let event = self.generator.next_event(&before, &self.setup.players, decisive);

        // 2. Score, dynamics, statistics
        self.scoreboard.record_event(&event)?;
        if self.recent.len() == self.momentum_window {
            self.recent.pop_front();
        }
        self.recent.push_back(event);

        // 3. Predictor + odds
        let score = self.scoreboard.get_score_snapshot();
        let features = self.features(&score);
        let win_probability = match self.predict(&features) {
            Ok(p) => p,
            Err(err) => {
                warn!(feature = %err.feature, index = self.events_processed, "predictor failed, simulation halted");
                self.failure = Some(err.clone());
                return Err(err.into());
            }
        };
        let odds = self.odds.compute_odds(win_probability, &score, self.recent.make_contiguous());

        let record = EventRecord { index: self.events_processed, event, score, win_probability, odds };
        self.events_processed += 1;
        self.last = Some((win_probability, odds));

        for sink in &mut self.sinks {
            sink.on_event(&record, &features);
        }
        if let Some(log) = self.event_log.as_mut() {
            log.push(record.clone());
        }

        if self.scoreboard.is_match_over() {
            if let Some(outcome) = self.outcome() {
                for sink in &mut self.sinks {
                    sink.on_match_end(&outcome);
                }
            }
        }
        Ok(record)
    }

    /// Step until the match is over, then build the report.
    pub fn run(mut self) -> Result<MatchReport> {
        while !self.scoreboard.is_match_over() {
            self.step()?;
        }
        self.into_report().ok_or(MatchError::MatchAlreadyOver)
    }

    fn outcome(&self) -> Option<MatchOutcome> {
        let winner = self.scoreboard.winner()?;
        let state = self.scoreboard.state();
        Some(MatchOutcome {
            winner,
            set_score: state.sets,
            points_played: state.points_played,
            events: self.events_processed,
        })
    }

    /// Final report; `None` until the match is over.
    pub fn into_report(self) -> Option<MatchReport> {
        let outcome = self.outcome()?;
        let (final_win_probability, final_odds) = self.last?;
        let players = self.setup.players.clone().map(|p| p.name);

        Some(MatchReport {
            schema_version: crate::SCHEMA_VERSION,
            seed: self.seed,
            winner_name: players[outcome.winner].clone(),
            players,
            format: self.setup.format.clone().into(),
            winner: outcome.winner,
            set_score: outcome.set_score,
            sets: self.scoreboard.history().to_vec(),
            total_points: outcome.points_played,
            total_events: outcome.events,
            statistics: *self.scoreboard.statistics(),
            final_win_probability,
            final_odds,
            events: self.event_log,
        })
    }
}
