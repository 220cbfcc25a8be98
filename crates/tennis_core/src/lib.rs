//! # tennis_core - Event-by-Event Tennis Match Simulation with Live Odds
//!
//! Simulates a two-player tennis match shot by shot and prices three live
//! markets (match, set, game winner) after every event.
//!
//! ## Features
//! - Full scoring rules: deuce/advantage, tiebreaks, deciding-set match tiebreak
//! - Seedable shot generator (same seed = same match)
//! - Fatigue/confidence tracking and per-player statistics
//! - Pluggable win-probability model with a fail-fast feature contract
//! - JSON API and parallel Monte-Carlo batches

#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod odds;
pub mod predictor;

pub use api::{simulate_batch_json, simulate_match_json, MatchRequest};
pub use engine::{
    run_batch, BatchSummary, EngineConfig, EventGenerator, EventRecord, EventSink, MatchReport,
    MatchSetup, MatchSimulation, MatchState, Scoreboard, ScoreSnapshot,
};
pub use error::{MatchError, MissingFeatureError, Result, ValidationError};
pub use models::{
    MatchContext, MatchFormat, MatchStatistics, PlayerAttributes, ShotOutcome, ShotType,
    TennisEvent,
};
pub use odds::{Market, MarketOdds, OddsCalculator};
pub use predictor::{FeatureSnapshot, StrengthModel, TrainingSample, WinProbabilityModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
