pub mod batch; // Parallel Monte-Carlo runs
pub mod config;
pub mod driver; // Simulation Driver
pub mod dynamics; // Fatigue & confidence
pub mod generator; // Stochastic shot/event generator
pub mod scoring; // Scoring State Machine
pub mod sink; // Event observers
pub mod state;

pub use batch::{run_batch, run_seed, BatchSummary, DEFAULT_RUNS};
pub use config::{DynamicsConfig, EngineConfig, GeneratorConfig, OddsConfig, ENGINE_CONFIG_PATH_ENV};
pub use driver::{MatchReport, MatchSetup, MatchSimulation};
pub use dynamics::DynamicsModel;
pub use generator::EventGenerator;
pub use scoring::{PointResult, Scoreboard};
pub use sink::{EventRecord, EventSink, MatchOutcome, SampleSink, TracingSink};
pub use state::{MatchState, ScoreSnapshot, SetRecord};
