use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::config_env::resolve_engine_config;
use crate::engine::{
    run_batch, BatchSummary, EngineConfig, MatchReport, MatchSetup, MatchSimulation, TracingSink,
    DEFAULT_RUNS,
};
use crate::models::{MatchContext, MatchFormat, MatchFormatSpec, PlayerAttributes};
use crate::predictor::StrengthModel;
use crate::SCHEMA_VERSION;

/// Preset name or an explicit format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FormatSelector {
    Preset(String),
    Custom(MatchFormatSpec),
}

impl Default for FormatSelector {
    fn default() -> Self {
        FormatSelector::Preset("grand_slam".to_string())
    }
}

impl FormatSelector {
    pub fn resolve(&self) -> Result<MatchFormat, String> {
        let format = match self {
            FormatSelector::Preset(name) => MatchFormat::preset(name),
            FormatSelector::Custom(spec) => MatchFormat::new(*spec),
        };
        format.map_err(|e| format!("Invalid match format: {e}"))
    }
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(default)]
    pub format: FormatSelector,
    pub players: [PlayerAttributes; 2],
    #[serde(default)]
    pub context: MatchContext,
    /// Include every event with its odds snapshot in the response.
    #[serde(default)]
    pub include_events: bool,
    /// Overrides `TENNIS_ENGINE_CONFIG_PATH` and the defaults.
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(default = "default_runs")]
    pub runs: usize,
    #[serde(default)]
    pub format: FormatSelector,
    pub players: [PlayerAttributes; 2],
    #[serde(default)]
    pub context: MatchContext,
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

fn default_runs() -> usize {
    DEFAULT_RUNS
}

fn check_schema_version(version: u8) -> Result<(), String> {
    if version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {version}"));
    }
    Ok(())
}

fn build_setup(
    format: &FormatSelector,
    players: [PlayerAttributes; 2],
    context: MatchContext,
) -> Result<MatchSetup, String> {
    let setup = MatchSetup { format: format.resolve()?, players, context };
    setup.validate().map_err(|e| format!("Invalid players: {e}"))?;
    Ok(setup)
}

/// Simulate one match; returns `MatchReport` JSON.
pub fn simulate_match_json(request_json: &str) -> Result<String, String> {
    let report = simulate_match(request_json)?;
    serde_json::to_string(&report).map_err(|e| format!("Failed to serialize report: {e}"))
}

pub fn simulate_match(request_json: &str) -> Result<MatchReport, String> {
    let request: MatchRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;
    check_schema_version(request.schema_version)?;

    let MatchRequest { seed, format, players, context, include_events, engine, .. } = request;
    let setup = build_setup(&format, players, context)?;
    let config = resolve_engine_config(engine)?;

    let mut sim = MatchSimulation::seeded(setup, &config, seed, Arc::new(StrengthModel::default()))
        .map_err(|e| format!("Failed to create simulation: {e}"))?;
    sim.record_events(include_events);
    sim.add_sink(Box::new(TracingSink));

    sim.run().map_err(|e| format!("Simulation failed: {e}"))
}

/// Monte-Carlo batch; returns `BatchSummary` JSON.
pub fn simulate_batch_json(request_json: &str) -> Result<String, String> {
    let request: BatchRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {e}"))?;
    check_schema_version(request.schema_version)?;

    let BatchRequest { seed, runs, format, players, context, engine, .. } = request;
    let setup = build_setup(&format, players, context)?;
    let config = resolve_engine_config(engine)?;

    let summary: BatchSummary =
        run_batch(&setup, &config, runs, seed, Arc::new(StrengthModel::default()))
            .map_err(|e| format!("Batch failed: {e}"))?;
    serde_json::to_string(&summary).map_err(|e| format!("Failed to serialize summary: {e}"))
}

/// JSON schema of the `simulate_match_json` response.
pub fn report_schema_json() -> Result<String, String> {
    let schema = schemars::schema_for!(MatchReport);
    serde_json::to_string_pretty(&schema).map_err(|e| format!("Failed to serialize schema: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn players() -> serde_json::Value {
        json!([
            {
                "name": "Roger",
                "serve_accuracy": 0.70,
                "groundstroke_accuracy": 0.75,
                "volley_accuracy": 0.70,
                "speed": 85,
                "stamina": 88,
                "mental_strength": 90,
                "wins_vs_opponents": {"Novak": 23}
            },
            {
                "name": "Novak",
                "serve_accuracy": 0.65,
                "groundstroke_accuracy": 0.80,
                "volley_accuracy": 0.70,
                "speed": 90,
                "stamina": 92,
                "mental_strength": 95,
                "wins_vs_opponents": {"Roger": 27}
            }
        ])
    }

    fn request(seed: u64, format: serde_json::Value) -> String {
        json!({
            "schema_version": 1,
            "seed": seed,
            "format": format,
            "players": players(),
            "context": {"surface": "clay", "is_indoor": false, "weather": "windy", "event_country": "France"},
            "engine": {}
        })
        .to_string()
    }

    #[test]
    fn test_simulate_match_json_basic() {
        let out = simulate_match_json(&request(42, json!("grand_slam"))).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        let winner = parsed["winner"].as_u64().unwrap() as usize;
        assert_eq!(parsed["set_score"][winner], 3);
        assert!(parsed["final_odds"]["match_winner"].is_array());
        assert!(parsed.get("events").is_none());
    }

    #[test]
    fn test_same_seed_same_json() {
        let req = request(999, json!("atp_1000"));
        assert_eq!(simulate_match_json(&req).unwrap(), simulate_match_json(&req).unwrap());
    }

    #[test]
    fn test_custom_format_and_events() {
        let mut req: serde_json::Value = serde_json::from_str(&request(
            5,
            json!({
                "sets_to_win": 1,
                "games_to_win_set": 4,
                "tiebreak_points": 7,
                "final_set_tiebreak": false
            }),
        ))
        .unwrap();
        req["include_events"] = json!(true);

        let report = simulate_match(&req.to_string()).unwrap();
        assert_eq!(report.format.games_to_win_set, 4);
        assert_eq!(report.sets.len(), 1);
        let events = report.events.unwrap();
        assert_eq!(events.len() as u64, report.total_events);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let wrong_version = request(1, json!("grand_slam")).replace("\"schema_version\":1", "\"schema_version\":2");
        assert!(simulate_match_json(&wrong_version).unwrap_err().contains("schema version"));

        let unknown = simulate_match_json(&request(1, json!("davis_cup"))).unwrap_err();
        assert!(unknown.contains("davis_cup"));

        let zero_sets = request(
            1,
            json!({"sets_to_win": 0, "games_to_win_set": 6, "tiebreak_points": 7, "final_set_tiebreak": false}),
        );
        assert!(simulate_match_json(&zero_sets).is_err());

        let huge_sets = request(
            1,
            json!({"sets_to_win": 2_147_483_648u64, "games_to_win_set": 6, "tiebreak_points": 7, "final_set_tiebreak": false}),
        );
        assert!(simulate_match_json(&huge_sets).unwrap_err().contains("at most"));

        assert!(simulate_match_json("{not json").unwrap_err().starts_with("Invalid JSON request"));
    }

    #[test]
    fn test_batch_json() {
        let mut req: serde_json::Value = serde_json::from_str(&request(3, json!("atp_1000"))).unwrap();
        req["runs"] = json!(6);
        let out = simulate_batch_json(&req.to_string()).unwrap();
        let summary: BatchSummary = serde_json::from_str(&out).unwrap();
        assert_eq!(summary.runs, 6);
        assert_eq!(summary.players, ["Roger".to_string(), "Novak".to_string()]);
    }

    #[test]
    fn test_report_schema_names_fields() {
        let schema = report_schema_json().unwrap();
        assert!(schema.contains("final_odds"));
        assert!(schema.contains("set_score"));
    }
}
