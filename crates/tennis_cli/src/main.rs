//! Tennis Sim CLI
//!
//! Runs single matches or Monte-Carlo batches from the command line and
//! prints the result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tennis_core::api::report_schema_json;
use tennis_core::engine::{
    run_batch, EngineConfig, MatchSetup, MatchSimulation, TracingSink, DEFAULT_RUNS,
};
use tennis_core::models::{MatchFormat, PlayerAttributes};
use tennis_core::predictor::StrengthModel;

#[derive(Parser)]
#[command(name = "tennis_sim")]
#[command(about = "Simulate tennis matches with live odds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match
    Simulate {
        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Format preset (see `formats`)
        #[arg(long, default_value = "grand_slam")]
        format: String,

        /// JSON file with an array of two players (defaults to a demo pairing)
        #[arg(long)]
        players: Option<PathBuf>,

        /// Engine config file (.json/.yaml); falls back to TENNIS_ENGINE_CONFIG_PATH
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include every event with its odds in the report
        #[arg(long, default_value = "false")]
        events: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Simulate many matches in parallel and summarize them
    Batch {
        #[arg(long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "grand_slam")]
        format: String,

        #[arg(long)]
        players: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the JSON schema of the match report
    Schema,

    /// List format presets
    Formats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { seed, format, players, config, events, out } => {
            let setup = build_setup(&format, players.as_deref())?;
            let config = load_config(config.as_deref())?;
            info!(
                seed,
                format = %format,
                player1 = %setup.players[0].name,
                player2 = %setup.players[1].name,
                "simulating match"
            );

            let mut sim =
                MatchSimulation::seeded(setup, &config, seed, Arc::new(StrengthModel::default()))
                    .context("Failed to create simulation")?;
            sim.record_events(events);
            sim.add_sink(Box::new(TracingSink));
            let report = sim.run().context("Simulation failed")?;

            let json = serde_json::to_string_pretty(&report)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(
                        path = %path.display(),
                        generated_at = %chrono::Utc::now().to_rfc3339(),
                        "report saved"
                    );
                }
                None => println!("{json}"),
            }
        }

        Commands::Batch { runs, seed, format, players, config } => {
            let setup = build_setup(&format, players.as_deref())?;
            let config = load_config(config.as_deref())?;
            let started = chrono::Utc::now();

            let summary =
                run_batch(&setup, &config, runs, seed, Arc::new(StrengthModel::default()))
                    .context("Batch failed")?;

            let elapsed = chrono::Utc::now() - started;
            info!(runs, elapsed_ms = elapsed.num_milliseconds(), "batch finished");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Schema => {
            let schema = report_schema_json().map_err(anyhow::Error::msg)?;
            println!("{schema}");
        }

        Commands::Formats => {
            for name in MatchFormat::preset_names() {
                let format = MatchFormat::preset(name)?;
                println!(
                    "{name}: best of {} sets, {} games per set, final-set tiebreak: {}",
                    format.max_sets(),
                    format.games_to_win_set(),
                    format.final_set_tiebreak()
                );
            }
        }
    }

    Ok(())
}

fn build_setup(format: &str, players: Option<&Path>) -> Result<MatchSetup> {
    let mut setup = MatchSetup::demo();
    setup.format = MatchFormat::preset(format)
        .with_context(|| format!("Unknown format preset: {format}"))?;
    if let Some(path) = players {
        setup.players = load_players(path)?;
    }
    setup.validate().context("Invalid players")?;
    Ok(setup)
}

fn load_players(path: &Path) -> Result<[PlayerAttributes; 2]> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Expected an array of two players in {}", path.display()))
}

/// `--config` beats `TENNIS_ENGINE_CONFIG_PATH`, which beats the defaults.
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = path {
        return EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config {}", path.display()));
    }
    Ok(EngineConfig::from_env()?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["tennis_sim", "simulate", "--seed", "7", "--events"]).unwrap();
        match cli.command {
            Commands::Simulate { seed, events, format, .. } => {
                assert_eq!(seed, 7);
                assert!(events);
                assert_eq!(format, "grand_slam");
            }
            _ => panic!("expected simulate"),
        }

        let cli = Cli::try_parse_from(["tennis_sim", "batch", "--runs", "10"]).unwrap();
        assert!(matches!(cli.command, Commands::Batch { runs: 10, seed: 42, .. }));
    }

    #[test]
    fn test_build_setup_rejects_unknown_format() {
        let err = build_setup("exhibition", None).unwrap_err();
        assert!(err.to_string().contains("exhibition"));
    }

    #[test]
    fn test_players_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "Iga", "serve_accuracy": 0.7, "groundstroke_accuracy": 0.8,
                  "volley_accuracy": 0.6, "speed": 90, "stamina": 90, "mental_strength": 92}},
                {{"name": "Aryna", "serve_accuracy": 0.75, "groundstroke_accuracy": 0.74,
                  "volley_accuracy": 0.6, "speed": 84, "stamina": 88, "mental_strength": 85}}
            ]"#
        )
        .unwrap();

        let setup = build_setup("atp_1000", Some(file.path())).unwrap();
        assert_eq!(setup.players[1].name, "Aryna");
        assert_eq!(setup.format, MatchFormat::atp_1000());
    }

    #[test]
    fn test_explicit_config_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"max_events": 1234}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_events, 1234);
    }
}
