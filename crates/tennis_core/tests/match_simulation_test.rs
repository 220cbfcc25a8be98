use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{mpsc, Arc};

use tennis_core::engine::{EngineConfig, MatchSetup, MatchSimulation, SampleSink, Scoreboard};
use tennis_core::models::{
    MatchContext, MatchFormat, MatchFormatSpec, MatchStatistics, PlayerAttributes, ShotOutcome,
    ShotPreferences, Surface, Weather,
};
use tennis_core::predictor::{FixedProbability, StrengthModel, TrainingSample, WinProbabilityModel};
use tennis_core::MatchError;

fn player(name: &str, serve: f64, ground: f64) -> PlayerAttributes {
    PlayerAttributes {
        name: name.to_string(),
        serve_accuracy: serve,
        groundstroke_accuracy: ground,
        volley_accuracy: 0.7,
        speed: 85.0,
        stamina: 85.0,
        mental_strength: 85.0,
        shot_preferences: ShotPreferences::default(),
        wins_vs_opponents: BTreeMap::new(),
    }
}

fn setup(format: MatchFormat) -> MatchSetup {
    MatchSetup {
        format,
        players: [player("Alcaraz", 0.72, 0.78), player("Sinner", 0.70, 0.80)],
        context: MatchContext::new(Surface::Grass, false, Weather::Cloudy, "UK"),
    }
}

fn strength() -> Arc<dyn WinProbabilityModel> {
    Arc::new(StrengthModel::default())
}

#[test]
fn test_grand_slam_always_terminates_with_three_sets() {
    for seed in 0..20 {
        let sim =
            MatchSimulation::seeded(setup(MatchFormat::grand_slam()), &EngineConfig::test(), seed, strength())
                .unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.set_score[report.winner], 3, "seed {seed}");
        assert!(report.set_score[0] + report.set_score[1] <= 5);
        if let Some(last) = report.sets.last() {
            assert_eq!(last.winner, report.winner);
        }
    }
}

#[test]
fn test_match_tiebreak_decides_fifth_set() {
    // Find a seed that reaches the fifth set and check it was a single game.
    let fifth = (0..200u64).find_map(|seed| {
        let report =
            MatchSimulation::seeded(setup(MatchFormat::grand_slam()), &EngineConfig::test(), seed, strength())
                .unwrap()
                .run()
                .unwrap();
        report.sets.iter().find(|s| s.set_number == 5).copied()
    });
    let fifth = fifth.expect("some seed should go to five sets");
    assert!(fifth.match_tiebreak);
    assert_eq!(fifth.games[fifth.winner], 1);
    assert_eq!(fifth.games[1 - fifth.winner], 0);
}

#[test]
fn test_regular_sets_end_by_two_or_tiebreak() {
    let report =
        MatchSimulation::seeded(setup(MatchFormat::atp_1000()), &EngineConfig::test(), 77, strength())
            .unwrap()
            .run()
            .unwrap();
    for set in report.sets.iter().filter(|s| !s.match_tiebreak) {
        let (w, l) = (set.games[set.winner], set.games[1 - set.winner]);
        assert!((w == 6 && l <= 4) || (w == 7 && (l == 5 || l == 6)), "set {:?}", set);
    }
}

#[test]
fn test_statistics_derive_from_events() {
    let mut sim =
        MatchSimulation::seeded(setup(MatchFormat::atp_1000()), &EngineConfig::test(), 2024, strength())
            .unwrap();
    sim.record_events(true);
    let report = sim.run().unwrap();
    let events = report.events.as_ref().unwrap();

    let rebuilt = MatchStatistics::from_events(events.iter().map(|r| &r.event));
    assert_eq!(rebuilt, report.statistics);

    let aces = events.iter().filter(|r| r.event.outcome == ShotOutcome::Ace).count() as u32;
    assert_eq!(aces, report.statistics.players[0].aces + report.statistics.players[1].aces);
    assert_eq!(report.statistics.total_points(), report.total_points);
}

#[test]
fn test_odds_stay_positive_and_bounded() {
    let mut sim =
        MatchSimulation::seeded(setup(MatchFormat::atp_1000()), &EngineConfig::test(), 8, strength()).unwrap();
    sim.record_events(true);
    let report = sim.run().unwrap();
    for record in report.events.unwrap() {
        for (_, [p1, p2]) in record.odds.iter() {
            assert!(p1.is_finite() && p1 > 0.0);
            assert!(p2.is_finite() && p2 > 0.0);
        }
        assert!((0.0..=1.0).contains(&record.score.fatigue[0]));
        assert!((0.0..=1.0).contains(&record.score.confidence[1]));
    }
}

#[test]
fn test_extreme_predictions_hit_ceiling() {
    let mut sim = MatchSimulation::seeded(
        setup(MatchFormat::atp_1000()),
        &EngineConfig::test(),
        1,
        Arc::new(FixedProbability(0.0)),
    )
    .unwrap();
    let record = sim.step().unwrap();
    // Momentum can only scale the ceiling by a bounded factor.
    assert!(record.odds.match_winner[0] >= 80.0);
    assert!(record.odds.match_winner[1] <= 1.25);
}

#[test]
fn test_training_samples_flow_through_channel() {
    let (tx, rx) = mpsc::channel::<TrainingSample>();
    let mut sim =
        MatchSimulation::seeded(setup(MatchFormat::atp_1000()), &EngineConfig::test(), 31, strength()).unwrap();
    sim.add_sink(Box::new(SampleSink::new(tx)));
    let report = sim.run().unwrap();

    let samples: Vec<TrainingSample> = rx.iter().collect();
    assert_eq!(samples.len() as u32, report.total_points);
    assert!(samples.iter().all(|s| s.point_winner < 2));
    assert!(samples[0].features.contains("recent_event_4"));
    assert_eq!(samples[0].features.number("set_score_1").unwrap(), 0.0);
}

#[test]
fn test_scoreboard_rejects_points_after_match() {
    let format = MatchFormat::new(MatchFormatSpec {
        sets_to_win: 1,
        games_to_win_set: 1,
        tiebreak_points: 3,
        final_set_tiebreak: false,
        final_set_tiebreak_points: 0,
    })
    .unwrap();
    let mut board = Scoreboard::new(format);
    // 1-0 is not enough (needs a two-game lead): 2-0 ends it.
    for _ in 0..8 {
        board.apply_point_outcome(0).unwrap();
    }
    assert!(board.is_match_over());
    assert_eq!(board.history()[0].games, [2, 0]);
    assert!(matches!(board.apply_point_outcome(1), Err(MatchError::MatchAlreadyOver)));
}

#[test]
fn test_engine_config_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(
        file,
        "generator:\n  ace_probability: 0.3\nodds:\n  ceiling_odds: 40.0\nmax_events: 500000"
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.generator.ace_probability, 0.3);

    let mut sim = MatchSimulation::seeded(setup(MatchFormat::atp_1000()), &config, 4, strength()).unwrap();
    sim.record_events(true);
    let report = sim.run().unwrap();
    let aces = report.statistics.players[0].aces + report.statistics.players[1].aces;
    assert!(aces > 0);
}
