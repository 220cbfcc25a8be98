//! Event sinks: pure observers of the simulation loop.
//!
//! The driver calls every sink once per processed event with the post-event
//! record and the feature snapshot the predictor saw. Sinks cannot influence
//! the match.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use tracing::{debug, info, trace};

use super::state::ScoreSnapshot;
use crate::models::TennisEvent;
use crate::odds::MarketOdds;
use crate::predictor::{FeatureSnapshot, TrainingSample};

/// One processed event with the score and odds after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventRecord {
    /// 0-based position in the match.
    pub index: u64,
    pub event: TennisEvent,
    pub score: ScoreSnapshot,
    /// Player 1 win probability fed to the odds engine (after clamping).
    pub win_probability: f64,
    pub odds: MarketOdds,
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchOutcome {
    pub winner: usize,
    pub set_score: [u32; 2],
    pub points_played: u32,
    pub events: u64,
}

pub trait EventSink {
    fn name(&self) -> &str;

    /// Features of the opening state, before any event.
    fn on_match_start(&mut self, _features: &FeatureSnapshot) {}

    fn on_event(&mut self, record: &EventRecord, features: &FeatureSnapshot);

    fn on_match_end(&mut self, _outcome: &MatchOutcome) {}
}

// ============================================
// TracingSink
// ============================================

/// Logs every shot at `trace` and every finished point at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn name(&self) -> &str {
        "TracingSink"
    }

    fn on_event(&mut self, record: &EventRecord, _features: &FeatureSnapshot) {
        let event = &record.event;
        trace!(
            index = record.index,
            player = event.player,
            shot = event.shot.shot_type.name(),
            outcome = event.outcome.name(),
            speed = event.shot.ball_speed,
            spin = event.shot.ball_spin,
            decisive = event.is_decisive_point,
            "shot"
        );
        if event.ends_point() {
            let score = &record.score;
            debug!(
                index = record.index,
                points = %score.point_score,
                games = ?score.game_score,
                sets = ?score.set_score,
                win_probability = record.win_probability,
                odds = %record.odds,
                "point"
            );
        }
    }

    fn on_match_end(&mut self, outcome: &MatchOutcome) {
        info!(
            winner = outcome.winner,
            sets = ?outcome.set_score,
            points = outcome.points_played,
            events = outcome.events,
            "match finished"
        );
    }
}

// ============================================
// SampleSink
// ============================================

/// Ships `(features at point start, point winner)` pairs to an offline
/// trainer over a channel. Stops sending once the receiver hangs up.
pub struct SampleSink {
    tx: Sender<TrainingSample>,
    point_start: Option<FeatureSnapshot>,
    sent: u64,
    disconnected: bool,
}

impl SampleSink {
    pub fn new(tx: Sender<TrainingSample>) -> Self {
        Self { tx, point_start: None, sent: 0, disconnected: false }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl EventSink for SampleSink {
    fn name(&self) -> &str {
        "SampleSink"
    }

    fn on_match_start(&mut self, features: &FeatureSnapshot) {
        self.point_start = Some(features.clone());
    }

    fn on_event(&mut self, record: &EventRecord, features: &FeatureSnapshot) {
        let Some(point_winner) = record.event.point_winner() else {
            return;
        };
        let start = self.point_start.replace(features.clone());
        if self.disconnected {
            return;
        }
        if let Some(features) = start {
            if self.tx.send(TrainingSample { features, point_winner }).is_err() {
                debug!(sent = self.sent, "training sample receiver dropped");
                self.disconnected = true;
            } else {
                self.sent += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::MatchState;
    use crate::models::{MatchFormat, Shot, ShotOutcome, ShotType};
    use std::sync::mpsc;

    fn record(index: u64, player: usize, outcome: ShotOutcome) -> EventRecord {
        let event = TennisEvent {
            player,
            shot: Shot { shot_type: ShotType::Forehand, ball_speed: 100.0, ball_spin: 2000.0, location: None },
            outcome,
            is_decisive_point: false,
        };
        EventRecord {
            index,
            event,
            score: MatchState::new().snapshot(&MatchFormat::grand_slam()),
            win_probability: 0.5,
            odds: MarketOdds { match_winner: [2.0, 2.0], set_winner: [2.0, 2.0], game_winner: [2.0, 2.0] },
        }
    }

    fn features(tag: f64) -> FeatureSnapshot {
        let mut f = FeatureSnapshot::new();
        f.insert("tag", tag);
        f
    }

    #[test]
    fn test_sample_sink_pairs_point_start_with_winner() {
        let (tx, rx) = mpsc::channel();
        let mut sink = SampleSink::new(tx);

        sink.on_match_start(&features(0.0));
        sink.on_event(&record(0, 0, ShotOutcome::InPlay), &features(1.0));
        sink.on_event(&record(1, 1, ShotOutcome::Winner), &features(2.0));
        sink.on_event(&record(2, 0, ShotOutcome::Out), &features(3.0));
        drop(sink);

        let samples: Vec<TrainingSample> = rx.iter().collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].features, features(0.0));
        assert_eq!(samples[0].point_winner, 1);
        assert_eq!(samples[1].features, features(2.0));
        assert_eq!(samples[1].point_winner, 1);
    }

    #[test]
    fn test_sample_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sink = SampleSink::new(tx);
        sink.on_match_start(&features(0.0));
        sink.on_event(&record(0, 0, ShotOutcome::Winner), &features(1.0));
        sink.on_event(&record(1, 0, ShotOutcome::Winner), &features(2.0));
        assert_eq!(sink.sent(), 0);
    }
}
