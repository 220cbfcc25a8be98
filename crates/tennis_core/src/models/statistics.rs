use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::events::{ShotOutcome, ShotType, TennisEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlayerStatistics {
    pub aces: u32,
    pub double_faults: u32,
    pub winners: u32,
    /// Unforced errors, nets and outs committed by this player.
    pub unforced_errors: u32,
    /// Errors this player was forced into by the opponent.
    pub forced_errors: u32,
    pub points_won: u32,
    pub first_serves_in: u32,
    pub service_points: u32,
}

impl PlayerStatistics {
    /// Share of service points where the first serve landed.
    pub fn first_serve_percentage(&self) -> f64 {
        if self.service_points == 0 {
            0.0
        } else {
            self.first_serves_in as f64 / self.service_points as f64
        }
    }
}

/// Aggregated per-player counters, derived only from the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MatchStatistics {
    pub players: [PlayerStatistics; 2],
}

impl MatchStatistics {
    pub fn player(&self, index: usize) -> &PlayerStatistics {
        &self.players[index]
    }

    pub fn total_points(&self) -> u32 {
        self.players[0].points_won + self.players[1].points_won
    }

    /// Fold a complete event stream into statistics.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a TennisEvent>) -> Self {
        let mut tracker = StatisticsTracker::default();
        for event in events {
            tracker.record(event);
        }
        tracker.into_statistics()
    }
}

/// Incremental fold over events; tracks shots within the current point.
#[derive(Debug, Clone, Default)]
pub struct StatisticsTracker {
    stats: MatchStatistics,
    shots_in_point: u32,
}

impl StatisticsTracker {
    pub fn record(&mut self, event: &TennisEvent) {
        self.shots_in_point += 1;
        let striker = event.player;
        let opponent = 1 - striker;

        if event.shot.shot_type.is_serve() {
            let server = &mut self.stats.players[striker];
            server.service_points += 1;
            if event.shot.shot_type == ShotType::ServeFirst {
                server.first_serves_in += 1;
            }
        }

        let only_shot = self.shots_in_point == 1;
        match event.outcome {
            ShotOutcome::Ace if only_shot && event.shot.shot_type == ShotType::ServeFirst => {
                self.stats.players[striker].aces += 1;
            }
            ShotOutcome::DoubleFault if only_shot => {
                self.stats.players[striker].double_faults += 1;
            }
            ShotOutcome::Winner => self.stats.players[striker].winners += 1,
            ShotOutcome::ForcedError => self.stats.players[opponent].forced_errors += 1,
            outcome if outcome.is_unforced_miss() => {
                self.stats.players[striker].unforced_errors += 1;
            }
            _ => {}
        }

        if let Some(winner) = event.point_winner() {
            self.stats.players[winner].points_won += 1;
            self.shots_in_point = 0;
        }
    }

    pub fn statistics(&self) -> &MatchStatistics {
        &self.stats
    }

    pub fn into_statistics(self) -> MatchStatistics {
        self.stats
    }
}
