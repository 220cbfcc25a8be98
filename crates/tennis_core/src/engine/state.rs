//! Match state owned by the scoreboard, plus the read-only snapshot handed
//! to the generator, the odds engine and observers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{MatchFormat, PlayerDynamics, PointScore, ScoringMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchState {
    pub server: usize,
    pub receiver: usize,
    pub points: PointScore,
    pub games: [u32; 2],
    pub sets: [u32; 2],
    /// 1-based
    pub current_set: u32,
    pub mode: ScoringMode,
    pub dynamics: [PlayerDynamics; 2],
    pub points_played: u32,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            server: 0,
            receiver: 1,
            points: PointScore::default(),
            games: [0, 0],
            sets: [0, 0],
            current_set: 1,
            mode: ScoringMode::Regular,
            dynamics: [PlayerDynamics::default(); 2],
            points_played: 0,
        }
    }

    pub fn is_tiebreak(&self) -> bool {
        self.mode == ScoringMode::Tiebreak
    }

    pub fn is_match_tiebreak(&self) -> bool {
        self.mode == ScoringMode::MatchTiebreak
    }

    /// Switch scoring mode; the point score restarts in the matching representation.
    pub(crate) fn enter_mode(&mut self, mode: ScoringMode) {
        self.mode = mode;
        self.points = PointScore::love_all(mode);
    }

    pub(crate) fn swap_service(&mut self) {
        std::mem::swap(&mut self.server, &mut self.receiver);
    }

    pub fn snapshot(&self, format: &MatchFormat) -> ScoreSnapshot {
        ScoreSnapshot {
            server: self.server,
            receiver: self.receiver,
            point_score: self.points,
            game_score: self.games,
            set_score: self.sets,
            current_set: self.current_set,
            is_tiebreak: self.is_tiebreak(),
            is_match_tiebreak: self.is_match_tiebreak(),
            fatigue: [self.dynamics[0].fatigue, self.dynamics[1].fatigue],
            confidence: [self.dynamics[0].confidence, self.dynamics[1].confidence],
            sets_to_win: format.sets_to_win(),
            games_to_win_set: format.games_to_win_set(),
            points_played: self.points_played,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned copy of the score at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreSnapshot {
    pub server: usize,
    pub receiver: usize,
    pub point_score: PointScore,
    pub game_score: [u32; 2],
    pub set_score: [u32; 2],
    pub current_set: u32,
    pub is_tiebreak: bool,
    pub is_match_tiebreak: bool,
    pub fatigue: [f64; 2],
    pub confidence: [f64; 2],
    pub sets_to_win: u32,
    pub games_to_win_set: u32,
    pub points_played: u32,
}

impl ScoreSnapshot {
    /// Point differential from the server's side (labels as 0..=4, counts raw).
    pub fn server_point_lead(&self) -> i64 {
        self.point_score.value(self.server) as i64 - self.point_score.value(self.receiver) as i64
    }

    pub fn set_lead(&self) -> i64 {
        self.set_score[0] as i64 - self.set_score[1] as i64
    }

    pub fn game_lead(&self) -> i64 {
        self.game_score[0] as i64 - self.game_score[1] as i64
    }
}

/// Games won by each player in one completed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SetRecord {
    pub set_number: u32,
    pub games: [u32; 2],
    pub winner: usize,
    /// Decided by a match tiebreak instead of games.
    #[serde(default)]
    pub match_tiebreak: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PointLabel;

    #[test]
    fn test_new_state_defaults() {
        let state = MatchState::new();
        assert_eq!((state.server, state.receiver), (0, 1));
        assert_eq!(state.current_set, 1);
        assert!(state.points.is_love_all());
        assert!(!state.is_tiebreak() && !state.is_match_tiebreak());
        assert_eq!(state.dynamics[1].confidence, 0.5);
    }

    #[test]
    fn test_enter_mode_resets_representation() {
        let mut state = MatchState::new();
        state.points = PointScore::Regular([PointLabel::Thirty, PointLabel::Forty]);
        state.enter_mode(ScoringMode::Tiebreak);
        assert_eq!(state.points, PointScore::Count([0, 0]));
        assert!(state.is_tiebreak());
    }

    #[test]
    fn test_server_point_lead_uses_server_perspective() {
        let mut state = MatchState::new();
        state.points = PointScore::Regular([PointLabel::Fifteen, PointLabel::Forty]);
        let snap = state.snapshot(&MatchFormat::grand_slam());
        assert_eq!(snap.server_point_lead(), -2);

        state.swap_service();
        let snap = state.snapshot(&MatchFormat::grand_slam());
        assert_eq!(snap.server_point_lead(), 2);
    }
}
