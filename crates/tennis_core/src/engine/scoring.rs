//! Scoring State Machine
//!
//! Point -> game -> set -> match transitions, including regular tiebreaks
//! at `games_to_win_set` all and the deciding-set match tiebreak.
//!
//! `Scoreboard` is the only writer of [`MatchState`]. Everything else reads
//! a [`ScoreSnapshot`].

use tracing::{debug, info};

use super::dynamics::DynamicsModel;
use super::state::{MatchState, ScoreSnapshot, SetRecord};
use crate::error::{MatchError, Result};
use crate::models::{
    MatchFormat, MatchStatistics, PointLabel, PointScore, ScoringMode, StatisticsTracker,
    TennisEvent,
};

// ============================================
// PointResult
// ============================================

/// What a single point completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointResult {
    pub point_winner: usize,
    pub game_won: bool,
    pub set_won: bool,
    pub match_won: bool,
    /// Populated when `set_won` is true.
    pub completed_set: Option<SetRecord>,
}

impl PointResult {
    fn point_only(point_winner: usize) -> Self {
        Self { point_winner, game_won: false, set_won: false, match_won: false, completed_set: None }
    }
}

// ============================================
// Transitions (pure, operate on a state copy)
// ============================================

/// Regular-mode label update. Returns true when the winner took the game.
fn advance_labels(labels: &mut [PointLabel; 2], winner: usize) -> bool {
    let loser = 1 - winner;
    match (labels[winner], labels[loser]) {
        (PointLabel::Advantage, _) => true,
        (PointLabel::Forty, PointLabel::Advantage) => {
            labels[loser] = PointLabel::Forty;
            false
        }
        (PointLabel::Forty, PointLabel::Forty) => {
            labels[winner] = PointLabel::Advantage;
            false
        }
        (PointLabel::Forty, _) => true,
        (current, _) => {
            labels[winner] = current.next();
            false
        }
    }
}

/// Tiebreak count update: threshold reached with a two-point lead.
fn advance_count(counts: &mut [u32; 2], winner: usize, target: u32) -> bool {
    counts[winner] += 1;
    let lead = counts[winner].saturating_sub(counts[1 - winner]);
    counts[winner] >= target && lead >= 2
}

/// A set ends on a two-game lead at `games_to_win_set` or more, or as soon
/// as any tiebreak game is decided.
fn set_complete(games: [u32; 2], format: &MatchFormat, finished_mode: ScoringMode) -> bool {
    if finished_mode.counts_points() {
        return true;
    }
    let high = games[0].max(games[1]);
    let low = games[0].min(games[1]);
    high >= format.games_to_win_set() && high - low >= 2
}

/// Award the current point to `winner` and cascade through game, set and match.
///
/// Callers guarantee `winner` is 0 or 1 and the match is still live.
pub(crate) fn award_point(state: &mut MatchState, format: &MatchFormat, winner: usize) -> PointResult {
    state.points_played += 1;
    let finished_mode = state.mode;

    let game_won = match &mut state.points {
        PointScore::Regular(labels) => advance_labels(labels, winner),
        PointScore::Count(counts) => {
            let target = if finished_mode == ScoringMode::MatchTiebreak {
                format.final_set_tiebreak_points()
            } else {
                format.tiebreak_points()
            };
            advance_count(counts, winner, target)
        }
    };
    if !game_won {
        return PointResult::point_only(winner);
    }

    state.games[winner] += 1;
    state.swap_service();
    if finished_mode.counts_points() {
        // Second swap after a tiebreak game; the tiebreak server opens the next game.
        state.swap_service();
    }

    if !set_complete(state.games, format, finished_mode) {
        let g = format.games_to_win_set();
        let next_mode = if state.games == [g, g] { ScoringMode::Tiebreak } else { ScoringMode::Regular };
        state.enter_mode(next_mode);
        return PointResult { game_won: true, ..PointResult::point_only(winner) };
    }

    let record = SetRecord {
        set_number: state.current_set,
        games: state.games,
        winner,
        match_tiebreak: finished_mode == ScoringMode::MatchTiebreak,
    };
    state.sets[winner] += 1;
    state.games = [0, 0];

    let match_won = state.sets[winner] >= format.sets_to_win();
    let next_mode = if match_won {
        ScoringMode::Regular
    } else {
        state.current_set += 1;
        if state.current_set == format.deciding_set() && format.final_set_tiebreak() {
            ScoringMode::MatchTiebreak
        } else {
            ScoringMode::Regular
        }
    };
    state.enter_mode(next_mode);

    PointResult {
        point_winner: winner,
        game_won: true,
        set_won: true,
        match_won,
        completed_set: Some(record),
    }
}

fn match_over(state: &MatchState, format: &MatchFormat) -> bool {
    state.sets.iter().any(|&s| s >= format.sets_to_win())
}

// ============================================
// Scoreboard
// ============================================

/// Owns the match state, set history, running statistics and the
/// fatigue/confidence model.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    format: MatchFormat,
    state: MatchState,
    history: Vec<SetRecord>,
    tracker: StatisticsTracker,
    dynamics: DynamicsModel,
    last_point: Option<PointResult>,
}

impl Scoreboard {
    pub fn new(format: MatchFormat) -> Self {
        Self::with_dynamics(format, DynamicsModel::default())
    }

    pub fn with_dynamics(format: MatchFormat, dynamics: DynamicsModel) -> Self {
        let mut state = MatchState::new();
        // A one-set match with a final-set tiebreak is a single match tiebreak.
        if format.deciding_set() == 1 && format.final_set_tiebreak() {
            state.enter_mode(ScoringMode::MatchTiebreak);
        }
        Self {
            format,
            state,
            history: Vec::new(),
            tracker: StatisticsTracker::default(),
            dynamics,
            last_point: None,
        }
    }

    pub fn format(&self) -> &MatchFormat {
        &self.format
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn history(&self) -> &[SetRecord] {
        &self.history
    }

    pub fn statistics(&self) -> &MatchStatistics {
        self.tracker.statistics()
    }

    pub fn last_point(&self) -> Option<&PointResult> {
        self.last_point.as_ref()
    }

    /// Record that `winner` won the current point.
    pub fn apply_point_outcome(&mut self, winner: usize) -> Result<PointResult> {
        if winner > 1 {
            return Err(MatchError::InvalidPlayerIndex { index: winner });
        }
        if self.is_match_over() {
            return Err(MatchError::MatchAlreadyOver);
        }

        let set_number = self.state.current_set;
        let result = award_point(&mut self.state, &self.format, winner);
        self.last_point = Some(result);

        if result.game_won {
            debug!(
                set = set_number,
                games = ?self.state.games,
                winner,
                mode = ?self.state.mode,
                "game complete"
            );
        }
        if let Some(record) = result.completed_set {
            info!(
                set = record.set_number,
                games = ?record.games,
                winner = record.winner,
                match_tiebreak = record.match_tiebreak,
                "set complete"
            );
            self.history.push(record);
        }
        if result.match_won {
            info!(winner, sets = ?self.state.sets, points = self.state.points_played, "match complete");
        }
        Ok(result)
    }

    /// Feed one generated event: fatigue/confidence, statistics, then score.
    ///
    /// Returns the point result when the event ended a point.
    pub fn record_event(&mut self, event: &TennisEvent) -> Result<Option<PointResult>> {
        if event.player > 1 {
            return Err(MatchError::InvalidPlayerIndex { index: event.player });
        }
        if self.is_match_over() {
            return Err(MatchError::MatchAlreadyOver);
        }

        self.dynamics.apply(&mut self.state.dynamics, event);
        self.tracker.record(event);

        match event.point_winner() {
            Some(winner) => self.apply_point_outcome(winner).map(Some),
            None => Ok(None),
        }
    }

    /// True when the last recorded point completed a game.
    pub fn is_game_over(&self) -> bool {
        self.last_point.is_some_and(|p| p.game_won)
    }

    /// True when the last recorded point completed a set.
    pub fn is_set_over(&self) -> bool {
        self.last_point.is_some_and(|p| p.set_won)
    }

    pub fn is_match_over(&self) -> bool {
        match_over(&self.state, &self.format)
    }

    pub fn winner(&self) -> Option<usize> {
        (0..2).find(|&p| self.state.sets[p] >= self.format.sets_to_win())
    }

    /// Would `winner` taking the current point be a break, set or match point?
    pub fn is_point_decisive(&self, winner: usize) -> bool {
        if winner > 1 || self.is_match_over() {
            return false;
        }
        let receiver = self.state.receiver;
        let mut probe = self.state;
        let result = award_point(&mut probe, &self.format, winner);
        result.set_won || (result.game_won && winner == receiver)
    }

    /// Break, set or match point for either player.
    pub fn is_decisive_point(&self) -> bool {
        self.is_point_decisive(0) || self.is_point_decisive(1)
    }

    pub fn get_score_snapshot(&self) -> ScoreSnapshot {
        self.state.snapshot(&self.format)
    }
}
