//! Odds Engine
//!
//! Turns a win probability for player 1 into decimal odds for three markets:
//!
//! - `match_winner`: base odds from the probability, then a momentum factor
//!   from recent events (player 1 odds multiplied, player 2 odds divided).
//! - `set_winner`: match probability shifted by the current set and game leads.
//! - `game_winner`: logistic in the point differential seen from the server.
//!
//! Probabilities outside [0, 1] are clamped before use. Probabilities of
//! exactly 0 or 1 map to the ceiling odds instead of infinity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::config::OddsConfig;
use crate::engine::state::ScoreSnapshot;
use crate::models::{ShotOutcome, TennisEvent};

/// Decimal odds for player 1 and player 2.
pub type OddsPair = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum Market {
    MatchWinner,
    SetWinner,
    GameWinner,
}

impl Market {
    pub const ALL: [Market; 3] = [Market::MatchWinner, Market::SetWinner, Market::GameWinner];

    pub fn name(self) -> &'static str {
        match self {
            Market::MatchWinner => "match_winner",
            Market::SetWinner => "set_winner",
            Market::GameWinner => "game_winner",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketOdds {
    pub match_winner: OddsPair,
    pub set_winner: OddsPair,
    pub game_winner: OddsPair,
}

impl MarketOdds {
    pub fn get(&self, market: Market) -> OddsPair {
        match market {
            Market::MatchWinner => self.match_winner,
            Market::SetWinner => self.set_winner,
            Market::GameWinner => self.game_winner,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Market, OddsPair)> + '_ {
        Market::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

impl fmt::Display for MarketOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (market, [p1, p2]) in self.iter() {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            write!(f, "{market}: {p1:.2}/{p2:.2}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct OddsCalculator {
    config: OddsConfig,
}

impl OddsCalculator {
    pub fn new(config: OddsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OddsConfig {
        &self.config
    }

    /// All three markets for the current step.
    ///
    /// `recent_events` is oldest-first; only the last `momentum_window` are used.
    pub fn compute_odds(
        &self,
        win_probability: f64,
        snapshot: &ScoreSnapshot,
        recent_events: &[TennisEvent],
    ) -> MarketOdds {
        let base = self.convert_probability_to_odds(win_probability);
        let momentum = self.calculate_momentum_factor(recent_events);
        let match_winner = self.adjust_odds(base, momentum);

        MarketOdds {
            match_winner,
            set_winner: self.calculate_set_odds(match_winner, snapshot),
            game_winner: self.calculate_game_odds(match_winner, snapshot),
        }
    }

    pub fn convert_probability_to_odds(&self, probability: f64) -> OddsPair {
        let p = clamp_probability(probability);
        [self.invert(p), self.invert(1.0 - p)]
    }

    fn invert(&self, p: f64) -> f64 {
        if p <= 0.0 {
            self.config.ceiling_odds
        } else {
            1.0 / p
        }
    }

    pub fn odds_to_probability(&self, odds: f64) -> f64 {
        if odds > 0.0 {
            1.0 / odds
        } else {
            0.0
        }
    }

    /// `1 + momentum` over the most recent window; winners add, unforced
    /// misses subtract, with decisive points weighted higher.
    pub fn calculate_momentum_factor(&self, recent_events: &[TennisEvent]) -> f64 {
        let skip = recent_events.len().saturating_sub(self.config.momentum_window);
        let momentum: f64 = recent_events[skip..]
            .iter()
            .map(|event| {
                let weight = if event.is_decisive_point {
                    self.config.decisive_momentum
                } else {
                    self.config.regular_momentum
                };
                match event.outcome {
                    ShotOutcome::Winner => weight,
                    outcome if outcome.is_unforced_miss() => -weight,
                    _ => 0.0,
                }
            })
            .sum();
        1.0 + momentum
    }

    pub fn adjust_odds(&self, odds: OddsPair, factor: f64) -> OddsPair {
        if factor <= 0.0 {
            return odds;
        }
        [odds[0] * factor, odds[1] / factor]
    }

    pub fn calculate_set_odds(&self, match_odds: OddsPair, snapshot: &ScoreSnapshot) -> OddsPair {
        let mut p = clamp_probability(self.odds_to_probability(match_odds[0]));
        let sets_to_win = snapshot.sets_to_win.max(1) as f64;

        let set_diff = snapshot.set_lead() as f64;
        if set_diff > 0.0 {
            p += (1.0 - p) * (set_diff / sets_to_win);
        } else if set_diff < 0.0 {
            p *= 1.0 + set_diff / sets_to_win;
        }

        let game_diff = snapshot.game_lead() as f64;
        p += (1.0 - p) * (game_diff / self.config.set_game_scale);

        self.convert_probability_to_odds(p)
    }

    /// Server's game probability is `1 / (1 + e^-d)` for the server's point
    /// lead `d`; the pair is reordered to player 1, player 2.
    pub fn calculate_game_odds(&self, _match_odds: OddsPair, snapshot: &ScoreSnapshot) -> OddsPair {
        let lead = snapshot.server_point_lead() as f64;
        let server_p = 1.0 / (1.0 + (-lead).exp());
        let [server_odds, receiver_odds] = self.convert_probability_to_odds(server_p);
        if snapshot.server == 0 {
            [server_odds, receiver_odds]
        } else {
            [receiver_odds, server_odds]
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.5
    } else {
        p.clamp(0.0, 1.0)
    }
}
