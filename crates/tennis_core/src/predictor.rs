//! Win-probability boundary.
//!
//! The odds engine treats the predictor as a pure query: a
//! [`FeatureSnapshot`] goes in, player 1's win probability comes out. Models
//! never update themselves during a match step. Learning happens offline from
//! [`TrainingSample`] records shipped out of the driver through a channel
//! (see `engine::sink::SampleSink`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::state::ScoreSnapshot;
use crate::error::MissingFeatureError;
use crate::models::{MatchContext, PlayerAttributes, TennisEvent};

// ============================================
// Feature snapshot
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view; flags read as 0/1, text has none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Text(_) => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<usize> for FeatureValue {
    fn from(value: usize) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Flag(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

/// Named features describing the match at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FeatureSnapshot {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full feature set from score, players, venue and recent events.
    ///
    /// `recent_events` is oldest-first; the last `window` become
    /// `recent_event_0..` as shot-type codes, zero-padded.
    pub fn capture(
        score: &ScoreSnapshot,
        players: &[PlayerAttributes; 2],
        context: &MatchContext,
        recent_events: &[TennisEvent],
        window: usize,
    ) -> Self {
        let mut f = Self::new();

        f.insert("surface", context.surface.as_str());
        f.insert("is_indoor", context.is_indoor);
        f.insert("weather", context.weather().as_str());
        f.insert("event_country", context.event_country.as_str());

        f.insert("server", score.server);
        f.insert("receiver", score.receiver);
        f.insert("set_score_1", score.set_score[0]);
        f.insert("set_score_2", score.set_score[1]);
        f.insert("game_score_1", score.game_score[0]);
        f.insert("game_score_2", score.game_score[1]);
        f.insert("point_value_1", score.point_score.value(0));
        f.insert("point_value_2", score.point_score.value(1));
        f.insert("current_set", score.current_set);
        f.insert("is_tiebreak", score.is_tiebreak);
        f.insert("is_match_tiebreak", score.is_match_tiebreak);
        f.insert("fatigue_1", score.fatigue[0]);
        f.insert("fatigue_2", score.fatigue[1]);
        f.insert("confidence_1", score.confidence[0]);
        f.insert("confidence_2", score.confidence[1]);

        for (i, player) in players.iter().enumerate() {
            let prefix = format!("player{}", i + 1);
            f.insert(format!("{prefix}_serve"), player.serve_accuracy);
            f.insert(format!("{prefix}_ground"), player.groundstroke_accuracy);
            f.insert(format!("{prefix}_volley"), player.volley_accuracy);
            f.insert(format!("{prefix}_speed"), player.speed);
            f.insert(format!("{prefix}_stamina"), player.stamina);
            f.insert(format!("{prefix}_mental_strength"), player.mental_strength);
            f.insert(
                format!("{prefix}_wins_vs_opponent"),
                player.wins_vs(&players[1 - i].name),
            );
        }

        let [winning_odd, losing_odd] = strength_odds(players);
        f.insert("average_winning_odd", winning_odd);
        f.insert("average_losing_odd", losing_odd);

        let skip = recent_events.len().saturating_sub(window);
        let recent = &recent_events[skip..];
        for i in 0..window {
            let code = recent.get(i).map(|e| e.shot.shot_type.code()).unwrap_or(0);
            f.insert(format!("recent_event_{i}"), code);
        }

        f
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FeatureValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Result<&FeatureValue, MissingFeatureError> {
        self.values.get(key).ok_or_else(|| MissingFeatureError::new(key))
    }

    /// Numeric feature; absent or non-numeric values are reported as missing.
    pub fn number(&self, key: &str) -> Result<f64, MissingFeatureError> {
        self.get(key)?.as_number().ok_or_else(|| MissingFeatureError::new(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Pre-match odds from relative base strength.
fn strength_odds(players: &[PlayerAttributes; 2]) -> [f64; 2] {
    let s1 = players[0].base_strength();
    let s2 = players[1].base_strength();
    let total = s1 + s2;
    if total <= 0.0 {
        return [2.0, 2.0];
    }
    let p1 = s1 / total;
    let invert = |p: f64| if p > 0.0 { 1.0 / p } else { f64::MAX };
    [invert(p1), invert(1.0 - p1)]
}

// ============================================
// Models
// ============================================

/// Read-only win-probability model for player 1.
pub trait WinProbabilityModel: Send + Sync {
    fn required_features(&self) -> &[&'static str];

    fn predict(&self, features: &FeatureSnapshot) -> Result<f64, MissingFeatureError>;

    /// Fail on the first required feature absent from `features`.
    fn check_features(&self, features: &FeatureSnapshot) -> Result<(), MissingFeatureError> {
        match self.required_features().iter().find(|key| !features.contains(key)) {
            Some(missing) => Err(MissingFeatureError::new(*missing)),
            None => Ok(()),
        }
    }
}

const STRENGTH_FEATURES: [&str; 10] = [
    "player1_serve",
    "player2_serve",
    "player1_ground",
    "player2_ground",
    "fatigue_1",
    "fatigue_2",
    "set_score_1",
    "set_score_2",
    "game_score_1",
    "game_score_2",
];

/// Logistic model over the strength gap and the current score.
///
/// `z = strength_weight x (effective_1 - effective_2) + set_weight x set_lead
///     + game_weight x game_lead`, where
/// `effective = (serve + ground) / 2 - fatigue_weight x fatigue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StrengthModel {
    pub strength_weight: f64,
    pub fatigue_weight: f64,
    pub set_weight: f64,
    pub game_weight: f64,
}

impl Default for StrengthModel {
    fn default() -> Self {
        Self { strength_weight: 8.0, fatigue_weight: 0.3, set_weight: 0.8, game_weight: 0.15 }
    }
}

impl WinProbabilityModel for StrengthModel {
    fn required_features(&self) -> &[&'static str] {
        &STRENGTH_FEATURES
    }

    fn predict(&self, features: &FeatureSnapshot) -> Result<f64, MissingFeatureError> {
        self.check_features(features)?;

        let effective = |serve: &str, ground: &str, fatigue: &str| -> Result<f64, MissingFeatureError> {
            let base = (features.number(serve)? + features.number(ground)?) / 2.0;
            Ok(base - self.fatigue_weight * features.number(fatigue)?)
        };
        let gap = effective("player1_serve", "player1_ground", "fatigue_1")?
            - effective("player2_serve", "player2_ground", "fatigue_2")?;
        let set_lead = features.number("set_score_1")? - features.number("set_score_2")?;
        let game_lead = features.number("game_score_1")? - features.number("game_score_2")?;

        let z = self.strength_weight * gap + self.set_weight * set_lead + self.game_weight * game_lead;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// Same probability regardless of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedProbability(pub f64);

impl WinProbabilityModel for FixedProbability {
    fn required_features(&self) -> &[&'static str] {
        &[]
    }

    fn predict(&self, _features: &FeatureSnapshot) -> Result<f64, MissingFeatureError> {
        Ok(self.0)
    }
}

/// One labelled example for offline training: features before a point and
/// who won that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrainingSample {
    pub features: FeatureSnapshot,
    pub point_winner: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::MatchState;
    use crate::models::{MatchFormat, Shot, ShotOutcome, ShotPreferences, ShotType, Surface, Weather};

    fn player(name: &str, opponent: &str, serve: f64, ground: f64, h2h: u32) -> PlayerAttributes {
        PlayerAttributes {
            name: name.to_string(),
            serve_accuracy: serve,
            groundstroke_accuracy: ground,
            volley_accuracy: 0.7,
            speed: 85.0,
            stamina: 88.0,
            mental_strength: 90.0,
            shot_preferences: ShotPreferences::default(),
            wins_vs_opponents: BTreeMap::from([(opponent.to_string(), h2h)]),
        }
    }

    fn players() -> [PlayerAttributes; 2] {
        [player("Roger", "Novak", 0.70, 0.75, 23), player("Novak", "Roger", 0.65, 0.80, 27)]
    }

    fn serve_event() -> TennisEvent {
        TennisEvent {
            player: 0,
            shot: Shot { shot_type: ShotType::Smash, ball_speed: 120.0, ball_spin: 1500.0, location: None },
            outcome: ShotOutcome::InPlay,
            is_decisive_point: false,
        }
    }

    fn capture() -> FeatureSnapshot {
        let score = MatchState::new().snapshot(&MatchFormat::grand_slam());
        let context = MatchContext::new(Surface::Grass, true, Weather::Sunny, "UK");
        FeatureSnapshot::capture(&score, &players(), &context, &[serve_event()], 5)
    }

    #[test]
    fn test_capture_contains_context_and_players() {
        let f = capture();
        assert_eq!(f.get("surface").unwrap(), &FeatureValue::from("grass"));
        assert_eq!(f.get("weather").unwrap(), &FeatureValue::from("indoor"));
        assert_eq!(f.number("player1_wins_vs_opponent").unwrap(), 23.0);
        assert_eq!(f.number("player2_wins_vs_opponent").unwrap(), 27.0);
        assert_eq!(f.number("is_indoor").unwrap(), 1.0);
        assert_eq!(f.number("confidence_2").unwrap(), 0.5);
    }

    #[test]
    fn test_recent_events_are_padded() {
        let f = capture();
        assert_eq!(f.number("recent_event_0").unwrap(), ShotType::Smash.code() as f64);
        assert_eq!(f.number("recent_event_4").unwrap(), 0.0);
        assert!(!f.contains("recent_event_5"));
    }

    #[test]
    fn test_strength_odds_match_base_strength_ratio() {
        let f = capture();
        // Base strengths are equal (0.725 each).
        assert!((f.number("average_winning_odd").unwrap() - 2.0).abs() < 1e-9);
        assert!((f.number("average_losing_odd").unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_strength_model_requires_features() {
        let mut f = capture();
        f.remove("fatigue_2");
        let err = StrengthModel::default().predict(&f).unwrap_err();
        assert_eq!(err.feature, "fatigue_2");
        assert_eq!(err.to_string(), "Missing feature: fatigue_2");
    }

    #[test]
    fn test_text_feature_is_not_numeric() {
        let mut f = capture();
        f.insert("set_score_1", "one");
        assert!(StrengthModel::default().predict(&f).is_err());
    }

    #[test]
    fn test_strength_model_responds_to_score() {
        let model = StrengthModel::default();
        let even = model.predict(&capture()).unwrap();
        assert!((even - 0.5).abs() < 1e-9);

        let mut ahead = capture();
        ahead.insert("set_score_1", 2u32);
        ahead.insert("game_score_1", 3u32);
        let p = model.predict(&ahead).unwrap();
        assert!(p > even && p < 1.0);

        let mut tired = capture();
        tired.insert("fatigue_1", 0.9);
        assert!(model.predict(&tired).unwrap() < even);
    }

    #[test]
    fn test_fixed_probability_ignores_features() {
        let model = FixedProbability(0.3);
        assert_eq!(model.predict(&FeatureSnapshot::new()).unwrap(), 0.3);
        assert!(model.check_features(&FeatureSnapshot::new()).is_ok());
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let f = capture();
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["event_country"], "UK");
        assert_eq!(json["is_tiebreak"], false);
        let back: FeatureSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), f.len());
    }
}
