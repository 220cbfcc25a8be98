//! Point-level score primitives.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regular-game point label for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PointLabel {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "15")]
    Fifteen,
    #[serde(rename = "30")]
    Thirty,
    #[serde(rename = "40")]
    Forty,
    #[serde(rename = "Adv")]
    Advantage,
    #[serde(rename = "Game")]
    Game,
}

impl PointLabel {
    /// Ordinal used by the game-odds market (0, 15, 30, 40, Adv -> 0..=4).
    pub fn value(self) -> u32 {
        match self {
            PointLabel::Zero => 0,
            PointLabel::Fifteen => 1,
            PointLabel::Thirty => 2,
            PointLabel::Forty => 3,
            PointLabel::Advantage => 4,
            PointLabel::Game => 5,
        }
    }

    /// Plain progression 0 -> 15 -> 30 -> 40 -> Game, ignoring deuce.
    pub fn next(self) -> PointLabel {
        match self {
            PointLabel::Zero => PointLabel::Fifteen,
            PointLabel::Fifteen => PointLabel::Thirty,
            PointLabel::Thirty => PointLabel::Forty,
            PointLabel::Forty | PointLabel::Advantage | PointLabel::Game => PointLabel::Game,
        }
    }
}

impl fmt::Display for PointLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PointLabel::Zero => "0",
            PointLabel::Fifteen => "15",
            PointLabel::Thirty => "30",
            PointLabel::Forty => "40",
            PointLabel::Advantage => "Adv",
            PointLabel::Game => "Game",
        };
        f.write_str(label)
    }
}

/// Which counting rules apply to the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    Regular,
    Tiebreak,
    MatchTiebreak,
}

impl ScoringMode {
    pub fn counts_points(self) -> bool {
        !matches!(self, ScoringMode::Regular)
    }
}

/// Current point score. The active representation always agrees with the
/// scoring mode: labels in regular play, integer counts in either tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointScore {
    Regular([PointLabel; 2]),
    Count([u32; 2]),
}

impl PointScore {
    pub fn love_all(mode: ScoringMode) -> Self {
        if mode.counts_points() {
            PointScore::Count([0, 0])
        } else {
            PointScore::Regular([PointLabel::Zero; 2])
        }
    }

    pub fn is_love_all(&self) -> bool {
        match self {
            PointScore::Regular(labels) => labels == &[PointLabel::Zero; 2],
            PointScore::Count(counts) => counts == &[0, 0],
        }
    }

    /// Numeric value of a player's score (label ordinal or raw count).
    pub fn value(&self, player: usize) -> u32 {
        match self {
            PointScore::Regular(labels) => labels[player].value(),
            PointScore::Count(counts) => counts[player],
        }
    }

    pub fn label(&self, player: usize) -> String {
        match self {
            PointScore::Regular(labels) => labels[player].to_string(),
            PointScore::Count(counts) => counts[player].to_string(),
        }
    }
}

impl Default for PointScore {
    fn default() -> Self {
        PointScore::love_all(ScoringMode::Regular)
    }
}

impl fmt::Display for PointScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.label(0), self.label(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_progression() {
        assert_eq!(PointLabel::Zero.next(), PointLabel::Fifteen);
        assert_eq!(PointLabel::Thirty.next(), PointLabel::Forty);
        assert_eq!(PointLabel::Forty.next(), PointLabel::Game);
        assert_eq!(PointLabel::Advantage.value(), 4);
    }

    #[test]
    fn test_representation_follows_mode() {
        assert_eq!(PointScore::love_all(ScoringMode::Regular), PointScore::default());
        assert_eq!(PointScore::love_all(ScoringMode::Tiebreak), PointScore::Count([0, 0]));
        assert_eq!(PointScore::love_all(ScoringMode::MatchTiebreak), PointScore::Count([0, 0]));
    }

    #[test]
    fn test_display_and_serde_labels() {
        let score = PointScore::Regular([PointLabel::Advantage, PointLabel::Forty]);
        assert_eq!(score.to_string(), "Adv-40");
        assert_eq!(serde_json::to_string(&score).unwrap(), r#"{"regular":["Adv","40"]}"#);
        assert_eq!(PointScore::Count([5, 3]).to_string(), "5-3");
    }
}
