//! Match format parameters.
//!
//! A `MatchFormat` is validated once at construction and never changes for
//! the lifetime of a match. Named presets mirror the common professional
//! formats.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;

/// Largest accepted `sets_to_win`.
pub const MAX_SETS_TO_WIN: u32 = 100;

/// Raw, unvalidated format fields (deserialization input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchFormatSpec {
    pub sets_to_win: u32,
    pub games_to_win_set: u32,
    pub tiebreak_points: u32,
    pub final_set_tiebreak: bool,
    #[serde(default)]
    pub final_set_tiebreak_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchFormatSpec", into = "MatchFormatSpec")]
pub struct MatchFormat {
    sets_to_win: u32,
    games_to_win_set: u32,
    tiebreak_points: u32,
    final_set_tiebreak: bool,
    final_set_tiebreak_points: u32,
}

static PRESETS: Lazy<BTreeMap<&'static str, MatchFormatSpec>> = Lazy::new(|| {
    let mut presets = BTreeMap::new();
    presets.insert("grand_slam", MatchFormat::grand_slam().into());
    presets.insert("atp_1000", MatchFormat::atp_1000().into());
    presets
});

impl MatchFormat {
    pub fn new(spec: MatchFormatSpec) -> Result<Self, ValidationError> {
        let positive = |field: &'static str, value: u32| {
            if value < 1 {
                Err(ValidationError::NonPositive { field, value })
            } else {
                Ok(())
            }
        };
        positive("sets_to_win", spec.sets_to_win)?;
        positive("games_to_win_set", spec.games_to_win_set)?;
        positive("tiebreak_points", spec.tiebreak_points)?;
        if spec.sets_to_win > MAX_SETS_TO_WIN {
            return Err(ValidationError::TooLarge {
                field: "sets_to_win",
                value: spec.sets_to_win,
                max: MAX_SETS_TO_WIN,
            });
        }
        if spec.final_set_tiebreak && spec.final_set_tiebreak_points < 1 {
            return Err(ValidationError::MissingFinalSetTiebreakPoints);
        }

        Ok(Self {
            sets_to_win: spec.sets_to_win,
            games_to_win_set: spec.games_to_win_set,
            tiebreak_points: spec.tiebreak_points,
            final_set_tiebreak: spec.final_set_tiebreak,
            final_set_tiebreak_points: spec.final_set_tiebreak_points,
        })
    }

    /// Look up a named preset (`grand_slam`, `atp_1000`).
    pub fn preset(name: &str) -> Result<Self, ValidationError> {
        let spec = PRESETS
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UnknownFormat(name.to_string()))?;
        Self::new(spec)
    }

    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.keys().copied()
    }

    pub fn grand_slam() -> Self {
        Self {
            sets_to_win: 3,
            games_to_win_set: 6,
            tiebreak_points: 7,
            final_set_tiebreak: true,
            final_set_tiebreak_points: 10,
        }
    }

    pub fn atp_1000() -> Self {
        Self {
            sets_to_win: 2,
            games_to_win_set: 6,
            tiebreak_points: 7,
            final_set_tiebreak: true,
            final_set_tiebreak_points: 7,
        }
    }

    pub fn sets_to_win(&self) -> u32 {
        self.sets_to_win
    }

    pub fn games_to_win_set(&self) -> u32 {
        self.games_to_win_set
    }

    pub fn tiebreak_points(&self) -> u32 {
        self.tiebreak_points
    }

    pub fn final_set_tiebreak(&self) -> bool {
        self.final_set_tiebreak
    }

    pub fn final_set_tiebreak_points(&self) -> u32 {
        self.final_set_tiebreak_points
    }

    /// Set number (1-based) of the deciding set.
    pub fn deciding_set(&self) -> u32 {
        self.sets_to_win * 2 - 1
    }

    /// Upper bound on sets played in a complete match.
    pub fn max_sets(&self) -> u32 {
        self.deciding_set()
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::grand_slam()
    }
}

impl JsonSchema for MatchFormat {
    fn schema_name() -> String {
        "MatchFormat".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        MatchFormatSpec::json_schema(gen)
    }
}

impl TryFrom<MatchFormatSpec> for MatchFormat {
    type Error = ValidationError;

    fn try_from(spec: MatchFormatSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<MatchFormat> for MatchFormatSpec {
    fn from(format: MatchFormat) -> Self {
        Self {
            sets_to_win: format.sets_to_win,
            games_to_win_set: format.games_to_win_set,
            tiebreak_points: format.tiebreak_points,
            final_set_tiebreak: format.final_set_tiebreak,
            final_set_tiebreak_points: format.final_set_tiebreak_points,
        }
    }
}
