use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    ServeFirst,
    ServeSecond,
    Forehand,
    Backhand,
    VolleyForehand,
    VolleyBackhand,
    Smash,
    SliceForehand,
    SliceBackhand,
    DropshotForehand,
    DropshotBackhand,
}

/// Which player attribute governs a shot's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyClass {
    Serve,
    Volley,
    Groundstroke,
}

impl ShotType {
    /// Every shot type a rally can produce (serves excluded).
    pub const RALLY: [ShotType; 9] = [
        ShotType::Forehand,
        ShotType::Backhand,
        ShotType::VolleyForehand,
        ShotType::VolleyBackhand,
        ShotType::Smash,
        ShotType::SliceForehand,
        ShotType::SliceBackhand,
        ShotType::DropshotForehand,
        ShotType::DropshotBackhand,
    ];

    pub fn is_serve(self) -> bool {
        matches!(self, ShotType::ServeFirst | ShotType::ServeSecond)
    }

    /// Serves and smashes cost double fatigue.
    pub fn is_heavy(self) -> bool {
        self.is_serve() || self == ShotType::Smash
    }

    pub fn accuracy_class(self) -> AccuracyClass {
        match self {
            ShotType::ServeFirst | ShotType::ServeSecond => AccuracyClass::Serve,
            ShotType::VolleyForehand | ShotType::VolleyBackhand => AccuracyClass::Volley,
            _ => AccuracyClass::Groundstroke,
        }
    }

    /// Stable numeric code used in predictor features (0 is reserved for padding).
    pub fn code(self) -> u32 {
        match self {
            ShotType::ServeFirst => 1,
            ShotType::ServeSecond => 2,
            ShotType::Forehand => 3,
            ShotType::Backhand => 4,
            ShotType::VolleyForehand => 5,
            ShotType::VolleyBackhand => 6,
            ShotType::Smash => 7,
            ShotType::SliceForehand => 8,
            ShotType::SliceBackhand => 9,
            ShotType::DropshotForehand => 10,
            ShotType::DropshotBackhand => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShotType::ServeFirst => "serve_first",
            ShotType::ServeSecond => "serve_second",
            ShotType::Forehand => "forehand",
            ShotType::Backhand => "backhand",
            ShotType::VolleyForehand => "volley_forehand",
            ShotType::VolleyBackhand => "volley_backhand",
            ShotType::Smash => "smash",
            ShotType::SliceForehand => "slice_forehand",
            ShotType::SliceBackhand => "slice_backhand",
            ShotType::DropshotForehand => "dropshot_forehand",
            ShotType::DropshotBackhand => "dropshot_backhand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Ace,
    DoubleFault,
    InPlay,
    Winner,
    ForcedError,
    UnforcedError,
    Net,
    Out,
}

impl ShotOutcome {
    pub fn ends_point(self) -> bool {
        self != ShotOutcome::InPlay
    }

    /// True when the striking player wins the point with this outcome.
    pub fn striker_wins(self) -> bool {
        matches!(self, ShotOutcome::Winner | ShotOutcome::ForcedError | ShotOutcome::Ace)
    }

    /// Errors committed by the striker without pressure from the opponent.
    pub fn is_unforced_miss(self) -> bool {
        matches!(self, ShotOutcome::UnforcedError | ShotOutcome::Net | ShotOutcome::Out)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShotOutcome::Ace => "ace",
            ShotOutcome::DoubleFault => "double_fault",
            ShotOutcome::InPlay => "in_play",
            ShotOutcome::Winner => "winner",
            ShotOutcome::ForcedError => "forced_error",
            ShotOutcome::UnforcedError => "unforced_error",
            ShotOutcome::Net => "net",
            ShotOutcome::Out => "out",
        }
    }
}

/// Landing zone on a 3x3 court grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourtLocation {
    LeftNear,
    CenterNear,
    RightNear,
    LeftMiddle,
    CenterMiddle,
    RightMiddle,
    LeftFar,
    CenterFar,
    RightFar,
}

impl CourtLocation {
    pub const ALL: [CourtLocation; 9] = [
        CourtLocation::LeftNear,
        CourtLocation::CenterNear,
        CourtLocation::RightNear,
        CourtLocation::LeftMiddle,
        CourtLocation::CenterMiddle,
        CourtLocation::RightMiddle,
        CourtLocation::LeftFar,
        CourtLocation::CenterFar,
        CourtLocation::RightFar,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Shot {
    pub shot_type: ShotType,
    /// km/h
    pub ball_speed: f64,
    /// rpm
    pub ball_spin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<CourtLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TennisEvent {
    /// Striking player (0 or 1).
    pub player: usize,
    pub shot: Shot,
    pub outcome: ShotOutcome,
    /// Break, set or match point for either player.
    #[serde(default)]
    pub is_decisive_point: bool,
}

impl TennisEvent {
    pub fn ends_point(&self) -> bool {
        self.outcome.ends_point()
    }

    /// Winner of the point this event ended, if it ended one.
    pub fn point_winner(&self) -> Option<usize> {
        if !self.ends_point() {
            return None;
        }
        if self.outcome.striker_wins() {
            Some(self.player)
        } else {
            Some(1 - self.player)
        }
    }
}
