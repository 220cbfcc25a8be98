pub mod context;
pub mod events;
pub mod format;
pub mod player;
pub mod score;
pub mod statistics;

pub use context::{MatchContext, Surface, Weather};
pub use events::{AccuracyClass, CourtLocation, Shot, ShotOutcome, ShotType, TennisEvent};
pub use format::{MatchFormat, MatchFormatSpec};
pub use player::{PlayerAttributes, PlayerDynamics, ShotPreferences};
pub use score::{PointLabel, PointScore, ScoringMode};
pub use statistics::{MatchStatistics, PlayerStatistics, StatisticsTracker};
