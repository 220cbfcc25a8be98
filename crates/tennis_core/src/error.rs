use thiserror::Error;

/// Rejected construction input (formats, players, engine config).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be at least 1, got {value}")]
    NonPositive { field: &'static str, value: u32 },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge { field: &'static str, value: u32, max: u32 },

    #[error("final_set_tiebreak_points must be at least 1 when final_set_tiebreak is enabled")]
    MissingFinalSetTiebreakPoints,

    #[error("Unknown match format: {0}")]
    UnknownFormat(String),

    #[error("Invalid attribute {attribute}: {value} (expected {expected})")]
    InvalidAttribute { attribute: &'static str, value: f64, expected: &'static str },

    #[error("Invalid shot preferences: {0}")]
    InvalidPreferences(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),
}

/// The predictor was handed a snapshot without a feature it requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing feature: {feature}")]
pub struct MissingFeatureError {
    pub feature: String,
}

impl MissingFeatureError {
    pub fn new(feature: impl Into<String>) -> Self {
        Self { feature: feature.into() }
    }
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Point winner outside {0, 1}.
    #[error("Configuration error: player index {index} is not 0 or 1")]
    InvalidPlayerIndex { index: usize },

    #[error("Match is already over")]
    MatchAlreadyOver,

    #[error(transparent)]
    MissingFeature(#[from] MissingFeatureError),

    #[error("Match did not finish within {limit} events")]
    EventLimitExceeded { limit: u64 },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
