use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Hard,
    Clay,
    Grass,
    Carpet,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Carpet => "carpet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Windy,
    Rainy,
    Indoor,
}

impl Weather {
    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Windy => "windy",
            Weather::Rainy => "rainy",
            Weather::Indoor => "indoor",
        }
    }
}

/// Immutable venue context for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchContext {
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub is_indoor: bool,
    #[serde(default)]
    weather: Weather,
    #[serde(default)]
    pub event_country: String,
}

impl MatchContext {
    pub fn new(
        surface: Surface,
        is_indoor: bool,
        weather: Weather,
        event_country: impl Into<String>,
    ) -> Self {
        Self { surface, is_indoor, weather, event_country: event_country.into() }
    }

    /// Weather as seen by the match: always `Indoor` under a roof.
    pub fn weather(&self) -> Weather {
        if self.is_indoor {
            Weather::Indoor
        } else {
            self.weather
        }
    }
}

impl Default for MatchContext {
    fn default() -> Self {
        Self::new(Surface::Hard, false, Weather::Sunny, "USA")
    }
}
