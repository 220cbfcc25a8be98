use serde::{Deserialize, Serialize};

/// Odds engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsConfig {
    /// Odds quoted when a side's probability is exactly 0 (default: 100)
    pub ceiling_odds: f64,
    /// Events kept for the momentum scan (default: 10)
    pub momentum_window: usize,
    /// Most recent events exposed as predictor features (default: 5)
    pub feature_window: usize,
    /// Momentum per winner/error on a decisive point (default: 0.02)
    pub decisive_momentum: f64,
    /// Momentum per winner/error on any other point (default: 0.01)
    pub regular_momentum: f64,
    /// Divisor applied to the game lead in the set market (default: 12)
    pub set_game_scale: f64,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            ceiling_odds: 100.0,
            momentum_window: 10,
            feature_window: 5,
            decisive_momentum: 0.02,
            regular_momentum: 0.01,
            set_game_scale: 12.0,
        }
    }
}

impl OddsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.ceiling_odds.is_finite() && self.ceiling_odds > 1.0) {
            return Err(format!("ceiling_odds must be finite and > 1, got {}", self.ceiling_odds));
        }
        if self.momentum_window == 0 {
            return Err("momentum_window must be at least 1".to_string());
        }
        if self.feature_window > self.momentum_window {
            return Err(format!(
                "feature_window ({}) cannot exceed momentum_window ({})",
                self.feature_window, self.momentum_window
            ));
        }
        let worst_swing = self.momentum_window as f64 * self.decisive_momentum.max(self.regular_momentum);
        if worst_swing >= 1.0 {
            return Err(format!(
                "momentum over a full window could reach {worst_swing}, which would flip odds signs"
            ));
        }
        if self.set_game_scale <= 0.0 {
            return Err("set_game_scale must be positive".to_string());
        }
        Ok(())
    }
}
