//! Event generator parameters.

use serde::{Deserialize, Serialize};

/// Shot generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // === Serve ===
    /// Chance a landed first serve is an ace (default: 0.05)
    pub ace_probability: f64,
    /// Second serve success = serve_accuracy x factor, capped at 1 (default: 1.1)
    pub second_serve_factor: f64,

    // === Rally outcome bands ===
    /// Cumulative band edges for in-play, winner, forced error, unforced error
    /// and net. Each is scaled by the shot's accuracy; anything above the last
    /// edge is out. (default: 0.80, 0.90, 0.95, 0.98, 0.99)
    pub outcome_bands: [f64; 5],

    // === Ball speed (km/h) ===
    /// Serve speed mean = base + per_speed_point x speed (default: 100 + 0.4)
    pub serve_speed_base: f64,
    pub serve_speed_per_point: f64,
    /// Rally speed mean = factor x speed, before the shot-type multiplier (default: 0.7)
    pub rally_speed_factor: f64,
    /// Standard deviation for both speed draws (default: 10)
    pub speed_std_dev: f64,
    pub min_ball_speed: f64,
    pub max_ball_speed: f64,

    // === Ball spin (rpm) ===
    pub serve_spin_range: (f64, f64),
    pub rally_spin_range: (f64, f64),

    /// Attach a landing zone to every shot (default: true)
    pub track_location: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ace_probability: 0.05,
            second_serve_factor: 1.1,

            outcome_bands: [0.80, 0.90, 0.95, 0.98, 0.99],

            serve_speed_base: 100.0,
            serve_speed_per_point: 0.4,
            rally_speed_factor: 0.7,
            speed_std_dev: 10.0,
            min_ball_speed: 20.0,
            max_ball_speed: 250.0,

            serve_spin_range: (1000.0, 3000.0),
            rally_spin_range: (1000.0, 4000.0),

            track_location: true,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.ace_probability) {
            return Err(format!("ace_probability must be in [0, 1], got {}", self.ace_probability));
        }
        if self.second_serve_factor <= 0.0 {
            return Err(format!(
                "second_serve_factor must be positive, got {}",
                self.second_serve_factor
            ));
        }
        let mut previous = 0.0;
        for edge in self.outcome_bands {
            if !(previous..=1.0).contains(&edge) {
                return Err(format!(
                    "outcome_bands must ascend within [0, 1], got {:?}",
                    self.outcome_bands
                ));
            }
            previous = edge;
        }
        if self.speed_std_dev < 0.0 {
            return Err("speed_std_dev must be non-negative".to_string());
        }
        if self.min_ball_speed > self.max_ball_speed {
            return Err("min_ball_speed exceeds max_ball_speed".to_string());
        }
        for (name, (lo, hi)) in
            [("serve_spin_range", self.serve_spin_range), ("rally_spin_range", self.rally_spin_range)]
        {
            if lo >= hi {
                return Err(format!("{name} must be a non-empty range, got ({lo}, {hi})"));
            }
        }
        Ok(())
    }
}
