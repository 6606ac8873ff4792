//! Game tuning and screen geometry
//!
//! Injected into the simulation at construction; never read from globals.
//! Loaded from JSON where every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground strip at the bottom of the screen
    pub ground_height: f32,

    // === Player physics ===
    pub gravity: f32,
    /// Velocity set by a flap (must be negative, i.e. upward)
    pub flap_velocity: f32,
    pub power_up_duration_ms: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Distance from the right edge the last pipe must travel before the next spawns
    pub pipe_spacing: f32,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub speed_cap: f32,
    pub points_per_level: u32,
    pub hazard_min_level: u32,

    // === Spawning (one in N) ===
    pub power_up_odds: u32,
    pub hazard_odds: u32,
    pub decoration_odds: u32,
    pub coin_interval_min_ms: f32,
    pub coin_interval_max_ms: f32,

    // === Modes ===
    pub celebration_duration_ms: f32,
    pub rainbow_duration_ms: f32,
    /// Scroll speed multiplier while SlowTime is active
    pub slow_time_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,

            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            power_up_duration_ms: POWER_UP_DURATION_MS,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_spacing: PIPE_SPACING,

            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_cap: SPEED_CAP,
            points_per_level: POINTS_PER_LEVEL,
            hazard_min_level: HAZARD_MIN_LEVEL,

            power_up_odds: POWER_UP_ODDS,
            hazard_odds: HAZARD_ODDS,
            decoration_odds: DECORATION_ODDS,
            coin_interval_min_ms: COIN_INTERVAL_MIN_MS,
            coin_interval_max_ms: COIN_INTERVAL_MAX_MS,

            celebration_duration_ms: CELEBRATION_DURATION_MS,
            rainbow_duration_ms: RAINBOW_DURATION_MS,
            slow_time_factor: SLOW_TIME_FACTOR,
        }
    }
}

impl GameConfig {
    /// Default tuning on a screen of the given size
    pub fn with_screen(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Y coordinate of the ground surface
    pub fn ground_y(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        if !(0.0..self.screen_height).contains(&self.ground_height) {
            return Err(ConfigError::invalid(
                "ground_height",
                format!("{} must lie in [0, screen_height)", self.ground_height),
            ));
        }
        // The player spawns at mid-screen and must start above the ground
        if self.screen_height / 2.0 + PLAYER_HEIGHT >= self.ground_y() {
            return Err(ConfigError::invalid(
                "ground_height",
                format!("{} buries the player's spawn point", self.ground_height),
            ));
        }
        // Coins spawn in [150, h - 200), the tightest spawn band
        if self.screen_height <= 350.0 {
            return Err(ConfigError::invalid(
                "screen_height",
                format!("{} leaves no room for spawn bands (needs > 350)", self.screen_height),
            ));
        }

        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::invalid("gravity", "must be finite and non-negative"));
        }
        if !self.flap_velocity.is_finite() || self.flap_velocity >= 0.0 {
            return Err(ConfigError::invalid("flap_velocity", "must be negative (upward)"));
        }
        positive("power_up_duration_ms", self.power_up_duration_ms)?;

        positive("pipe_width", self.pipe_width)?;
        positive("pipe_gap", self.pipe_gap)?;
        positive("pipe_spacing", self.pipe_spacing)?;
        let lowest_gap_end = self.screen_height / 2.0 + PIPE_MIN_TOP + self.pipe_gap;
        if lowest_gap_end > self.screen_height {
            return Err(ConfigError::invalid(
                "pipe_gap",
                format!("{} does not fit below the lowest gap placement", self.pipe_gap),
            ));
        }

        positive("base_speed", self.base_speed)?;
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            return Err(ConfigError::invalid("speed_increment", "must be non-negative"));
        }
        if !self.speed_cap.is_finite() || self.speed_cap < self.base_speed {
            return Err(ConfigError::invalid("speed_cap", "must be at least base_speed"));
        }
        at_least_one("points_per_level", self.points_per_level)?;

        at_least_one("power_up_odds", self.power_up_odds)?;
        at_least_one("hazard_odds", self.hazard_odds)?;
        at_least_one("decoration_odds", self.decoration_odds)?;
        positive("coin_interval_min_ms", self.coin_interval_min_ms)?;
        if !self.coin_interval_max_ms.is_finite()
            || self.coin_interval_max_ms <= self.coin_interval_min_ms
        {
            return Err(ConfigError::invalid(
                "coin_interval_max_ms",
                "must be greater than coin_interval_min_ms",
            ));
        }

        positive("celebration_duration_ms", self.celebration_duration_ms)?;
        positive("rainbow_duration_ms", self.rainbow_duration_ms)?;
        if !(self.slow_time_factor > 0.0 && self.slow_time_factor <= 1.0) {
            return Err(ConfigError::invalid("slow_time_factor", "must lie in (0, 1]"));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn at_least_one(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be at least 1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::with_screen(800.0, 800.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_gap() {
        let config = GameConfig {
            pipe_gap: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pipe_gap", .. }));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let config = GameConfig {
            base_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "base_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_cap_below_base() {
        let config = GameConfig {
            speed_cap: 5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_gap_too_tall_for_screen() {
        // Lowest gap ends at 400 + 50 + 350 = 800 on an 800 screen: fits
        let fits = GameConfig {
            pipe_gap: 350.0,
            ..GameConfig::with_screen(800.0, 800.0)
        };
        assert!(fits.validate().is_ok());

        let too_tall = GameConfig {
            pipe_gap: 351.0,
            ..GameConfig::with_screen(800.0, 800.0)
        };
        assert!(too_tall.validate().is_err());
    }

    #[test]
    fn test_rejects_ground_above_spawn_point() {
        let buried = GameConfig {
            ground_height: 700.0,
            ..GameConfig::with_screen(800.0, 1200.0)
        };
        assert!(matches!(
            buried.validate(),
            Err(ConfigError::Invalid { field: "ground_height", .. })
        ));

        // Spawn 600 + 45 = 645 sits exactly on a ground at 645
        let touching = GameConfig {
            ground_height: 555.0,
            ..GameConfig::with_screen(800.0, 1200.0)
        };
        assert!(touching.validate().is_err());

        let clear = GameConfig {
            ground_height: 554.0,
            ..GameConfig::with_screen(800.0, 1200.0)
        };
        assert!(clear.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_odds_and_intervals() {
        let zero_odds = GameConfig {
            hazard_odds: 0,
            ..Default::default()
        };
        assert!(zero_odds.validate().is_err());

        let inverted = GameConfig {
            coin_interval_min_ms: 5000.0,
            coin_interval_max_ms: 4000.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let slow = GameConfig {
            slow_time_factor: 0.0,
            ..Default::default()
        };
        assert!(slow.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "screen_width": 1024.0, "speed_cap": 12.0 }"#)
            .expect("valid partial config");
        assert_eq!(config.screen_width, 1024.0);
        assert_eq!(config.speed_cap, 12.0);
        assert_eq!(config.pipe_gap, PIPE_GAP);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "pipe_width": -3.0 }"#),
            Err(ConfigError::Invalid { field: "pipe_width", .. })
        ));
    }
}
