//! Score-driven difficulty curve
//!
//! Level and scroll speed are pure functions of the score, so recomputing them
//! every tick is harmless. Only the level *transition* has side effects, and
//! those live in the tick.

use crate::config::GameConfig;
use crate::consts::{BASE_SPEED, POINTS_PER_LEVEL, SPEED_CAP, SPEED_INCREMENT};

/// Difficulty tuning extracted from the config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub base_speed: f32,
    pub speed_increment: f32,
    pub speed_cap: f32,
    pub points_per_level: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Difficulty {
    /// Stock curve: 6.0 base, +0.5 per level, capped at 15.0, a level every 10 points
    pub const STANDARD: Self = Self {
        base_speed: BASE_SPEED,
        speed_increment: SPEED_INCREMENT,
        speed_cap: SPEED_CAP,
        points_per_level: POINTS_PER_LEVEL,
    };

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            base_speed: config.base_speed,
            speed_increment: config.speed_increment,
            speed_cap: config.speed_cap,
            points_per_level: config.points_per_level.max(1),
        }
    }

    /// Level for a score (1-based)
    #[inline]
    pub fn level_for(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }

    /// Scroll speed for a level, capped
    #[inline]
    pub fn speed_for(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.base_speed + steps * self.speed_increment).min(self.speed_cap)
    }
}

/// Level for a score on the stock curve
pub fn level_for(score: u32) -> u32 {
    Difficulty::STANDARD.level_for(score)
}

/// Scroll speed for a level on the stock curve
pub fn speed_for(level: u32) -> f32 {
    Difficulty::STANDARD.speed_for(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_boundaries() {
        let d = Difficulty::default();
        assert_eq!(d.level_for(0), 1);
        assert_eq!(d.level_for(9), 1);
        assert_eq!(d.level_for(10), 2);
        assert_eq!(d.level_for(47), 5);
    }

    #[test]
    fn test_score_47_speed() {
        let level = level_for(47);
        assert_eq!(level, 5);
        assert!((speed_for(level) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_curve_from_config() {
        let config = GameConfig {
            base_speed: 4.0,
            speed_increment: 1.0,
            speed_cap: 6.0,
            points_per_level: 5,
            ..Default::default()
        };
        let d = Difficulty::from_config(&config);
        assert_eq!(d.level_for(12), 3);
        assert_eq!(d.speed_for(3), 6.0);
        assert_eq!(d.speed_for(4), 6.0);
    }

    #[test]
    fn test_speed_caps_at_15() {
        let d = Difficulty::default();
        // 6.0 + 18 * 0.5 = 15.0
        assert_eq!(d.speed_for(19), 15.0);
        assert_eq!(d.speed_for(20), 15.0);
        assert_eq!(d.speed_for(u32::MAX), 15.0);
    }

    #[test]
    fn test_level_zero_treated_as_first() {
        let d = Difficulty::default();
        assert_eq!(d.speed_for(0), d.base_speed);
    }

    proptest! {
        #[test]
        fn prop_pure_and_idempotent(score in 0u32..100_000) {
            let d = Difficulty::default();
            let level = d.level_for(score);
            prop_assert_eq!(level, d.level_for(score));
            prop_assert_eq!(d.speed_for(level).to_bits(), d.speed_for(level).to_bits());
        }

        #[test]
        fn prop_speed_monotonic_and_capped(level in 1u32..10_000) {
            let d = Difficulty::default();
            let here = d.speed_for(level);
            let next = d.speed_for(level + 1);
            prop_assert!(next >= here);
            prop_assert!(here <= 15.0);
            prop_assert!(here >= d.base_speed);
        }

        #[test]
        fn prop_level_non_decreasing(score in 0u32..100_000) {
            let d = Difficulty::default();
            prop_assert!(d.level_for(score + 1) >= d.level_for(score));
        }
    }
}
