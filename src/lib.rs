//! Funny Flap - A side-scrolling flapping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Draw command generation for an external renderer
//! - `platform`: Input, high-score storage and the loop host
//! - `config`: Data-driven game tuning
//! - `error`: Error types

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, StoreError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame duration (60 Hz); speeds are tuned per frame
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 1200.0;
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 45.0;
    /// Downward acceleration (units/frame²)
    pub const GRAVITY: f32 = 1.0;
    /// Velocity set by a flap (negative is up)
    pub const FLAP_VELOCITY: f32 = -15.0;
    /// Flap multiplier while boost is active
    pub const BOOST_FLAP_FACTOR: f32 = 1.3;
    /// Velocity multiplier applied once on boost pickup
    pub const BOOST_PICKUP_FACTOR: f32 = 1.5;
    pub const ROTATION_PER_VELOCITY: f32 = 3.0;
    pub const MIN_ROTATION_DEG: f32 = -30.0;
    pub const MAX_ROTATION_DEG: f32 = 90.0;
    /// Duration of any power-up effect
    pub const POWER_UP_DURATION_MS: f32 = 3000.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 120.0;
    pub const PIPE_GAP: f32 = 300.0;
    pub const PIPE_SPACING: f32 = 400.0;
    /// Minimum clearance between the screen top and a gap
    pub const PIPE_MIN_TOP: f32 = 50.0;

    /// Difficulty curve
    pub const BASE_SPEED: f32 = 6.0;
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const SPEED_CAP: f32 = 15.0;
    pub const POINTS_PER_LEVEL: u32 = 10;
    /// Level at which moving hazards start to appear
    pub const HAZARD_MIN_LEVEL: u32 = 3;

    /// Spawn odds (one in N per opportunity)
    pub const POWER_UP_ODDS: u32 = 8;
    pub const HAZARD_ODDS: u32 = 500;
    pub const DECORATION_ODDS: u32 = 300;
    pub const FLAP_BUBBLE_ODDS: u32 = 5;

    /// Coin spawn interval bounds
    pub const COIN_INTERVAL_MIN_MS: f32 = 3000.0;
    pub const COIN_INTERVAL_MAX_MS: f32 = 8000.0;

    /// Pickup and hit radii
    pub const COIN_RADIUS: f32 = 40.0;
    pub const HAZARD_RADIUS: f32 = 35.0;
    pub const POWER_UP_SIZE: f32 = 40.0;

    /// Relative speeds against the world scroll
    pub const HAZARD_SPEED_FACTOR: f32 = 0.8;
    pub const POWER_UP_SPEED_FACTOR: f32 = 0.9;
    pub const SLOW_TIME_FACTOR: f32 = 0.5;

    /// Mode and banner durations
    pub const CELEBRATION_DURATION_MS: f32 = 8000.0;
    pub const RAINBOW_DURATION_MS: f32 = 5000.0;
    pub const LEVEL_BANNER_MS: f32 = 3000.0;
    pub const CELEBRATION_EVERY: u32 = 10;
    pub const RAINBOW_EVERY: u32 = 5;

    /// Transient effect lifetimes
    pub const FLOATING_TEXT_LIFE_MS: f32 = 2000.0;
    pub const FLOATING_TEXT_RISE: f32 = 2.0;
    pub const CHAT_BUBBLE_LIFE_MS: f32 = 3000.0;
    pub const CHAT_BUBBLE_RISE: f32 = 0.5;
}

/// Convert an HSV colour (hue in degrees) to linear RGBA
pub fn hsv_to_rgba(hue: f32, saturation: f32, value: f32, alpha: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = value * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = value - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m, alpha]
}

/// Unit direction for an angle in degrees
#[inline]
pub fn direction_deg(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
