//! Game state and core simulation types
//!
//! Every entity is plain data plus its own per-frame update rule. The
//! [`GameState`] owns every population; entities never reference each other.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::rect::Rect;
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for an activation to restart
    GameOver,
}

/// Something noteworthy that happened during a tick (for audio, HUD, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Flapped,
    Scored { score: u32 },
    CoinCollected { total: u32 },
    PowerUpCollected(PowerUpKind),
    LevelUp { level: u32, speed: f32 },
    CelebrationStarted,
    RainbowStarted,
    /// A lethal overlap was absorbed by the shield
    ShieldBlocked,
    GameOver { score: u32, high_score: u32 },
    Restarted,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Boost,
    SlowTime,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::Shield, Self::Boost, Self::SlowTime];
}

/// Active power-up effects, sharing one countdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: bool,
    pub boost: bool,
    pub slow_time: bool,
    /// Remaining effect time (ms); flags clear when it runs out
    pub timer_ms: f32,
}

impl ActiveEffects {
    /// Count down and clear all flags once the timer expires
    pub fn tick(&mut self, dt_ms: f32) {
        if self.timer_ms > 0.0 {
            self.timer_ms -= dt_ms;
            if self.timer_ms <= 0.0 {
                *self = Self::default();
            }
        }
    }

    pub fn any(&self) -> bool {
        self.timer_ms > 0.0
    }
}

/// The player-controlled flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    /// Degrees, derived from velocity
    pub rotation: f32,
    pub effects: ActiveEffects,
    spawn: Vec2,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let spawn = Vec2::new(config.screen_width / 4.0, config.screen_height / 2.0);
        Self {
            pos: spawn,
            vel_y: 0.0,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            rotation: 0.0,
            effects: ActiveEffects::default(),
            spawn,
        }
    }

    /// Back to the spawn point with no momentum or effects
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel_y = 0.0;
        self.rotation = 0.0;
        self.effects = ActiveEffects::default();
    }

    /// Gravity, integration, rotation and effect countdown for one frame
    pub fn update(&mut self, gravity: f32, dt_ms: f32) {
        self.vel_y += gravity;
        self.pos.y += self.vel_y;
        self.rotation =
            (self.vel_y * ROTATION_PER_VELOCITY).clamp(MIN_ROTATION_DEG, MAX_ROTATION_DEG);
        self.effects.tick(dt_ms);
    }

    pub fn flap(&mut self, flap_velocity: f32) {
        self.vel_y = if self.effects.boost {
            flap_velocity * BOOST_FLAP_FACTOR
        } else {
            flap_velocity
        };
    }

    /// Every pickup restarts the shared timer
    pub fn apply_power_up(&mut self, kind: PowerUpKind, flap_velocity: f32, duration_ms: f32) {
        self.effects.timer_ms = duration_ms;
        match kind {
            PowerUpKind::Shield => self.effects.shield = true,
            PowerUpKind::Boost => {
                self.effects.boost = true;
                self.vel_y = flap_velocity * BOOST_PICKUP_FACTOR;
            }
            PowerUpKind::SlowTime => self.effects.slow_time = true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// A pipe pair with a gap the player must fly through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    /// Bottom of the top pipe
    pub top_height: f32,
    /// Opening between the pipes, fixed for the pipe's lifetime
    pub gap: f32,
    /// Set once when the player passes the trailing edge
    pub scored: bool,
    /// Shield feedback already shown for this pipe
    pub shield_blocked: bool,
}

impl Pipe {
    pub fn new(x: f32, width: f32, top_height: f32, gap: f32) -> Self {
        Self {
            x,
            width,
            top_height,
            gap,
            scored: false,
            shield_blocked: false,
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Top of the bottom pipe
    pub fn bottom_y(&self) -> f32 {
        self.top_height + self.gap
    }

    pub fn gap_center(&self) -> f32 {
        self.top_height + self.gap * 0.5
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.trailing_edge(), self.top_height)
    }

    pub fn bottom_rect(&self, screen_height: f32) -> Rect {
        Rect::new(self.x, self.bottom_y(), self.trailing_edge(), screen_height)
    }

    /// Fully past the left boundary
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// Moving hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Spinning cross of blades
    Blade,
    /// Ball bobbing up and down
    Bouncer,
    /// Vertical laser bar
    Laser,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [Self::Blade, Self::Bouncer, Self::Laser];
}

/// A free-floating lethal obstacle (appears from level 3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub pos: Vec2,
    pub age_ms: f32,
    pub shield_blocked: bool,
}

impl Hazard {
    pub fn new(kind: HazardKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            age_ms: 0.0,
            shield_blocked: false,
        }
    }

    pub fn advance(&mut self, speed: f32, dt_ms: f32) {
        self.age_ms += dt_ms;
        self.pos.x -= speed * HAZARD_SPEED_FACTOR;
        if self.kind == HazardKind::Bouncer {
            self.pos.y += (self.age_ms * 0.01).sin() * 3.0;
        }
    }

    /// Blade spin angle in degrees
    pub fn spin(&self) -> f32 {
        self.age_ms * 0.02
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -100.0
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    /// Time since spawn, drives the floating animation
    pub age_ms: f32,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, age_ms: 0.0 }
    }

    pub fn advance(&mut self, speed: f32, dt_ms: f32) {
        self.age_ms += dt_ms;
        self.pos.x -= speed;
        self.pos.y += (self.age_ms * 0.01).sin() * 2.0;
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -50.0
    }
}

/// A power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
    pub age_ms: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: POWER_UP_SIZE,
            age_ms: 0.0,
        }
    }

    /// Drifts a little slower than the pipes
    pub fn advance(&mut self, speed: f32, dt_ms: f32) {
        self.age_ms += dt_ms;
        self.pos.x -= speed * POWER_UP_SPEED_FACTOR;
        self.pos.y += (self.age_ms * 0.006).sin() * 3.0;
    }

    /// Size multiplier for the pulsing draw
    pub fn pulse(&self) -> f32 {
        (self.age_ms * 0.01).sin() * 0.3 + 1.0
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -50.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hue in degrees
    pub hue: f32,
    pub saturation: f32,
    pub life_ms: f32,
    pub max_life_ms: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt_ms: f32) {
        self.pos += self.vel;
        self.vel.y += 0.3;
        self.vel.x *= 0.99;
        self.size *= 0.985;
        self.life_ms -= dt_ms;
    }

    pub fn opacity(&self) -> f32 {
        (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life_ms <= 0.0
    }
}

/// Rising text popup ("BONK!", "BLING!")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub life_ms: f32,
    pub max_life_ms: f32,
}

impl FloatingText {
    pub fn new(text: impl Into<String>, pos: Vec2) -> Self {
        Self {
            text: text.into(),
            pos,
            life_ms: FLOATING_TEXT_LIFE_MS,
            max_life_ms: FLOATING_TEXT_LIFE_MS,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos.y -= FLOATING_TEXT_RISE;
        self.life_ms -= dt_ms;
    }

    pub fn opacity(&self) -> f32 {
        (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life_ms <= 0.0
    }
}

/// Speech bubble floating next to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBubble {
    pub text: String,
    pub pos: Vec2,
    pub life_ms: f32,
    pub max_life_ms: f32,
}

impl ChatBubble {
    pub fn new(text: impl Into<String>, pos: Vec2) -> Self {
        Self {
            text: text.into(),
            pos,
            life_ms: CHAT_BUBBLE_LIFE_MS,
            max_life_ms: CHAT_BUBBLE_LIFE_MS,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos.y -= CHAT_BUBBLE_RISE;
        self.life_ms -= dt_ms;
    }

    pub fn opacity(&self) -> f32 {
        (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life_ms <= 0.0
    }
}

/// Harmless glyph drifting across the sky
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub glyph: String,
    pub pos: Vec2,
    pub speed: f32,
}

impl Decoration {
    pub fn update(&mut self, time_ms: f32) {
        self.pos.x -= self.speed;
        self.pos.y += (time_ms * 0.01 + self.pos.x * 0.01).sin() * 2.0;
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -50.0
    }
}

/// Time-boxed visual modes and banners (ms remaining, 0 = off)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeTimers {
    pub celebration_ms: f32,
    pub rainbow_ms: f32,
    pub level_banner_ms: f32,
}

impl ModeTimers {
    pub fn tick(&mut self, dt_ms: f32) {
        for timer in [
            &mut self.celebration_ms,
            &mut self.rainbow_ms,
            &mut self.level_banner_ms,
        ] {
            if *timer > 0.0 {
                *timer = (*timer - dt_ms).max(0.0);
            }
        }
    }

    pub fn celebration(&self) -> bool {
        self.celebration_ms > 0.0
    }

    pub fn rainbow(&self) -> bool {
        self.rainbow_ms > 0.0
    }

    pub fn level_banner(&self) -> bool {
        self.level_banner_ms > 0.0
    }
}

/// Complete game state (deterministic given seed and inputs)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    #[serde(skip)]
    pub difficulty: Difficulty,
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub coins_collected: u32,
    pub level: u32,
    /// Current scroll speed (units/frame), before the slow-time factor
    pub speed: f32,
    /// Simulated time since the state was created
    pub time_ms: f32,
    pub frame: u64,
    pub player: Player,
    pub pipes: Vec<Pipe>,
    pub hazards: Vec<Hazard>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub bubbles: Vec<ChatBubble>,
    pub decorations: Vec<Decoration>,
    pub modes: ModeTimers,
    /// Countdown to the next coin
    pub coin_timer_ms: f32,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let difficulty = Difficulty::from_config(&config);
        let player = Player::new(&config);
        let mut state = Self {
            difficulty,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            high_score: 0,
            coins_collected: 0,
            level: 1,
            speed: difficulty.speed_for(1),
            time_ms: 0.0,
            frame: 0,
            player,
            pipes: Vec::new(),
            hazards: Vec::new(),
            coins: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            bubbles: Vec::new(),
            decorations: Vec::new(),
            modes: ModeTimers::default(),
            coin_timer_ms: 0.0,
            events: Vec::new(),
            config,
        };

        state.coin_timer_ms = state.next_coin_interval();
        state.spawn_pipe();

        Ok(state)
    }

    /// Carry a high score over from a store
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Effective world scroll speed this frame
    pub fn scroll_speed(&self) -> f32 {
        if self.player.effects.slow_time {
            self.speed * self.config.slow_time_factor
        } else {
            self.speed
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Screen centre, where announcements appear
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.config.screen_width, self.config.screen_height) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_seeds_one_pipe() {
        let state = GameState::new(GameConfig::default(), 7).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed, BASE_SPEED);
        assert!(state.coins.is_empty() && state.hazards.is_empty());
        assert!(state.coin_timer_ms >= COIN_INTERVAL_MIN_MS);
        assert!(state.coin_timer_ms < COIN_INTERVAL_MAX_MS);
    }

    #[test]
    fn test_new_state_rejects_bad_config() {
        let config = GameConfig {
            pipe_gap: 0.0,
            ..Default::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_player_physics_and_rotation_clamp() {
        let mut player = Player::new(&GameConfig::default());
        let start_y = player.pos.y;
        player.update(1.0, FRAME_MS);
        assert_eq!(player.vel_y, 1.0);
        assert_eq!(player.pos.y, start_y + 1.0);
        assert_eq!(player.rotation, 3.0);

        for _ in 0..60 {
            player.update(1.0, FRAME_MS);
        }
        assert_eq!(player.rotation, MAX_ROTATION_DEG);

        player.flap(FLAP_VELOCITY);
        player.update(1.0, FRAME_MS);
        assert_eq!(player.rotation, MIN_ROTATION_DEG);
    }

    #[test]
    fn test_boost_flap_is_stronger() {
        let mut player = Player::new(&GameConfig::default());
        player.apply_power_up(PowerUpKind::Boost, FLAP_VELOCITY, POWER_UP_DURATION_MS);
        assert_eq!(player.vel_y, FLAP_VELOCITY * BOOST_PICKUP_FACTOR);
        player.flap(FLAP_VELOCITY);
        assert_eq!(player.vel_y, FLAP_VELOCITY * BOOST_FLAP_FACTOR);
    }

    #[test]
    fn test_effects_expire_together() {
        let mut effects = ActiveEffects::default();
        effects.shield = true;
        effects.slow_time = true;
        effects.timer_ms = 100.0;

        effects.tick(60.0);
        assert!(effects.shield && effects.any());
        effects.tick(60.0);
        assert!(!effects.shield && !effects.slow_time && !effects.any());
    }

    #[test]
    fn test_pipe_geometry() {
        let pipe = Pipe::new(300.0, 120.0, 200.0, 300.0);
        assert_eq!(pipe.bottom_y(), 500.0);
        assert_eq!(pipe.gap, 300.0);
        assert_eq!(pipe.gap_center(), 350.0);
        assert_eq!(pipe.top_rect(), Rect::new(300.0, 0.0, 420.0, 200.0));
        assert_eq!(pipe.bottom_rect(800.0), Rect::new(300.0, 500.0, 420.0, 800.0));
    }

    #[test]
    fn test_pipe_offscreen_needs_trailing_edge_past_left() {
        let mut pipe = Pipe::new(-1.0, 120.0, 200.0, 300.0);
        assert!(!pipe.is_offscreen());
        pipe.x = -120.0;
        assert!(!pipe.is_offscreen());
        pipe.advance(0.5);
        assert!(pipe.is_offscreen());
    }

    #[test]
    fn test_hazard_motion_by_kind() {
        let mut laser = Hazard::new(HazardKind::Laser, Vec2::new(500.0, 300.0));
        laser.advance(10.0, FRAME_MS);
        assert_eq!(laser.pos, Vec2::new(492.0, 300.0));

        let mut bouncer = Hazard::new(HazardKind::Bouncer, Vec2::new(500.0, 300.0));
        bouncer.advance(10.0, 100.0);
        assert!((bouncer.pos.y - (300.0 + 1.0f32.sin() * 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_mode_timers_clear_at_zero() {
        let mut modes = ModeTimers {
            celebration_ms: 20.0,
            rainbow_ms: 0.0,
            level_banner_ms: 5.0,
        };
        modes.tick(10.0);
        assert!(modes.celebration() && !modes.level_banner());
        modes.tick(10.0);
        assert!(!modes.celebration() && !modes.rainbow());
    }

    #[test]
    fn test_slow_time_scales_scroll() {
        let mut state = GameState::new(GameConfig::default(), 3).unwrap();
        assert_eq!(state.scroll_speed(), BASE_SPEED);
        state.player.apply_power_up(PowerUpKind::SlowTime, FLAP_VELOCITY, POWER_UP_DURATION_MS);
        assert_eq!(state.scroll_speed(), BASE_SPEED * SLOW_TIME_FACTOR);
    }

    #[test]
    fn test_transient_opacity_fades_linearly() {
        let mut text = FloatingText::new("BONK!", Vec2::ZERO);
        text.update(FLOATING_TEXT_LIFE_MS / 2.0);
        assert!((text.opacity() - 0.5).abs() < 1e-5);
        assert_eq!(text.pos.y, -FLOATING_TEXT_RISE);

        let mut bubble = ChatBubble::new("hi", Vec2::ZERO);
        bubble.update(CHAT_BUBBLE_LIFE_MS);
        assert!(bubble.is_dead());
        assert_eq!(bubble.opacity(), 0.0);
    }
}
