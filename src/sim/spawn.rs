//! Entity spawning and effect bursts
//!
//! All randomness comes from the state's seeded RNG so runs replay exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{
    ChatBubble, Coin, Decoration, FloatingText, GameState, Hazard, HazardKind, Particle, Pipe,
    PowerUp, PowerUpKind,
};
use crate::consts::*;
use crate::direction_deg;

/// Bubbles shown when a pipe is passed
pub const CHEER_MESSAGES: [&str; 12] = [
    "OOPS! 😅",
    "Nice try! 😂",
    "Almost there! 🤣",
    "Keep going! 💪",
    "You're flying! 🚀",
    "Super bird! 🦸",
    "Fantastic! ✨",
    "Amazing! 🌟",
    "Epic fail! 😜",
    "Don't give up! 💖",
    "You got this! 🔥",
    "Flying high! 🎈",
];

/// Bubbles shown on level up
pub const LEVEL_UP_MESSAGES: [&str; 6] = [
    "LEVEL UP! 🎉",
    "Getting faster! 🏃",
    "Speed boost! ⚡",
    "Challenge accepted! 🎯",
    "Next level! 🆙",
    "Difficulty rising! 📈",
];

/// Glyphs for drifting sky decorations
pub const DECORATION_GLYPHS: [&str; 10] = [
    "😄", "🎉", "⭐", "🌟", "💫", "🎈", "🦋", "🌈", "☀️", "⚡",
];

/// Particle burst presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Confetti around the player when a pipe is passed
    Score,
    /// Red sparks where a coin was picked up
    Coin,
    /// Big celebration in the upper third of the screen
    Fireworks,
    /// Sparkles where a power-up was picked up
    PowerUp,
    /// Puff behind the player on each flap
    Flap,
}

impl Burst {
    /// (count, scatter half-width, life in ms)
    fn params(self) -> (usize, f32, f32) {
        match self {
            Burst::Score => (15, 20.0, 1200.0),
            Burst::Coin => (12, 15.0, 1000.0),
            Burst::Fireworks => (60, 150.0, 2500.0),
            Burst::PowerUp => (20, 30.0, 1800.0),
            Burst::Flap => (8, 10.0, 600.0),
        }
    }
}

impl GameState {
    /// Uniform draw from the configured coin interval
    pub(crate) fn next_coin_interval(&mut self) -> f32 {
        let (min, max) = (self.config.coin_interval_min_ms, self.config.coin_interval_max_ms);
        self.rng.random_range(min..max)
    }

    /// One-in-`odds` roll
    pub(crate) fn roll(&mut self, odds: u32) -> bool {
        self.rng.random_ratio(1, odds.max(1))
    }

    /// New pipe with its leading edge on the right boundary
    pub fn spawn_pipe(&mut self) {
        let max_top = self.config.screen_height / 2.0 + PIPE_MIN_TOP;
        let top = self.rng.random_range(PIPE_MIN_TOP..max_top);
        self.pipes.push(Pipe::new(
            self.config.screen_width,
            self.config.pipe_width,
            top,
            self.config.pipe_gap,
        ));
        log::debug!("Spawned pipe, gap top at {top:.0}");
    }

    pub fn spawn_coin(&mut self) {
        let y = self.rng.random_range(150.0..self.config.screen_height - 200.0);
        self.coins.push(Coin::new(Vec2::new(self.config.screen_width + 50.0, y)));
    }

    pub fn spawn_hazard(&mut self) {
        let kind = HazardKind::ALL[self.rng.random_range(0..HazardKind::ALL.len())];
        let y = self.rng.random_range(100.0..self.config.screen_height - 200.0);
        self.hazards
            .push(Hazard::new(kind, Vec2::new(self.config.screen_width + 50.0, y)));
        log::debug!("Spawned {kind:?} hazard");
    }

    pub fn spawn_power_up(&mut self) {
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let y = self.rng.random_range(100.0..self.config.screen_height - 200.0);
        self.power_ups.push(PowerUp::new(
            kind,
            Vec2::new(self.config.screen_width + POWER_UP_SIZE, y),
        ));
        log::debug!("Spawned {kind:?} power-up");
    }

    pub fn spawn_decoration(&mut self) {
        let glyph = DECORATION_GLYPHS[self.rng.random_range(0..DECORATION_GLYPHS.len())];
        let y = self.rng.random_range(50.0..self.config.screen_height - 150.0);
        let speed = self.rng.random_range(2.0..5.0);
        self.decorations.push(Decoration {
            glyph: glyph.to_string(),
            pos: Vec2::new(self.config.screen_width + 50.0, y),
            speed,
        });
    }

    /// Emit a burst of particles
    pub fn burst(&mut self, kind: Burst) {
        let (count, scatter, life_ms) = kind.params();
        let origin = match kind {
            Burst::Score => self.player.pos,
            Burst::Fireworks => Vec2::new(
                self.config.screen_width / 2.0,
                self.config.screen_height / 3.0,
            ),
            Burst::Flap => self.player.pos + Vec2::new(-20.0, 10.0),
            // Usually placed with burst_here at the pickup point
            Burst::Coin | Burst::PowerUp => self.player.center(),
        };
        self.burst_at(kind, origin, count, scatter, life_ms);
    }

    /// Emit a burst of particles around a point
    pub fn burst_here(&mut self, kind: Burst, origin: Vec2) {
        let (count, scatter, life_ms) = kind.params();
        self.burst_at(kind, origin, count, scatter, life_ms);
    }

    fn burst_at(&mut self, kind: Burst, origin: Vec2, count: usize, scatter: f32, life_ms: f32) {
        for _ in 0..count {
            let (hue, saturation, angle) = match kind {
                Burst::Coin => (0.0, 1.0, self.rng.random_range(0.0..360.0)),
                // Flap puffs blow backwards in cool colours
                Burst::Flap => (
                    self.rng.random_range(180.0..240.0),
                    0.8,
                    self.rng.random_range(150.0..210.0),
                ),
                _ => (
                    self.rng.random_range(0.0..360.0),
                    1.0,
                    self.rng.random_range(0.0..360.0),
                ),
            };
            // Fireworks spread half as far vertically
            let spread = if kind == Burst::Fireworks {
                Vec2::new(scatter, scatter / 2.0)
            } else {
                Vec2::splat(scatter)
            };
            let offset = Vec2::new(
                self.rng.random_range(-spread.x..spread.x),
                self.rng.random_range(-spread.y..spread.y),
            );
            let speed: f32 = self.rng.random_range(5.0..17.0);
            let size: f32 = self.rng.random_range(3.0..11.0);
            self.particles.push(Particle {
                pos: origin + offset,
                vel: direction_deg(angle) * speed,
                hue,
                saturation,
                life_ms,
                max_life_ms: life_ms,
                size,
            });
        }
    }

    /// Rising text popup at a position
    pub fn add_text(&mut self, text: &str, pos: Vec2) {
        self.texts.push(FloatingText::new(text, pos));
    }

    /// Speech bubble beside the player
    pub fn add_bubble(&mut self, text: &str) {
        let pos = self.player.pos + Vec2::new(80.0, -50.0);
        self.bubbles.push(ChatBubble::new(text, pos));
    }

    /// Speech bubble with a random line from a message list
    pub fn add_random_bubble(&mut self, messages: &[&str]) {
        if messages.is_empty() {
            return;
        }
        let message = messages[self.rng.random_range(0..messages.len())];
        self.add_bubble(message);
    }
}
