//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the state
//! - Populations updated in insertion order
//! - Removal is collect-then-compact, never during iteration
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod phase;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    aabb_overlap, circle_contains, player_circle_collision, player_pipe_collision,
    power_up_pickup_radius,
};
pub use difficulty::{Difficulty, level_for, speed_for};
pub use rect::Rect;
pub use spawn::{Burst, CHEER_MESSAGES, DECORATION_GLYPHS, LEVEL_UP_MESSAGES};
pub use state::{
    ActiveEffects, ChatBubble, Coin, Decoration, FloatingText, GameEvent, GamePhase, GameState,
    Hazard, HazardKind, Particle, Pipe, Player, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
