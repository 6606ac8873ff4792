//! Collision detection between the player and every entity population
//!
//! Pure geometry only. Whether an overlap is lethal, blocked by a shield or a
//! pickup is decided by the tick.

use glam::Vec2;

use super::rect::Rect;

/// Rectangle-rectangle overlap (strict)
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Point inside a circle (strict distance threshold)
#[inline]
pub fn circle_contains(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Player box against both halves of a pipe pair
pub fn player_pipe_collision(player: &Rect, top: &Rect, bottom: &Rect) -> bool {
    aabb_overlap(player, top) || aabb_overlap(player, bottom)
}

/// Player box against a round entity, measured from the player's centre
#[inline]
pub fn player_circle_collision(player: &Rect, center: Vec2, radius: f32) -> bool {
    circle_contains(player.center(), center, radius)
}

/// Generous pickup radius for power-ups: their size plus half the player width
#[inline]
pub fn power_up_pickup_radius(size: f32, player: &Rect) -> f32 {
    size + player.width() / 2.0
}
