//! Per-frame simulation tick
//!
//! Core game loop that advances every population one frame. Speeds are in
//! units per frame; timers count down by the measured frame time.

use std::ops::ControlFlow;

use glam::Vec2;

use super::collision::{player_circle_collision, player_pipe_collision, power_up_pickup_radius};
use super::spawn::{Burst, CHEER_MESSAGES, LEVEL_UP_MESSAGES};
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Press-down activations captured since the previous tick
    pub activations: u32,
    /// Idle/demo mode - the game flies itself
    pub autopilot: bool,
}

impl TickInput {
    pub fn tap() -> Self {
        Self {
            activations: 1,
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.events.clear();

    let mut activations = input.activations;
    if input.autopilot {
        activations += autopilot(state);
    }
    for _ in 0..activations {
        // A restart consumes the rest of the frame
        if state.activate() {
            return;
        }
    }

    // Frozen until restarted
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.frame += 1;
    state.time_ms += dt_ms;

    update_difficulty(state);

    state.player.update(state.config.gravity, dt_ms);
    let player_y = state.player.pos.y;
    if player_y < 0.0 || player_y > state.config.ground_y() {
        let at = state.player.pos;
        state.game_over("CRASH! 💥", at);
        return;
    }

    if update_pipes(state).is_break() {
        return;
    }
    maintain_pipes(state);

    update_coins(state, dt_ms);
    if update_hazards(state, dt_ms).is_break() {
        return;
    }
    update_power_ups(state, dt_ms);

    update_transients(state, dt_ms);

    state.modes.tick(dt_ms);
}

/// Recompute level and speed from the score; announce level transitions
fn update_difficulty(state: &mut GameState) {
    let level = state.difficulty.level_for(state.score);
    if level > state.level {
        state.level = level;
        state.add_random_bubble(&LEVEL_UP_MESSAGES);
        let center = state.screen_center();
        state.add_text("SPEED UP! ⚡", center);
        state.modes.level_banner_ms = LEVEL_BANNER_MS;
        state.events.push(GameEvent::LevelUp {
            level,
            speed: state.difficulty.speed_for(level),
        });
        log::info!(
            "Level {} at score {}, speed {:.1}",
            level,
            state.score,
            state.difficulty.speed_for(level)
        );
    }
    state.speed = state.difficulty.speed_for(state.level);
}

/// Move pipes, test the player against them and score passed pipes.
/// Side effects apply only if nothing in this pass was fatal.
fn update_pipes(state: &mut GameState) -> ControlFlow<()> {
    let speed = state.scroll_speed();
    let player_box = state.player.bounds();
    let player_x = state.player.pos.x;
    let shield = state.player.effects.shield;
    let screen_height = state.config.screen_height;

    let mut blocked: Vec<Vec2> = Vec::new();
    let mut passed: Vec<usize> = Vec::new();
    let mut fatal = None;

    for (index, pipe) in state.pipes.iter_mut().enumerate() {
        pipe.advance(speed);

        if player_pipe_collision(&player_box, &pipe.top_rect(), &pipe.bottom_rect(screen_height)) {
            let at = Vec2::new(pipe.x, pipe.gap_center());
            if !shield {
                fatal = Some(at);
                break;
            }
            if !pipe.shield_blocked {
                pipe.shield_blocked = true;
                blocked.push(at);
            }
        }

        if !pipe.scored && pipe.trailing_edge() < player_x {
            passed.push(index);
        }
    }

    if let Some(at) = fatal {
        state.game_over("BONK! 💥", at);
        return ControlFlow::Break(());
    }

    for at in blocked {
        state.add_text("SHIELD! 🛡️", at);
        state.events.push(GameEvent::ShieldBlocked);
    }
    for index in passed {
        state.pipes[index].scored = true;
        pipe_passed(state);
    }

    state.pipes.retain(|pipe| !pipe.is_offscreen());
    ControlFlow::Continue(())
}

/// Score bookkeeping and milestone celebrations
fn pipe_passed(state: &mut GameState) {
    state.score += 1;
    state.burst(Burst::Score);
    state.add_random_bubble(&CHEER_MESSAGES);
    state.events.push(GameEvent::Scored { score: state.score });

    if state.score % CELEBRATION_EVERY == 0 {
        state.modes.celebration_ms = state.config.celebration_duration_ms;
        state.burst(Burst::Fireworks);
        let at = Vec2::new(
            state.config.screen_width / 2.0,
            state.config.screen_height / 3.0,
        );
        state.add_text("DISCO TIME! 🕺", at);
        state.events.push(GameEvent::CelebrationStarted);
    } else if state.score % RAINBOW_EVERY == 0 {
        state.modes.rainbow_ms = state.config.rainbow_duration_ms;
        state.burst(Burst::Fireworks);
        state.events.push(GameEvent::RainbowStarted);
    }

    if state.roll(state.config.power_up_odds) {
        state.spawn_power_up();
    }
}

/// Keep pipes coming at a fixed spacing
fn maintain_pipes(state: &mut GameState) {
    let threshold = state.config.screen_width - state.config.pipe_spacing;
    let needs_pipe = state.pipes.last().is_none_or(|last| last.x < threshold);
    if needs_pipe {
        state.spawn_pipe();
    }
}

fn update_coins(state: &mut GameState, dt_ms: f32) {
    state.coin_timer_ms -= dt_ms;
    if state.coin_timer_ms <= 0.0 {
        state.spawn_coin();
        state.coin_timer_ms = state.next_coin_interval();
    }

    let speed = state.scroll_speed();
    let player_box = state.player.bounds();
    let mut picked: Vec<Vec2> = Vec::new();

    state.coins.retain_mut(|coin| {
        coin.advance(speed, dt_ms);
        if player_circle_collision(&player_box, coin.pos, COIN_RADIUS) {
            picked.push(coin.pos);
            false
        } else {
            !coin.is_offscreen()
        }
    });

    for pos in picked {
        state.coins_collected += 1;
        state.burst_here(Burst::Coin, pos);
        state.add_text("BLING! 💰", pos);
        state.events.push(GameEvent::CoinCollected {
            total: state.coins_collected,
        });
    }
}

fn update_hazards(state: &mut GameState, dt_ms: f32) -> ControlFlow<()> {
    if state.level >= state.config.hazard_min_level && state.roll(state.config.hazard_odds) {
        state.spawn_hazard();
    }

    let speed = state.scroll_speed();
    let player_box = state.player.bounds();
    let shield = state.player.effects.shield;
    let mut blocked: Vec<Vec2> = Vec::new();
    let mut fatal = None;

    for hazard in &mut state.hazards {
        hazard.advance(speed, dt_ms);
        if player_circle_collision(&player_box, hazard.pos, HAZARD_RADIUS) {
            if !shield {
                fatal = Some(hazard.pos);
                break;
            }
            if !hazard.shield_blocked {
                hazard.shield_blocked = true;
                blocked.push(hazard.pos);
            }
        }
    }

    if let Some(at) = fatal {
        state.game_over("BONK! 🤕", at);
        return ControlFlow::Break(());
    }

    for at in blocked {
        state.add_text("SHIELD! 🛡️", at);
        state.events.push(GameEvent::ShieldBlocked);
    }

    state.hazards.retain(|hazard| !hazard.is_offscreen());
    ControlFlow::Continue(())
}

fn update_power_ups(state: &mut GameState, dt_ms: f32) {
    let speed = state.scroll_speed();
    let player_box = state.player.bounds();
    let mut picked: Vec<(PowerUpKind, Vec2)> = Vec::new();

    state.power_ups.retain_mut(|power_up| {
        power_up.advance(speed, dt_ms);
        let radius = power_up_pickup_radius(power_up.size, &player_box);
        if player_circle_collision(&player_box, power_up.pos, radius) {
            picked.push((power_up.kind, power_up.pos));
            false
        } else {
            !power_up.is_offscreen()
        }
    });

    for (kind, pos) in picked {
        state.player.apply_power_up(
            kind,
            state.config.flap_velocity,
            state.config.power_up_duration_ms,
        );
        state.burst_here(Burst::PowerUp, pos);
        state.add_text("POWER! ⚡", pos);
        state.events.push(GameEvent::PowerUpCollected(kind));
        log::debug!("Picked up {kind:?}");
    }
}

/// Particles, texts, bubbles and decorations: advance and expire
fn update_transients(state: &mut GameState, dt_ms: f32) {
    state.particles.retain_mut(|particle| {
        particle.update(dt_ms);
        !particle.is_dead()
    });
    state.texts.retain_mut(|text| {
        text.update(dt_ms);
        !text.is_dead()
    });
    state.bubbles.retain_mut(|bubble| {
        bubble.update(dt_ms);
        !bubble.is_dead()
    });

    let time_ms = state.time_ms;
    state.decorations.retain_mut(|decoration| {
        decoration.update(time_ms);
        !decoration.is_offscreen()
    });
    if state.roll(state.config.decoration_odds) {
        state.spawn_decoration();
    }
}

/// Demo-mode pilot: restart after a crash, otherwise flap to stay at the
/// height of the next gap
fn autopilot(state: &GameState) -> u32 {
    if state.phase == GamePhase::GameOver {
        return 1;
    }

    let player = &state.player;
    let target = state
        .pipes
        .iter()
        .find(|pipe| pipe.trailing_edge() > player.pos.x)
        .map(|pipe| pipe.gap_center())
        .unwrap_or(state.config.ground_y() / 2.0);

    let falling = player.vel_y >= 0.0;
    // A flap lifts ~120 units, so wait until just below the gap centre
    if falling && player.center().y > target + 20.0 {
        1
    } else {
        0
    }
}
