//! Render adapter
//!
//! Translates a [`GameState`] into an ordered list of [`DrawCommand`]s for an
//! external [`Renderer`]. Nothing here mutates the simulation; all animation
//! phases are derived from simulated time so frames are reproducible.

pub mod shapes;

use glam::Vec2;
use serde::Serialize;

use crate::hsv_to_rgba;
use crate::sim::{GamePhase, GameState, Rect};

/// Linear RGBA
pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
pub const MAGENTA: Color = [1.0, 0.0, 1.0, 1.0];
pub const GRAY: Color = [0.53, 0.53, 0.53, 1.0];

/// Same colour with its alpha scaled by `opacity`
#[inline]
pub fn with_opacity(color: Color, opacity: f32) -> Color {
    [color[0], color[1], color[2], color[3] * opacity.clamp(0.0, 1.0)]
}

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Layer {
    Background,
    Decorations,
    Coins,
    Hazards,
    Pipes,
    PowerUps,
    Player,
    Particles,
    Texts,
    Bubbles,
    Ground,
    Ui,
    GameOver,
}

/// A single renderer primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Everything until the next marker belongs to this layer
    BeginLayer(Layer),
    Rect {
        rect: Rect,
        color: Color,
    },
    /// Filled when `stroke` is None, otherwise an outline of that width
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        stroke: Option<f32>,
    },
    Oval {
        rect: Rect,
        color: Color,
    },
    /// Text centred horizontally on `pos.x` unless `left_aligned`
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        left_aligned: bool,
    },
    /// Rotate (degrees) and scale around a pivot until the matching pop
    PushTransform {
        pivot: Vec2,
        rotation_deg: f32,
        scale: f32,
    },
    PopTransform,
}

/// Consumer of draw commands (canvas, GPU, terminal, test recorder)
pub trait Renderer {
    fn present(&mut self, commands: &[DrawCommand]);
}

/// Headless renderer that keeps the latest frame and counts presents
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: u64,
    pub commands: u64,
    pub last: Vec<DrawCommand>,
}

impl Renderer for FrameRecorder {
    fn present(&mut self, commands: &[DrawCommand]) {
        self.frames += 1;
        self.commands += commands.len() as u64;
        self.last.clear();
        self.last.extend_from_slice(commands);
    }
}

/// Build the full frame for the current state
pub fn build_frame(state: &GameState, fps: u32) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(
        64 + state.pipes.len() * 8 + state.particles.len() + state.texts.len() * 2,
    );
    let time = state.time_ms;

    out.push(DrawCommand::BeginLayer(Layer::Background));
    background(state, &mut out);

    out.push(DrawCommand::BeginLayer(Layer::Decorations));
    out.extend(state.decorations.iter().map(shapes::decoration));

    out.push(DrawCommand::BeginLayer(Layer::Coins));
    for coin in &state.coins {
        out.extend(shapes::coin(coin));
    }

    out.push(DrawCommand::BeginLayer(Layer::Hazards));
    for hazard in &state.hazards {
        out.extend(shapes::hazard(hazard));
    }

    out.push(DrawCommand::BeginLayer(Layer::Pipes));
    let ground_y = state.config.ground_y();
    for pipe in &state.pipes {
        out.extend(shapes::pipe(pipe, ground_y, time));
    }

    out.push(DrawCommand::BeginLayer(Layer::PowerUps));
    for power_up in &state.power_ups {
        out.extend(shapes::power_up(power_up));
    }

    out.push(DrawCommand::BeginLayer(Layer::Player));
    out.extend(shapes::player(&state.player, time));

    out.push(DrawCommand::BeginLayer(Layer::Particles));
    out.extend(state.particles.iter().map(shapes::particle));

    out.push(DrawCommand::BeginLayer(Layer::Texts));
    for text in &state.texts {
        out.extend(shapes::floating_text(text, time));
    }

    out.push(DrawCommand::BeginLayer(Layer::Bubbles));
    for bubble in &state.bubbles {
        out.extend(shapes::chat_bubble(bubble));
    }

    out.push(DrawCommand::BeginLayer(Layer::Ground));
    out.push(DrawCommand::Rect {
        rect: Rect::new(0.0, ground_y, state.config.screen_width, state.config.screen_height),
        color: [0.7, 0.6, 0.5, 1.0],
    });
    out.push(DrawCommand::Rect {
        rect: Rect::new(0.0, ground_y, state.config.screen_width, ground_y + 15.0),
        color: [0.54, 0.6, 0.64, 1.0],
    });

    out.push(DrawCommand::BeginLayer(Layer::Ui));
    hud(state, fps, &mut out);

    if state.phase == GamePhase::GameOver {
        out.push(DrawCommand::BeginLayer(Layer::GameOver));
        game_over_overlay(state, &mut out);
    }

    out
}

/// Sky gradient in horizontal bands; disco and rainbow modes cycle hues
fn background(state: &GameState, out: &mut Vec<DrawCommand>) {
    const BAND: f32 = 40.0;
    const TOP: Color = [0.53, 0.81, 0.98, 1.0];
    const MID: Color = [0.68, 0.85, 0.9, 1.0];
    const BOTTOM: Color = [1.0, 0.85, 0.73, 1.0];

    let width = state.config.screen_width;
    let height = state.config.screen_height;
    let time = state.time_ms;

    let mut y = 0.0;
    while y < height {
        let color = if state.modes.celebration() {
            hsv_to_rgba(time * 0.5 + y * 2.0, 1.0, 1.0, 1.0)
        } else if state.modes.rainbow() {
            hsv_to_rgba(time * 0.04 + y * 0.5, 0.8, 1.0, 1.0)
        } else {
            let t = y / height;
            if t < 0.5 {
                lerp_color(TOP, MID, t * 2.0)
            } else {
                lerp_color(MID, BOTTOM, (t - 0.5) * 2.0)
            }
        };
        out.push(DrawCommand::Rect {
            rect: Rect::new(0.0, y, width, (y + BAND).min(height)),
            color,
        });
        y += BAND;
    }
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

fn text(text: impl Into<String>, pos: Vec2, size: f32, color: Color) -> DrawCommand {
    DrawCommand::Text {
        text: text.into(),
        pos,
        size,
        color,
        left_aligned: false,
    }
}

fn left_text(text: impl Into<String>, pos: Vec2, size: f32, color: Color) -> DrawCommand {
    DrawCommand::Text {
        text: text.into(),
        pos,
        size,
        color,
        left_aligned: true,
    }
}

fn hud(state: &GameState, fps: u32, out: &mut Vec<DrawCommand>) {
    let width = state.config.screen_width;
    let height = state.config.screen_height;

    let score = format!("Score: {}", state.score);
    out.push(left_text(score.clone(), Vec2::new(22.0, 52.0), 52.0, BLACK));
    out.push(left_text(score, Vec2::new(20.0, 50.0), 50.0, WHITE));
    out.push(left_text(
        format!("💰 {}", state.coins_collected),
        Vec2::new(20.0, 100.0),
        40.0,
        YELLOW,
    ));
    out.push(left_text(
        format!("Level: {} Speed: {:.1}", state.level, state.speed),
        Vec2::new(20.0, 140.0),
        35.0,
        shapes::speed_color(state.speed, 1.0),
    ));
    out.push(left_text(
        format!("FPS: {fps}"),
        Vec2::new(width - 100.0, 30.0),
        25.0,
        GREEN,
    ));

    let effects = &state.player.effects;
    if effects.any() {
        out.push(text("POWER UP! ⚡", Vec2::new(width / 2.0, 200.0), 40.0, MAGENTA));
        let fill = (effects.timer_ms / state.config.power_up_duration_ms).clamp(0.0, 1.0);
        out.extend(shapes::progress_bar(
            Rect::from_pos_size(Vec2::new((width - 200.0) / 2.0, 210.0), Vec2::new(200.0, 15.0)),
            fill,
            state.time_ms,
        ));
    }

    if state.modes.level_banner() {
        let opacity = state.modes.level_banner_ms / crate::consts::LEVEL_BANNER_MS;
        out.push(text(
            format!("LEVEL {}! 🚀", state.level),
            Vec2::new(width / 2.0, height / 2.0 - 100.0),
            60.0,
            with_opacity(RED, opacity),
        ));
    }
}

fn game_over_overlay(state: &GameState, out: &mut Vec<DrawCommand>) {
    let width = state.config.screen_width;
    let height = state.config.screen_height;
    let center = Vec2::new(width, height) / 2.0;

    out.push(DrawCommand::Rect {
        rect: Rect::new(0.0, 0.0, width, height),
        color: [0.0, 0.0, 0.0, 0.7],
    });
    out.push(text("GAME OVER! 💀", center + Vec2::new(2.0, -148.0), 82.0, RED));
    out.push(text("GAME OVER! 💀", center + Vec2::new(0.0, -150.0), 80.0, YELLOW));
    out.push(text(format!("Score: {}", state.score), center + Vec2::new(0.0, -50.0), 50.0, WHITE));
    out.push(text(format!("Level: {}", state.level), center, 50.0, WHITE));
    out.push(text(
        format!("Coins: {} 💰", state.coins_collected),
        center + Vec2::new(0.0, 50.0),
        50.0,
        WHITE,
    ));
    out.push(text(
        format!("High Score: {}", state.high_score),
        center + Vec2::new(0.0, 100.0),
        50.0,
        RED,
    ));
    out.push(text("Tap to restart! 🎮", center + Vec2::new(0.0, 180.0), 40.0, CYAN));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{TickInput, tick};

    fn layers(commands: &[DrawCommand]) -> Vec<Layer> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::BeginLayer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layers_in_draw_order() {
        let state = GameState::new(GameConfig::default(), 1).unwrap();
        let frame = build_frame(&state, 60);
        let order = layers(&frame);
        assert_eq!(order.first(), Some(&Layer::Background));
        assert_eq!(order.last(), Some(&Layer::Ui));
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(!order.contains(&Layer::GameOver));
    }

    #[test]
    fn test_game_over_overlay_only_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.high_score = 4;
        state.player.pos.y = state.config.ground_y() + 1.0;
        tick(&mut state, &TickInput::default(), 16.0);

        let frame = build_frame(&state, 60);
        assert_eq!(layers(&frame).last(), Some(&Layer::GameOver));
        let texts = texts(&frame);
        assert!(texts.contains(&"High Score: 4"));
        assert!(texts.contains(&"Tap to restart! 🎮"));
    }

    #[test]
    fn test_hud_shows_score_and_fps() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.score = 7;
        state.coins_collected = 2;
        let frame = build_frame(&state, 58);
        let texts = texts(&frame);
        assert!(texts.contains(&"Score: 7"));
        assert!(texts.contains(&"💰 2"));
        assert!(texts.contains(&"Level: 1 Speed: 6.0"));
        assert!(texts.contains(&"FPS: 58"));
        assert!(!texts.contains(&"POWER UP! ⚡"));
    }

    #[test]
    fn test_power_up_bar_while_effect_active() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.player.effects.shield = true;
        state.player.effects.timer_ms = 1500.0;
        let frame = build_frame(&state, 60);
        assert!(texts(&frame).contains(&"POWER UP! ⚡"));
    }

    #[test]
    fn test_level_banner_fades() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.level = 2;
        state.modes.level_banner_ms = 1500.0;
        let frame = build_frame(&state, 60);
        let banner = frame.iter().find_map(|c| match c {
            DrawCommand::Text { text, color, .. } if text == "LEVEL 2! 🚀" => Some(*color),
            _ => None,
        });
        let color = banner.expect("banner drawn");
        assert!((color[3] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_build_frame_is_pure() {
        let mut state = GameState::new(GameConfig::default(), 3).unwrap();
        for _ in 0..120 {
            tick(
                &mut state,
                &TickInput {
                    autopilot: true,
                    ..Default::default()
                },
                16.0,
            );
        }
        assert_eq!(build_frame(&state, 60), build_frame(&state, 60));
    }
}
