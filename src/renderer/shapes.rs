//! Shape generation for game entities

use glam::Vec2;

use super::{BLACK, Color, DrawCommand, RED, WHITE, YELLOW, with_opacity};
use crate::consts::{BASE_SPEED, SPEED_CAP};
use crate::hsv_to_rgba;
use crate::sim::{
    ChatBubble, Coin, Decoration, FloatingText, Hazard, HazardKind, Particle, Pipe, Player,
    PowerUp, PowerUpKind, Rect,
};

/// Interpolate colour based on scroll speed (slow=blue, medium=green, fast=red/orange)
pub fn speed_color(speed: f32, alpha: f32) -> Color {
    let t = ((speed - BASE_SPEED) / (SPEED_CAP - BASE_SPEED)).clamp(0.0, 1.0);

    // Color gradient: blue (slow) -> cyan -> green -> yellow -> orange -> red (fast)
    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, alpha]
}

fn filled(center: Vec2, radius: f32, color: Color) -> DrawCommand {
    DrawCommand::Circle {
        center,
        radius,
        color,
        stroke: None,
    }
}

fn centered_text(text: &str, pos: Vec2, size: f32, color: Color) -> DrawCommand {
    DrawCommand::Text {
        text: text.to_string(),
        pos,
        size,
        color,
        left_aligned: false,
    }
}

/// Rainbow body rotated with the velocity, plus shield rings and boost glow
pub fn player(player: &Player, time_ms: f32) -> Vec<DrawCommand> {
    let bounds = player.bounds();
    let center = player.center();
    let (x, y) = (bounds.min.x, bounds.min.y);
    let (w, h) = (bounds.width(), bounds.height());
    let hue = time_ms * 0.02;
    let wing = (time_ms * 0.005).sin() * 5.0;

    let mut out = vec![
        DrawCommand::PushTransform {
            pivot: center,
            rotation_deg: player.rotation,
            scale: 1.0,
        },
        DrawCommand::Oval {
            rect: bounds,
            color: hsv_to_rgba(hue, 0.8, 1.0, 1.0),
        },
        DrawCommand::Oval {
            rect: Rect::new(x + 5.0, y + 5.0, x + w - 5.0, y + h - 5.0),
            color: hsv_to_rgba(hue + 60.0, 0.9, 0.9, 1.0),
        },
        DrawCommand::Oval {
            rect: Rect::new(x + 10.0, y + 10.0 + wing, x + w - 15.0, y + h - 10.0 + wing),
            color: hsv_to_rgba(hue + 120.0, 0.7, 0.8, 1.0),
        },
        // Eye
        filled(Vec2::new(x + w * 0.7, y + h * 0.3), 8.0, WHITE),
        filled(Vec2::new(x + w * 0.72, y + h * 0.3), 4.0, BLACK),
        // Beak
        filled(Vec2::new(x + w + 7.0, y + h * 0.5), 8.0, [1.0, 0.55, 0.0, 1.0]),
        DrawCommand::PopTransform,
    ];

    if player.effects.shield {
        for i in 0..4 {
            let ring_hue = time_ms * 0.1 + i as f32 * 90.0;
            let alpha = (120.0 - i as f32 * 25.0) / 255.0;
            out.push(DrawCommand::Circle {
                center,
                radius: w + i as f32 * 8.0,
                color: hsv_to_rgba(ring_hue, 1.0, 1.0, alpha),
                stroke: Some(4.0),
            });
        }
    }
    if player.effects.boost {
        out.push(DrawCommand::Oval {
            rect: Rect::new(x - 10.0, y - 5.0, x + w + 10.0, y + h + 5.0),
            color: with_opacity(YELLOW, 0.6),
        });
    }

    out
}

/// Striped pipe pair with caps; the bottom pipe stops at the ground
pub fn pipe(pipe: &Pipe, ground_y: f32, time_ms: f32) -> Vec<DrawCommand> {
    let hue = time_ms * 0.005 + pipe.x * 0.1;
    let body = hsv_to_rgba(hue, 0.6, 0.8, 1.0);
    let cap = hsv_to_rgba(hue, 0.8, 1.0, 1.0);
    let stripe = hsv_to_rgba(hue + 180.0, 0.7, 0.6, 1.0);
    let (left, right) = (pipe.x, pipe.trailing_edge());

    let mut out = vec![
        DrawCommand::Rect {
            rect: Rect::new(left, 0.0, right, pipe.top_height),
            color: body,
        },
        DrawCommand::Rect {
            rect: Rect::new(left - 10.0, pipe.top_height - 30.0, right + 10.0, pipe.top_height),
            color: cap,
        },
        DrawCommand::Rect {
            rect: Rect::new(left, pipe.bottom_y(), right, ground_y),
            color: body,
        },
        DrawCommand::Rect {
            rect: Rect::new(left - 10.0, pipe.bottom_y(), right + 10.0, pipe.bottom_y() + 30.0),
            color: cap,
        },
    ];

    let mut y = 0.0;
    while y < pipe.top_height - 30.0 {
        out.push(DrawCommand::Rect {
            rect: Rect::new(left, y, right, y + 10.0),
            color: stripe,
        });
        y += 40.0;
    }
    let mut y = pipe.bottom_y() + 40.0;
    while y < ground_y {
        out.push(DrawCommand::Rect {
            rect: Rect::new(left, y, right, (y + 10.0).min(ground_y)),
            color: stripe,
        });
        y += 40.0;
    }

    out
}

/// Spinning, pulsing gold coin
pub fn coin(coin: &Coin) -> Vec<DrawCommand> {
    let gold = [1.0, 0.84, 0.0, 1.0];
    vec![
        DrawCommand::PushTransform {
            pivot: coin.pos,
            rotation_deg: (coin.age_ms * 0.01).to_degrees(),
            scale: 1.0 + (coin.age_ms * 0.008).sin() * 0.2,
        },
        filled(coin.pos, 25.0, gold),
        filled(coin.pos, 20.0, YELLOW),
        filled(coin.pos, 15.0, gold),
        filled(coin.pos - Vec2::splat(8.0), 8.0, with_opacity(WHITE, 0.6)),
        DrawCommand::PopTransform,
    ]
}

pub fn hazard(hazard: &Hazard) -> Vec<DrawCommand> {
    let pos = hazard.pos;
    match hazard.kind {
        HazardKind::Blade => {
            let arm = Rect::new(pos.x - 30.0, pos.y - 5.0, pos.x + 30.0, pos.y + 5.0);
            let mut out = Vec::with_capacity(4);
            for i in 0..2 {
                out.push(DrawCommand::PushTransform {
                    pivot: pos,
                    rotation_deg: hazard.spin() + i as f32 * 90.0,
                    scale: 1.0,
                });
                out.push(DrawCommand::Rect { rect: arm, color: RED });
                out.push(DrawCommand::PopTransform);
            }
            out
        }
        HazardKind::Bouncer => vec![
            filled(pos, 25.0, hsv_to_rgba(hazard.age_ms * 0.1, 1.0, 1.0, 1.0)),
            filled(pos - Vec2::splat(8.0), 8.0, WHITE),
        ],
        HazardKind::Laser => vec![
            DrawCommand::Rect {
                rect: Rect::new(pos.x - 10.0, pos.y - 50.0, pos.x + 10.0, pos.y + 50.0),
                color: with_opacity(RED, 0.8),
            },
            DrawCommand::Rect {
                rect: Rect::new(pos.x - 5.0, pos.y - 50.0, pos.x + 5.0, pos.y + 50.0),
                color: with_opacity(YELLOW, 0.8),
            },
        ],
    }
}

/// Concentric pulsing circles, coloured by kind
pub fn power_up(power_up: &PowerUp) -> Vec<DrawCommand> {
    let size = power_up.size * power_up.pulse();
    let rings: [(f32, Color); 3] = match power_up.kind {
        PowerUpKind::Shield => [
            (1.0, [0.0, 1.0, 1.0, 1.0]),
            (0.7, WHITE),
            (0.4, [0.0, 0.0, 1.0, 1.0]),
        ],
        PowerUpKind::Boost => [(1.0, RED), (0.6, YELLOW), (0.3, WHITE)],
        PowerUpKind::SlowTime => [
            (1.0, [0.5, 0.0, 0.5, 1.0]),
            (0.7, [1.0, 0.0, 1.0, 1.0]),
            (0.4, WHITE),
        ],
    };
    rings
        .iter()
        .map(|&(scale, color)| filled(power_up.pos, size * scale, color))
        .collect()
}

pub fn particle(particle: &Particle) -> DrawCommand {
    filled(
        particle.pos,
        particle.size,
        hsv_to_rgba(particle.hue, particle.saturation, 1.0, particle.opacity()),
    )
}

/// Shadowed rainbow popup
pub fn floating_text(text: &FloatingText, time_ms: f32) -> [DrawCommand; 2] {
    let opacity = text.opacity();
    [
        centered_text(
            &text.text,
            text.pos + Vec2::splat(2.0),
            50.0,
            with_opacity(BLACK, 0.4 * opacity),
        ),
        centered_text(
            &text.text,
            text.pos,
            50.0,
            hsv_to_rgba(time_ms * 0.1, 1.0, 1.0, opacity),
        ),
    ]
}

/// White box with a dark border and the message inside
pub fn chat_bubble(bubble: &ChatBubble) -> [DrawCommand; 3] {
    let opacity = bubble.opacity();
    let pos = bubble.pos;
    let rect = Rect::new(pos.x - 50.0, pos.y - 20.0, pos.x + 50.0, pos.y + 20.0);
    [
        DrawCommand::Rect {
            rect,
            color: with_opacity(WHITE, 0.8 * opacity),
        },
        DrawCommand::Rect {
            rect: Rect::new(rect.min.x, rect.max.y - 3.0, rect.max.x, rect.max.y),
            color: with_opacity(BLACK, 0.6 * opacity),
        },
        centered_text(
            &bubble.text,
            pos + Vec2::new(0.0, 8.0),
            30.0,
            with_opacity(BLACK, opacity),
        ),
    ]
}

pub fn decoration(decoration: &Decoration) -> DrawCommand {
    centered_text(
        &decoration.glyph,
        decoration.pos + Vec2::ONE,
        40.0,
        with_opacity(WHITE, 0.8),
    )
}

/// Grey track filled with rainbow segments up to `fill` (0..=1)
pub fn progress_bar(track: Rect, fill: f32, time_ms: f32) -> Vec<DrawCommand> {
    const SEGMENT: f32 = 5.0;
    let mut out = vec![DrawCommand::Rect {
        rect: track,
        color: super::GRAY,
    }];

    let fill_width = track.width() * fill.clamp(0.0, 1.0);
    let mut offset = 0.0;
    while offset < fill_width {
        let right = (offset + SEGMENT).min(fill_width);
        out.push(DrawCommand::Rect {
            rect: Rect::new(
                track.min.x + offset,
                track.min.y,
                track.min.x + right,
                track.max.y,
            ),
            color: hsv_to_rgba(time_ms * 0.01 + offset * 10.0, 1.0, 1.0, 1.0),
        });
        offset += SEGMENT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn transforms_balanced(commands: &[DrawCommand]) -> bool {
        let mut depth = 0i32;
        for command in commands {
            match command {
                DrawCommand::PushTransform { .. } => depth += 1,
                DrawCommand::PopTransform => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn test_speed_color_endpoints() {
        let slow = speed_color(BASE_SPEED, 1.0);
        assert_eq!(slow, [0.2, 0.4, 1.0, 1.0]);
        let fast = speed_color(SPEED_CAP, 0.5);
        assert!((fast[0] - 1.0).abs() < 1e-5);
        assert!((fast[1] - 0.3).abs() < 1e-5);
        assert_eq!(fast[3], 0.5);
    }

    #[test]
    fn test_player_rotation_and_effects() {
        let mut player = Player::new(&GameConfig::default());
        player.rotation = 45.0;
        let plain = super::player(&player, 0.0);
        assert!(transforms_balanced(&plain));
        assert!(matches!(
            plain[0],
            DrawCommand::PushTransform { rotation_deg, .. } if rotation_deg == 45.0
        ));

        player.apply_power_up(PowerUpKind::Shield, -15.0, 3000.0);
        let shielded = super::player(&player, 0.0);
        let rings = shielded
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { stroke: Some(_), .. }))
            .count();
        assert_eq!(rings, 4);
    }

    #[test]
    fn test_pipe_stops_at_ground() {
        let pipe = Pipe::new(100.0, 120.0, 200.0, 300.0);
        let commands = super::pipe(&pipe, 1100.0, 0.0);
        for command in &commands {
            if let DrawCommand::Rect { rect, .. } = command {
                assert!(rect.max.y <= 1100.0);
            }
        }
    }

    #[test]
    fn test_entity_transforms_balanced() {
        assert!(transforms_balanced(&coin(&Coin::new(Vec2::new(10.0, 10.0)))));
        for kind in HazardKind::ALL {
            let shapes = hazard(&Hazard::new(kind, Vec2::new(50.0, 50.0)));
            assert!(!shapes.is_empty());
            assert!(transforms_balanced(&shapes));
        }
    }

    #[test]
    fn test_progress_bar_fill() {
        let track = Rect::new(0.0, 0.0, 200.0, 15.0);
        assert_eq!(progress_bar(track, 0.0, 0.0).len(), 1);
        // 100 units in 5-unit segments
        assert_eq!(progress_bar(track, 0.5, 0.0).len(), 21);
    }

    #[test]
    fn test_fading_popups() {
        let mut text = FloatingText::new("BONK! 💥", Vec2::ZERO);
        text.life_ms = text.max_life_ms / 4.0;
        let [shadow, main] = floating_text(&text, 0.0);
        match (shadow, main) {
            (DrawCommand::Text { color: s, .. }, DrawCommand::Text { color: m, .. }) => {
                assert!((m[3] - 0.25).abs() < 1e-5);
                assert!((s[3] - 0.1).abs() < 1e-5);
            }
            _ => panic!("expected text commands"),
        }
    }
}
