//! Game phase transitions: flap, game over, restart
//!
//! Playing -> GameOver on a fatal collision or leaving the screen.
//! GameOver -> Playing on an activation. Nothing else.

use glam::Vec2;

use super::spawn::Burst;
use super::state::{GameEvent, GamePhase, GameState, ModeTimers};
use crate::consts::FLAP_BUBBLE_ODDS;

impl GameState {
    /// Route an activation: flap while playing, restart after game over.
    /// Returns true when it restarted the run.
    pub fn activate(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.flap();
                false
            }
            GamePhase::GameOver => {
                self.restart();
                true
            }
        }
    }

    pub fn flap(&mut self) {
        self.player.flap(self.config.flap_velocity);
        self.burst(Burst::Flap);
        if self.roll(FLAP_BUBBLE_ODDS) {
            self.add_bubble("Flap! 🪶");
        }
        self.events.push(GameEvent::Flapped);
    }

    /// End the run. Populations freeze until the next restart.
    pub fn game_over(&mut self, cause: &str, at: Vec2) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.add_text(cause, at);
        self.add_text("GAME OVER! 😵", self.screen_center());
        self.events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
        });
        log::info!(
            "Game over: score {} (level {}, {} coins), high score {}",
            self.score,
            self.level,
            self.coins_collected,
            self.high_score
        );
    }

    /// Fresh run: everything but the high score is reset and one pipe is seeded
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.coins_collected = 0;
        self.level = 1;
        self.speed = self.difficulty.speed_for(1);
        self.player.reset();

        self.pipes.clear();
        self.hazards.clear();
        self.coins.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.texts.clear();
        self.bubbles.clear();
        self.decorations.clear();
        self.modes = ModeTimers::default();

        self.coin_timer_ms = self.next_coin_interval();
        self.spawn_pipe();
        self.events.push(GameEvent::Restarted);
        log::info!("Restarted (high score {})", self.high_score);
    }
}
