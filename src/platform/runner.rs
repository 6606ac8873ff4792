//! Game loop host
//!
//! [`GameLoop`] runs one frame at a time: drain input, tick, persist, build
//! draw commands, present. [`LoopHost`] drives it on a dedicated thread at
//! ~60 Hz and hands it back on suspend so a session can resume.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::consts::FRAME_MS;
use crate::error::ConfigError;
use crate::platform::input::InputSource;
use crate::platform::storage::Store;
use crate::renderer::{Renderer, build_frame};
use crate::sim::{GamePhase, GameState, TickInput, tick};

/// Longest frame the simulation will integrate (ms); longer stalls are clamped
pub const MAX_FRAME_MS: f32 = 100.0;

const FRAME_DURATION: Duration = Duration::from_micros(16_667);

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    clock_ms: f64,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            clock_ms: 0.0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms as f64;
        self.frame_times[self.frame_index] = self.clock_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample sits at the next write position, 59 intervals back
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = self.clock_ms - oldest;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// One game session wired to its collaborators
pub struct GameLoop<R, I, S> {
    state: GameState,
    renderer: R,
    input: I,
    store: S,
    autopilot: bool,
    fps: FpsCounter,
    last_phase: GamePhase,
}

impl<R: Renderer, I: InputSource, S: Store> GameLoop<R, I, S> {
    /// Build a session, seeding the high score from the store.
    /// A failing store is logged and treated as empty.
    pub fn new(
        config: GameConfig,
        seed: u64,
        renderer: R,
        input: I,
        mut store: S,
    ) -> Result<Self, ConfigError> {
        let high_score = store.load_high_score().unwrap_or_else(|err| {
            log::warn!("Could not load high score: {err}");
            0
        });
        let state = GameState::new(config, seed)?.with_high_score(high_score);
        log::info!("Game loop ready (seed {seed}, high score {high_score})");

        Ok(Self {
            state,
            renderer,
            input,
            store,
            autopilot: false,
            fps: FpsCounter::default(),
            last_phase: GamePhase::Playing,
        })
    }

    /// Let the game fly itself (demo mode)
    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    /// Run one frame with the measured time since the previous one
    pub fn frame(&mut self, elapsed_ms: f32) {
        let dt_ms = elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let input = TickInput {
            activations: self.input.poll_activations(),
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input, dt_ms);

        // Persist on entering game over
        let phase = self.state.phase;
        if phase != self.last_phase {
            if phase == GamePhase::GameOver {
                self.save_high_score();
            }
            self.last_phase = phase;
        }

        self.fps.record(dt_ms);
        let commands = build_frame(&self.state, self.fps.fps());
        self.renderer.present(&commands);
    }

    fn save_high_score(&mut self) {
        if let Err(err) = self.store.save_high_score(self.state.high_score) {
            log::warn!("Could not save high score: {err}");
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }
}

/// Owns a [`GameLoop`] and runs it on its own thread while active
pub struct LoopHost<R, I, S> {
    game: Option<GameLoop<R, I, S>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<GameLoop<R, I, S>>>,
}

impl<R, I, S> LoopHost<R, I, S>
where
    R: Renderer + Send + 'static,
    I: InputSource + Send + 'static,
    S: Store + Send + 'static,
{
    pub fn new(game: GameLoop<R, I, S>) -> Self {
        Self {
            game: Some(game),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// App became visible: start the loop thread
    pub fn on_activate(&mut self) {
        log::info!("Loop host activated");
        self.start();
    }

    /// App left the foreground: stop after the current frame and keep the state
    pub fn on_suspend(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::Release);
        match handle.join() {
            Ok(game) => {
                log::info!("Loop suspended at frame {}", game.state().frame);
                self.game = Some(game);
            }
            Err(_) => log::error!("Game loop thread panicked; session lost"),
        }
    }

    /// Continue a suspended session where it left off
    pub fn on_resume_session(&mut self) {
        log::info!("Resuming session");
        self.start();
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// The session, while suspended
    pub fn game(&self) -> Option<&GameLoop<R, I, S>> {
        self.game.as_ref()
    }

    /// Stop the loop if needed and take the session back
    pub fn into_game(mut self) -> Option<GameLoop<R, I, S>> {
        self.on_suspend();
        self.game.take()
    }

    fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(mut game) = self.game.take() else {
            log::warn!("No session to run");
            return;
        };

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        self.handle = Some(thread::spawn(move || {
            let mut last: Option<Instant> = None;
            while running.load(Ordering::Acquire) {
                let now = Instant::now();
                let dt_ms = last.map_or(FRAME_MS, |prev| {
                    now.duration_since(prev).as_secs_f32() * 1000.0
                });
                last = Some(now);

                game.frame(dt_ms);

                if let Some(rest) = FRAME_DURATION.checked_sub(now.elapsed()) {
                    thread::sleep(rest);
                }
            }
            game
        }));
    }
}

impl<R, I, S> Drop for LoopHost<R, I, S> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::{ScriptedInput, channel};
    use crate::platform::storage::MemoryStore;
    use crate::renderer::{DrawCommand, FrameRecorder, Layer};

    fn game(
        store: MemoryStore,
        input: ScriptedInput,
    ) -> GameLoop<FrameRecorder, ScriptedInput, MemoryStore> {
        GameLoop::new(GameConfig::default(), 7, FrameRecorder::default(), input, store).unwrap()
    }

    #[test]
    fn test_fps_counter_steady_rate() {
        let mut fps = FpsCounter::default();
        for _ in 0..120 {
            fps.record(1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);

        for _ in 0..120 {
            fps.record(1000.0 / 30.0);
        }
        assert_eq!(fps.fps(), 30);
    }

    #[test]
    fn test_loads_high_score_from_store() {
        let game = game(MemoryStore::with_high_score(17), ScriptedInput::default());
        assert_eq!(game.state().high_score, 17);
    }

    #[test]
    fn test_frame_presents_once() {
        let mut game = game(MemoryStore::default(), ScriptedInput::new([1]));
        game.frame(FRAME_MS);
        assert_eq!(game.renderer().frames, 1);
        assert_eq!(game.state().frame, 1);
        assert!(matches!(
            game.renderer().last.first(),
            Some(DrawCommand::BeginLayer(Layer::Background))
        ));
    }

    #[test]
    fn test_saves_once_per_game_over() {
        // No input: the player drops to the ground
        let mut game = game(MemoryStore::with_high_score(3), ScriptedInput::default());
        for _ in 0..200 {
            game.frame(FRAME_MS);
        }
        assert!(game.state().is_game_over());
        assert_eq!(game.store().saves, 1);
        assert_eq!(game.store().high_score, 3);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut game = game(MemoryStore::default(), ScriptedInput::default());
        game.frame(5_000.0);
        assert_eq!(game.state().time_ms, MAX_FRAME_MS);
    }

    #[test]
    fn test_host_suspend_and_resume_keeps_session() {
        let (tx, input) = channel();
        let game = GameLoop::new(
            GameConfig::default(),
            3,
            FrameRecorder::default(),
            input,
            MemoryStore::default(),
        )
        .unwrap()
        .with_autopilot(true);

        let mut host = LoopHost::new(game);
        host.on_activate();
        assert!(host.is_running());
        assert!(host.game().is_none());
        assert!(tx.activate());
        thread::sleep(Duration::from_millis(60));

        host.on_suspend();
        assert!(!host.is_running());
        let first = host.game().map(|g| g.renderer().frames).unwrap_or(0);
        assert!(first > 0);

        host.on_resume_session();
        thread::sleep(Duration::from_millis(60));
        let game = host.into_game().unwrap();
        assert!(game.renderer().frames > first);
    }
}
