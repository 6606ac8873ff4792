//! Funny Flap headless runner
//!
//! Flies the game on autopilot for a number of frames (or wall-clock seconds
//! with `--realtime`) and reports how the run went.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use funny_flap::GameConfig;
use funny_flap::consts::FRAME_MS;
use funny_flap::platform::{GameLoop, JsonFileStore, LoopHost, MemoryStore, ScriptedInput, Store};
use funny_flap::renderer::FrameRecorder;

#[derive(Parser, Debug)]
#[command(name = "funny-flap")]
#[command(about = "Headless autopilot run of the flapping arcade simulation")]
struct Args {
    /// RNG seed for the run
    #[arg(default_value_t = 42)]
    seed: u64,
    /// Frames to simulate at a fixed 60 Hz step
    #[arg(default_value_t = 3600)]
    frames: u64,
    /// JSON game config; every field is optional
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON high-score file (in-memory when omitted)
    #[arg(long)]
    store: Option<PathBuf>,
    /// Run on the threaded loop host for this many wall-clock seconds instead
    #[arg(long)]
    realtime: Option<f32>,
    /// Print the final game state as JSON
    #[arg(long)]
    snapshot: bool,
}

fn run<S: Store + Send + 'static>(args: &Args, config: GameConfig, store: S) -> Result<()> {
    let game = GameLoop::new(
        config,
        args.seed,
        FrameRecorder::default(),
        ScriptedInput::default(),
        store,
    )?
    .with_autopilot(true);

    let game = match args.realtime {
        Some(secs) => {
            let mut host = LoopHost::new(game);
            host.on_activate();
            std::thread::sleep(Duration::from_secs_f32(secs.max(0.0)));
            host.into_game().context("game loop thread was lost")?
        }
        None => {
            let mut game = game;
            for _ in 0..args.frames {
                game.frame(FRAME_MS);
            }
            game
        }
    };

    let state = game.state();
    log::info!(
        "Ran {} frames: score {}, high score {}, level {}, coins {}, {} draw commands",
        game.renderer().frames,
        state.score,
        state.high_score,
        state.level,
        state.coins_collected,
        game.renderer().commands
    );
    println!(
        "frames={} score={} high_score={} level={} coins={} phase={:?}",
        state.frame, state.score, state.high_score, state.level, state.coins_collected, state.phase
    );

    if args.snapshot {
        let json = serde_json::to_string_pretty(state).context("failed to serialize snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::info!("Funny Flap (headless) starting with seed {}", args.seed);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    match &args.store {
        Some(path) => run(&args, config, JsonFileStore::new(path)),
        None => run(&args, config, MemoryStore::default()),
    }
}
