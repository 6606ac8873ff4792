//! Platform abstraction layer
//!
//! Everything outside the simulation that a host app provides:
//! - Input events (press-down activations)
//! - High score storage
//! - The frame loop and its lifecycle (activate, suspend, resume)

pub mod input;
pub mod runner;
pub mod storage;

pub use input::{ChannelInput, InputSender, InputSource, ScriptedInput, channel};
pub use runner::{FpsCounter, GameLoop, LoopHost, MAX_FRAME_MS};
pub use storage::{HighScoreRecord, JsonFileStore, MemoryStore, Store};
