//! High score persistence
//!
//! The simulation only ever holds the high score in memory; a [`Store`] loads
//! it when the loop starts and saves it after each game over.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Persistent high score storage
pub trait Store {
    fn load_high_score(&mut self) -> Result<u32, StoreError>;
    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError>;
}

/// In-memory store (tests, demo runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub high_score: u32,
    /// Number of successful saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }
}

impl Store for MemoryStore {
    fn load_high_score(&mut self) -> Result<u32, StoreError> {
        Ok(self.high_score)
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        self.high_score = high_score;
        self.saves += 1;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

/// JSON file store. A missing file reads as a high score of zero.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load_high_score(&mut self) -> Result<u32, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded high score {}", record.high_score);
        Ok(record.high_score)
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })?;
        fs::write(&self.path, json)?;
        log::debug!("High score {} saved to {}", high_score, self.path.display());
        Ok(())
    }
}
