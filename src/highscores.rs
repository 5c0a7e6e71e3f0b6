//! Best score tracking
//!
//! A single integer, persisted as plain text. Storage failures never reach
//! the game: reads fall back to 0 and writes are dropped with a warning.

use std::cell::Cell;
use std::path::PathBuf;

use crate::persistence::{self, PersistenceError};

/// Default file name inside ~/.flappy/
pub const HIGH_SCORE_FILE: &str = "high_score.txt";

/// Where the best score lives
pub trait HighScoreStore {
    /// Current best, 0 if absent or unreadable
    fn read(&self) -> u64;
    /// Replace the stored best
    fn write(&self, score: u64);
}

/// Compare a finished round against the store.
///
/// Returns `(previous_best, new_best)`; the store is written only when the
/// score is strictly greater than what it held.
pub fn record<S: HighScoreStore + ?Sized>(store: &S, score: u64) -> (u64, bool) {
    let previous = store.read();
    let new_best = score > previous;
    if new_best {
        store.write(score);
        log::info!("New high score: {} (was {})", score, previous);
    }
    (previous, new_best)
}

/// Plain-text integer file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under ~/.flappy/ with the given file name
    pub fn in_data_dir(filename: &str) -> Result<Self, PersistenceError> {
        Ok(Self::new(persistence::data_path(filename)?))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn try_read(&self) -> Result<u64, PersistenceError> {
        let text = persistence::read_text(&self.path)?;
        text.parse().map_err(|_| PersistenceError::Parse {
            path: self.path.clone(),
            value: text,
        })
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn read(&self) -> u64 {
        match self.try_read() {
            Ok(score) => score,
            Err(e) if e.is_not_found() => 0,
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                0
            }
        }
    }

    fn write(&self, score: u64) {
        if let Err(e) = persistence::write_text(&self.path, &score.to_string()) {
            log::warn!("Could not save high score: {}", e);
        }
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    best: Cell<u64>,
    writes: Cell<u32>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self {
            best: Cell::new(best),
            writes: Cell::new(0),
        }
    }

    /// Number of `write` calls so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn read(&self) -> u64 {
        self.best.get()
    }

    fn write(&self, score: u64) {
        self.best.set(score);
        self.writes.set(self.writes.get() + 1);
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &S {
    fn read(&self) -> u64 {
        (**self).read()
    }

    fn write(&self, score: u64) {
        (**self).write(score)
    }
}
