//! Save file helpers for ~/.flappy/
//!
//! Everything here is best-effort: callers decide whether a failure matters.
//! Settings and the high score are the only things ever persisted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Directory name under the home directory
pub const DATA_DIR_NAME: &str = ".flappy";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed value in {path}: {value:?}")]
    Parse { path: PathBuf, value: String },
}

impl PersistenceError {
    /// True when the file simply doesn't exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Get the ~/.flappy/ directory path, creating it if needed
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let dir = dirs::home_dir()
        .ok_or(PersistenceError::NoHomeDir)?
        .join(DATA_DIR_NAME);
    fs::create_dir_all(&dir).map_err(io_err(&dir))?;
    Ok(dir)
}

/// Full path for a file in ~/.flappy/
pub fn data_path(filename: &str) -> Result<PathBuf, PersistenceError> {
    Ok(data_dir()?.join(filename))
}

/// Read a whole file as trimmed text
pub fn read_text(path: &Path) -> Result<String, PersistenceError> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    Ok(text.trim().to_string())
}

/// Replace a file's contents, creating parent directories as needed
pub fn write_text(path: &Path, text: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::write(path, text).map_err(io_err(path))
}

/// Load JSON from `path`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load JSON from `path`, returning `T::default()` if missing or invalid
pub fn load_json_or_default<T: Default + DeserializeOwned>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => value,
        Err(e) if e.is_not_found() => T::default(),
        Err(e) => {
            log::warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Save a value as pretty-printed JSON
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(data).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_text(path, &json)
}
