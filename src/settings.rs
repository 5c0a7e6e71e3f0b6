//! Player settings
//!
//! Persisted as JSON in ~/.flappy/settings.json. Any field missing from the
//! file takes its default, so old files keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::HIGH_SCORE_FILE;
use crate::persistence::{self, PersistenceError};
use crate::tuning::Tuning;

/// File name inside ~/.flappy/
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physics and layout values for new rounds
    pub tuning: Tuning,
    /// High score file name, relative to the data dir
    pub high_score_file: String,
    /// Fixed RNG seed; every round uses it when set
    pub seed: Option<u64>,
    /// Draw the health / score overlay
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            high_score_file: HIGH_SCORE_FILE.to_string(),
            seed: None,
            show_hud: true,
        }
    }
}

impl Settings {
    pub fn load_from(path: &Path) -> Self {
        let settings: Self = persistence::load_json_or_default(path);
        log::info!("Settings loaded from {}", path.display());
        settings
    }

    /// Load from ~/.flappy/settings.json, defaults if unavailable. On first
    /// run the defaults are written out so there is a file to edit.
    pub fn load_or_create() -> Self {
        match persistence::data_path(SETTINGS_FILE) {
            Ok(path) => Self::load_or_create_at(&path),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn load_or_create_at(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        let settings = Self::default();
        if let Err(e) = settings.save_to(path) {
            log::warn!("Could not write default settings: {}", e);
        }
        settings
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::tests::scratch_path;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.high_score_file, "high_score.txt");
        assert_eq!(settings.seed, None);
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"seed": 9, "tuning": {"pipe_gap": 180.0}}"#).unwrap();
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.tuning.pipe_gap, 180.0);
        assert_eq!(settings.tuning.pipe_speed, 5.0);
        assert!(settings.show_hud);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = scratch_path("settings_roundtrip.json");
        let mut settings = Settings::default();
        settings.seed = Some(1234);
        settings.show_hud = false;
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let path = scratch_path("settings_first_run.json");
        assert_eq!(Settings::load_or_create_at(&path), Settings::default());
        assert!(path.exists());

        // Later runs read the file instead of overwriting it
        let mut edited = Settings::default();
        edited.seed = Some(77);
        edited.save_to(&path).unwrap();
        assert_eq!(Settings::load_or_create_at(&path), edited);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("settings_missing.json");
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
