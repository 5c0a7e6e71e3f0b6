//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a settings file can
//! override it. Defaults reproduce the classic feel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values (fatal at startup)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("ticks_per_second must be positive")]
    ZeroTickRate,
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("gap top range {min}..{max} is empty")]
    EmptyGapRange { min: i32, max: i32 },
    #[error("ground segment width {width} cannot cover view width {view} scrolling at {speed}")]
    GroundTooNarrow { width: f32, view: f32, speed: f32 },
}

/// Simulation parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub view_width: f32,
    pub view_height: f32,
    pub ticks_per_second: u32,

    pub bird_start_x: f32,
    pub bird_start_y: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub max_displacement: f32,
    pub max_up_tilt: f32,
    pub tilt_step: f32,
    pub max_down_tilt: f32,
    pub animation_ticks: u32,
    pub max_health: u32,

    pub pipe_gap: f32,
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub pipe_speed: f32,
    pub pipe_spawn_x: f32,

    pub ground_y: f32,
    pub ground_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            ticks_per_second: TICKS_PER_SECOND,

            bird_start_x: BIRD_START_X,
            bird_start_y: BIRD_START_Y,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            max_displacement: MAX_DISPLACEMENT,
            max_up_tilt: MAX_UP_TILT,
            tilt_step: TILT_STEP,
            max_down_tilt: MAX_DOWN_TILT,
            animation_ticks: ANIMATION_TICKS,
            max_health: MAX_HEALTH,

            pipe_gap: PIPE_GAP,
            gap_top_min: GAP_TOP_MIN,
            gap_top_max: GAP_TOP_MAX,
            pipe_speed: PIPE_SPEED,
            pipe_spawn_x: PIPE_SPAWN_X,

            ground_y: GROUND_Y,
            ground_speed: GROUND_SPEED,
        }
    }
}

impl Tuning {
    /// Ticks the session keeps running after health hits zero (one second)
    pub fn death_grace_ticks(&self) -> u32 {
        self.ticks_per_second
    }

    /// Check the values a session relies on. `ground_width` comes from the
    /// ground sprite, which is only known once assets are loaded.
    pub fn validate(&self, ground_width: f32) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        for (name, value) in [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
            ("ground_speed", self.ground_speed),
            ("tilt_step", self.tilt_step),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.gap_top_min >= self.gap_top_max {
            return Err(ConfigError::EmptyGapRange {
                min: self.gap_top_min,
                max: self.gap_top_max,
            });
        }
        // A segment is re-seated only once fully off-screen, so the other one
        // alone must span the view plus the step that pushed it past the edge.
        if ground_width < self.view_width + self.ground_speed {
            return Err(ConfigError::GroundTooNarrow {
                width: ground_width,
                view: self.view_width,
                speed: self.ground_speed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(672.0), Ok(()));
    }

    #[test]
    fn test_grace_is_one_second() {
        let tuning = Tuning::default();
        assert_eq!(tuning.death_grace_ticks(), 30);
    }

    #[test]
    fn test_rejects_empty_gap_range() {
        let tuning = Tuning {
            gap_top_min: 300,
            gap_top_max: 300,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(672.0),
            Err(ConfigError::EmptyGapRange { min: 300, max: 300 })
        );
    }

    #[test]
    fn test_rejects_narrow_ground() {
        let err = Tuning::default().validate(500.0).unwrap_err();
        assert!(matches!(err, ConfigError::GroundTooNarrow { .. }));
    }

    #[test]
    fn test_rejects_zero_speed() {
        let tuning = Tuning {
            pipe_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(672.0),
            Err(ConfigError::NonPositive { name: "pipe_speed", .. })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"pipe_speed": 7.0}"#).unwrap();
        assert_eq!(tuning.pipe_speed, 7.0);
        assert_eq!(tuning.max_health, MAX_HEALTH);
    }
}
