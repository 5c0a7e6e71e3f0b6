//! Flappy - A side-scrolling arcade game with pixel-accurate collision
//!
//! Core modules:
//! - `sim`: Simulation (bird physics, pipes, ground, collision, scoring)
//! - `game`: Screen state machine (Start / Playing / Paused / Ended)
//! - `assets`: Sprite frames and their opacity masks
//! - `renderer`: Read-only scene view + terminal renderer
//! - `platform`: Input polling and frame pacing
//! - `persistence`: Save file helpers (~/.flappy)
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Control, GameStateMachine, Screen};
pub use highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Visible field dimensions (pixels)
    pub const VIEW_WIDTH: f32 = 550.0;
    pub const VIEW_HEIGHT: f32 = 800.0;

    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 30;

    /// Bird spawn point
    pub const BIRD_START_X: f32 = 230.0;
    pub const BIRD_START_Y: f32 = 350.0;
    /// Velocity set by a jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -10.0;
    /// Coefficient of t² in the displacement formula
    pub const GRAVITY: f32 = 1.5;
    /// Terminal velocity: maximum downward displacement per tick
    pub const MAX_DISPLACEMENT: f32 = 15.0;

    /// Tilt (degrees): snap-to when rising, decay per tick, floor when diving
    pub const MAX_UP_TILT: f32 = 25.0;
    pub const TILT_STEP: f32 = 12.0;
    pub const MAX_DOWN_TILT: f32 = -90.0;
    /// Ticks each animation frame is shown
    pub const ANIMATION_TICKS: u32 = 5;

    /// Bird health; one point lost per overlapping pipe per tick
    pub const MAX_HEALTH: u32 = 250;

    /// Vertical opening between top and bottom pipe pieces
    pub const PIPE_GAP: f32 = 200.0;
    /// Range the gap top is drawn from (start inclusive, end exclusive)
    pub const GAP_TOP_MIN: i32 = 50;
    pub const GAP_TOP_MAX: i32 = 450;
    /// Horizontal pipe speed (pixels/tick)
    pub const PIPE_SPEED: f32 = 5.0;
    /// X coordinate new pipes appear at
    pub const PIPE_SPAWN_X: f32 = 600.0;

    /// Ground line and scroll speed
    pub const GROUND_Y: f32 = 680.0;
    pub const GROUND_SPEED: f32 = 5.0;
}

/// Round a world position to the pixel grid used by collision masks
#[inline]
pub fn to_pixel(x: f32, y: f32) -> IVec2 {
    IVec2::new(x.round() as i32, y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_rounds_half_away_from_zero() {
        assert_eq!(to_pixel(230.0, 350.5), IVec2::new(230, 351));
        assert_eq!(to_pixel(-2.5, 0.4), IVec2::new(-3, 0));
    }
}
