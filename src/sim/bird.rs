//! The player-controlled bird
//!
//! Vertical motion uses the classic discrete approximation: after a jump the
//! displacement on tick `t` is `vel * t + g * t²`, capped at a terminal value.
//! The bird never moves horizontally; the world scrolls past it.

use glam::Vec2;

use crate::assets::CollisionMasks;
use crate::sim::Mask;
use crate::tuning::Tuning;

/// Frame shown while diving
pub const DIVE_FRAME: usize = 1;

/// Frame order for one flap cycle
pub const FLAP_SEQUENCE: [usize; 4] = [0, 1, 2, 1];

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Top-left of the sprite; x is fixed after spawn
    pub pos: Vec2,
    /// Velocity set by the last jump (negative = up)
    pub vel: f32,
    /// Ticks since the last jump
    pub tick_count: u32,
    /// Sprite tilt in degrees (positive = nose up)
    pub tilt: f32,
    /// Current animation frame index
    pub frame: usize,
    /// Ticks into the current flap cycle
    pub frame_counter: u32,
    /// Remaining health; only ever decreases
    health: u32,
}

impl Bird {
    pub fn new(x: f32, y: f32, health: u32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: 0.0,
            tick_count: 0,
            tilt: 0.0,
            frame: 0,
            frame_counter: 0,
            health,
        }
    }

    /// Spawn at the tuned start point with full health
    pub fn spawn(tuning: &Tuning) -> Self {
        Self::new(tuning.bird_start_x, tuning.bird_start_y, tuning.max_health)
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Lose `amount` health, stopping at zero
    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Instant death (ground or ceiling)
    pub fn kill(&mut self) {
        self.health = 0;
    }

    /// Upward kick: restart the kinematic clock with the jump velocity
    pub fn jump(&mut self, tuning: &Tuning) {
        self.tick_count = 0;
        self.vel = tuning.jump_velocity;
    }

    /// Advance one tick. Returns the displacement applied.
    pub fn update(&mut self, tuning: &Tuning) -> f32 {
        self.tick_count += 1;
        let d = displacement(self.vel, self.tick_count, tuning);
        self.pos.y += d;

        if d < 0.0 {
            self.tilt = tuning.max_up_tilt;
        } else if self.tilt > tuning.max_down_tilt {
            self.tilt = (self.tilt - tuning.tilt_step).max(tuning.max_down_tilt);
        }
        d
    }

    /// Nose fully down?
    #[inline]
    pub fn is_diving(&self, tuning: &Tuning) -> bool {
        self.tilt <= tuning.max_down_tilt
    }

    /// Advance the flap animation one tick. A diving bird holds the level-wing
    /// frame; the counter is parked so flapping resumes on the next frame.
    pub fn animate(&mut self, tuning: &Tuning) {
        let per_frame = tuning.animation_ticks.max(1);
        if self.is_diving(tuning) {
            self.frame = DIVE_FRAME;
            self.frame_counter = per_frame * 2;
            return;
        }
        self.frame_counter = (self.frame_counter + 1) % (per_frame * FLAP_SEQUENCE.len() as u32);
        self.frame = FLAP_SEQUENCE[(self.frame_counter / per_frame) as usize];
    }

    /// Opacity mask of the current (unrotated) frame
    pub fn mask<'a>(&self, masks: &'a CollisionMasks) -> &'a Mask {
        &masks.bird[self.frame.min(masks.bird.len() - 1)]
    }

    /// Y of the sprite's lower edge
    #[inline]
    pub fn bottom(&self, height: f32) -> f32 {
        self.pos.y + height
    }
}

/// Displacement for tick `t` after a jump, clamped to terminal velocity
pub fn displacement(vel: f32, t: u32, tuning: &Tuning) -> f32 {
    let t = t as f32;
    let d = vel * t + tuning.gravity * t * t;
    if d >= tuning.max_displacement {
        tuning.max_displacement
    } else {
        d
    }
}
