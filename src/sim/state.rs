//! Per-round game state
//!
//! A `GameSession` owns everything that changes during one round. A new round
//! builds a new session; nothing carries over except the read-only masks.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bird::Bird;
use super::ground::Ground;
use super::pipe::{PipeStream, random_gap_top};
use crate::assets::CollisionMasks;
use crate::tuning::Tuning;

/// Events produced by one tick, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Jump impulse applied
    Flap,
    /// A pipe was cleared; carries the new score
    Scored { score: u32 },
    /// Bird overlapped a pipe and lost health
    Hit { pipe_id: u32, health: u32 },
    /// Bird hit the ground or left the top of the field
    OutOfBounds,
    /// Health reached zero this tick
    Died,
    /// Grace period after death is over; the round has ended
    SessionOver,
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed the gap RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub bird: Bird,
    pub ground: Ground,
    pub pipes: PipeStream,
    /// Pipes cleared this round
    pub score: u32,
    /// Ticks since the tick on which health first hit zero
    pub frames_since_death: u32,
    /// Ticks simulated so far
    pub time_ticks: u64,
    /// Set once the grace period has elapsed
    pub over: bool,
    pub(crate) masks: Rc<CollisionMasks>,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Start a round: bird at its spawn point, one pipe waiting ahead
    pub fn new(tuning: Tuning, masks: Rc<CollisionMasks>, seed: u64) -> Self {
        let mut session = Self::empty(tuning, masks, seed);
        session.spawn_pipe();
        log::info!("Session started (seed {})", seed);
        session
    }

    /// A round with no pipes at all (for scripted setups)
    pub fn empty(tuning: Tuning, masks: Rc<CollisionMasks>, seed: u64) -> Self {
        Self {
            seed,
            bird: Bird::spawn(&tuning),
            ground: Ground::new(tuning.ground_y, masks.ground_width),
            pipes: PipeStream::new(masks.pipe_width()),
            score: 0,
            frames_since_death: 0,
            time_ticks: 0,
            over: false,
            rng: Pcg32::seed_from_u64(seed),
            masks,
            tuning,
        }
    }

    /// Append a pipe at the spawn x with a random gap
    pub fn spawn_pipe(&mut self) -> u32 {
        let gap_top = random_gap_top(&mut self.rng, &self.tuning);
        self.pipes
            .spawn(self.tuning.pipe_spawn_x, gap_top, self.tuning.pipe_gap)
    }

    pub fn masks(&self) -> &CollisionMasks {
        &self.masks
    }

    /// Health as a 0-100 percentage (HUD)
    pub fn health_percent(&self) -> u32 {
        if self.tuning.max_health == 0 {
            return 0;
        }
        self.bird.health() * 100 / self.tuning.max_health
    }

    /// Is the bird outside the playable field? Its lower edge below the
    /// ground line, or the whole sprite above the top edge.
    pub fn bird_out_of_bounds(&self) -> bool {
        let bottom = self.bird.bottom(self.masks.bird_height());
        bottom > self.ground.y || bottom < 0.0
    }
}
