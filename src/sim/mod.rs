//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (pipes oldest first)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod ground;
pub mod mask;
pub mod pipe;
pub mod state;
pub mod tick;

pub use bird::{Bird, displacement};
pub use collision::{CollisionResult, bird_pipe_collision, check_collision};
pub use ground::Ground;
pub use mask::Mask;
pub use pipe::{Pipe, PipeEvent, PipeStream};
pub use state::{GameEvent, GameSession};
pub use tick::{TickInput, tick};
