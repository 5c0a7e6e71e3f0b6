//! Pixel-perfect collision between the bird and a pipe
//!
//! Bounding boxes would punish near misses at wing tips and pipe end caps,
//! so each test ANDs the bird's opacity mask with one pipe piece's mask at
//! their relative pixel offset.

use glam::IVec2;

use super::bird::Bird;
use super::pipe::Pipe;
use crate::assets::CollisionMasks;
use crate::to_pixel;

/// Result of a bird/pipe collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResult {
    /// First overlapping pixel with the top piece (bird coordinates)
    pub top: Option<IVec2>,
    /// First overlapping pixel with the bottom piece (bird coordinates)
    pub bottom: Option<IVec2>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }

    /// Does the bird touch either piece?
    #[inline]
    pub fn hit(&self) -> bool {
        self.top.is_some() || self.bottom.is_some()
    }
}

/// Offset of a pipe piece's origin relative to the bird's origin
#[inline]
pub fn piece_offset(bird: &Bird, pipe_x: f32, piece_y: f32) -> IVec2 {
    to_pixel(pipe_x, piece_y) - to_pixel(bird.pos.x, bird.pos.y)
}

/// Check the bird against both pieces of a pipe
pub fn bird_pipe_collision(bird: &Bird, pipe: &Pipe, masks: &CollisionMasks) -> CollisionResult {
    let bird_mask = bird.mask(masks);
    let top_offset = piece_offset(bird, pipe.x, pipe.top_piece_y(masks.pipe_height()));
    let bottom_offset = piece_offset(bird, pipe.x, pipe.bottom_piece_y());

    CollisionResult {
        top: bird_mask.overlap(&masks.pipe_top, top_offset),
        bottom: bird_mask.overlap(&masks.pipe_bottom, bottom_offset),
    }
}

/// Convenience form: does the bird touch the pipe at all?
#[inline]
pub fn check_collision(bird: &Bird, pipe: &Pipe, masks: &CollisionMasks) -> bool {
    bird_pipe_collision(bird, pipe, masks).hit()
}
