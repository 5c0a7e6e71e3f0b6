//! Pipes and the stream that spawns, scrolls and culls them
//!
//! The stream keeps pipes oldest-first. Passing a pipe is what requests the
//! next one, so in steady state exactly one pipe waits ahead of the bird,
//! with a second briefly on screen while the old one scrolls out.

use rand::Rng;

use crate::tuning::Tuning;

/// A top + bottom pipe pair with a gap between them
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Y where the top piece ends
    pub gap_top: f32,
    /// Y where the bottom piece starts
    pub gap_bottom: f32,
    /// Set once the bird is past the trailing edge
    pub passed: bool,
}

impl Pipe {
    pub fn new(id: u32, x: f32, gap_top: f32, gap: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            gap_bottom: gap_top + gap,
            passed: false,
        }
    }

    /// Scroll left
    #[inline]
    pub fn update(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Right edge of the pipe
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Y of the top piece's sprite origin
    #[inline]
    pub fn top_piece_y(&self, piece_height: f32) -> f32 {
        self.gap_top - piece_height
    }

    /// Y of the bottom piece's sprite origin
    #[inline]
    pub fn bottom_piece_y(&self) -> f32 {
        self.gap_bottom
    }
}

/// Draw a gap top uniformly from the tuned range
pub fn random_gap_top<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    rng.random_range(tuning.gap_top_min..tuning.gap_top_max) as f32
}

/// Something that happened to a pipe during `PipeStream::update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeEvent {
    /// Bird cleared the pipe; one point, and a new pipe is due
    Passed { id: u32 },
    /// Pipe scrolled off the left edge and was removed
    Culled { id: u32 },
}

/// Ordered collection of live pipes
#[derive(Debug, Clone)]
pub struct PipeStream {
    /// Live pipes, oldest first
    pub pipes: Vec<Pipe>,
    /// Width of a pipe sprite
    pub width: f32,
    /// Pass transitions over the stream's lifetime (culled pipes included)
    pub total_passed: u32,
    next_id: u32,
}

impl PipeStream {
    pub fn new(width: f32) -> Self {
        Self {
            pipes: Vec::new(),
            width,
            total_passed: 0,
            next_id: 1,
        }
    }

    /// Append a pipe at the back of the stream
    pub fn spawn(&mut self, x: f32, gap_top: f32, gap: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pipes.push(Pipe::new(id, x, gap_top, gap));
        log::debug!("Spawned pipe {} at x={} gap_top={}", id, x, gap_top);
        id
    }

    /// Scroll every pipe, mark passes and drop pipes that left the screen
    pub fn update(&mut self, bird_x: f32, speed: f32) -> Vec<PipeEvent> {
        let mut events = Vec::new();
        let width = self.width;

        for pipe in &mut self.pipes {
            pipe.update(speed);
            if !pipe.passed && bird_x > pipe.trailing_edge(width) {
                pipe.passed = true;
                self.total_passed += 1;
                events.push(PipeEvent::Passed { id: pipe.id });
            }
        }

        self.pipes.retain(|pipe| {
            let gone = pipe.trailing_edge(width) < 0.0;
            if gone {
                log::debug!("Culled pipe {}", pipe.id);
                events.push(PipeEvent::Culled { id: pipe.id });
            }
            !gone
        });

        events
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }
}
