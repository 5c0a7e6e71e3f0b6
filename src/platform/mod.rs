//! Platform abstraction layer
//!
//! Input polling and frame pacing. The game itself only ever sees
//! `InputFrame`s; where they come from is up to the `InputSource`.

pub mod terminal;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub use terminal::{TerminalGuard, TerminalInput};

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Jump,
    Pause,
    Confirm,
    Restart,
    Quit,
}

/// Everything the player did since the last poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
    /// Jump key is held this tick
    pub jump_held: bool,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame carrying exactly these events
    pub fn with(events: &[InputEvent]) -> Self {
        Self {
            jump_held: events.contains(&InputEvent::Jump),
            events: events.to_vec(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        if event == InputEvent::Jump {
            self.jump_held = true;
        }
        self.events.push(event);
    }

    pub fn has(&self, event: InputEvent) -> bool {
        self.events.contains(&event)
    }

    /// Should the bird jump this tick?
    pub fn wants_jump(&self) -> bool {
        self.jump_held || self.has(InputEvent::Jump)
    }
}

/// Source of per-tick input
pub trait InputSource {
    /// Drain pending input without blocking
    fn poll(&mut self) -> InputFrame;
}

/// Replays a fixed list of frames, then reports nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Sleeps until the next fixed tick boundary
#[derive(Debug)]
pub struct FrameGovernor {
    interval: Duration,
    next: Instant,
}

impl FrameGovernor {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            interval: Self::interval_for(ticks_per_second),
            next: Instant::now(),
        }
    }

    pub fn interval_for(ticks_per_second: u32) -> Duration {
        Duration::from_secs(1) / ticks_per_second.max(1)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next tick is due.
    ///
    /// If the loop fell behind, the schedule restarts from now instead of
    /// running a burst of catch-up ticks.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.interval;
        } else {
            if now - self.next > self.interval {
                log::debug!("Frame overran by {:?}", now - self.next);
            }
            self.next = now + self.interval;
        }
    }
}
