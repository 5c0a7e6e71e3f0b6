//! Screen state machine
//!
//! Start -> Playing <-> Paused -> Ended -> Start. The Playing and Paused
//! screens own the session, so restarting simply drops it and the next
//! Confirm builds a fresh one.

use std::mem;
use std::rc::Rc;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::CollisionMasks;
use crate::highscores::{self, HighScoreStore};
use crate::platform::{InputEvent, InputFrame};
use crate::sim::{GameEvent, GameSession, TickInput, tick};
use crate::tuning::Tuning;

/// What the end screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndSummary {
    pub score: u32,
    /// Best score before this round
    pub previous_best: u64,
    /// This round beat the previous best
    pub new_best: bool,
}

/// Current screen
#[derive(Debug, Clone)]
pub enum Screen {
    /// Title screen; `ticks` drives the idle animation
    Start { ticks: u64 },
    Playing(GameSession),
    Paused(GameSession),
    Ended(EndSummary),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Start { .. } => "Start",
            Screen::Playing(_) => "Playing",
            Screen::Paused(_) => "Paused",
            Screen::Ended(_) => "Ended",
        }
    }

    /// Session being played or paused, if any
    pub fn session(&self) -> Option<&GameSession> {
        match self {
            Screen::Playing(s) | Screen::Paused(s) => Some(s),
            _ => None,
        }
    }
}

/// What the main loop should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct GameStateMachine<S: HighScoreStore> {
    screen: Screen,
    tuning: Tuning,
    masks: Rc<CollisionMasks>,
    store: S,
    /// Every round uses this seed when set
    fixed_seed: Option<u64>,
    seeds: Pcg32,
    /// Best score, known once the first round has ended
    best: Option<u64>,
    /// Events from the most recent simulation tick
    events: Vec<GameEvent>,
}

impl<S: HighScoreStore> GameStateMachine<S> {
    /// Start on the title screen.
    ///
    /// With `seed` set every round replays the same pipe layout; otherwise
    /// each round draws a fresh seed.
    pub fn new(tuning: Tuning, masks: Rc<CollisionMasks>, store: S, seed: Option<u64>) -> Self {
        let seeds = Pcg32::seed_from_u64(seed.unwrap_or_else(rand::random));
        Self {
            screen: Screen::Start { ticks: 0 },
            tuning,
            masks,
            store,
            fixed_seed: seed,
            seeds,
            best: None,
            events: Vec::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn best(&self) -> Option<u64> {
        self.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn masks(&self) -> &CollisionMasks {
        &self.masks
    }

    /// Events produced by the last Playing tick (empty on other screens)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Advance one tick with this frame's input
    pub fn step(&mut self, input: &InputFrame) -> Control {
        self.events.clear();
        if input.has(InputEvent::Quit) {
            log::info!("Quit from {} screen", self.screen.name());
            return Control::Quit;
        }

        let screen = mem::replace(&mut self.screen, Screen::Start { ticks: 0 });
        self.screen = match screen {
            Screen::Start { ticks } => {
                if input.has(InputEvent::Confirm) {
                    Screen::Playing(self.new_session())
                } else {
                    Screen::Start { ticks: ticks + 1 }
                }
            }
            Screen::Playing(session) if input.has(InputEvent::Pause) => {
                log::info!("Paused at tick {}", session.time_ticks);
                Screen::Paused(session)
            }
            Screen::Playing(mut session) => {
                self.events = tick(
                    &mut session,
                    &TickInput {
                        jump: input.wants_jump(),
                    },
                );
                if session.over {
                    Screen::Ended(self.finish(&session))
                } else {
                    Screen::Playing(session)
                }
            }
            Screen::Paused(session) => {
                if input.has(InputEvent::Confirm) {
                    log::info!("Resumed at tick {}", session.time_ticks);
                    Screen::Playing(session)
                } else {
                    Screen::Paused(session)
                }
            }
            Screen::Ended(summary) => {
                if input.has(InputEvent::Restart) {
                    log::info!("Back to start screen");
                    Screen::Start { ticks: 0 }
                } else {
                    Screen::Ended(summary)
                }
            }
        };
        Control::Continue
    }

    fn new_session(&mut self) -> GameSession {
        let seed = self.fixed_seed.unwrap_or_else(|| self.seeds.next_u64());
        GameSession::new(self.tuning.clone(), Rc::clone(&self.masks), seed)
    }

    fn finish(&mut self, session: &GameSession) -> EndSummary {
        let (previous_best, new_best) = highscores::record(&self.store, u64::from(session.score));
        let best = if new_best {
            u64::from(session.score)
        } else {
            previous_best
        };
        self.best = Some(best);
        log::info!("Round over: score {} (best {})", session.score, best);
        EndSummary {
            score: session.score,
            previous_best,
            new_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetProvider, ProceduralAssets};
    use crate::highscores::MemoryHighScoreStore;

    fn machine(best: u64) -> GameStateMachine<MemoryHighScoreStore> {
        let masks = ProceduralAssets.load().unwrap().masks().shared();
        GameStateMachine::new(
            Tuning::default(),
            masks,
            MemoryHighScoreStore::with_best(best),
            Some(3),
        )
    }

    fn press(events: &[InputEvent]) -> InputFrame {
        InputFrame::with(events)
    }

    /// Step with no input until the round ends
    fn run_to_end<S: HighScoreStore>(m: &mut GameStateMachine<S>) {
        for _ in 0..1000 {
            m.step(&InputFrame::new());
            if matches!(m.screen(), Screen::Ended(_)) {
                return;
            }
        }
        panic!("round never ended");
    }

    #[test]
    fn test_start_idles_until_confirm() {
        let mut m = machine(0);
        m.step(&InputFrame::new());
        m.step(&press(&[InputEvent::Pause]));
        assert!(matches!(m.screen(), Screen::Start { ticks: 2 }));
        m.step(&press(&[InputEvent::Confirm]));
        assert!(matches!(m.screen(), Screen::Playing(_)));
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut m = machine(0);
        m.step(&press(&[InputEvent::Confirm]));
        m.step(&press(&[InputEvent::Jump]));
        let before = m.screen().session().unwrap().clone();

        m.step(&press(&[InputEvent::Pause]));
        assert!(matches!(m.screen(), Screen::Paused(_)));
        for _ in 0..10 {
            m.step(&press(&[InputEvent::Jump]));
        }
        let paused = m.screen().session().unwrap();
        assert_eq!(paused.time_ticks, before.time_ticks);
        assert_eq!(paused.bird, before.bird);

        m.step(&press(&[InputEvent::Confirm]));
        assert!(matches!(m.screen(), Screen::Playing(_)));
        m.step(&InputFrame::new());
        assert_eq!(m.screen().session().unwrap().time_ticks, before.time_ticks + 1);
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut m = machine(0);
        assert_eq!(m.step(&press(&[InputEvent::Quit])), Control::Quit);
        m.step(&press(&[InputEvent::Confirm]));
        assert_eq!(
            m.step(&press(&[InputEvent::Jump, InputEvent::Quit])),
            Control::Quit
        );
        // Quit does not advance the round
        assert_eq!(m.screen().session().unwrap().time_ticks, 0);
    }

    #[test]
    fn test_end_keeps_higher_stored_best() {
        let mut m = machine(100);
        m.step(&press(&[InputEvent::Confirm]));
        run_to_end(&mut m);
        match m.screen() {
            Screen::Ended(summary) => {
                assert_eq!(summary.score, 0);
                assert_eq!(summary.previous_best, 100);
                assert!(!summary.new_best);
            }
            other => panic!("unexpected screen {}", other.name()),
        }
        assert_eq!(m.store().writes(), 0);
        assert_eq!(m.best(), Some(100));
    }

    #[test]
    fn test_restart_goes_to_start_then_new_round() {
        let mut m = machine(0);
        m.step(&press(&[InputEvent::Confirm]));
        run_to_end(&mut m);
        // Confirm alone does not leave the end screen
        m.step(&press(&[InputEvent::Confirm]));
        assert!(matches!(m.screen(), Screen::Ended(_)));
        m.step(&press(&[InputEvent::Restart]));
        assert!(matches!(m.screen(), Screen::Start { ticks: 0 }));
        m.step(&press(&[InputEvent::Confirm]));
        let session = m.screen().session().unwrap();
        assert_eq!(session.score, 0);
        assert_eq!(session.time_ticks, 0);
        assert_eq!(session.bird.health(), 250);
    }

    #[test]
    fn test_fixed_seed_replays_layout() {
        let mut m = machine(0);
        m.step(&press(&[InputEvent::Confirm]));
        let first = m.screen().session().unwrap().pipes.pipes[0].gap_top;
        run_to_end(&mut m);
        m.step(&press(&[InputEvent::Restart]));
        m.step(&press(&[InputEvent::Confirm]));
        assert_eq!(m.screen().session().unwrap().pipes.pipes[0].gap_top, first);
    }

    #[test]
    fn test_playing_step_reports_events() {
        let mut m = machine(0);
        m.step(&press(&[InputEvent::Confirm]));
        assert!(m.events().is_empty());
        m.step(&press(&[InputEvent::Jump]));
        assert_eq!(m.events(), &[GameEvent::Flap]);
    }

    #[test]
    fn test_held_jump_flaps_every_tick() {
        let mut m = machine(0);
        m.step(&press(&[InputEvent::Confirm]));
        let held = InputFrame {
            events: Vec::new(),
            jump_held: true,
        };
        let mut last_y = m.screen().session().unwrap().bird.pos.y;
        for _ in 0..5 {
            m.step(&held);
            assert_eq!(m.events(), &[GameEvent::Flap]);
            let y = m.screen().session().unwrap().bird.pos.y;
            assert!(y < last_y);
            last_y = y;
        }
        m.step(&InputFrame::new());
        assert!(!m.events().contains(&GameEvent::Flap));
    }

    #[test]
    fn test_best_unknown_until_round_ends() {
        let mut m = machine(42);
        assert_eq!(m.best(), None);
        m.step(&press(&[InputEvent::Confirm]));
        for _ in 0..10 {
            m.step(&InputFrame::new());
        }
        assert_eq!(m.best(), None);

        run_to_end(&mut m);
        assert_eq!(m.best(), Some(42));
        m.step(&press(&[InputEvent::Restart]));
        assert_eq!(m.best(), Some(42));
        assert_eq!(m.store().writes(), 0);
    }
}
