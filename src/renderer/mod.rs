//! Rendering module
//!
//! The game hands renderers a read-only `Scene`; nothing a renderer does can
//! touch the simulation. `frame` composites the world into a pixel buffer,
//! `terminal` prints that buffer with half-block characters.

pub mod frame;
pub mod terminal;

use std::io;

use crate::game::{GameStateMachine, Screen};
use crate::highscores::HighScoreStore;

pub use frame::{Compositor, PixelBuf};
pub use terminal::TerminalRenderer;

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub screen: &'a Screen,
    /// Best score, if a round has revealed it yet
    pub best: Option<u64>,
    pub show_hud: bool,
}

impl<'a> Scene<'a> {
    pub fn of<S: HighScoreStore>(machine: &'a GameStateMachine<S>, show_hud: bool) -> Self {
        Self {
            screen: machine.screen(),
            best: machine.best(),
            show_hud,
        }
    }

    /// Text overlay lines for this scene
    pub fn hud_lines(&self) -> Vec<String> {
        match self.screen {
            Screen::Start { .. } => {
                let mut lines = vec!["FLAPPY".to_string()];
                if let Some(best) = self.best {
                    lines.push(format!("Best: {}", best));
                }
                lines.push("SPACE to start, Q to quit".to_string());
                lines
            }
            Screen::Playing(session) if self.show_hud => vec![format!(
                "Score: {}   Health: {}%",
                session.score,
                session.health_percent()
            )],
            Screen::Playing(_) => Vec::new(),
            Screen::Paused(session) => vec![
                format!("Score: {}", session.score),
                "PAUSED".to_string(),
                "SPACE to resume".to_string(),
            ],
            Screen::Ended(summary) => {
                let mut lines = vec![
                    "GAME OVER".to_string(),
                    format!("Score: {}", summary.score),
                ];
                if summary.new_best {
                    lines.push(format!("New best! (was {})", summary.previous_best));
                } else {
                    lines.push(format!("Best: {}", summary.previous_best));
                }
                lines.push("P to play again, Q to quit".to_string());
                lines
            }
        }
    }
}

/// Draws scenes somewhere
pub trait Renderer {
    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EndSummary;

    #[test]
    fn test_end_lines_mention_new_best() {
        let screen = Screen::Ended(EndSummary {
            score: 7,
            previous_best: 3,
            new_best: true,
        });
        let scene = Scene {
            screen: &screen,
            best: Some(7),
            show_hud: true,
        };
        let lines = scene.hud_lines();
        assert!(lines.contains(&"Score: 7".to_string()));
        assert!(lines.iter().any(|l| l.contains("New best") && l.contains('3')));
    }

    #[test]
    fn test_start_lines_show_best() {
        let screen = Screen::Start { ticks: 0 };
        let scene = Scene {
            screen: &screen,
            best: Some(12),
            show_hud: false,
        };
        assert!(scene.hud_lines().contains(&"Best: 12".to_string()));
    }

    #[test]
    fn test_start_lines_before_first_round() {
        let screen = Screen::Start { ticks: 0 };
        let scene = Scene {
            screen: &screen,
            best: None,
            show_hud: true,
        };
        let lines = scene.hud_lines();
        assert_eq!(lines.len(), 2);
        assert!(!lines.iter().any(|l| l.starts_with("Best")));
    }
}
