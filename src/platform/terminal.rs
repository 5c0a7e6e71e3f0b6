//! Terminal input and screen setup (crossterm)

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};

use super::{InputEvent, InputFrame, InputSource};

/// Translate one key press into game commands.
///
/// Space and Up both flap and confirm, so a single key starts, resumes and
/// plays the game.
pub fn map_key(key: &KeyEvent) -> &'static [InputEvent] {
    if key.kind == KeyEventKind::Release {
        return &[];
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => &[InputEvent::Quit],
        KeyCode::Char(' ') | KeyCode::Up => &[InputEvent::Jump, InputEvent::Confirm],
        KeyCode::Char('k') | KeyCode::Char('K') => &[InputEvent::Pause],
        KeyCode::Char('p') | KeyCode::Char('P') => &[InputEvent::Restart],
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => &[InputEvent::Quit],
        _ => &[],
    }
}

/// Is this key one of the jump keys?
fn is_jump_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char(' ') | KeyCode::Up)
}

/// Reads pending key events from the terminal.
///
/// When the terminal reports key releases, a jump key stays held from its
/// press until its release, across any number of polls. Otherwise only the
/// presses (and the OS auto-repeat) that arrive during a poll count.
#[derive(Debug, Default)]
pub struct TerminalInput {
    held: bool,
    release_events: bool,
}

impl TerminalInput {
    /// `release_events`: the terminal sends `KeyEventKind::Release`
    pub fn new(release_events: bool) -> Self {
        Self {
            held: false,
            release_events,
        }
    }

    /// Jump key currently down (release-tracking terminals only)
    pub fn jump_held(&self) -> bool {
        self.held
    }

    /// Fold one poll's worth of key events into a frame
    pub fn process(&mut self, keys: impl IntoIterator<Item = KeyEvent>) -> InputFrame {
        let mut frame = InputFrame::new();
        for key in keys {
            if is_jump_key(key.code) {
                self.held = key.kind != KeyEventKind::Release;
            }
            for &e in map_key(&key) {
                frame.push(e);
            }
        }
        if self.release_events {
            frame.jump_held = self.held;
        }
        frame
    }

    fn drain() -> io::Result<Vec<KeyEvent>> {
        let mut keys = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> InputFrame {
        match Self::drain() {
            Ok(keys) => self.process(keys),
            Err(e) => {
                // Without input there is no way to play; treat it as quit
                log::error!("Terminal input failed: {}", e);
                let mut frame = InputFrame::new();
                frame.push(InputEvent::Quit);
                frame
            }
        }
    }
}

/// Raw mode + alternate screen for as long as it lives
pub struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::debug!("Terminal set up (key release events: {})", enhanced);
        Ok(Self { enhanced })
    }

    /// Will key releases be reported?
    pub fn reports_key_release(&self) -> bool {
        self.enhanced
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.enhanced {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
        let _ = out.flush();
    }
}
