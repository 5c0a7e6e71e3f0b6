//! Half-block terminal renderer
//!
//! Each character cell shows two vertically stacked pixels: the upper one
//! as the foreground of '▀', the lower one as the background.

use std::io::{self, Write};

use crossterm::style::{self, Color};
use crossterm::{cursor, queue, terminal};

use super::frame::{Compositor, PixelBuf};
use super::{Renderer, Scene};
use crate::assets::Rgba;

const HUD_FG: Color = Color::White;
const HUD_BG: Color = Color::Rgb { r: 30, g: 30, b: 30 };

fn color(c: Rgba) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    buf: PixelBuf,
    compositor: Compositor,
    /// Follow the real terminal size on every frame
    track_terminal: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Render to stdout, sized to the terminal
    pub fn stdout(compositor: Compositor) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut renderer = Self::new(io::stdout(), compositor, cols, rows);
        renderer.track_terminal = true;
        Ok(renderer)
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render to any writer at a fixed character size
    pub fn new(out: W, compositor: Compositor, cols: u16, rows: u16) -> Self {
        Self {
            out,
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            compositor,
            track_terminal: false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn draw_pixels(&mut self) -> io::Result<()> {
        let out = &mut self.out;
        let buf = &self.buf;
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = buf.h / 2;
        let mut prev: Option<(Rgba, Rgba)> = None;

        for row in 0..rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..buf.w {
                let top = buf.get(col, row * 2);
                let bottom = buf.get(col, row * 2 + 1);
                if prev != Some((top, bottom)) {
                    queue!(
                        out,
                        style::SetForegroundColor(color(top)),
                        style::SetBackgroundColor(color(bottom))
                    )?;
                    prev = Some((top, bottom));
                }
                let ch = if top == bottom { ' ' } else { '\u{2580}' };
                queue!(out, style::Print(ch))?;
            }
        }
        queue!(out, style::ResetColor)
    }

    fn draw_hud(&mut self, lines: &[String]) -> io::Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let rows = (self.buf.h / 2) as u16;
        let cols = self.buf.w as u16;
        // Gameplay HUD sits on the top row, menus in the middle
        let first = if lines.len() == 1 {
            0
        } else {
            (rows / 2).saturating_sub(lines.len() as u16 / 2)
        };
        for (i, line) in lines.iter().enumerate() {
            let text = format!(" {} ", line);
            let width = text.chars().count() as u16;
            let x = cols.saturating_sub(width) / 2;
            queue!(
                self.out,
                cursor::MoveTo(x, first + i as u16),
                style::SetForegroundColor(HUD_FG),
                style::SetBackgroundColor(HUD_BG),
                style::Print(text)
            )?;
        }
        queue!(self.out, style::ResetColor)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        if self.track_terminal {
            match terminal::size() {
                Ok((cols, rows)) => self.resize(cols, rows),
                Err(e) => log::debug!("Terminal size unavailable: {}", e),
            }
        }
        self.compositor.compose(scene.screen, &mut self.buf);
        self.draw_pixels()?;
        self.draw_hud(&scene.hud_lines())?;
        self.out.flush()
    }
}
