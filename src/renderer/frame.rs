//! World compositing into a pixel buffer
//!
//! Each buffer pixel is mapped back into world coordinates and the sprites
//! are sampled there, back to front: sky, pipes, ground, bird. The field
//! is scaled uniformly to fit and centred; anything outside it is border.

use glam::Vec2;

use crate::assets::{Rgba, Sprite, SpriteSet};
use crate::game::Screen;
use crate::sim::bird::FLAP_SEQUENCE;
use crate::sim::Pipe;
use crate::to_pixel;
use crate::tuning::Tuning;

const SKY_TOP: Rgba = [70, 180, 200, 255];
const SKY_BOTTOM: Rgba = [190, 232, 245, 255];
const BORDER: Rgba = [0, 0, 0, 255];
const OPAQUE: u8 = 127;

/// Fixed-size RGBA pixel grid
#[derive(Debug, Clone)]
pub struct PixelBuf {
    pub w: usize,
    pub h: usize,
    px: Vec<Rgba>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![BORDER; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, BORDER);
    }

    pub fn set(&mut self, x: usize, y: usize, c: Rgba) {
        if x < self.w && y < self.h {
            self.px[y * self.w + x] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.px[y * self.w + x]
    }
}

/// Where and how to draw the bird
#[derive(Debug, Clone, Copy, PartialEq)]
struct BirdPose {
    pos: Vec2,
    frame: usize,
    tilt: f32,
}

/// Drawable state for one frame, independent of which screen produced it
#[derive(Debug, Clone)]
struct WorldView<'a> {
    bird: Option<BirdPose>,
    pipes: &'a [Pipe],
    ground_x: [f32; 2],
    ground_y: f32,
    dim: bool,
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255]
}

fn darken(c: Rgba) -> Rgba {
    [c[0] / 2, c[1] / 2, c[2] / 2, c[3]]
}

/// Turns scenes into pixels
#[derive(Debug, Clone)]
pub struct Compositor {
    pub sprites: SpriteSet,
    pipe_top: Sprite,
    tuning: Tuning,
}

impl Compositor {
    pub fn new(sprites: SpriteSet, tuning: &Tuning) -> Self {
        Self {
            pipe_top: sprites.pipe_top(),
            sprites,
            tuning: tuning.clone(),
        }
    }

    fn world_view<'a>(&self, screen: &'a Screen) -> WorldView<'a> {
        let t = &self.tuning;
        let ground_w = self.sprites.ground.width as f32;
        match screen {
            Screen::Playing(session) | Screen::Paused(session) => WorldView {
                bird: Some(BirdPose {
                    pos: session.bird.pos,
                    frame: session.bird.frame,
                    tilt: session.bird.tilt,
                }),
                pipes: &session.pipes.pipes,
                ground_x: [session.ground.x1, session.ground.x2],
                ground_y: session.ground.y,
                dim: matches!(screen, Screen::Paused(_)),
            },
            Screen::Start { ticks } => {
                // Idle: the ground keeps scrolling and the bird bobs in place
                let scrolled = (*ticks as f32 * t.ground_speed) % ground_w;
                let per_frame = u64::from(t.animation_ticks.max(1));
                let frame = FLAP_SEQUENCE[((ticks / per_frame) % FLAP_SEQUENCE.len() as u64) as usize];
                let bob = (*ticks as f32 * 0.25).sin() * 6.0;
                WorldView {
                    bird: Some(BirdPose {
                        pos: Vec2::new(t.bird_start_x, t.bird_start_y + bob),
                        frame,
                        tilt: 0.0,
                    }),
                    pipes: &[],
                    ground_x: [-scrolled, ground_w - scrolled],
                    ground_y: t.ground_y,
                    dim: false,
                }
            }
            Screen::Ended(_) => WorldView {
                bird: None,
                pipes: &[],
                ground_x: [0.0, ground_w],
                ground_y: t.ground_y,
                dim: true,
            },
        }
    }

    fn sample_bird(&self, pose: &BirdPose, p: Vec2) -> Option<Rgba> {
        let sprite = self.sprites.bird.get(pose.frame)?;
        let half = Vec2::new(sprite.width as f32, sprite.height as f32) * 0.5;
        // Undo the tilt about the sprite centre (positive tilt = nose up)
        let d = p - (pose.pos + half);
        let src = Vec2::from_angle(pose.tilt.to_radians()).rotate(d) + half;
        let c = sprite.get(src.x.floor() as i32, src.y.floor() as i32);
        (c[3] > OPAQUE).then_some(c)
    }

    fn sample_ground(&self, view: &WorldView, p: Vec2) -> Option<Rgba> {
        if p.y < view.ground_y {
            return None;
        }
        let ground = &self.sprites.ground;
        let sy = (p.y - view.ground_y).floor() as i32;
        view.ground_x.iter().find_map(|&x| {
            let sx = (p.x - x).floor() as i32;
            let c = ground.get(sx, sy.min(ground.height as i32 - 1));
            (sx >= 0 && sx < ground.width as i32 && c[3] > OPAQUE).then_some(c)
        })
    }

    fn sample_pipes(&self, view: &WorldView, p: Vec2) -> Option<Rgba> {
        let height = self.sprites.pipe.height as f32;
        view.pipes.iter().find_map(|pipe| {
            let top = to_pixel(pipe.x, pipe.top_piece_y(height));
            let bottom = to_pixel(pipe.x, pipe.bottom_piece_y());
            let (px, py) = (p.x.floor() as i32, p.y.floor() as i32);
            [(&self.pipe_top, top), (&self.sprites.pipe, bottom)]
                .into_iter()
                .map(|(sprite, origin)| sprite.get(px - origin.x, py - origin.y))
                .find(|c| c[3] > OPAQUE)
        })
    }

    fn sample(&self, view: &WorldView, p: Vec2) -> Rgba {
        let c = view
            .bird
            .as_ref()
            .and_then(|pose| self.sample_bird(pose, p))
            .or_else(|| self.sample_ground(view, p))
            .or_else(|| self.sample_pipes(view, p))
            .unwrap_or_else(|| lerp(SKY_TOP, SKY_BOTTOM, p.y / self.tuning.view_height));
        if view.dim { darken(c) } else { c }
    }

    /// World units per buffer pixel and the field's left/top offset in pixels
    fn fit(&self, buf: &PixelBuf) -> (f32, Vec2) {
        let field = Vec2::new(self.tuning.view_width, self.tuning.view_height);
        let scale = (field.x / buf.w.max(1) as f32).max(field.y / buf.h.max(1) as f32);
        let used = field / scale;
        let offset = (Vec2::new(buf.w as f32, buf.h as f32) - used) * 0.5;
        (scale, offset)
    }

    /// Paint the whole buffer for this screen
    pub fn compose(&self, screen: &Screen, buf: &mut PixelBuf) {
        let view = self.world_view(screen);
        let (scale, offset) = self.fit(buf);
        for by in 0..buf.h {
            for bx in 0..buf.w {
                let p = (Vec2::new(bx as f32 + 0.5, by as f32 + 0.5) - offset) * scale;
                let inside = p.x >= 0.0
                    && p.y >= 0.0
                    && p.x < self.tuning.view_width
                    && p.y < self.tuning.view_height;
                let c = if inside { self.sample(&view, p) } else { BORDER };
                buf.set(bx, by, c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetProvider, ProceduralAssets};
    use crate::game::EndSummary;
    use crate::sim::GameSession;

    fn compositor() -> Compositor {
        Compositor::new(ProceduralAssets.load().unwrap(), &Tuning::default())
    }

    fn session(c: &Compositor) -> GameSession {
        GameSession::empty(Tuning::default(), c.sprites.masks().shared(), 1)
    }

    #[test]
    fn test_bird_pixels_come_from_current_frame() {
        let c = compositor();
        let screen = Screen::Playing(session(&c));
        let view = c.world_view(&screen);
        // Sprite pixel (35, 25) of a bird at (230, 350)
        let got = c.sample(&view, Vec2::new(265.5, 375.5));
        assert_eq!(got, c.sprites.bird[0].get(35, 25));
    }

    #[test]
    fn test_pipe_pieces_drawn_at_gap() {
        let c = compositor();
        let mut s = session(&c);
        s.pipes.spawn(300.0, 300.0, 200.0);
        let screen = Screen::Playing(s);
        let view = c.world_view(&screen);
        // Above the gap: top piece; inside the gap: sky
        let above = c.sample(&view, Vec2::new(350.5, 100.5));
        assert_eq!(above, c.pipe_top.get(50, 440));
        let gap = c.sample(&view, Vec2::new(350.5, 400.5));
        assert_eq!(gap, lerp(SKY_TOP, SKY_BOTTOM, 400.5 / 800.0));
        let below = c.sample(&view, Vec2::new(350.5, 600.5));
        assert_eq!(below, c.sprites.pipe.get(50, 100));
    }

    #[test]
    fn test_ground_covers_pipes() {
        let c = compositor();
        let mut s = session(&c);
        s.pipes.spawn(300.0, 100.0, 200.0);
        let screen = Screen::Playing(s);
        let view = c.world_view(&screen);
        let p = c.sample(&view, Vec2::new(350.5, 690.5));
        assert_eq!(p, c.sprites.ground.get(350, 10));
    }

    #[test]
    fn test_paused_and_ended_are_dimmed() {
        let c = compositor();
        let paused = Screen::Paused(session(&c));
        let playing = Screen::Playing(session(&c));
        let at = Vec2::new(10.5, 10.5);
        let lit = c.sample(&c.world_view(&playing), at);
        assert_eq!(c.sample(&c.world_view(&paused), at), darken(lit));

        let ended = Screen::Ended(EndSummary {
            score: 0,
            previous_best: 0,
            new_best: false,
        });
        assert!(c.world_view(&ended).bird.is_none());
    }

    #[test]
    fn test_field_is_centred_with_border() {
        let c = compositor();
        // Twice as wide as needed: 27.5 px of border each side
        let mut buf = PixelBuf::new(110, 80);
        c.compose(&Screen::Start { ticks: 0 }, &mut buf);
        assert_eq!(buf.get(0, 40), BORDER);
        assert_eq!(buf.get(109, 40), BORDER);
        assert_ne!(buf.get(30, 0), BORDER);
        assert_ne!(buf.get(80, 79), BORDER);
    }

    #[test]
    fn test_title_bird_flaps() {
        let c = compositor();
        let frames: Vec<usize> = [0u64, 5, 10, 15, 20]
            .iter()
            .map(|&ticks| {
                let screen = Screen::Start { ticks };
                c.world_view(&screen).bird.unwrap().frame
            })
            .collect();
        assert_eq!(frames, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_resize_keeps_size_consistent() {
        let mut buf = PixelBuf::new(4, 4);
        buf.resize(10, 6);
        buf.set(9, 5, SKY_TOP);
        assert_eq!(buf.get(9, 5), SKY_TOP);
        // Out of range writes are ignored
        buf.set(10, 0, SKY_TOP);
    }
}
