//! Sprite frames and the collision masks derived from them
//!
//! Sprites are drawn procedurally at the classic 2x sizes (bird 68x48,
//! pipe 104x640, ground 672x224), so the game runs without image files.
//! Masks are built once per frame here and shared read-only by every session.

use std::rc::Rc;

use thiserror::Error;

use crate::sim::Mask;

/// Sprite set could not be assembled (fatal at startup)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("sprite `{0}` has no pixels")]
    EmptySprite(&'static str),
    #[error("sprite `{name}` pixel buffer holds {got} pixels, expected {expected}")]
    BadPixelBuffer {
        name: &'static str,
        got: usize,
        expected: usize,
    },
    #[error("bird frame {index} is {got:?}, expected {expected:?} like frame 0")]
    FrameSizeMismatch {
        index: usize,
        got: (u32, u32),
        expected: (u32, u32),
    },
    #[error("bird animation needs at least 3 frames, got {0}")]
    TooFewFrames(usize),
}

/// RGBA color
pub type Rgba = [u8; 4];

const CLEAR: Rgba = [0, 0, 0, 0];

/// A row-major RGBA image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl Sprite {
    /// Fully transparent sprite
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![CLEAR; (width * height) as usize],
        }
    }

    /// Pixel at (x, y); transparent outside the sprite
    pub fn get(&self, x: i32, y: i32) -> Rgba {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return CLEAR;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            self.pixels[y as usize * self.width as usize + x as usize] = c;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Rgba) {
        for y in (cy - ry).floor() as i32..=(cy + ry).ceil() as i32 {
            for x in (cx - rx).floor() as i32..=(cx + rx).ceil() as i32 {
                let nx = (x as f32 + 0.5 - cx) / rx;
                let ny = (y as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set(x, y, c);
                }
            }
        }
    }

    /// Mirror top-to-bottom (bottom pipe piece -> top pipe piece)
    pub fn flip_vertical(&self) -> Self {
        let w = self.width as usize;
        let pixels = self
            .pixels
            .chunks(w.max(1))
            .rev()
            .flatten()
            .copied()
            .collect();
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Opacity mask from the alpha channel
    pub fn mask(&self) -> Mask {
        Mask::from_alpha(self.width, self.height, self.pixels.iter().map(|p| p[3]))
    }

    fn check(&self, name: &'static str) -> Result<(), AssetError> {
        let expected = (self.width * self.height) as usize;
        if expected == 0 {
            return Err(AssetError::EmptySprite(name));
        }
        if self.pixels.len() != expected {
            return Err(AssetError::BadPixelBuffer {
                name,
                got: self.pixels.len(),
                expected,
            });
        }
        Ok(())
    }
}

/// Every sprite the game draws
#[derive(Debug, Clone)]
pub struct SpriteSet {
    /// Bird animation frames (wing up, level, down)
    pub bird: Vec<Sprite>,
    /// Pipe with its end cap at the top (the bottom piece)
    pub pipe: Sprite,
    pub ground: Sprite,
}

impl SpriteSet {
    /// Assemble and validate a sprite set
    pub fn new(bird: Vec<Sprite>, pipe: Sprite, ground: Sprite) -> Result<Self, AssetError> {
        if bird.len() < 3 {
            return Err(AssetError::TooFewFrames(bird.len()));
        }
        let expected = (bird[0].width, bird[0].height);
        for (index, frame) in bird.iter().enumerate() {
            frame.check("bird")?;
            let got = (frame.width, frame.height);
            if got != expected {
                return Err(AssetError::FrameSizeMismatch {
                    index,
                    got,
                    expected,
                });
            }
        }
        pipe.check("pipe")?;
        ground.check("ground")?;
        Ok(Self { bird, pipe, ground })
    }

    /// The downward-facing pipe piece (cap at the bottom)
    pub fn pipe_top(&self) -> Sprite {
        self.pipe.flip_vertical()
    }

    /// Derive the collision masks (done once, at startup)
    pub fn masks(&self) -> CollisionMasks {
        CollisionMasks {
            bird: self.bird.iter().map(Sprite::mask).collect(),
            pipe_top: self.pipe_top().mask(),
            pipe_bottom: self.pipe.mask(),
            ground_width: self.ground.width as f32,
        }
    }
}

/// Opacity masks used by the simulation
#[derive(Debug, Clone)]
pub struct CollisionMasks {
    /// One mask per bird animation frame
    pub bird: Vec<Mask>,
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
    /// Width of one ground segment
    pub ground_width: f32,
}

impl CollisionMasks {
    pub fn bird_height(&self) -> f32 {
        self.bird.first().map_or(0.0, |m| m.height() as f32)
    }

    pub fn pipe_width(&self) -> f32 {
        self.pipe_bottom.width() as f32
    }

    pub fn pipe_height(&self) -> f32 {
        self.pipe_bottom.height() as f32
    }

    /// Shared handle for sessions
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

/// Supplies sprites at startup; never touched per tick
pub trait AssetProvider {
    fn load(&self) -> Result<SpriteSet, AssetError>;
}

/// Draws every sprite in code
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralAssets;

pub const BIRD_SIZE: (u32, u32) = (68, 48);
pub const PIPE_SIZE: (u32, u32) = (104, 640);
pub const GROUND_SIZE: (u32, u32) = (672, 224);

const BIRD_BODY: Rgba = [245, 200, 66, 255];
const BIRD_WING: Rgba = [255, 236, 150, 255];
const BIRD_OUTLINE: Rgba = [90, 60, 20, 255];
const BIRD_BEAK: Rgba = [240, 120, 40, 255];
const EYE_WHITE: Rgba = [255, 255, 255, 255];
const EYE_PUPIL: Rgba = [20, 20, 20, 255];
const PIPE_DARK: Rgba = [74, 122, 26, 255];
const PIPE_MID: Rgba = [100, 170, 40, 255];
const PIPE_LIGHT: Rgba = [145, 215, 62, 255];
const GRASS: Rgba = [84, 168, 55, 255];
const GRASS_LIGHT: Rgba = [110, 200, 70, 255];
const DIRT: Rgba = [210, 185, 110, 255];
const DIRT_DARK: Rgba = [185, 160, 90, 255];

impl ProceduralAssets {
    /// Bird frame; `wing` is 0 = up, 1 = level, 2 = down
    fn bird_frame(wing: usize) -> Sprite {
        let (w, h) = BIRD_SIZE;
        let mut s = Sprite::new(w, h);
        s.fill_ellipse(31.0, 25.0, 27.0, 20.0, BIRD_OUTLINE);
        s.fill_ellipse(31.0, 25.0, 25.0, 18.0, BIRD_BODY);
        // Wing tips poke past the body outline when raised or lowered
        let wing_y = [12.0, 24.0, 36.0][wing.min(2)];
        s.fill_ellipse(16.0, wing_y, 13.0, 7.0, BIRD_OUTLINE);
        s.fill_ellipse(16.0, wing_y, 11.0, 5.0, BIRD_WING);
        s.fill_rect(52, 26, 15, 8, BIRD_OUTLINE);
        s.fill_rect(53, 27, 13, 6, BIRD_BEAK);
        s.fill_ellipse(45.0, 15.0, 7.0, 7.0, EYE_WHITE);
        s.fill_rect(47, 13, 4, 5, EYE_PUPIL);
        s
    }

    fn pipe() -> Sprite {
        let (w, h) = PIPE_SIZE;
        let mut s = Sprite::new(w, h);
        let shade = |x: i32, width: i32| {
            let t = x * 3 / width.max(1);
            match t {
                0 => PIPE_DARK,
                1 => PIPE_MID,
                _ => PIPE_LIGHT,
            }
        };
        // Shaft is narrower than the cap, leaving transparent margins
        for x in 4..(w as i32 - 4) {
            s.fill_rect(x, 0, 1, h as i32, shade(x - 4, w as i32 - 8));
        }
        for x in 0..w as i32 {
            s.fill_rect(x, 0, 1, 48, shade(x, w as i32));
        }
        s.fill_rect(0, 46, w as i32, 2, PIPE_DARK);
        s
    }

    fn ground() -> Sprite {
        let (w, h) = GROUND_SIZE;
        let mut s = Sprite::new(w, h);
        s.fill_rect(0, 0, w as i32, 24, GRASS);
        for x in (0..w as i32).step_by(24) {
            s.fill_rect(x, 0, 12, 24, GRASS_LIGHT);
        }
        for y in 24..h as i32 {
            for x in 0..w as i32 {
                let c = if (x + y) % 32 < 16 { DIRT } else { DIRT_DARK };
                s.set(x, y, c);
            }
        }
        s
    }
}

impl AssetProvider for ProceduralAssets {
    fn load(&self) -> Result<SpriteSet, AssetError> {
        let bird = (0..3).map(Self::bird_frame).collect();
        let sprites = SpriteSet::new(bird, Self::pipe(), Self::ground())?;
        log::info!(
            "Procedural sprites ready (bird {}x{}, pipe {}x{})",
            sprites.bird[0].width,
            sprites.bird[0].height,
            sprites.pipe.width,
            sprites.pipe.height
        );
        Ok(sprites)
    }
}
