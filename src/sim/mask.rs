//! Opacity bitmasks for pixel-perfect collision
//!
//! A mask is one bit per sprite pixel, set where the pixel is visibly opaque.
//! Rows are packed into `u64` words so the overlap test can AND whole runs of
//! pixels at once instead of probing them one by one.

use glam::IVec2;

/// Alpha above this counts as opaque (matches the usual 127 cutoff)
pub const ALPHA_THRESHOLD: u8 = 127;

const WORD_BITS: i32 = 64;

/// Binary opacity bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Create an all-transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let width = width as i32;
        let height = height as i32;
        let words_per_row = ((width + WORD_BITS - 1) / WORD_BITS) as usize;
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build a mask from an alpha channel laid out row-major
    pub fn from_alpha(width: u32, height: u32, alpha: impl IntoIterator<Item = u8>) -> Self {
        let mut mask = Self::new(width, height);
        let w = width.max(1) as i32;
        for (i, a) in alpha.into_iter().enumerate().take((width * height) as usize) {
            if a > ALPHA_THRESHOLD {
                mask.set(i as i32 % w, i as i32 / w);
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Mark a pixel opaque (out-of-range coordinates are ignored)
    pub fn set(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let idx = y as usize * self.words_per_row + (x / WORD_BITS) as usize;
            self.bits[idx] |= 1u64 << (x % WORD_BITS);
        }
    }

    /// Is the pixel opaque? Anything outside the mask is transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.words_per_row + (x / WORD_BITS) as usize;
        self.bits[idx] & (1u64 << (x % WORD_BITS)) != 0
    }

    /// Number of opaque pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Read 64 pixels of row `y` starting at column `x` (may be negative or
    /// run past the edge; missing pixels read as transparent). Bit i is x + i.
    fn row_bits(&self, x: i32, y: i32) -> u64 {
        if y < 0 || y >= self.height || x >= self.width || x + WORD_BITS <= 0 {
            return 0;
        }
        let row = &self.bits[y as usize * self.words_per_row..][..self.words_per_row];
        let word_at = |i: i32| -> u64 {
            if i < 0 || i as usize >= row.len() {
                0
            } else {
                row[i as usize]
            }
        };
        let word = x.div_euclid(WORD_BITS);
        let shift = x.rem_euclid(WORD_BITS);
        let lo = word_at(word) >> shift;
        let hi = if shift == 0 {
            0
        } else {
            word_at(word + 1) << (WORD_BITS - shift)
        };
        let mut out = lo | hi;
        // Clear bits past the right edge
        let remaining = self.width - x;
        if remaining < WORD_BITS {
            out &= (1u64 << remaining) - 1;
        }
        out
    }

    /// First point where `other`, placed at `offset` relative to this mask's
    /// origin, shares an opaque pixel with this mask. The point is in this
    /// mask's coordinates. Scans rows top to bottom, then left to right.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let (x0, x1, y0, y1) = self.overlap_bounds(other, offset)?;
        for y in y0..y1 {
            let mut x = x0;
            while x < x1 {
                let hit = self.row_bits(x, y) & other.row_bits(x - offset.x, y - offset.y);
                let hit = mask_span(hit, x1 - x);
                if hit != 0 {
                    return Some(IVec2::new(x + hit.trailing_zeros() as i32, y));
                }
                x += WORD_BITS;
            }
        }
        None
    }

    /// Number of pixels opaque in both masks at the given offset
    pub fn overlap_area(&self, other: &Mask, offset: IVec2) -> u32 {
        let Some((x0, x1, y0, y1)) = self.overlap_bounds(other, offset) else {
            return 0;
        };
        let mut area = 0;
        for y in y0..y1 {
            let mut x = x0;
            while x < x1 {
                let hit = self.row_bits(x, y) & other.row_bits(x - offset.x, y - offset.y);
                area += mask_span(hit, x1 - x).count_ones();
                x += WORD_BITS;
            }
        }
        area
    }

    /// Intersection of the two rectangles in this mask's coordinates
    fn overlap_bounds(&self, other: &Mask, offset: IVec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width).min(self.width);
        let y1 = (offset.y + other.height).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, x1, y0, y1))
    }
}

/// Keep only the lowest `len` bits
#[inline]
fn mask_span(bits: u64, len: i32) -> u64 {
    if len >= WORD_BITS {
        bits
    } else {
        bits & ((1u64 << len) - 1)
    }
}
