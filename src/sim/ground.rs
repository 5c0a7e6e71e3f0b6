//! Scrolling ground strip
//!
//! Two copies of the ground sprite sit side by side. When one scrolls fully
//! past the left edge it jumps to just behind the other.

#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    /// Ground line (top of the sprite)
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
    /// Width of one segment
    pub width: f32,
}

impl Ground {
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Scroll both segments left and re-seat any that left the screen
    pub fn update(&mut self, speed: f32) {
        self.x1 -= speed;
        self.x2 -= speed;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }

    /// Do the two segments together cover `[0, view_width]` without a seam?
    pub fn covers(&self, view_width: f32) -> bool {
        let (left, right) = if self.x1 <= self.x2 {
            (self.x1, self.x2)
        } else {
            (self.x2, self.x1)
        };
        let contiguous = right <= left + self.width;
        contiguous && left <= 0.0 && right + self.width >= view_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reseat_behind_other_segment() {
        let mut ground = Ground::new(680.0, 672.0);
        for _ in 0..135 {
            ground.update(5.0);
        }
        // x1 hit -675 (< -672) and moved behind x2 = -3
        assert_eq!(ground.x2, -3.0);
        assert_eq!(ground.x1, 669.0);
        assert!(ground.covers(550.0));
    }

    #[test]
    fn test_segments_stay_adjacent() {
        let mut ground = Ground::new(680.0, 672.0);
        for _ in 0..2000 {
            ground.update(5.0);
            assert_eq!((ground.x1 - ground.x2).abs(), 672.0);
        }
    }

    proptest! {
        #[test]
        fn prop_no_seam_across_view(ticks in 0usize..3000, speed in 1u32..12) {
            let speed = speed as f32;
            let mut ground = Ground::new(680.0, 672.0);
            for _ in 0..ticks {
                ground.update(speed);
                prop_assert!(ground.covers(550.0), "seam at x1={} x2={}", ground.x1, ground.x2);
            }
        }
    }
}
