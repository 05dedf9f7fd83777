//! Software pixel grid used by headless presentation.

use invaders_core::{Rect, SpriteSize};

use crate::Color;

/// Row-major grid of `0xAARRGGBB` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Creates a transparent black frame buffer.
    #[must_use]
    pub fn new(size: SpriteSize) -> Self {
        let len = size.width() as usize * size.height() as usize;
        Self {
            width: size.width(),
            height: size.height(),
            pixels: vec![0; len],
        }
    }

    /// Dimensions of the buffer.
    #[must_use]
    pub const fn size(&self) -> SpriteSize {
        SpriteSize::new(self.width, self.height)
    }

    /// Every pixel in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Paints the part of `rect` that lies inside the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let left = rect.left().clamp(0, i64::from(self.width));
        let right = rect.right().clamp(0, i64::from(self.width));
        let top = rect.top().clamp(0, i64::from(self.height));
        let bottom = rect.bottom().clamp(0, i64::from(self.height));
        if left >= right || top >= bottom {
            return;
        }

        let pixel = color.to_argb();
        let width = self.width as usize;
        for row in top as usize..bottom as usize {
            let start = row * width;
            self.pixels[start + left as usize..start + right as usize].fill(pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::ScreenPoint;

    fn rect(x: i32, y: i32, width: u32, height: u32) -> Rect {
        Rect::from_origin_and_size(ScreenPoint::new(x, y), SpriteSize::new(width, height))
    }

    #[test]
    fn fill_covers_exactly_the_rectangle() {
        let mut frame = FrameBuffer::new(SpriteSize::new(8, 8));
        let red = Color::from_rgb_u8(255, 0, 0);

        frame.fill_rect(rect(2, 3, 2, 1), red);

        assert_eq!(frame.pixel(2, 3), Some(red.to_argb()));
        assert_eq!(frame.pixel(3, 3), Some(red.to_argb()));
        assert_eq!(frame.pixel(4, 3), Some(0));
        assert_eq!(frame.pixel(2, 4), Some(0));
        assert_eq!(frame.pixels().iter().filter(|pixel| **pixel != 0).count(), 2);
    }

    #[test]
    fn fill_clips_to_buffer_edges() {
        let mut frame = FrameBuffer::new(SpriteSize::new(4, 4));
        let blue = Color::from_rgb_u8(0, 0, 255);

        frame.fill_rect(rect(-2, -2, 4, 4), blue);
        frame.fill_rect(rect(3, 3, 10, 10), blue);
        frame.fill_rect(rect(-50, 0, 10, 10), blue);

        assert_eq!(frame.pixel(0, 0), Some(blue.to_argb()));
        assert_eq!(frame.pixel(1, 1), Some(blue.to_argb()));
        assert_eq!(frame.pixel(2, 2), Some(0));
        assert_eq!(frame.pixel(3, 3), Some(blue.to_argb()));
        assert_eq!(frame.pixel(4, 4), None);
    }

    #[test]
    fn later_fills_occlude_earlier_ones() {
        let mut frame = FrameBuffer::new(SpriteSize::new(4, 4));
        let back = Color::from_rgb_u8(10, 10, 10);
        let front = Color::from_rgb_u8(200, 200, 200);

        frame.fill_rect(rect(0, 0, 4, 4), back);
        frame.fill_rect(rect(1, 1, 1, 1), front);

        assert_eq!(frame.pixel(1, 1), Some(front.to_argb()));
        assert_eq!(frame.pixel(0, 0), Some(back.to_argb()));
    }
}
