//! Monochrome frame buffer
//!
//! 128x64 pixels, 1 bit per pixel, stored as eight 8-pixel-tall pages. This
//! matches the memory layout of SH1106/SSD1306 controllers, so a page can be
//! sent to the panel as-is.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;

#[derive(Clone)]
pub struct FrameBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Raw column bytes of one page
    pub fn page(&self, index: usize) -> &[u8; WIDTH] {
        &self.pages[index]
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// True if any pixel is lit
    pub fn any_lit(&self) -> bool {
        self.pages.iter().flatten().any(|&b| b != 0)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1 << (y % 8);
            match color {
                BinaryColor::On => self.pages[y / 8][x] |= bit,
                BinaryColor::Off => self.pages[y / 8][x] &= !bit,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_layout() {
        let mut fb = FrameBuffer::new();
        fb.draw_iter([Pixel(Point::new(3, 9), BinaryColor::On)]).unwrap();

        assert!(fb.pixel(3, 9));
        assert_eq!(fb.page(1)[3], 0b0000_0010);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new();
        fb.draw_iter([
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(0, 64), BinaryColor::On),
            Pixel(Point::new(128, 0), BinaryColor::On),
        ])
        .unwrap();
        assert!(!fb.any_lit());
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw_iter([Pixel(Point::new(0, 0), BinaryColor::On)]).unwrap();
        fb.clear(BinaryColor::Off).unwrap();
        assert!(!fb.any_lit());
    }
}
