//! RGB565 framebuffer
//!
//! Off-screen copy of the 240×320 portrait panel. Implements
//! embedded-graphics' `DrawTarget`, so it can stand in for the ILI9341 in
//! tests and in the host simulator, or back a DMA flush on target.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::Color;

/// Panel width in portrait orientation
pub const WIDTH: u16 = 240;
/// Panel height in portrait orientation
pub const HEIGHT: u16 = 320;

const PIXELS: usize = WIDTH as usize * HEIGHT as usize;

/// Framebuffer for the 240×320 RGB565 panel
pub struct Framebuffer {
    buffer: [u16; PIXELS],
}

impl Framebuffer {
    /// Create a new framebuffer initialized to black
    pub const fn new() -> Self {
        Self {
            buffer: [0; PIXELS],
        }
    }

    /// Get pixel at coordinates
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x < WIDTH && y < HEIGHT {
            Some(Color(self.buffer[Self::index(x, y)]))
        } else {
            None
        }
    }

    /// Set pixel at coordinates (bounds-checked)
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool {
        if x < WIDTH && y < HEIGHT {
            self.buffer[Self::index(x, y)] = color.0;
            true
        } else {
            false
        }
    }

    /// Clear framebuffer to a solid color
    pub fn clear_to(&mut self, color: Color) {
        self.buffer.fill(color.0);
    }

    /// Raw pixels, row-major
    pub fn as_slice(&self) -> &[u16] {
        &self.buffer
    }

    /// Rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.buffer.chunks_exact(WIDTH as usize)
    }

    const fn index(x: u16, y: u16) -> usize {
        y as usize * WIDTH as usize + x as usize
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
                continue;
            }
            self.buffer[Self::index(x as u16, y as u16)] = color.into_storage();
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        let raw = color.into_storage();
        let (left, right) = (area.top_left.x as usize, bottom_right.x as usize);
        for y in area.top_left.y..=bottom_right.y {
            let row = y as usize * WIDTH as usize;
            self.buffer[row + left..=row + right].fill(raw);
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_pixel_bounds() {
        let mut fb = Framebuffer::new();
        assert!(fb.set_pixel(239, 319, Color::RED));
        assert!(!fb.set_pixel(240, 0, Color::RED));
        assert!(!fb.set_pixel(0, 320, Color::RED));
        assert_eq!(fb.get_pixel(239, 319), Some(Color::RED));
        assert_eq!(fb.get_pixel(240, 319), None);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_solid_clips_to_panel() {
        let mut fb = Framebuffer::new();
        Rectangle::new(Point::new(230, 310), Size::new(50, 50))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(Color::GREEN)))
            .draw(&mut fb)
            .unwrap();

        assert_eq!(fb.get_pixel(230, 310), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(239, 319), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(229, 310), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(230, 309), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_iter_skips_negative_coordinates() {
        let mut fb = Framebuffer::new();
        let pixels = [
            Pixel(Point::new(-1, 0), Rgb565::from(Color::WHITE)),
            Pixel(Point::new(0, -1), Rgb565::from(Color::WHITE)),
            Pixel(Point::new(1, 1), Rgb565::from(Color::WHITE)),
        ];
        fb.draw_iter(pixels).unwrap();
        assert_eq!(fb.as_slice().iter().filter(|&&p| p == 0xFFFF).count(), 1);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_rows() {
        let mut fb = Framebuffer::new();
        fb.clear_to(Color::GRAY);
        assert_eq!(fb.rows().count(), HEIGHT as usize);
        assert!(fb.rows().all(|row| row.len() == WIDTH as usize));
        assert!(fb.as_slice().iter().all(|&p| p == Color::GRAY.0));
    }
}
