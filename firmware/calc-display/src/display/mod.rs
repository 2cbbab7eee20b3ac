//! Display sink abstraction
//!
//! The painter only needs three primitives from the panel: solid
//! rectangles, one pixel outlines and text on an opaque background. Any
//! driver offering those can host the calculator.

pub mod framebuffer;
pub mod graphics;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};

/// RGB565 color (16-bit: 5 red, 6 green, 5 blue)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const ORANGE: Color = Color(0xFDA0);
    pub const GRAY: Color = Color::from_rgb(128, 128, 128);
    pub const DARK_GRAY: Color = Color::from_rgb(64, 64, 64);
    pub const LIGHT_GRAY: Color = Color::from_rgb(192, 192, 192);

    /// Create RGB565 from RGB888 components
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r5 = (r >> 3) as u16;
        let g6 = (g >> 2) as u16;
        let b5 = (b >> 3) as u16;
        Self((r5 << 11) | (g6 << 5) | b5)
    }

    /// Expand to RGB888, replicating the high bits into the low ones
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        Rgb565::from(RawU16::new(color.0))
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        Color(color.into_storage())
    }
}

/// Drawing primitives the screen painter needs.
///
/// Calls are fire and forget; a sink clips whatever falls off the panel.
pub trait DisplaySink {
    /// Fill a `w`×`h` rectangle
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color);

    /// One pixel outline just inside the `w`×`h` rectangle
    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color);

    /// Draw `text` with its top-left corner at `(x, y)`
    fn text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        font: &'static MonoFont<'static>,
        fg: Color,
        bg: Color,
    );
}
