//! embedded-graphics adapter
//!
//! Wraps any `DrawTarget<Color = Rgb565>` (an ILI9341 driver, the
//! [`Framebuffer`](super::framebuffer::Framebuffer), a simulator window) so
//! the painter can draw on it.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
};
use embedded_graphics::text::{Baseline, Text};

use super::{Color, DisplaySink};

pub struct GraphicsSink<D> {
    target: D,
}

impl<D> GraphicsSink<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn area(x: u16, y: u16, w: u16, h: u16) -> Rectangle {
    Rectangle::new(Point::new(x as i32, y as i32), Size::new(w as u32, h as u32))
}

impl<D> DisplaySink for GraphicsSink<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) {
        area(x, y, w, h)
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(color)))
            .draw(&mut self.target)
            .ok();
    }

    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(Rgb565::from(color))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        area(x, y, w, h).into_styled(style).draw(&mut self.target).ok();
    }

    fn text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        font: &'static MonoFont<'static>,
        fg: Color,
        bg: Color,
    ) {
        let style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(Rgb565::from(fg))
            .background_color(Rgb565::from(bg))
            .build();
        Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(&mut self.target)
            .ok();
    }
}
