//! Screen painter
//!
//! Turns calculator and pointer state into drawing calls. Nothing here
//! decides *when* to draw; the control loop asks the render gate first.

use core::fmt::{self, Write};

use calc_core::{
    format_general, Button, ButtonKind, CalculatorState, Geometry, Keypad, PointerStatus,
};
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::MonoFont;

use crate::display::{Color, DisplaySink};

/// Font for the readout and the key labels
pub const FONT: &MonoFont<'static> = &FONT_10X20;

/// Left edge of the readout text
const READOUT_X: u16 = 5;
/// Top of each readout line
const READOUT_LINES_Y: [u16; 3] = [5, 30, 55];

/// One line of readout text
pub type ReadoutLine = heapless::String<32>;

/// Screen colors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Whole-panel fill at power-on
    pub screen: Color,
    pub readout_bg: Color,
    /// Status line (`Input:` / `Result:` / `Ready` / error)
    pub status: Color,
    /// `Op:` line
    pub operator: Color,
    /// `Touch:` line
    pub pointer: Color,
    pub keypad_bg: Color,
    pub digit_key: Color,
    pub operator_key: Color,
    pub clear_key: Color,
    pub equals_key: Color,
    pub pressed_key: Color,
    pub key_outline: Color,
    pub key_label: Color,
}

impl Theme {
    /// Black readout over a dark grey keypad
    pub const fn classic() -> Self {
        Self {
            screen: Color::GRAY,
            readout_bg: Color::BLACK,
            status: Color::GREEN,
            operator: Color::LIGHT_GRAY,
            pointer: Color::YELLOW,
            keypad_bg: Color::DARK_GRAY,
            digit_key: Color::LIGHT_GRAY,
            operator_key: Color::ORANGE,
            clear_key: Color::RED,
            equals_key: Color::GREEN,
            pressed_key: Color::YELLOW,
            key_outline: Color::BLACK,
            key_label: Color::BLACK,
        }
    }

    /// Resting fill for a key of `kind`
    pub const fn key_color(&self, kind: ButtonKind) -> Color {
        match kind {
            ButtonKind::Digit => self.digit_key,
            ButtonKind::Operator => self.operator_key,
            ButtonKind::Clear => self.clear_key,
            ButtonKind::Equals => self.equals_key,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// The three readout lines, top to bottom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readout {
    pub status: ReadoutLine,
    pub operator: ReadoutLine,
    pub pointer: ReadoutLine,
}

impl Readout {
    /// Compose the readout for the given state
    pub fn compose(state: &CalculatorState, pointer: &PointerStatus) -> Self {
        let status = if state.is_error() {
            line(format_args!("Error: invalid op"))
        } else if !state.input().is_empty() {
            line(format_args!("Input: {}", state.input().as_str()))
        } else if state.has_accumulator() {
            line(format_args!("Result: {}", format_general(state.accumulator())))
        } else {
            line(format_args!("Ready"))
        };

        let operator = match state.pending_operator() {
            Some(op) => line(format_args!("Op: {}", op)),
            None => line(format_args!("Op: none")),
        };

        let pointer = if pointer.pressed {
            line(format_args!("Touch: {:3},{:3}", pointer.x, pointer.y))
        } else {
            line(format_args!("Touch: ---"))
        };

        Self {
            status,
            operator,
            pointer,
        }
    }

    pub fn lines(&self) -> [&str; 3] {
        [self.status.as_str(), self.operator.as_str(), self.pointer.as_str()]
    }
}

fn line(args: fmt::Arguments<'_>) -> ReadoutLine {
    let mut text = ReadoutLine::new();
    // Longest line is "Input: " plus a full buffer, which fits
    let _ = text.write_fmt(args);
    text
}

/// Repaint the readout area
pub fn draw_readout<S: DisplaySink>(
    sink: &mut S,
    geometry: &Geometry,
    theme: &Theme,
    readout: &Readout,
) {
    sink.fill_rect(0, 0, geometry.screen_width, geometry.display_height, theme.readout_bg);

    let colors = [theme.status, theme.operator, theme.pointer];
    for ((text, y), fg) in readout.lines().into_iter().zip(READOUT_LINES_Y).zip(colors) {
        sink.text(READOUT_X, y, text, FONT, fg, theme.readout_bg);
    }
}

/// Paint the keypad backdrop and every key at rest
pub fn draw_keypad<S: DisplaySink>(sink: &mut S, keypad: &Keypad, theme: &Theme) {
    let backdrop = keypad.geometry().keypad_area();
    sink.fill_rect(backdrop.x, backdrop.y, backdrop.w, backdrop.h, theme.keypad_bg);

    for button in keypad.buttons() {
        draw_button(sink, button, theme, false);
    }
}

/// Paint one key, highlighted while `pressed`
pub fn draw_button<S: DisplaySink>(sink: &mut S, button: &Button, theme: &Theme, pressed: bool) {
    let rect = button.rect;
    let fill = if pressed {
        theme.pressed_key
    } else {
        theme.key_color(button.kind())
    };

    sink.fill_rect(rect.x, rect.y, rect.w, rect.h, fill);
    sink.draw_rect(rect.x, rect.y, rect.w, rect.h, theme.key_outline);

    let glyph = FONT.character_size;
    let text_w = (glyph.width as usize * button.label.chars().count()) as u16;
    let text_h = glyph.height as u16;
    let x = rect.x + rect.w.saturating_sub(text_w) / 2;
    let y = rect.y + rect.h.saturating_sub(text_h) / 2;
    sink.text(x, y, button.label, FONT, theme.key_label, fill);
}
