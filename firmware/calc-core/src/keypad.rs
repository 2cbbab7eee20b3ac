//! Keypad layout and hit-testing
//!
//! The keypad is a fixed table built at compile time from a [`Geometry`].
//! Sixteen keys form a 4×4 grid under the readout, followed by a
//! full-width `=` bar:
//!
//! ```text
//! ┌────┬────┬────┬────┐
//! │ 7  │ 8  │ 9  │ /  │
//! ├────┼────┼────┼────┤
//! │ 4  │ 5  │ 6  │ *  │
//! ├────┼────┼────┼────┤
//! │ 1  │ 2  │ 3  │ -  │
//! ├────┼────┼────┼────┤
//! │ 0  │ .  │ C  │ +  │
//! ├────┴────┴────┴────┤
//! │         =         │
//! └───────────────────┘
//! ```

use core::fmt;

use crate::engine::Operator;

/// Columns in the key grid
pub const GRID_COLUMNS: u16 = 4;
/// Rows in the key grid (the `=` bar is an extra row below)
pub const GRID_ROWS: u16 = 4;
/// Grid keys plus the `=` bar
pub const BUTTON_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize + 1;

/// Semantic action of a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Digit `0-9` or decimal point
    Digit(char),
    Operator(Operator),
    Clear,
    Equals,
}

/// Key category, used for coloring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    Digit,
    Operator,
    Clear,
    Equals,
}

impl Key {
    pub const fn kind(self) -> ButtonKind {
        match self {
            Key::Digit(_) => ButtonKind::Digit,
            Key::Operator(_) => ButtonKind::Operator,
            Key::Clear => ButtonKind::Clear,
            Key::Equals => ButtonKind::Equals,
        }
    }
}

/// Screen rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Point containment with inclusive bounds on all four edges,
    /// i.e. `x ∈ [x, x + w]` and `y ∈ [y, y + h]`.
    pub const fn contains(&self, px: u16, py: u16) -> bool {
        let (px, py) = (px as u32, py as u32);
        let (x, y) = (self.x as u32, self.y as u32);
        px >= x && px <= x + self.w as u32 && py >= y && py <= y + self.h as u32
    }

    pub const fn center(&self) -> (u16, u16) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// One physical key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub rect: Rect,
    pub key: Key,
}

impl Button {
    pub const fn kind(&self) -> ButtonKind {
        self.key.kind()
    }
}

/// Labels in grid order, row by row
const GRID_KEYS: [(&str, Key); (GRID_COLUMNS * GRID_ROWS) as usize] = [
    ("7", Key::Digit('7')),
    ("8", Key::Digit('8')),
    ("9", Key::Digit('9')),
    ("/", Key::Operator(Operator::Div)),
    ("4", Key::Digit('4')),
    ("5", Key::Digit('5')),
    ("6", Key::Digit('6')),
    ("*", Key::Operator(Operator::Mul)),
    ("1", Key::Digit('1')),
    ("2", Key::Digit('2')),
    ("3", Key::Digit('3')),
    ("-", Key::Operator(Operator::Sub)),
    ("0", Key::Digit('0')),
    (".", Key::Digit('.')),
    ("C", Key::Clear),
    ("+", Key::Operator(Operator::Add)),
];

/// Keypad placement on the panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub screen_width: u16,
    pub screen_height: u16,
    /// Height of the readout area above the keypad
    pub display_height: u16,
    /// Gap between neighbouring keys
    pub spacing: u16,
    /// Left/right margin of the grid
    pub start_x: u16,
    /// Top of the first key row
    pub start_y: u16,
    pub button_height: u16,
}

impl Geometry {
    /// ILI9341 in portrait orientation, 240×320
    pub const STANDARD: Geometry = Geometry {
        screen_width: 240,
        screen_height: 320,
        display_height: 80,
        spacing: 4,
        start_x: 6,
        start_y: 80 + 10,
        button_height: 42,
    };

    /// Key width so that the grid spans the screen between the margins
    pub const fn button_width(&self) -> u16 {
        self.screen_width
            .saturating_sub(self.start_x.saturating_mul(2))
            .saturating_sub(self.spacing.saturating_mul(GRID_COLUMNS - 1))
            / GRID_COLUMNS
    }

    /// Rectangle of the key at `(col, row)`
    pub const fn cell(&self, col: u16, row: u16) -> Rect {
        let w = self.button_width();
        Rect::new(
            self.start_x + col * (w + self.spacing),
            self.start_y + row * (self.button_height + self.spacing),
            w,
            self.button_height,
        )
    }

    /// The full-width `=` bar below the grid
    pub const fn equals_bar(&self) -> Rect {
        let cell = self.cell(0, GRID_ROWS);
        Rect::new(
            cell.x,
            cell.y,
            cell.w * GRID_COLUMNS + self.spacing * (GRID_COLUMNS - 1),
            cell.h,
        )
    }

    /// Backdrop painted behind the keys, down to the bottom of the screen
    pub const fn keypad_area(&self) -> Rect {
        let top = self.start_y.saturating_sub(self.spacing);
        Rect::new(0, top, self.screen_width, self.screen_height.saturating_sub(top))
    }

    /// Check that every key is non-empty and lands on the panel below the readout
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.button_width() == 0 || self.button_height == 0 {
            return Err(GeometryError::EmptyButtons);
        }
        if self.start_y < self.display_height {
            return Err(GeometryError::OverlapsReadout);
        }
        // Widened so that absurd values report an error instead of overflowing
        let pitch = self.button_height as u32 + self.spacing as u32;
        let bottom = self.start_y as u32 + GRID_ROWS as u32 * pitch + self.button_height as u32;
        if bottom > self.screen_height as u32 {
            return Err(GeometryError::OffScreen {
                bottom,
                screen_height: self.screen_height,
            });
        }
        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Invalid keypad geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    EmptyButtons,
    OverlapsReadout,
    OffScreen { bottom: u32, screen_height: u16 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::EmptyButtons => write!(f, "keys have zero width or height"),
            GeometryError::OverlapsReadout => write!(f, "keypad starts inside the readout area"),
            GeometryError::OffScreen { bottom, screen_height } => write!(
                f,
                "keypad ends at y={} but the screen is {} pixels tall",
                bottom, screen_height
            ),
        }
    }
}

/// Immutable button table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keypad {
    geometry: Geometry,
    buttons: [Button; BUTTON_COUNT],
}

impl Keypad {
    /// Lay out the keypad for `geometry`
    pub const fn new(geometry: Geometry) -> Self {
        let placeholder = Button {
            label: "=",
            rect: geometry.equals_bar(),
            key: Key::Equals,
        };
        let mut buttons = [placeholder; BUTTON_COUNT];

        let mut i = 0;
        while i < GRID_KEYS.len() {
            let (label, key) = GRID_KEYS[i];
            let col = i as u16 % GRID_COLUMNS;
            let row = i as u16 / GRID_COLUMNS;
            buttons[i] = Button {
                label,
                rect: geometry.cell(col, row),
                key,
            };
            i += 1;
        }

        Self { geometry, buttons }
    }

    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    /// First button in table order containing the point
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.buttons.iter().position(|b| b.rect.contains(x, y))
    }

    /// Index of the button carrying `label`
    pub fn find_label(&self, label: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.label == label)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        STANDARD_KEYPAD
    }
}

/// Keypad for the standard ILI9341 portrait layout
pub const STANDARD_KEYPAD: Keypad = Keypad::new(Geometry::STANDARD);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_geometry() {
        let g = Geometry::STANDARD;
        assert_eq!(g.button_width(), 54);
        assert_eq!(g.cell(0, 0), Rect::new(6, 90, 54, 42));
        assert_eq!(g.cell(3, 3), Rect::new(6 + 3 * 58, 90 + 3 * 46, 54, 42));
        assert_eq!(g.equals_bar(), Rect::new(6, 274, 228, 42));
        assert_eq!(g.keypad_area(), Rect::new(0, 86, 240, 234));
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_table_order() {
        let labels: [&str; BUTTON_COUNT] = [
            "7", "8", "9", "/", "4", "5", "6", "*", "1", "2", "3", "-", "0", ".", "C", "+", "=",
        ];
        for (button, label) in STANDARD_KEYPAD.buttons().iter().zip(labels) {
            assert_eq!(button.label, label);
        }
        assert_eq!(STANDARD_KEYPAD.button(3).unwrap().key, Key::Operator(Operator::Div));
        assert_eq!(STANDARD_KEYPAD.button(14).unwrap().kind(), ButtonKind::Clear);
        assert_eq!(STANDARD_KEYPAD.button(16).unwrap().kind(), ButtonKind::Equals);
    }

    #[test]
    fn test_hit_test_inclusive_edges() {
        let keypad = &STANDARD_KEYPAD;
        // Key "7" spans x 6..=60, y 90..=132
        assert_eq!(keypad.hit_test(6, 90), Some(0));
        assert_eq!(keypad.hit_test(60, 132), Some(0));
        assert_eq!(keypad.hit_test(33, 111), Some(0));
        // Gap between "7" and "8"
        assert_eq!(keypad.hit_test(61, 100), None);
        assert_eq!(keypad.hit_test(63, 100), None);
        assert_eq!(keypad.hit_test(64, 100), Some(1));
        // Readout area and margins
        assert_eq!(keypad.hit_test(120, 40), None);
        assert_eq!(keypad.hit_test(2, 100), None);
        // Equals bar
        assert_eq!(keypad.hit_test(200, 300), Some(16));
    }

    #[test]
    fn test_shared_edge_resolves_to_earlier_button() {
        let geometry = Geometry {
            spacing: 0,
            ..Geometry::STANDARD
        };
        let keypad = Keypad::new(geometry);
        let right_edge = keypad.button(0).unwrap().rect.x + keypad.button(0).unwrap().rect.w;
        assert_eq!(keypad.button(1).unwrap().rect.x, right_edge);
        assert_eq!(keypad.hit_test(right_edge, 100), Some(0));
        assert_eq!(keypad.hit_test(right_edge + 1, 100), Some(1));
    }

    #[test]
    fn test_find_label() {
        assert_eq!(STANDARD_KEYPAD.find_label("5"), Some(5));
        assert_eq!(STANDARD_KEYPAD.find_label("="), Some(16));
        assert_eq!(STANDARD_KEYPAD.find_label("%"), None);
    }

    #[test]
    fn test_validate_rejects_offscreen_keypad() {
        let tall = Geometry {
            button_height: 55,
            ..Geometry::STANDARD
        };
        assert_eq!(
            tall.validate(),
            Err(GeometryError::OffScreen {
                bottom: 90 + 4 * 59 + 55,
                screen_height: 320
            })
        );

        let flat = Geometry {
            button_height: 0,
            ..Geometry::STANDARD
        };
        assert_eq!(flat.validate(), Err(GeometryError::EmptyButtons));

        let high = Geometry {
            start_y: 40,
            ..Geometry::STANDARD
        };
        assert_eq!(high.validate(), Err(GeometryError::OverlapsReadout));
    }
}
