//! Operand input buffer
//!
//! Holds the digits and decimal point typed for the operand that has not
//! been committed to the accumulator yet. Capacity is fixed; appends past
//! the limit are refused the way a physical keypad ignores extra digits.

use core::fmt;

/// Maximum number of visible characters in the operand buffer
pub const INPUT_CAPACITY: usize = 16;

/// Reason an append was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejected {
    /// Buffer already holds `INPUT_CAPACITY` characters
    Full,
    /// A decimal point is already present
    DuplicateDecimal,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::Full => write!(f, "input buffer full"),
            Rejected::DuplicateDecimal => write!(f, "decimal point already entered"),
        }
    }
}

/// Bounded operand text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: heapless::String<INPUT_CAPACITY>,
}

impl InputBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            text: heapless::String::new(),
        }
    }

    /// Append one character.
    ///
    /// Refused when the buffer is full, or when `c` is `'.'` and a decimal
    /// point was already typed. A refused append leaves the buffer untouched.
    pub fn append(&mut self, c: char) -> Result<(), Rejected> {
        if self.text.len() + c.len_utf8() > INPUT_CAPACITY {
            return Err(Rejected::Full);
        }
        if c == '.' && self.has_decimal() {
            return Err(Rejected::DuplicateDecimal);
        }
        self.text.push(c).map_err(|_| Rejected::Full)
    }

    /// Reset to empty
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Numeric value of the typed operand; empty parses as `0.0`
    pub fn parse_value(&self) -> f64 {
        if self.text.is_empty() {
            return 0.0;
        }
        scan_decimal(&self.text)
    }

    pub fn has_decimal(&self) -> bool {
        self.text.contains('.')
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Lenient decimal scanner with `atof` semantics.
///
/// Accepts optional leading whitespace, an optional sign, digits with at
/// most one point and an optional exponent. Whatever follows the longest
/// numeric prefix is ignored; no numeric prefix at all yields `0.0`.
pub fn scan_decimal(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows the marker
    let mantissa_end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let numeral = &text[start..i];
    numeral
        .parse::<f64>()
        .or_else(|_| text[start..mantissa_end].parse::<f64>())
        .unwrap_or(0.0)
}
