//! Number rendering for the readout
//!
//! Values are shown the way C's `%.6g` prints them: six significant digits,
//! trailing zeros dropped, switching to exponent form below `1e-4` or from
//! `1e6` upwards.

use core::fmt::{self, Write};

/// Capacity of a rendered number
pub const NUMBER_TEXT_CAPACITY: usize = 24;

/// Rendered number, no heap involved
pub type NumberText = heapless::String<NUMBER_TEXT_CAPACITY>;

/// Significant digits
const PRECISION: i32 = 6;

/// Render `value` with `%.6g` semantics
pub fn format_general(value: f64) -> NumberText {
    let mut out = NumberText::new();
    // Longest output is "-1.23457e-308", so this cannot run out of room
    let _ = write_general(&mut out, value);
    out
}

fn write_general(out: &mut NumberText, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    // The decimal exponent after rounding picks the style
    let mut scientific = NumberText::new();
    write!(scientific, "{:.*e}", (PRECISION - 1) as usize, value)?;
    let (mantissa, exponent) = scientific.split_once('e').ok_or(fmt::Error)?;
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        write!(out, "{:.*}", decimals, value)?;
        trim_fraction(out);
    } else {
        out.push_str(mantissa).map_err(|_| fmt::Error)?;
        trim_fraction(out);
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "e{}{:02}", sign, exponent.unsigned_abs())?;
    }
    Ok(())
}

fn trim_fraction(text: &mut NumberText) {
    if !text.contains('.') {
        return;
    }
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
}
