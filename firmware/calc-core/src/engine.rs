//! Immediate-execution evaluation engine
//!
//! Every operator press applies the previously pending operator right away,
//! left to right, with no precedence. A division by zero latches a sticky
//! error flag; from then on only a clear is honoured.
//!
//! ```text
//!            digit / operator / equals
//!   ┌──────────┐ ─────────────────────▶ ┌──────────┐
//!   │  Ready   │                        │ Running  │
//!   └──────────┘ ◀──────── clear ────── └────┬─────┘
//!        ▲                                   │ x / 0
//!        │            ┌──────────┐           │
//!        └── clear ── │  Error   │ ◀─────────┘
//!                     └──────────┘
//! ```

use core::fmt;

use crate::buffer::{InputBuffer, Rejected};
use crate::keypad::Key;

/// Binary operator on the keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Keypad symbol for this operator
    pub const fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Parse a keypad symbol
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Arithmetic faults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcError {
    DivisionByZero,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

/// Apply `op` to `(a, b)`.
///
/// With no operator the result is `b`; this happens when an operand is typed
/// right after `=` and a new operator is pressed.
pub fn apply(a: f64, b: f64, op: Option<Operator>) -> Result<f64, CalcError> {
    match op {
        Some(Operator::Add) => Ok(a + b),
        Some(Operator::Sub) => Ok(a - b),
        Some(Operator::Mul) => Ok(a * b),
        // -0.0 == 0.0, so both zeros are caught
        Some(Operator::Div) if b == 0.0 => Err(CalcError::DivisionByZero),
        Some(Operator::Div) => Ok(a / b),
        None => Ok(b),
    }
}

/// What a key press did to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// State updated (or deliberately left alone, e.g. a bare `=`)
    Accepted,
    /// Digit refused by the input buffer
    Rejected(Rejected),
    /// Engine is latched in error; only clear is honoured
    Blocked,
}

/// Calculator state. Only [`Calculator`] mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    accumulator: f64,
    has_accumulator: bool,
    pending: Option<Operator>,
    error: bool,
    input: InputBuffer,
}

impl CalculatorState {
    /// Power-on / cleared state
    pub const fn initial() -> Self {
        Self {
            accumulator: 0.0,
            has_accumulator: false,
            pending: None,
            error: false,
            input: InputBuffer::new(),
        }
    }

    /// Running value; meaningful only when [`has_accumulator`](Self::has_accumulator) is true
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn has_accumulator(&self) -> bool {
        self.has_accumulator
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The evaluation engine
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    state: CalculatorState,
}

impl Calculator {
    pub const fn new() -> Self {
        Self {
            state: CalculatorState::initial(),
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Dispatch a key to its handler
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Digit(d) => self.on_digit(d),
            Key::Operator(op) => self.on_operator(op),
            Key::Equals => self.on_equals(),
            Key::Clear => {
                self.on_clear();
                KeyOutcome::Accepted
            }
        }
    }

    /// Append a digit or decimal point to the operand being typed
    pub fn on_digit(&mut self, d: char) -> KeyOutcome {
        if self.state.error {
            return KeyOutcome::Blocked;
        }
        match self.state.input.append(d) {
            Ok(()) => KeyOutcome::Accepted,
            Err(reason) => KeyOutcome::Rejected(reason),
        }
    }

    /// Commit the typed operand and make `op` the pending operator.
    ///
    /// Pressing an operator straight after another one only swaps the
    /// pending operator; the accumulator is left alone.
    pub fn on_operator(&mut self, op: Operator) -> KeyOutcome {
        if self.state.error {
            return KeyOutcome::Blocked;
        }

        let value = self.state.input.parse_value();
        if !self.state.has_accumulator {
            self.state.accumulator = value;
            self.state.has_accumulator = true;
        } else if self.state.pending.is_some() || !self.state.input.is_empty() {
            self.apply_pending(value);
        }

        self.state.input.clear();
        self.state.pending = Some(op);
        KeyOutcome::Accepted
    }

    /// Finish the pending operation
    pub fn on_equals(&mut self) -> KeyOutcome {
        if self.state.error {
            return KeyOutcome::Blocked;
        }

        if !self.state.has_accumulator && !self.state.input.is_empty() {
            self.state.accumulator = self.state.input.parse_value();
            self.state.has_accumulator = true;
            self.state.pending = None;
            self.state.input.clear();
        } else if self.state.has_accumulator && self.state.pending.is_some() {
            let value = self.state.input.parse_value();
            self.apply_pending(value);
            self.state.pending = None;
            self.state.input.clear();
        }
        KeyOutcome::Accepted
    }

    /// Full reset; the only way out of the error state
    pub fn on_clear(&mut self) {
        self.state = CalculatorState::initial();
    }

    fn apply_pending(&mut self, value: f64) {
        match apply(self.state.accumulator, value, self.state.pending) {
            Ok(result) => self.state.accumulator = result,
            Err(err) => {
                log::debug!("{}: latching error", err);
                self.state.error = true;
                self.state.accumulator = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(calc: &mut Calculator, keys: &str) {
        for c in keys.chars() {
            let key = match c {
                'C' => Key::Clear,
                '=' => Key::Equals,
                c => match Operator::from_symbol(c) {
                    Some(op) => Key::Operator(op),
                    None => Key::Digit(c),
                },
            };
            calc.handle_key(key);
        }
    }

    #[test]
    fn test_apply() {
        assert_eq!(apply(2.0, 3.0, Some(Operator::Add)), Ok(5.0));
        assert_eq!(apply(2.0, 3.0, Some(Operator::Sub)), Ok(-1.0));
        assert_eq!(apply(2.0, 3.0, Some(Operator::Mul)), Ok(6.0));
        assert_eq!(apply(3.0, 2.0, Some(Operator::Div)), Ok(1.5));
        assert_eq!(apply(2.0, 3.0, None), Ok(3.0));
        assert_eq!(apply(5.0, 0.0, Some(Operator::Div)), Err(CalcError::DivisionByZero));
        assert_eq!(apply(5.0, -0.0, Some(Operator::Div)), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_seven_plus_three() {
        let mut calc = Calculator::new();
        press(&mut calc, "7+3=");
        let s = calc.state();
        assert_eq!(s.accumulator(), 10.0);
        assert!(s.has_accumulator());
        assert!(s.input().is_empty());
        assert_eq!(s.pending_operator(), None);
        assert!(!s.is_error());
    }

    #[test]
    fn test_left_to_right_evaluation() {
        let mut calc = Calculator::new();
        press(&mut calc, "2+3*4=");
        assert_eq!(calc.state().accumulator(), 20.0);
    }

    #[test]
    fn test_division_by_zero_is_sticky() {
        let mut calc = Calculator::new();
        press(&mut calc, "5/0=");
        assert!(calc.state().is_error());
        assert_eq!(calc.state().accumulator(), 0.0);

        let latched = calc.state().clone();
        assert_eq!(calc.handle_key(Key::Digit('2')), KeyOutcome::Blocked);
        assert_eq!(calc.handle_key(Key::Operator(Operator::Add)), KeyOutcome::Blocked);
        assert_eq!(calc.handle_key(Key::Equals), KeyOutcome::Blocked);
        assert_eq!(calc.state(), &latched);

        calc.handle_key(Key::Clear);
        assert_eq!(calc.state(), &CalculatorState::initial());
    }

    #[test]
    fn test_division_by_zero_on_operator() {
        let mut calc = Calculator::new();
        press(&mut calc, "8/0+");
        assert!(calc.state().is_error());
    }

    #[test]
    fn test_operator_override() {
        let mut calc = Calculator::new();
        press(&mut calc, "9+");
        let before = calc.state().accumulator();
        press(&mut calc, "-");
        assert_eq!(calc.state().accumulator(), before);
        assert_eq!(calc.state().pending_operator(), Some(Operator::Sub));

        press(&mut calc, "4=");
        assert_eq!(calc.state().accumulator(), 5.0);
    }

    #[test]
    fn test_first_value_finalize() {
        let mut calc = Calculator::new();
        press(&mut calc, "42=");
        assert!(calc.state().has_accumulator());
        assert_eq!(calc.state().accumulator(), 42.0);
        assert!(calc.state().input().is_empty());
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let mut calc = Calculator::new();
        press(&mut calc, "6*7=");
        let done = calc.state().clone();
        press(&mut calc, "==");
        assert_eq!(calc.state(), &done);

        let mut fresh = Calculator::new();
        press(&mut fresh, "=");
        assert_eq!(fresh.state(), &CalculatorState::initial());
    }

    #[test]
    fn test_operand_after_equals_replaces_result() {
        // Nothing pending, so the new operand passes through unchanged
        let mut calc = Calculator::new();
        press(&mut calc, "7=3+");
        assert_eq!(calc.state().accumulator(), 3.0);
        press(&mut calc, "1=");
        assert_eq!(calc.state().accumulator(), 4.0);
    }

    #[test]
    fn test_operator_without_operand_uses_zero() {
        let mut calc = Calculator::new();
        press(&mut calc, "+5=");
        assert_eq!(calc.state().accumulator(), 5.0);
    }

    #[test]
    fn test_clear_from_any_state() {
        for keys in ["", "7", "7+", "7+3", "7+3=", "1.5*", "5/0=", "..."] {
            let mut calc = Calculator::new();
            press(&mut calc, keys);
            calc.on_clear();
            assert_eq!(calc.state(), &CalculatorState::initial(), "after {:?}", keys);
        }
    }

    #[test]
    fn test_digit_rejections_reported() {
        let mut calc = Calculator::new();
        press(&mut calc, "1.");
        assert_eq!(
            calc.handle_key(Key::Digit('.')),
            KeyOutcome::Rejected(Rejected::DuplicateDecimal)
        );
        assert_eq!(calc.state().input().as_str(), "1.");
    }
}
