//! # Touch Calculator Core
//!
//! Allocation-free calculator logic for the STM32F429 Discovery touch
//! calculator (ILI9341 panel + STMPE811 touch controller).
//!
//! - **Input buffer**: bounded operand text typed on the keypad
//! - **Engine**: immediate-execution accumulator with a sticky error flag
//! - **Keypad**: compile-time button table with inclusive hit-testing
//! - **Dispatch**: press/hold/release classification, one activation per press
//! - **Render gate**: decides when the readout needs repainting
//!
//! # Control Flow
//!
//! ```text
//!  TouchSource ──sample──▶ TouchDispatcher ──hit_test──▶ Keypad
//!                               │
//!                          Activated(i)
//!                               ▼
//!                          Calculator ──mutates──▶ InputBuffer
//!                               │
//!                               ▼
//!                          RenderGate ──refresh?──▶ display sink
//! ```
//!
//! # Usage
//!
//! ```
//! use calc_core::{Calculator, Key, Operator};
//!
//! let mut calc = Calculator::new();
//! calc.handle_key(Key::Digit('7'));
//! calc.handle_key(Key::Operator(Operator::Add));
//! calc.handle_key(Key::Digit('3'));
//! calc.handle_key(Key::Equals);
//!
//! assert_eq!(calc.state().accumulator(), 10.0);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod buffer;
pub mod dispatch;
pub mod engine;
pub mod format;
pub mod keypad;
pub mod render;

pub use buffer::{InputBuffer, Rejected, INPUT_CAPACITY};
pub use dispatch::{DispatchEvent, PointerStatus, TouchDispatcher, TouchSample, TouchSource};
pub use engine::{apply, CalcError, Calculator, CalculatorState, KeyOutcome, Operator};
pub use format::{format_general, NumberText};
pub use keypad::{
    Button, ButtonKind, Geometry, GeometryError, Key, Keypad, Rect, BUTTON_COUNT, STANDARD_KEYPAD,
};
pub use render::RenderGate;
