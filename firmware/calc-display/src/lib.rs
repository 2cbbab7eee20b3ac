//! # Touch Calculator Display
//!
//! Everything between [`calc_core`] and the pixels: the display sink
//! abstraction, an embedded-graphics adapter, an RGB565 framebuffer, the
//! screen painter and the control loop that ties them together.
//!
//! ```text
//! ┌──────────────────────────┐  0
//! │ Result: 10               │
//! │ Op: none                 │  readout (80 px)
//! │ Touch: ---               │
//! ├──────────────────────────┤  86
//! │  keypad (4×4 + "=" bar)  │
//! └──────────────────────────┘  320
//! ```
//!
//! The loop is generic over the two hardware collaborators. On target the
//! ILI9341 driver provides a [`DisplaySink`] (directly or as an
//! embedded-graphics `DrawTarget` through [`GraphicsSink`]) and the STMPE811
//! driver a [`calc_core::TouchSource`].

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod display;
pub mod view;

pub use app::{CalculatorApp, Tick};
pub use display::framebuffer::{Framebuffer, HEIGHT, WIDTH};
pub use display::graphics::GraphicsSink;
pub use display::{Color, DisplaySink};
pub use view::{Readout, ReadoutLine, Theme};
