//! Readout refresh gating
//!
//! The readout is repainted only when the calculator state changed or the
//! pointer status differs from what was last painted. Everything else is
//! left on the panel untouched, which keeps SPI traffic down and stops the
//! text from flickering while a finger rests on the glass.

use crate::dispatch::PointerStatus;

#[derive(Clone, Copy, Debug)]
pub struct RenderGate {
    dirty: bool,
    last: PointerStatus,
}

impl RenderGate {
    /// A fresh gate always asks for the first paint
    pub const fn new() -> Self {
        Self {
            dirty: true,
            last: PointerStatus::RELEASED,
        }
    }

    /// Flag a calculator state change
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the readout must be repainted for `pointer`
    pub fn needs_refresh(&self, pointer: &PointerStatus) -> bool {
        self.dirty || self.last != *pointer
    }

    /// Record that the readout now shows `pointer`
    pub fn rendered(&mut self, pointer: PointerStatus) {
        self.dirty = false;
        self.last = pointer;
    }

    /// Pointer status currently on screen
    pub fn last_rendered(&self) -> PointerStatus {
        self.last
    }
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new()
    }
}
