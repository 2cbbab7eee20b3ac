//! Control loop
//!
//! One [`CalculatorApp::tick`] is one pass of the firmware's main loop:
//!
//! 1. take exactly one touch sample
//! 2. let the dispatcher classify it (at most one activation)
//! 3. feed an activated key to the engine and repaint that key
//! 4. repaint the readout if the render gate says so
//!
//! There is no sleep and nothing blocks; the panel's own sample rate paces
//! the loop.

use calc_core::{
    Calculator, DispatchEvent, KeyOutcome, Keypad, PointerStatus, RenderGate, TouchDispatcher,
    TouchSource,
};

use crate::display::DisplaySink;
use crate::view::{self, Readout, Theme};

/// What a single tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    /// Key activated this tick
    pub activated: Option<usize>,
    /// Engine response to the activated key
    pub outcome: Option<KeyOutcome>,
    /// Key whose press ended this tick
    pub released: Option<usize>,
    /// Readout repainted
    pub redrawn: bool,
}

/// The calculator application: engine, dispatcher and render gate
/// owned by one value and driven by [`tick`](Self::tick)
pub struct CalculatorApp {
    keypad: Keypad,
    theme: Theme,
    calculator: Calculator,
    dispatcher: TouchDispatcher,
    gate: RenderGate,
}

impl CalculatorApp {
    pub const fn new(keypad: Keypad) -> Self {
        Self::with_theme(keypad, Theme::classic())
    }

    pub const fn with_theme(keypad: Keypad, theme: Theme) -> Self {
        Self {
            keypad,
            theme,
            calculator: Calculator::new(),
            dispatcher: TouchDispatcher::new(),
            gate: RenderGate::new(),
        }
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Pointer status from the latest sample
    pub fn pointer(&self) -> PointerStatus {
        self.dispatcher.pointer()
    }

    /// Key currently held down
    pub fn held(&self) -> Option<usize> {
        self.dispatcher.held()
    }

    /// Readout for the current state
    pub fn readout(&self) -> Readout {
        Readout::compose(self.calculator.state(), &self.dispatcher.pointer())
    }

    /// Paint the whole screen once
    pub fn start<S: DisplaySink>(&mut self, sink: &mut S) {
        let geometry = self.keypad.geometry();
        sink.fill_rect(0, 0, geometry.screen_width, geometry.screen_height, self.theme.screen);
        self.refresh(sink);
        view::draw_keypad(sink, &self.keypad, &self.theme);
        log::info!("calculator ready, {} keys", self.keypad.buttons().len());
    }

    /// Run one pass of the control loop
    pub fn tick<T, S>(&mut self, touch: &mut T, sink: &mut S) -> Tick
    where
        T: TouchSource,
        S: DisplaySink,
    {
        let mut tick = Tick::default();

        match self.dispatcher.step(touch.sample(), &self.keypad) {
            Some(DispatchEvent::Activated { index, replaced }) => {
                if let Some(previous) = replaced.and_then(|i| self.keypad.button(i)) {
                    view::draw_button(sink, previous, &self.theme, false);
                }
                if let Some(button) = self.keypad.button(index) {
                    let outcome = self.calculator.handle_key(button.key);
                    log::debug!("key {:?} -> {:?}", button.label, outcome);
                    view::draw_button(sink, button, &self.theme, true);
                    tick.outcome = Some(outcome);
                }
                self.gate.mark_dirty();
                tick.activated = Some(index);
            }
            Some(DispatchEvent::Released { index }) => {
                if let Some(button) = self.keypad.button(index) {
                    view::draw_button(sink, button, &self.theme, false);
                }
                self.gate.mark_dirty();
                tick.released = Some(index);
            }
            None => {}
        }

        let pointer = self.dispatcher.pointer();
        if self.gate.needs_refresh(&pointer) {
            self.refresh(sink);
            tick.redrawn = true;
        }
        tick
    }

    /// Paint the screen, then tick forever
    pub fn run<T, S>(&mut self, touch: &mut T, sink: &mut S) -> !
    where
        T: TouchSource,
        S: DisplaySink,
    {
        self.start(sink);
        loop {
            self.tick(touch, sink);
        }
    }

    fn refresh<S: DisplaySink>(&mut self, sink: &mut S) {
        let pointer = self.dispatcher.pointer();
        let readout = Readout::compose(self.calculator.state(), &pointer);
        log::trace!("readout: {:?}", readout.lines());
        view::draw_readout(sink, self.keypad.geometry(), &self.theme, &readout);
        self.gate.rendered(pointer);
    }
}

impl Default for CalculatorApp {
    fn default() -> Self {
        Self::new(Keypad::default())
    }
}
