//! Touch dispatch
//!
//! Turns raw touch samples into key activations. The dispatcher is a two
//! state machine, `Idle` and `Held(i)`; a key fires only when the finger
//! lands on a key different from the one already held, so resting on a key
//! never repeats and dragging onto a neighbour fires the neighbour once.

use crate::keypad::Keypad;

/// One raw reading from the touch controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub x: u16,
    pub y: u16,
    pub pressed: bool,
}

impl TouchSample {
    /// Finger down at `(x, y)`
    pub const fn at(x: u16, y: u16) -> Self {
        Self { x, y, pressed: true }
    }

    /// No finger on the panel
    pub const fn released() -> Self {
        Self {
            x: 0,
            y: 0,
            pressed: false,
        }
    }
}

/// Touch controller as seen by the control loop
pub trait TouchSource {
    /// Latest reading; must not block. Consecutive readings may jump
    /// around mid-press, no debouncing is assumed.
    fn sample(&mut self) -> TouchSample;
}

/// Pointer state shown in the readout.
///
/// A released pointer always carries `(0, 0)` so that two released
/// samples compare equal whatever coordinates the controller reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerStatus {
    pub x: u16,
    pub y: u16,
    pub pressed: bool,
}

impl PointerStatus {
    pub const RELEASED: PointerStatus = PointerStatus {
        x: 0,
        y: 0,
        pressed: false,
    };

    pub const fn from_sample(sample: TouchSample) -> Self {
        if sample.pressed {
            Self {
                x: sample.x,
                y: sample.y,
                pressed: true,
            }
        } else {
            Self::RELEASED
        }
    }
}

/// Logical key event produced by one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchEvent {
    /// Key `index` newly pressed. `replaced` is the key that was held
    /// before when the finger slid over from another key.
    Activated { index: usize, replaced: Option<usize> },
    /// Finger lifted from key `index`
    Released { index: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum HoldState {
    #[default]
    Idle,
    Held(usize),
}

/// Press/hold/release classifier
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchDispatcher {
    state: HoldState,
    pointer: PointerStatus,
}

impl TouchDispatcher {
    pub const fn new() -> Self {
        Self {
            state: HoldState::Idle,
            pointer: PointerStatus::RELEASED,
        }
    }

    /// Key currently held down, if any
    pub fn held(&self) -> Option<usize> {
        match self.state {
            HoldState::Idle => None,
            HoldState::Held(i) => Some(i),
        }
    }

    /// Pointer status derived from the most recent sample
    pub fn pointer(&self) -> PointerStatus {
        self.pointer
    }

    /// Classify one sample
    pub fn step(&mut self, sample: TouchSample, keypad: &Keypad) -> Option<DispatchEvent> {
        self.pointer = PointerStatus::from_sample(sample);

        if !sample.pressed {
            return match core::mem::take(&mut self.state) {
                HoldState::Held(index) => Some(DispatchEvent::Released { index }),
                HoldState::Idle => None,
            };
        }

        // Off-key samples keep whatever is held; sliding back does not re-fire
        let index = keypad.hit_test(sample.x, sample.y)?;
        let replaced = self.held();
        if replaced == Some(index) {
            return None;
        }

        self.state = HoldState::Held(index);
        Some(DispatchEvent::Activated { index, replaced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::STANDARD_KEYPAD;

    fn center_of(label: &str) -> (u16, u16) {
        let index = STANDARD_KEYPAD.find_label(label).unwrap();
        STANDARD_KEYPAD.button(index).unwrap().rect.center()
    }

    #[test]
    fn test_continuous_press_activates_once() {
        let mut dispatcher = TouchDispatcher::new();
        let (x, y) = center_of("5");
        let mut activations = 0;

        for tick in 0..50u16 {
            // Resistive panels jitter; stay inside the key
            let sample = TouchSample::at(x + tick % 3, y - tick % 2);
            if let Some(DispatchEvent::Activated { .. }) = dispatcher.step(sample, &STANDARD_KEYPAD) {
                activations += 1;
            }
        }
        assert_eq!(activations, 1);
        assert_eq!(dispatcher.held(), Some(5));

        assert_eq!(
            dispatcher.step(TouchSample::released(), &STANDARD_KEYPAD),
            Some(DispatchEvent::Released { index: 5 })
        );
        assert_eq!(dispatcher.held(), None);
        assert_eq!(dispatcher.step(TouchSample::released(), &STANDARD_KEYPAD), None);
    }

    #[test]
    fn test_drag_activates_each_key_once() {
        let mut dispatcher = TouchDispatcher::new();
        let (x7, y7) = center_of("7");
        let (x8, y8) = center_of("8");
        let mut events = heapless::Vec::<DispatchEvent, 8>::new();

        for sample in [
            TouchSample::at(x7, y7),
            TouchSample::at(x7 + 10, y7),
            TouchSample::at(x8, y8),
            TouchSample::at(x8 + 5, y8),
        ] {
            if let Some(event) = dispatcher.step(sample, &STANDARD_KEYPAD) {
                events.push(event).unwrap();
            }
        }

        assert_eq!(
            events.as_slice(),
            &[
                DispatchEvent::Activated { index: 0, replaced: None },
                DispatchEvent::Activated { index: 1, replaced: Some(0) },
            ]
        );
    }

    #[test]
    fn test_gap_keeps_held_key() {
        let mut dispatcher = TouchDispatcher::new();
        let (x, y) = center_of("7");

        assert!(dispatcher.step(TouchSample::at(x, y), &STANDARD_KEYPAD).is_some());
        // Gap between "7" and "8"
        assert_eq!(dispatcher.step(TouchSample::at(62, y), &STANDARD_KEYPAD), None);
        assert_eq!(dispatcher.held(), Some(0));
        // Back onto the same key: no repeat
        assert_eq!(dispatcher.step(TouchSample::at(x, y), &STANDARD_KEYPAD), None);
    }

    #[test]
    fn test_press_outside_keys() {
        let mut dispatcher = TouchDispatcher::new();
        assert_eq!(dispatcher.step(TouchSample::at(120, 40), &STANDARD_KEYPAD), None);
        assert_eq!(dispatcher.held(), None);
        assert_eq!(
            dispatcher.pointer(),
            PointerStatus { x: 120, y: 40, pressed: true }
        );

        // Sliding from the readout onto a key fires it
        let (x, y) = center_of("C");
        assert_eq!(
            dispatcher.step(TouchSample::at(x, y), &STANDARD_KEYPAD),
            Some(DispatchEvent::Activated { index: 14, replaced: None })
        );
    }

    #[test]
    fn test_released_pointer_is_normalised() {
        let sample = TouchSample { x: 17, y: 99, pressed: false };
        assert_eq!(PointerStatus::from_sample(sample), PointerStatus::RELEASED);
        assert_eq!(
            PointerStatus::from_sample(TouchSample::at(17, 99)),
            PointerStatus { x: 17, y: 99, pressed: true }
        );
    }

    #[test]
    fn test_new_press_after_release_fires_again() {
        let mut dispatcher = TouchDispatcher::new();
        let (x, y) = center_of("9");
        let mut activations = 0;
        for sample in [
            TouchSample::at(x, y),
            TouchSample::released(),
            TouchSample::at(x, y),
            TouchSample::at(x, y),
        ] {
            if let Some(DispatchEvent::Activated { .. }) = dispatcher.step(sample, &STANDARD_KEYPAD) {
                activations += 1;
            }
        }
        assert_eq!(activations, 2);
    }
}
