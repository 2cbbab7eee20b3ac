//! Scripted touch sessions
//!
//! A session is a TOML file describing what a finger does on the panel,
//! step by step, plus optional expectations about the final screen. Every
//! setting is optional so that a two-line file is a valid session.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use calc_core::{Geometry, Keypad, TouchSample, TouchSource};
use log::{debug, info};
use serde::Deserialize;

use crate::error::SimError;

/// Ticks a tap stays pressed when neither the step nor the session says otherwise
pub const DEFAULT_HOLD: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct Session {
    pub name: Option<String>,
    /// Ticks each tap stays pressed
    pub hold: Option<usize>,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub expect: Option<Expect>,
}

/// Keypad overrides; the panel itself is always 240×320
#[derive(Debug, Default, Deserialize)]
pub struct GeometryConfig {
    pub display_height: Option<u16>,
    pub spacing: Option<u16>,
    pub start_x: Option<u16>,
    pub start_y: Option<u16>,
    pub button_height: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Press the centre of a labelled button, then lift
    Tap { tap: String, hold: Option<usize> },
    /// Raw pressed samples at a fixed point
    Press {
        press: Point,
        #[serde(default = "one_tick")]
        ticks: usize,
    },
    /// Released samples
    Release { release: usize },
    /// One tap per character
    Keys { keys: String },
}

fn one_tick() -> usize {
    1
}

/// Expected end state; unset fields are not checked
#[derive(Debug, Default, Deserialize)]
pub struct Expect {
    /// First readout line
    pub readout: Option<String>,
    /// Pending operator symbol, or `none`
    pub operator: Option<String>,
    pub error: Option<bool>,
    pub activations: Option<usize>,
}

impl Session {
    /// Parse session text
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a session file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read session {}", path.display()))?;
        let session = Self::parse(&text)
            .with_context(|| format!("failed to parse session {}", path.display()))?;
        info!(
            "Loaded session {:?} ({} steps)",
            session.display_name(),
            session.steps.len()
        );
        debug!("Session: {:?}", session);
        Ok(session)
    }

    /// Session typing `keys`, one tap per character
    pub fn from_keys(keys: &str, hold: usize) -> Self {
        Self {
            name: Some(format!("keys {}", keys)),
            hold: Some(hold),
            steps: vec![Step::Keys {
                keys: keys.to_string(),
            }],
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Keypad for this session after applying geometry overrides
    pub fn keypad(&self) -> Result<Keypad, SimError> {
        let geometry = self.geometry.resolve()?;
        Ok(Keypad::new(geometry))
    }

    /// Expand the steps into the samples the touch controller would report
    pub fn samples(&self, keypad: &Keypad) -> Result<Vec<TouchSample>, SimError> {
        let default_hold = self.hold.unwrap_or(DEFAULT_HOLD);
        let mut samples = Vec::new();

        for step in &self.steps {
            match step {
                Step::Tap { tap, hold } => {
                    push_tap(&mut samples, keypad, tap, hold.unwrap_or(default_hold))?;
                }
                Step::Press { press, ticks } => {
                    let sample = TouchSample::at(press.x, press.y);
                    samples.extend(std::iter::repeat(sample).take(*ticks));
                }
                Step::Release { release } => {
                    samples.extend(std::iter::repeat(TouchSample::released()).take(*release));
                }
                Step::Keys { keys } => {
                    if keys.is_empty() {
                        return Err(SimError::EmptyKeys);
                    }
                    for c in keys.chars() {
                        let mut utf8 = [0u8; 4];
                        let label = c.encode_utf8(&mut utf8);
                        push_tap(&mut samples, keypad, label, default_hold)?;
                    }
                }
            }
        }
        Ok(samples)
    }
}

fn push_tap(
    samples: &mut Vec<TouchSample>,
    keypad: &Keypad,
    label: &str,
    hold: usize,
) -> Result<(), SimError> {
    let button = keypad
        .find_label(label)
        .and_then(|index| keypad.button(index))
        .ok_or_else(|| SimError::UnknownLabel(label.to_string()))?;
    let (x, y) = button.rect.center();
    samples.extend(std::iter::repeat(TouchSample::at(x, y)).take(hold));
    samples.push(TouchSample::released());
    Ok(())
}

impl GeometryConfig {
    /// Apply the overrides to the standard geometry and validate the result
    pub fn resolve(&self) -> Result<Geometry, SimError> {
        let standard = Geometry::STANDARD;
        let geometry = Geometry {
            display_height: self.display_height.unwrap_or(standard.display_height),
            spacing: self.spacing.unwrap_or(standard.spacing),
            start_x: self.start_x.unwrap_or(standard.start_x),
            start_y: self.start_y.unwrap_or(standard.start_y),
            button_height: self.button_height.unwrap_or(standard.button_height),
            ..standard
        };
        geometry.validate()?;
        Ok(geometry)
    }
}

/// Touch source replaying a prepared list of samples.
///
/// Once the script runs out the finger is considered lifted.
pub struct ScriptedTouch {
    samples: VecDeque<TouchSample>,
}

impl ScriptedTouch {
    pub fn new(samples: Vec<TouchSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl TouchSource for ScriptedTouch {
    fn sample(&mut self) -> TouchSample {
        self.samples.pop_front().unwrap_or_else(TouchSample::released)
    }
}
