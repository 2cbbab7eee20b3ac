//! Runs a session through the firmware control loop

use calc_core::{CalculatorState, Operator};
use calc_display::{CalculatorApp, Framebuffer, GraphicsSink, Readout, Tick};
use log::{debug, info};

use crate::error::SimError;
use crate::session::{Expect, ScriptedTouch, Session};

/// What happened during a run
#[derive(Debug)]
pub struct Report {
    pub ticks: usize,
    pub activations: usize,
    pub releases: usize,
    pub redraws: usize,
    /// Ticks that activated or released a key, with their tick number
    pub events: Vec<(usize, Tick)>,
    pub readout: Readout,
    pub state: CalculatorState,
}

/// Replay `session` on a fresh calculator.
///
/// Returns the report together with the final screen contents.
pub fn simulate(session: &Session) -> Result<(Report, Framebuffer), SimError> {
    let keypad = session.keypad()?;
    let samples = session.samples(&keypad)?;
    info!(
        "Running {:?}: {} samples",
        session.display_name(),
        samples.len()
    );

    let mut touch = ScriptedTouch::new(samples);
    let mut sink = GraphicsSink::new(Framebuffer::new());
    let mut app = CalculatorApp::new(keypad);
    app.start(&mut sink);

    let mut ticks = 0;
    let mut redraws = 0;
    let mut events = Vec::new();
    while touch.remaining() > 0 {
        let tick = app.tick(&mut touch, &mut sink);
        if tick.redrawn {
            redraws += 1;
        }
        if tick.activated.is_some() || tick.released.is_some() {
            debug!("tick {}: {:?}", ticks, tick);
            events.push((ticks, tick));
        }
        ticks += 1;
    }

    let report = Report {
        ticks,
        activations: events.iter().filter(|(_, t)| t.activated.is_some()).count(),
        releases: events.iter().filter(|(_, t)| t.released.is_some()).count(),
        redraws,
        events,
        readout: app.readout(),
        state: app.calculator().state().clone(),
    };
    Ok((report, sink.into_inner()))
}

/// One expectation compared against the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }

    pub fn into_result(self) -> Result<(), SimError> {
        if self.passed() {
            Ok(())
        } else {
            Err(SimError::Expectation {
                field: self.field,
                expected: self.expected,
                actual: self.actual,
            })
        }
    }
}

fn operator_name(op: Option<Operator>) -> String {
    match op {
        Some(op) => op.to_string(),
        None => "none".to_string(),
    }
}

impl Expect {
    /// Compare every set field against `report`
    pub fn checks(&self, report: &Report) -> Vec<Check> {
        let mut checks = Vec::new();
        if let Some(readout) = &self.readout {
            checks.push(Check {
                field: "readout",
                expected: readout.clone(),
                actual: report.readout.status.to_string(),
            });
        }
        if let Some(operator) = &self.operator {
            checks.push(Check {
                field: "operator",
                expected: operator.clone(),
                actual: operator_name(report.state.pending_operator()),
            });
        }
        if let Some(error) = self.error {
            checks.push(Check {
                field: "error",
                expected: error.to_string(),
                actual: report.state.is_error().to_string(),
            });
        }
        if let Some(activations) = self.activations {
            checks.push(Check {
                field: "activations",
                expected: activations.to_string(),
                actual: report.activations.to_string(),
            });
        }
        checks
    }

    /// First failing expectation, if any
    pub fn verify(&self, report: &Report) -> Result<(), SimError> {
        self.checks(report).into_iter().try_for_each(Check::into_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Point, Step};
    use calc_display::Color;

    #[test]
    fn test_seven_plus_three() {
        let (report, _) = simulate(&Session::from_keys("7+3=", 3)).unwrap();
        assert_eq!(report.readout.status, "Result: 10");
        assert_eq!(report.activations, 4);
        assert_eq!(report.releases, 4);
        assert_eq!(report.ticks, 16);
        assert_eq!(report.state.accumulator(), 10.0);
    }

    #[test]
    fn test_long_hold_single_activation() {
        let session = Session::parse("[[steps]]\ntap = \"5\"\nhold = 200\n").unwrap();
        let (report, _) = simulate(&session).unwrap();
        assert_eq!(report.activations, 1);
        assert_eq!(report.readout.status, "Input: 5");
        // Press, release
        assert_eq!(report.redraws, 2);
    }

    #[test]
    fn test_drag_between_keys() {
        let session = Session {
            steps: vec![
                Step::Press { press: Point { x: 33, y: 111 }, ticks: 3 },
                Step::Press { press: Point { x: 62, y: 111 }, ticks: 2 },
                Step::Press { press: Point { x: 91, y: 111 }, ticks: 3 },
                Step::Release { release: 1 },
            ],
            ..Default::default()
        };
        let (report, screen) = simulate(&session).unwrap();
        assert_eq!(report.activations, 2);
        assert_eq!(report.state.input().as_str(), "78");
        // Both keys back at rest after the release
        assert_eq!(screen.get_pixel(8, 92), Some(Color::LIGHT_GRAY));
        assert_eq!(screen.get_pixel(66, 92), Some(Color::LIGHT_GRAY));
    }

    #[test]
    fn test_expectations() {
        let (report, _) = simulate(&Session::from_keys("9/0=", 1)).unwrap();
        let expect = Expect {
            readout: Some("Error: invalid op".to_string()),
            operator: Some("none".to_string()),
            error: Some(true),
            activations: Some(4),
        };
        assert_eq!(expect.checks(&report).len(), 4);
        assert!(expect.verify(&report).is_ok());

        let wrong = Expect {
            readout: Some("Result: 0".to_string()),
            ..Default::default()
        };
        match wrong.verify(&report) {
            Err(SimError::Expectation { field, actual, .. }) => {
                assert_eq!(field, "readout");
                assert_eq!(actual, "Error: invalid op");
            }
            other => panic!("expected a readout mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_pending_operator_name() {
        let (report, _) = simulate(&Session::from_keys("4*", 1)).unwrap();
        let expect = Expect {
            operator: Some("*".to_string()),
            ..Default::default()
        };
        assert!(expect.verify(&report).is_ok());
    }

    #[test]
    fn test_bundled_sessions_pass() {
        let bundled = [
            include_str!("../sessions/seven_plus_three.toml"),
            include_str!("../sessions/left_to_right.toml"),
            include_str!("../sessions/divide_by_zero.toml"),
            include_str!("../sessions/drag.toml"),
        ];
        for text in bundled {
            let session = Session::parse(text).unwrap();
            let (report, _) = simulate(&session).unwrap();
            let expect = session.expect.as_ref().unwrap();
            assert!(
                expect.verify(&report).is_ok(),
                "{}: {:?}",
                session.display_name(),
                expect.checks(&report)
            );
        }
    }
}
