//! Simulator errors

use calc_core::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no button labelled {0:?}")]
    UnknownLabel(String),

    #[error("key string is empty")]
    EmptyKeys,

    #[error("invalid keypad geometry: {0}")]
    Geometry(GeometryError),

    #[error("expected {field} to be {expected}, got {actual}")]
    Expectation {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

impl From<GeometryError> for SimError {
    fn from(err: GeometryError) -> Self {
        SimError::Geometry(err)
    }
}
