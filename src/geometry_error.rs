//! Error handling for pose construction, setters and parameter loading

use std::io;
use crate::precision::Precision;

/// Unified error for malformed geometry and for failures while reading parameters or writing records.
/// Unreachable or deferred moves are not errors, they are reported by
/// [`MoveOutcome`](crate::kinematic_traits::MoveOutcome).
#[derive(Debug)]
pub enum GeometryError {
    /// A position, orientation or joint table has the wrong number of components.
    Shape { what: &'static str, expected: String, found: String },
    JointCountMismatch { ground: usize, platform: usize },
    PrecisionMismatch { expected: Precision, found: Precision },
    InvalidBounds { min: f64, max: f64 },
    InvalidSampling { what: &'static str, low: f64, high: f64 },
    LockPoisoned,
    IoError(io::Error),
    CsvError(String),
    ParseError(String),
    MissingField(String),
}

impl GeometryError {
    pub(crate) fn shape(what: &'static str, expected: &str, found: String) -> Self {
        GeometryError::Shape { what, expected: expected.to_string(), found }
    }
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            GeometryError::Shape { what, ref expected, ref found } =>
                write!(f, "Shape of {} must be {}, got shape {}", what, expected, found),
            GeometryError::JointCountMismatch { ground, platform } =>
                write!(f, "Joint count mismatch: ground has {}, platform has {}", ground, platform),
            GeometryError::PrecisionMismatch { expected, found } =>
                write!(f, "Precision mismatch: expected {}, found {}", expected, found),
            GeometryError::InvalidBounds { min, max } =>
                write!(f, "Invalid leg bounds: Lmin = {}, Lmax = {}", min, max),
            GeometryError::InvalidSampling { what, low, high } =>
                write!(f, "Invalid sampling {}: [{}, {}]", what, low, high),
            GeometryError::LockPoisoned =>
                write!(f, "Mechanism lock poisoned by a panicking thread"),
            GeometryError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            GeometryError::CsvError(ref msg) =>
                write!(f, "CSV Error: {}", msg),
            GeometryError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            GeometryError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
        }
    }
}

impl std::error::Error for GeometryError {}

impl From<io::Error> for GeometryError {
    fn from(err: io::Error) -> Self {
        GeometryError::IoError(err)
    }
}

#[cfg(feature = "allow_filesystem")]
impl From<csv::Error> for GeometryError {
    fn from(err: csv::Error) -> Self {
        GeometryError::CsvError(err.to_string())
    }
}
