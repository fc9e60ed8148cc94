//! Numeric width used for all stored arrays of a body.
//!
//! Values are always computed in `f64` and narrowed when stored. Narrowing to a smaller
//! width silently loses accuracy; this is accepted and kept configurable per instance.

use std::fmt;
use std::str::FromStr;

use crate::geometry_error::GeometryError;

/// Largest finite value representable in IEEE 754 half precision.
const HALF_MAX: f64 = 65504.0;

/// Smallest exponent of a normal half precision number.
const HALF_MIN_EXPONENT: i32 = -14;

/// Explicit mantissa bits of half precision.
const HALF_MANTISSA_BITS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 16 bit, emulated by rounding to 11 significant bits, ties to even.
    Half,
    /// 32 bit float.
    Single,
    /// 64 bit float, no narrowing.
    #[default]
    Double,
}

impl Precision {
    /// Round the value to what this precision can store.
    pub fn narrow(self, x: f64) -> f64 {
        match self {
            Precision::Double => x,
            Precision::Single => x as f32 as f64,
            Precision::Half => narrow_half(x),
        }
    }

    pub fn narrow_all(self, values: &mut [f64]) {
        values.iter_mut().for_each(|v| *v = self.narrow(*v));
    }

    /// Fails with `PrecisionMismatch` unless `other` is the same precision.
    pub fn ensure_same(self, other: Precision) -> Result<(), GeometryError> {
        if self != other {
            return Err(GeometryError::PrecisionMismatch { expected: self, found: other });
        }
        Ok(())
    }
}

fn narrow_half(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    let exponent = (x.abs().log2().floor() as i32).max(HALF_MIN_EXPONENT);
    let step = 2f64.powi(exponent - HALF_MANTISSA_BITS);
    let rounded = (x / step).round_ties_even() * step;
    if rounded.abs() > HALF_MAX {
        return f64::INFINITY.copysign(x);
    }
    rounded
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Precision::Half => "f16",
            Precision::Single => "f32",
            Precision::Double => "f64",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Precision {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f16" | "half" | "float16" => Ok(Precision::Half),
            "f32" | "single" | "float32" => Ok(Precision::Single),
            "f64" | "double" | "float64" => Ok(Precision::Double),
            other => Err(GeometryError::ParseError(format!("unknown precision: {}", other))),
        }
    }
}
