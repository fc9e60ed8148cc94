//! Singular configurations of the 3-RPR mechanism.
//!
//! The mechanism loses a controllable degree of freedom when the yaw is a multiple of 180°
//! and the platform center lies on the circle of radius `√(R² − 2Rr·cos yaw + r²)` around
//! the ground center. Exact equality is never met by continuous sampling, so both conditions
//! are checked within a tolerance band.

/// Default band for `|sin yaw|`.
pub const ANGULAR_TOLERANCE: f64 = 1e-9;

/// Default band for the radial condition, in length units.
pub const DISTANCE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingularityCheck {
    /// Circumradius of the ground joints (R).
    pub ground_radius: f64,
    /// Circumradius of the platform joints (r).
    pub platform_radius: f64,
    pub angular_tolerance: f64,
    pub distance_tolerance: f64,
}

impl SingularityCheck {
    pub fn new(ground_radius: f64, platform_radius: f64) -> Self {
        SingularityCheck {
            ground_radius,
            platform_radius,
            angular_tolerance: ANGULAR_TOLERANCE,
            distance_tolerance: DISTANCE_TOLERANCE,
        }
    }

    pub fn with_tolerance(self, angular_tolerance: f64, distance_tolerance: f64) -> Self {
        SingularityCheck { angular_tolerance, distance_tolerance, ..self }
    }

    /// Yaw is in degrees.
    pub fn is_singular(&self, x: f64, y: f64, yaw: f64) -> bool {
        let (s, c) = yaw.to_radians().sin_cos();
        if s.abs() > self.angular_tolerance {
            return false;
        }
        let (big_r, r) = (self.ground_radius, self.platform_radius);
        let critical = (big_r * big_r - 2.0 * big_r * r * c + r * r).max(0.0).sqrt();
        (x.hypot(y) - critical).abs() <= self.distance_tolerance
    }
}

/// [`SingularityCheck::is_singular`] with the default tolerances.
pub fn is_singular(x: f64, y: f64, yaw: f64, ground_radius: f64, platform_radius: f64) -> bool {
    SingularityCheck::new(ground_radius, platform_radius).is_singular(x, y, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_at_zero_yaw() {
        // cos 0 = 1: the critical radius is R - r
        assert!(is_singular(75.0, 0.0, 0.0, 100.0, 25.0));
        assert!(is_singular(0.0, -75.0, 0.0, 100.0, 25.0));
        assert!(is_singular(75.0 * 0.6, 75.0 * 0.8, 360.0, 100.0, 25.0));
    }

    #[test]
    fn test_singular_at_half_turn() {
        // cos 180 = -1: the critical radius is R + r
        assert!(is_singular(125.0, 0.0, 180.0, 100.0, 25.0));
        assert!(!is_singular(75.0, 0.0, 180.0, 100.0, 25.0));
    }

    #[test]
    fn test_regular_configurations() {
        assert!(!is_singular(75.0, 0.0, 90.0, 100.0, 25.0));
        assert!(!is_singular(10.0, 10.0, 0.0, 100.0, 25.0));
        assert!(!is_singular(75.0, 0.0, 0.5, 100.0, 25.0));
    }

    #[test]
    fn test_tolerance_band() {
        let check = SingularityCheck::new(100.0, 25.0);
        assert!(!check.is_singular(75.001, 0.0, 0.0));
        assert!(check.with_tolerance(1e-9, 0.01).is_singular(75.001, 0.0, 0.0));
        // At 0.1° the critical radius grows by about 5e-5
        assert!(check.with_tolerance(0.01, 1e-3).is_singular(75.0, 0.0, 0.1));
        assert!(!check.with_tolerance(0.01, 1e-6).is_singular(75.0, 0.0, 0.1));
    }
}
