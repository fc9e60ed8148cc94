//! Inverse kinematics output: length and bearing of every leg.

use crate::geometry_error::GeometryError;
use crate::ground::Ground;
use crate::kinematic_traits::Point;
use crate::platform::Platform;
use crate::precision::Precision;
use crate::record::Record;

/// Lengths and bearings (degrees) of the legs connecting ground joint `i` with platform joint `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Legs {
    lengths: Vec<f64>,
    bearings: Vec<f64>,
    precision: Precision,
}

impl Legs {
    /// Recomputes all legs from scratch. Both joint sets must have the same count.
    pub fn recompute(
        ground_joints: &[Point],
        platform_joints: &[Point],
        precision: Precision,
    ) -> Result<Self, GeometryError> {
        if ground_joints.len() != platform_joints.len() {
            return Err(GeometryError::JointCountMismatch {
                ground: ground_joints.len(),
                platform: platform_joints.len(),
            });
        }
        let (lengths, bearings): (Vec<f64>, Vec<f64>) = ground_joints
            .iter()
            .zip(platform_joints.iter())
            .map(|(a, b)| {
                let diff = b - a;
                (precision.narrow(diff.norm()), precision.narrow(diff.y.atan2(diff.x).to_degrees()))
            })
            .unzip();
        Ok(Legs { lengths, bearings, precision })
    }

    /// Legs between the current joints of both bodies, which must share one precision.
    pub fn between(ground: &Ground, platform: &Platform) -> Result<Self, GeometryError> {
        ground.precision().ensure_same(platform.precision())?;
        Legs::recompute(ground.joints(), platform.joints(), ground.precision())
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn bearings(&self) -> &[f64] {
        &self.bearings
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// True if every length lies within `[min, max]`.
    pub fn within(&self, min: f64, max: f64) -> bool {
        self.lengths.iter().all(|&l| l >= min && l <= max)
    }

    /// Leg lengths `Ld_{i}` followed by bearings `La_{i}`, legs numbered from 1.
    pub fn record(&self) -> Record {
        let mut record = Record::new();
        for (i, length) in self.lengths.iter().enumerate() {
            record.insert(format!("Ld_{}", i + 1), *length);
        }
        for (i, bearing) in self.bearings.iter().enumerate() {
            record.insert(format!("La_{}", i + 1), *bearing);
        }
        record
    }
}

/// End points in the x/y plane of a leg of given length leaving `origin` at `bearing` degrees.
pub fn segment(origin: [f64; 2], bearing: f64, length: f64) -> ([f64; 2], [f64; 2]) {
    let (s, c) = bearing.to_radians().sin_cos();
    (origin, [origin[0] + length * c, origin[1] + length * s])
}

/// Closed-form leg length for a platform joint at radius `r` and angle `gamma` (degrees)
/// in the platform frame, with the platform center at (`x`, `y`) and yawed by `yaw` degrees.
/// `anchor` is the ground joint.
pub fn analytic_length(anchor: [f64; 2], r: f64, gamma: f64, x: f64, y: f64, yaw: f64) -> f64 {
    let (s, c) = (yaw + gamma).to_radians().sin_cos();
    (x + r * c - anchor[0]).hypot(y + r * s - anchor[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn joints() -> (Vec<Point>, Vec<Point>) {
        (
            vec![Point::new(0.0, 100.0, 0.0), Point::new(-86.6, -50.0, 0.0), Point::new(86.6, -50.0, 0.0)],
            vec![Point::new(25.0, 0.0, 0.0), Point::new(-12.5, 21.65, 0.0), Point::new(-12.5, -21.65, 3.0)],
        )
    }

    #[test]
    fn test_lengths_and_bearings() {
        let legs = Legs::recompute(&[Point::zeros()], &[Point::new(3.0, 4.0, 0.0)], Precision::Double).unwrap();
        assert_eq!(legs.lengths(), &[5.0]);
        assert!((legs.bearings()[0] - 4f64.atan2(3.0).to_degrees()).abs() < TOLERANCE);

        let legs = Legs::recompute(&[Point::zeros()], &[Point::new(-1.0, 0.0, 0.0)], Precision::Double).unwrap();
        assert!((legs.bearings()[0] - 180.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_swapping_bodies() {
        let (ground, platform) = joints();
        let forward = Legs::recompute(&ground, &platform, Precision::Double).unwrap();
        let backward = Legs::recompute(&platform, &ground, Precision::Double).unwrap();
        for i in 0..forward.len() {
            assert!((forward.lengths()[i] - backward.lengths()[i]).abs() < TOLERANCE);
            let turn = (forward.bearings()[i] - backward.bearings()[i]).rem_euclid(360.0);
            assert!((turn - 180.0).abs() < 1e-9, "bearing turned by {}", turn);
        }
    }

    #[test]
    fn test_count_mismatch() {
        let (ground, platform) = joints();
        assert!(matches!(
            Legs::recompute(&ground, &platform[..2], Precision::Double),
            Err(GeometryError::JointCountMismatch { ground: 3, platform: 2 })
        ));
    }

    #[test]
    fn test_within() {
        let (ground, platform) = joints();
        let legs = Legs::recompute(&ground, &platform, Precision::Double).unwrap();
        assert!(legs.within(10.0, 190.0));
        assert!(!legs.within(10.0, 50.0));
    }

    #[test]
    fn test_record() {
        let (ground, platform) = joints();
        let record = Legs::recompute(&ground, &platform, Precision::Double).unwrap().record();
        assert_eq!(record.names().collect::<Vec<_>>(), vec!["Ld_1", "Ld_2", "Ld_3", "La_1", "La_2", "La_3"]);
    }

    #[test]
    fn test_segment() {
        let (start, end) = segment([1.0, 1.0], 90.0, 2.0);
        assert_eq!(start, [1.0, 1.0]);
        assert!((end[0] - 1.0).abs() < TOLERANCE && (end[1] - 3.0).abs() < TOLERANCE);
    }
}
