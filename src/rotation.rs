//! Elementary axis rotations and their composition.
//!
//! Joints are treated as row vectors, so a rotation is applied as `joint · Rx · Ry · Rz`.
//! With this convention a positive angle about z turns a joint counterclockwise in the
//! x/y plane, matching how joints are placed from the body yaw.

use nalgebra::Matrix3;
use crate::kinematic_traits::{Joints, Point};

/// Rotation about x by `theta` radians, tilting y and z.
pub fn rx(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, c, s,
        0.0, -s, c,
    )
}

/// Rotation about y by `phi` radians, tilting x and z.
pub fn ry(phi: f64) -> Matrix3<f64> {
    let (s, c) = phi.sin_cos();
    Matrix3::new(
        c, 0.0, -s,
        0.0, 1.0, 0.0,
        s, 0.0, c,
    )
}

/// Rotation about z by `psi` radians, in the x/y plane.
pub fn rz(psi: f64) -> Matrix3<f64> {
    let (s, c) = psi.sin_cos();
    Matrix3::new(
        c, s, 0.0,
        -s, c, 0.0,
        0.0, 0.0, 1.0,
    )
}

/// Product `Rx · Ry · Rz` for angles given in degrees.
pub fn rotation_matrix(offset_angles: &Point) -> Matrix3<f64> {
    let radians = offset_angles.map(f64::to_radians);
    rx(radians.x) * ry(radians.y) * rz(radians.z)
}

/// Rotates joints expressed relative to the pivot of their body. Angles are degrees.
pub fn compose(offset_angles: &Point, local_joints: &[Point]) -> Joints {
    let m = rotation_matrix(offset_angles);
    local_joints
        .iter()
        .map(|joint| (joint.transpose() * m).transpose())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_yaw_turns_counterclockwise() {
        let rotated = compose(&Point::new(0.0, 0.0, 90.0), &[Point::new(1.0, 0.0, 0.0)]);
        assert!((rotated[0] - Point::new(0.0, 1.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_zero_angles_are_identity() {
        let joints = vec![Point::new(1.0, 2.0, 3.0), Point::new(-4.0, 5.0, 0.5)];
        let rotated = compose(&Point::zeros(), &joints);
        for (a, b) in joints.iter().zip(rotated.iter()) {
            assert!((a - b).norm() < TOLERANCE);
        }
    }

    #[test]
    fn test_matrices_are_orthonormal() {
        for m in [rx(0.3), ry(-1.1), rz(2.5), rotation_matrix(&Point::new(10.0, 20.0, 30.0))] {
            assert!((m * m.transpose() - Matrix3::identity()).norm() < TOLERANCE);
            assert!((m.determinant() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_axis_conventions() {
        let quarter = std::f64::consts::FRAC_PI_2;
        // Row vector y tilts towards +z about x
        let y = Point::new(0.0, 1.0, 0.0);
        assert!(((y.transpose() * rx(quarter)).transpose() - Point::new(0.0, 0.0, 1.0)).norm() < TOLERANCE);
        // Row vector x tilts towards -z about y
        let x = Point::new(1.0, 0.0, 0.0);
        assert!(((x.transpose() * ry(quarter)).transpose() - Point::new(0.0, 0.0, -1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_inverse_yaw_restores() {
        let joints = vec![Point::new(25.0, 0.0, 0.0), Point::new(-12.5, 21.65, 0.0)];
        let there = compose(&Point::new(0.0, 0.0, 37.0), &joints);
        let back = compose(&Point::new(0.0, 0.0, -37.0), &there);
        for (a, b) in joints.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }
}
