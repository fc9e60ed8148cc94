//! Fixed triangle of anchor joints. Written once at construction, never re-posed.

use crate::geometry_error::GeometryError;
use crate::kinematic_traits::{Joints, Point};
use crate::pose::{JointLayout, Pose};
use crate::precision::Precision;
use crate::record::Record;

#[derive(Debug, Clone)]
pub struct Ground {
    pose: Pose,
}

impl Ground {
    pub fn new(
        position: &[f64],
        orientation: &[f64],
        joints: JointLayout,
        precision: Precision,
        scale: f64,
    ) -> Result<Self, GeometryError> {
        Ok(Ground { pose: Pose::new("ground", position, orientation, joints, precision, scale)? })
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn joints(&self) -> &Joints {
        self.pose.joints()
    }

    pub fn position(&self) -> &Point {
        self.pose.position()
    }

    pub fn precision(&self) -> Precision {
        self.pose.precision()
    }

    /// Joint coordinates as `A{i}_{x|y|z}`, joints numbered from 1.
    pub fn record(&self) -> Record {
        let mut record = Record::new();
        for (i, joint) in self.joints().iter().enumerate() {
            for (axis, value) in ["x", "y", "z"].iter().zip(joint.iter()) {
                record.insert(format!("A{}_{}", i + 1, axis), *value);
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_record() {
        let ground = Ground::new(&[0.0; 3], &[0.0, 0.0, 90.0], JointLayout::Radius(100.0),
                                 Precision::Double, 1.0).unwrap();
        let record = ground.record();
        assert_eq!(record.len(), 9);
        assert_eq!(record.names().next(), Some("A1_x"));
        assert!(record.get("A1_x").unwrap().abs() < 1e-9);
        assert!((record.get("A1_y").unwrap() - 100.0).abs() < 1e-9);
        assert!((record.get("A3_x").unwrap() - 86.602540378).abs() < 1e-6);
        assert!((record.get("A2_y").unwrap() + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_joints() {
        let ground = Ground::new(&[0.0; 3], &[0.0; 3],
                                 vec![[0.0, 100.0, 0.0], [-86.6, -50.0, 0.0], [86.6, -50.0, 0.0]].into(),
                                 Precision::Double, 1.0).unwrap();
        assert_eq!(ground.joints()[1], Point::new(-86.6, -50.0, 0.0));
    }
}
