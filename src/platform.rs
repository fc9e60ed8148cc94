//! The mobile triangle. Moves in two phases: [`Platform::propose`] computes the candidate
//! geometry without touching any field, [`Platform::commit`] installs a proposal.

use crate::geometry_error::GeometryError;
use crate::kinematic_traits::{Joints, Point};
use crate::pose::{narrow_joints, narrow_point, vector_from, JointLayout, Pose, Transition};
use crate::precision::Precision;
use crate::record::Record;
use crate::rotation::compose;

/// Change of position and orientation made by a move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub position: Point,
    pub orientation: Point,
}

impl Offset {
    pub fn is_zero(&self) -> bool {
        self.position.iter().chain(self.orientation.iter()).all(|&v| v == 0.0)
    }
}

/// Candidate geometry of the platform after a move. Produced by [`Platform::propose`].
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub position: Point,
    pub orientation: Point,
    pub offset: Offset,
    pub joints: Joints,
    pub distance_to_joint: Vec<f64>,
    pub bearing_to_joint: Vec<f64>,
    pub precision: Precision,

    // Pose the proposal was computed from
    base_position: Point,
    base_orientation: Point,
    base_joints: Joints,
}

impl Proposal {
    /// True if the platform still stands where this proposal was computed from.
    pub fn is_based_on(&self, platform: &Platform) -> bool {
        self.base_position == *platform.position()
            && self.base_orientation == *platform.orientation()
            && self.base_joints == *platform.joints()
    }
}

/// Everything a commit replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTransition {
    pub position: Transition<Point>,
    pub orientation: Transition<Point>,
    pub joints: Transition<Joints>,
    pub offset: Offset,
}

#[derive(Debug, Clone)]
pub struct Platform {
    pose: Pose,
    distance_to_joint: Vec<f64>,
    bearing_to_joint: Vec<f64>,
    last_offset: Offset,
}

impl Platform {
    pub fn new(
        position: &[f64],
        orientation: &[f64],
        joints: JointLayout,
        precision: Precision,
        scale: f64,
    ) -> Result<Self, GeometryError> {
        let pose = Pose::new("platform", position, orientation, joints, precision, scale)?;
        let distance_to_joint = distances_to_joints(pose.position(), pose.joints(), precision);
        let bearing_to_joint = bearings_to_joints(pose.position(), pose.joints(), precision);
        Ok(Platform { pose, distance_to_joint, bearing_to_joint, last_offset: Offset::default() })
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> &Point {
        self.pose.position()
    }

    pub fn orientation(&self) -> &Point {
        self.pose.orientation()
    }

    pub fn joints(&self) -> &Joints {
        self.pose.joints()
    }

    pub fn precision(&self) -> Precision {
        self.pose.precision()
    }

    pub fn distance_to_joint(&self) -> &[f64] {
        &self.distance_to_joint
    }

    pub fn bearing_to_joint(&self) -> &[f64] {
        &self.bearing_to_joint
    }

    pub fn last_offset(&self) -> &Offset {
        &self.last_offset
    }

    /// Geometry the platform would have at the target. Missing arguments keep the current
    /// values. Joints are rotated by the orientation offset about the current position
    /// and then carried to the target position. A zero offset returns the current joints
    /// unchanged.
    pub fn propose(
        &self,
        position: Option<&[f64]>,
        orientation: Option<&[f64]>,
    ) -> Result<Proposal, GeometryError> {
        let precision = self.precision();
        let position = match position {
            Some(p) => narrow_point(precision, &vector_from("position", p)?),
            None => *self.position(),
        };
        let orientation = match orientation {
            Some(o) => narrow_point(precision, &vector_from("orientation", o)?),
            None => *self.orientation(),
        };
        let offset = Offset {
            position: position - self.position(),
            orientation: orientation - self.orientation(),
        };

        let joints = if offset.is_zero() {
            self.joints().clone()
        } else {
            let local: Joints = self.joints().iter().map(|j| j - self.position()).collect();
            let rotated = compose(&offset.orientation, &local);
            narrow_joints(precision, &rotated.iter().map(|j| j + position).collect::<Joints>())
        };

        Ok(Proposal {
            distance_to_joint: distances_to_joints(&position, &joints, precision),
            bearing_to_joint: bearings_to_joints(&position, &joints, precision),
            position,
            orientation,
            offset,
            joints,
            precision,
            base_position: *self.position(),
            base_orientation: *self.orientation(),
            base_joints: self.joints().clone(),
        })
    }

    /// Installs the proposal, archiving the replaced values. Either everything is installed
    /// or, on error, nothing is.
    pub fn commit(&mut self, proposal: Proposal) -> Result<PlatformTransition, GeometryError> {
        self.precision().ensure_same(proposal.precision)?;
        let count = self.joints().len();
        if proposal.joints.len() != count
            || proposal.distance_to_joint.len() != count
            || proposal.bearing_to_joint.len() != count {
            return Err(GeometryError::shape(
                "proposal joints",
                &format!("({}, 3)", count),
                format!("({}, 3)", proposal.joints.len()),
            ));
        }

        let position = self.pose.set_position(proposal.position.as_slice())?;
        let orientation = self.pose.set_orientation(proposal.orientation.as_slice())?;
        let joints = self.pose.set_joints(&proposal.joints)?;
        self.distance_to_joint = proposal.distance_to_joint;
        self.bearing_to_joint = proposal.bearing_to_joint;
        self.last_offset = proposal.offset;

        Ok(PlatformTransition { position, orientation, joints, offset: proposal.offset })
    }

    /// Joint coordinates `B{i}_{x|y|z}`, per joint distance `B{i}_dj` and bearing `B{i}_aj`,
    /// then the platform `x`, `y`, `z` and yaw `fi`.
    pub fn record(&self) -> Record {
        let mut record = Record::new();
        for (i, joint) in self.joints().iter().enumerate() {
            for (axis, value) in ["x", "y", "z"].iter().zip(joint.iter()) {
                record.insert(format!("B{}_{}", i + 1, axis), *value);
            }
        }
        for (i, value) in self.distance_to_joint.iter().enumerate() {
            record.insert(format!("B{}_dj", i + 1), *value);
        }
        for (i, value) in self.bearing_to_joint.iter().enumerate() {
            record.insert(format!("B{}_aj", i + 1), *value);
        }
        for (axis, value) in ["x", "y", "z"].iter().zip(self.position().iter()) {
            record.insert(*axis, *value);
        }
        record.insert("fi", self.pose.yaw());
        record
    }
}

/// Euclidean distance from `center` to every joint.
pub fn distances_to_joints(center: &Point, joints: &[Point], precision: Precision) -> Vec<f64> {
    joints.iter().map(|j| precision.narrow((j - center).norm())).collect()
}

/// Bearing in degrees of every joint as seen from `center`, in the x/y plane.
pub fn bearings_to_joints(center: &Point, joints: &[Point], precision: Precision) -> Vec<f64> {
    joints
        .iter()
        .map(|j| precision.narrow((j.y - center.y).atan2(j.x - center.x).to_degrees()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn platform() -> Platform {
        Platform::new(&[0.0; 3], &[0.0; 3], JointLayout::Radius(25.0), Precision::Double, 1.0).unwrap()
    }

    #[test]
    fn test_distances_and_bearings_at_construction() {
        let platform = platform();
        assert_eq!(platform.distance_to_joint().len(), 3);
        for d in platform.distance_to_joint() {
            assert!((d - 25.0).abs() < TOLERANCE);
        }
        let expected = [0.0, 120.0, -120.0];
        for (a, e) in platform.bearing_to_joint().iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "bearing {} expected {}", a, e);
        }
        assert!(platform.last_offset().is_zero());
    }

    #[test]
    fn test_zero_offset_keeps_joints() {
        let platform = platform();
        let proposal = platform.propose(None, None).unwrap();
        assert!(proposal.offset.is_zero());
        assert_eq!(&proposal.joints, platform.joints());

        let same = platform.propose(Some(&[0.0, 0.0, 0.0]), Some(&[0.0, 0.0, 0.0])).unwrap();
        for (a, b) in same.joints.iter().zip(platform.joints().iter()) {
            assert!((a - b).norm() < TOLERANCE);
        }
    }

    #[test]
    fn test_propose_does_not_mutate() {
        let platform = platform();
        let before = platform.joints().clone();
        let proposal = platform.propose(Some(&[10.0, 5.0, 0.0]), Some(&[0.0, 0.0, 30.0])).unwrap();
        assert_eq!(platform.joints(), &before);
        assert_eq!(platform.position(), &Point::zeros());
        assert_eq!(proposal.offset.position, Point::new(10.0, 5.0, 0.0));
        assert_eq!(proposal.offset.orientation, Point::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_translation_and_yaw() {
        let platform = platform();
        let proposal = platform.propose(Some(&[10.0, 5.0, 0.0]), Some(&[0.0, 0.0, 90.0])).unwrap();
        // First joint at (25, 0) turns to (0, 25) and is carried by (10, 5)
        assert!((proposal.joints[0] - Point::new(10.0, 30.0, 0.0)).norm() < TOLERANCE);
        for d in &proposal.distance_to_joint {
            assert!((d - 25.0).abs() < TOLERANCE);
        }
        assert!((proposal.bearing_to_joint[0] - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_commit_archives_and_installs() {
        let mut platform = platform();
        let before = platform.joints().clone();
        let proposal = platform.propose(Some(&[3.0, 4.0, 0.0]), Some(&[0.0, 0.0, 45.0])).unwrap();
        let transition = platform.commit(proposal.clone()).unwrap();

        assert_eq!(transition.position.previous, Point::zeros());
        assert_eq!(transition.joints.previous, before);
        assert_eq!(platform.position(), &Point::new(3.0, 4.0, 0.0));
        assert_eq!(platform.pose().previous_joints(), &before);
        assert_eq!(platform.joints(), &proposal.joints);
        assert_eq!(platform.last_offset(), &proposal.offset);
        assert!(!proposal.is_based_on(&platform));
    }

    #[test]
    fn test_commit_rejects_foreign_precision() {
        let mut platform = platform();
        let other = Platform::new(&[0.0; 3], &[0.0; 3], JointLayout::Radius(25.0), Precision::Single, 1.0).unwrap();
        let proposal = other.propose(Some(&[1.0, 0.0, 0.0]), None).unwrap();
        assert!(matches!(platform.commit(proposal), Err(GeometryError::PrecisionMismatch { .. })));
        assert_eq!(platform.position(), &Point::zeros());
    }

    #[test]
    fn test_shape_error_in_propose() {
        let platform = platform();
        assert!(matches!(
            platform.propose(Some(&[1.0, 2.0]), None),
            Err(GeometryError::Shape { what: "position", .. })
        ));
    }

    #[test]
    fn test_record_fields() {
        let record = platform().record();
        let names: Vec<&str> = record.names().collect();
        assert_eq!(&names[..3], &["B1_x", "B1_y", "B1_z"]);
        assert!(names.contains(&"B3_dj"));
        assert!(names.contains(&"B2_aj"));
        assert_eq!(&names[names.len() - 4..], &["x", "y", "z", "fi"]);
    }
}
