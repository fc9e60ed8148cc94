//! Rigid body shared by the ground and the platform.
//!
//! A [`Pose`] owns a position, an orientation (roll, pitch, yaw in degrees) and a fixed
//! number of attachment joints. Every setter validates the shape of its input, archives
//! the value it replaces into the matching `previous_*` field and hands both values back
//! as a [`Transition`], so history is visible at the call site.

use crate::geometry_error::GeometryError;
use crate::kinematic_traits::{Joints, Point};
use crate::precision::Precision;

/// Number of joints placed automatically when a body is built from a radius.
pub const CIRCLE_JOINTS: usize = 3;

/// Angular separation of automatically placed joints, degrees.
pub const CIRCLE_JOINT_SPACING: f64 = 120.0;

/// How the joints of a body are materialized at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum JointLayout {
    /// Three joints 120° apart on a circle of this radius around the body position,
    /// the first one at the body yaw.
    Radius(f64),
    /// Explicit joint rows. Must be an N×3 table with N ≥ 1.
    Explicit(Vec<Vec<f64>>),
}

impl From<f64> for JointLayout {
    fn from(radius: f64) -> Self {
        JointLayout::Radius(radius)
    }
}

impl From<Vec<[f64; 3]>> for JointLayout {
    fn from(rows: Vec<[f64; 3]>) -> Self {
        JointLayout::Explicit(rows.into_iter().map(|r| r.to_vec()).collect())
    }
}

/// Old and new value of a field changed by a setter.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    pub previous: T,
    pub current: T,
}

#[derive(Debug, Clone)]
pub struct Pose {
    name: String,
    scale: f64,
    precision: Precision,

    position: Point,
    orientation: Point,
    joints: Joints,

    previous_position: Point,
    previous_orientation: Point,
    previous_joints: Joints,
}

impl Pose {
    pub fn new(
        name: &str,
        position: &[f64],
        orientation: &[f64],
        joints: JointLayout,
        precision: Precision,
        scale: f64,
    ) -> Result<Self, GeometryError> {
        let position = narrow_point(precision, &vector_from("position", position)?);
        let orientation = narrow_point(precision, &vector_from("orientation", orientation)?);
        let joints = match joints {
            JointLayout::Radius(radius) => circle_joints(&position, radius, orientation.z),
            JointLayout::Explicit(rows) => joints_from_rows(&rows)?,
        };
        let joints = narrow_joints(precision, &joints);

        Ok(Pose {
            name: name.to_string(),
            scale,
            precision,
            position,
            orientation,
            previous_position: position,
            previous_orientation: orientation,
            previous_joints: joints.clone(),
            joints,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn position(&self) -> &Point {
        &self.position
    }

    pub fn orientation(&self) -> &Point {
        &self.orientation
    }

    /// Rotation about the vertical axis, degrees.
    pub fn yaw(&self) -> f64 {
        self.orientation.z
    }

    pub fn joints(&self) -> &Joints {
        &self.joints
    }

    pub fn previous_position(&self) -> &Point {
        &self.previous_position
    }

    pub fn previous_orientation(&self) -> &Point {
        &self.previous_orientation
    }

    pub fn previous_joints(&self) -> &Joints {
        &self.previous_joints
    }

    pub fn set_position(&mut self, value: &[f64]) -> Result<Transition<Point>, GeometryError> {
        let current = narrow_point(self.precision, &vector_from("position", value)?);
        self.previous_position = std::mem::replace(&mut self.position, current);
        Ok(Transition { previous: self.previous_position, current })
    }

    pub fn set_orientation(&mut self, value: &[f64]) -> Result<Transition<Point>, GeometryError> {
        let current = narrow_point(self.precision, &vector_from("orientation", value)?);
        self.previous_orientation = std::mem::replace(&mut self.orientation, current);
        Ok(Transition { previous: self.previous_orientation, current })
    }

    /// Replaces all joints. The joint count cannot change after construction.
    pub fn set_joints(&mut self, value: &[Point]) -> Result<Transition<Joints>, GeometryError> {
        if value.len() != self.joints.len() {
            return Err(GeometryError::shape(
                "joints",
                &format!("({}, 3)", self.joints.len()),
                format!("({}, 3)", value.len()),
            ));
        }
        let current = narrow_joints(self.precision, value);
        self.previous_joints = std::mem::replace(&mut self.joints, current.clone());
        Ok(Transition { previous: self.previous_joints.clone(), current })
    }

    /// Same as [`Pose::set_joints`] for untyped rows, validating the N×3 shape first.
    pub fn set_joint_rows(&mut self, rows: &[Vec<f64>]) -> Result<Transition<Joints>, GeometryError> {
        let joints = joints_from_rows(rows)?;
        self.set_joints(&joints)
    }
}

/// Joints 120° apart on a circle around `center`, the first one at `yaw` degrees. z is 0.
pub fn circle_joints(center: &Point, radius: f64, yaw: f64) -> Joints {
    (0..CIRCLE_JOINTS)
        .map(|i| {
            let angle = (yaw + CIRCLE_JOINT_SPACING * i as f64).to_radians();
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin(), 0.0)
        })
        .collect()
}

pub(crate) fn vector_from(what: &'static str, value: &[f64]) -> Result<Point, GeometryError> {
    match value {
        [x, y, z] => Ok(Point::new(*x, *y, *z)),
        _ => Err(GeometryError::shape(what, "(3,)", format!("({},)", value.len()))),
    }
}

pub(crate) fn joints_from_rows(rows: &[Vec<f64>]) -> Result<Joints, GeometryError> {
    if rows.is_empty() {
        return Err(GeometryError::shape("joints", "(N, 3), N >= 1", "(0,)".to_string()));
    }
    if let Some(bad) = rows.iter().find(|row| row.len() != 3) {
        return Err(GeometryError::shape(
            "joints", "(N, 3)", format!("({}, {})", rows.len(), bad.len()),
        ));
    }
    Ok(rows.iter().map(|row| Point::new(row[0], row[1], row[2])).collect())
}

pub(crate) fn narrow_point(precision: Precision, p: &Point) -> Point {
    p.map(|v| precision.narrow(v))
}

pub(crate) fn narrow_joints(precision: Precision, joints: &[Point]) -> Joints {
    joints.iter().map(|j| narrow_point(precision, j)).collect()
}
