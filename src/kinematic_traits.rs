extern crate nalgebra as na;

use na::Vector3;
use crate::geometry_error::GeometryError;

/// A joint location or any other point in 3D space.
pub type Point = Vector3<f64>;

/// Ordered joints of a body, one row per joint, each with exactly 3 coordinates.
pub type Joints = Vec<Point>;

/// Position (x, y, z) or orientation (roll, pitch, yaw, degrees) as plain numbers.
pub type Triple = [f64; 3];

/// How a single move request ended. Only `Committed` changes the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Leg lengths were in bounds and the new pose is installed.
    Committed,
    /// At least one leg length would fall outside [Lmin, Lmax]. Nothing changed.
    Unreachable,
    /// Reachable, but another move was in flight. The request is queued.
    Deferred,
}

impl MoveOutcome {
    pub fn accepted(self) -> bool {
        self == MoveOutcome::Committed
    }
}

/// Anything that can be asked to move the platform to the given position and orientation.
/// Implemented by the single threaded [`Rpr`](crate::mechanism::Rpr) and by
/// [`SharedRpr`](crate::mechanism::SharedRpr).
pub trait Mover {
    /// `None` keeps the current value. Slices must have exactly 3 components.
    fn try_move(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>)
                -> Result<MoveOutcome, GeometryError>;
}

impl<T: Mover + ?Sized> Mover for &mut T {
    fn try_move(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>)
                -> Result<MoveOutcome, GeometryError> {
        (**self).try_move(position, orientation)
    }
}
