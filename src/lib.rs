//! Rust implementation of the inverse kinematics of a planar 3-RPR parallel robot
//!
//! The mechanism consists of a fixed "ground" triangle of anchor joints, a mobile "platform"
//! triangle and three legs of variable length connecting ground joint `i` with platform
//! joint `i`. Given a desired platform position and yaw, the library computes the resulting
//! leg lengths and bearings, checks that every leg stays within its extension limits
//! `[Lmin, Lmax]` and only then commits the new pose.
//!
//! # Features
//!
//! - Two-phase moves: the platform proposes its geometry at the target, the mechanism
//!   validates reachability and commits. A rejected move leaves no trace.
//! - Explicit history: every setter returns a `Transition` with the old and the new value.
//! - Per-instance numeric precision (f16, f32 or f64) for all stored values.
//! - Tolerance-banded singularity predicate.
//! - Lazy generator of random, non-singular, non-duplicate, reachable target poses.
//! - Thread safe handle with a commit guard and a queue of deferred requests.
//! - Flat record export (CSV with the `allow_filesystem` feature), progress logging through
//!   `tracing`, and a 2D plot of the legs and the platform.
//!
//! ## Example
//!
//! ```
//! use rs_rpr_kinematics::kinematic_traits::MoveOutcome;
//! use rs_rpr_kinematics::mechanism::Rpr;
//! use rs_rpr_kinematics::parameters::rpr_kinematics::Parameters;
//!
//! let mut rpr = Rpr::from_parameters(&Parameters::default()).unwrap();
//! let outcome = rpr.move_to(Some(&[10.0, 5.0, 0.0]), Some(&[0.0, 0.0, 30.0])).unwrap();
//! assert_eq!(outcome, MoveOutcome::Committed);
//! println!("Leg lengths: {:?}", rpr.legs().lengths());
//! ```

pub mod geometry_error;
pub mod precision;
pub mod kinematic_traits;
pub mod utils;

pub mod pose;
pub mod rotation;
pub mod ground;
pub mod platform;
pub mod leg;

pub mod mechanism;
pub mod singularity;
pub mod target;

pub mod record;
pub mod visualization;

pub mod parameters;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;
