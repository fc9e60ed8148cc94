//! Random target poses for exercising the mechanism.
//!
//! [`TargetGenerator`] is a lazy iterator built by rejection sampling: a candidate is drawn
//! inside a disk with a random yaw, dropped if it repeats an already yielded position or
//! orientation or is singular, and yielded only once the mechanism accepted the move to it.
//! Without a retry cap the search is unbounded and may stall if the reachable, non-singular
//! region is small relative to the sampling disk.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::geometry_error::GeometryError;
use crate::kinematic_traits::{MoveOutcome, Mover, Triple};
use crate::singularity::SingularityCheck;

/// An accepted platform position and orientation (roll, pitch, yaw in degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Triple,
    pub orientation: Triple,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetSampling {
    /// Positions are drawn uniformly inside a disk of this radius around the origin, z = 0.
    pub radius: f64,
    /// Yaw is drawn uniformly from this closed range, degrees. Roll and pitch stay 0.
    pub yaw_limits: [f64; 2],
    /// Give up after this many rejected candidates in a row. `None` retries forever.
    pub max_attempts: Option<usize>,
}

impl Default for TargetSampling {
    fn default() -> Self {
        TargetSampling { radius: 50.0, yaw_limits: [10.0, 170.0], max_attempts: None }
    }
}

impl TargetSampling {
    fn validate(&self) -> Result<(), GeometryError> {
        let [low, high] = self.yaw_limits;
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(GeometryError::InvalidSampling { what: "yaw_limits", low, high });
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(GeometryError::InvalidSampling { what: "radius", low: 0.0, high: self.radius });
        }
        Ok(())
    }

    /// Draws one candidate, not yet checked for anything.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Target {
        let theta = rng.gen_range(0.0..TAU);
        let r = self.radius * rng.gen_range(0.0..1.0f64).sqrt();
        let [low, high] = self.yaw_limits;
        let yaw = rng.gen_range(low..=high);
        Target {
            position: [r * theta.cos(), r * theta.sin(), 0.0],
            orientation: [0.0, 0.0, yaw],
        }
    }
}

pub struct TargetGenerator<M: Mover> {
    mover: M,
    sampling: TargetSampling,
    singularity: SingularityCheck,
    rng: StdRng,
    seen_positions: Vec<Triple>,
    seen_orientations: Vec<Triple>,
    attempts: usize,
    finished: bool,
}

impl<M: Mover> TargetGenerator<M> {
    pub fn new(
        mover: M,
        sampling: TargetSampling,
        singularity: SingularityCheck,
        rng: StdRng,
    ) -> Result<Self, GeometryError> {
        sampling.validate()?;
        Ok(TargetGenerator {
            mover,
            sampling,
            singularity,
            rng,
            seen_positions: Vec::new(),
            seen_orientations: Vec::new(),
            attempts: 0,
            finished: false,
        })
    }

    /// Reproducible sequence for the given seed.
    pub fn with_seed(
        mover: M,
        sampling: TargetSampling,
        singularity: SingularityCheck,
        seed: u64,
    ) -> Result<Self, GeometryError> {
        Self::new(mover, sampling, singularity, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(
        mover: M,
        sampling: TargetSampling,
        singularity: SingularityCheck,
    ) -> Result<Self, GeometryError> {
        Self::new(mover, sampling, singularity, StdRng::from_entropy())
    }

    /// Targets yielded so far.
    pub fn yielded(&self) -> usize {
        self.seen_positions.len()
    }

    /// Candidates rejected since the last yielded target.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    fn is_duplicate(&self, candidate: &Target) -> bool {
        self.seen_positions.contains(&candidate.position)
            || self.seen_orientations.contains(&candidate.orientation)
    }
}

impl<M: Mover> Iterator for TargetGenerator<M> {
    type Item = Result<Target, GeometryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(cap) = self.sampling.max_attempts {
                if self.attempts >= cap {
                    warn!("Target search stalled after {} rejected candidates", self.attempts);
                    self.finished = true;
                    return None;
                }
            }
            let candidate = self.sampling.sample(&mut self.rng);
            let [x, y, _] = candidate.position;

            if self.is_duplicate(&candidate) || self.singularity.is_singular(x, y, candidate.orientation[2]) {
                debug!("Rejected duplicate or singular candidate {:?}", candidate);
                self.attempts += 1;
                continue;
            }

            match self.mover.try_move(Some(&candidate.position), Some(&candidate.orientation)) {
                Ok(MoveOutcome::Committed) => {
                    self.seen_positions.push(candidate.position);
                    self.seen_orientations.push(candidate.orientation);
                    self.attempts = 0;
                    return Some(Ok(candidate));
                }
                Ok(outcome) => {
                    debug!("Candidate {:?} not accepted: {:?}", candidate, outcome);
                    self.attempts += 1;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts every move whose x is positive.
    struct HalfPlane {
        calls: usize,
    }

    impl Mover for HalfPlane {
        fn try_move(&mut self, position: Option<&[f64]>, _orientation: Option<&[f64]>)
                    -> Result<MoveOutcome, GeometryError> {
            self.calls += 1;
            let x = position.map(|p| p[0]).unwrap_or(0.0);
            Ok(if x > 0.0 { MoveOutcome::Committed } else { MoveOutcome::Unreachable })
        }
    }

    #[test]
    fn test_samples_inside_disk_and_limits() {
        let sampling = TargetSampling { radius: 5.0, yaw_limits: [10.0, 20.0], max_attempts: None };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let t = sampling.sample(&mut rng);
            assert!(t.position[0].hypot(t.position[1]) <= 5.0);
            assert_eq!(t.position[2], 0.0);
            assert_eq!(&t.orientation[..2], &[0.0, 0.0]);
            assert!(t.orientation[2] >= 10.0 && t.orientation[2] <= 20.0);
        }
    }

    #[test]
    fn test_yields_only_accepted_targets() {
        let mover = HalfPlane { calls: 0 };
        let mut generator = TargetGenerator::with_seed(
            mover, TargetSampling::default(), SingularityCheck::new(100.0, 25.0), 42).unwrap();
        let targets: Vec<Target> = generator.by_ref().take(20).map(|t| t.unwrap()).collect();
        assert_eq!(targets.len(), 20);
        assert!(generator.mover().calls >= 20);
        for t in &targets {
            assert!(t.position[0] > 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let run = |seed| {
            TargetGenerator::with_seed(HalfPlane { calls: 0 }, TargetSampling::default(),
                                       SingularityCheck::new(100.0, 25.0), seed)
                .unwrap()
                .take(5)
                .map(|t| t.unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_cap_ends_sequence() {
        // Single yaw value: every orientation after the first one is a duplicate
        let sampling = TargetSampling { radius: 0.001, yaw_limits: [0.0, 0.0], max_attempts: Some(50) };
        let mut generator = TargetGenerator::with_seed(
            HalfPlane { calls: 0 }, sampling, SingularityCheck::new(100.0, 25.0), 1).unwrap();
        let first = generator.find_map(|t| t.ok());
        assert!(first.is_some());
        assert!(generator.next().is_none());
        assert!(generator.next().is_none());
        assert_eq!(generator.yielded(), 1);
    }

    #[test]
    fn test_invalid_limits() {
        let sampling = TargetSampling { radius: 1.0, yaw_limits: [20.0, 10.0], max_attempts: None };
        let err = TargetGenerator::with_seed(HalfPlane { calls: 0 }, sampling,
                                             SingularityCheck::new(100.0, 25.0), 0).err().unwrap();
        assert!(matches!(err, GeometryError::InvalidSampling { what: "yaw_limits", .. }));
        assert_eq!(err.to_string(), "Invalid sampling yaw_limits: [20, 10]");

        let sampling = TargetSampling { radius: -1.0, ..TargetSampling::default() };
        let err = TargetGenerator::with_seed(HalfPlane { calls: 0 }, sampling,
                                             SingularityCheck::new(100.0, 25.0), 0).err().unwrap();
        assert!(matches!(err, GeometryError::InvalidSampling { what: "radius", .. }));
    }
}
