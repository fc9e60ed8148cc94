//! The 3-RPR mechanism: one ground, one platform and three legs with extension limits.
//!
//! A move is a transaction: the platform proposes its geometry at the target, candidate legs
//! are computed from it, and only if every leg length lies in `[Lmin, Lmax]` is the proposal
//! committed, the legs replaced and a snapshot exported. Otherwise nothing changes.
//!
//! [`Rpr::move_to`] takes `&mut self` and so cannot be re-entered. [`SharedRpr`] wraps a
//! mechanism for use from several threads: a reachable request arriving while another
//! commit is in flight is queued and reported as [`MoveOutcome::Deferred`]; the thread that
//! holds the commit drains the queue before releasing it, and a request queued just as it
//! releases is drained by the thread that queued it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::geometry_error::GeometryError;
use crate::ground::Ground;
use crate::kinematic_traits::{MoveOutcome, Mover};
use crate::leg::Legs;
use crate::parameters::rpr_kinematics::Parameters;
use crate::platform::{Platform, PlatformTransition, Proposal};
use crate::pose::JointLayout;
use crate::record::{Record, RecordSink};
use crate::target::Target;
use crate::utils::{format_fixed, is_valid};

/// Physical extension limits of every leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegBounds {
    pub min: f64,
    pub max: f64,
}

impl LegBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, GeometryError> {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(GeometryError::InvalidBounds { min, max });
        }
        Ok(LegBounds { min, max })
    }

    pub fn admits(&self, legs: &Legs) -> bool {
        legs.within(self.min, self.max)
    }
}

/// A proposal whose legs passed the reachability check, ready to be committed.
#[derive(Debug, Clone)]
pub struct Plan {
    pub proposal: Proposal,
    pub legs: Legs,
}

impl Plan {
    pub fn target(&self) -> Target {
        let (p, o) = (&self.proposal.position, &self.proposal.orientation);
        Target { position: [p.x, p.y, p.z], orientation: [o.x, o.y, o.z] }
    }
}

pub struct Rpr {
    name: String,
    ground: Ground,
    platform: Platform,
    legs: Legs,
    bounds: LegBounds,
    sinks: Vec<Box<dyn RecordSink>>,
}

impl std::fmt::Debug for Rpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rpr")
            .field("name", &self.name)
            .field("ground", &self.ground)
            .field("platform", &self.platform)
            .field("legs", &self.legs)
            .field("bounds", &self.bounds)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Rpr {
    /// Ground and platform must share precision and joint count.
    pub fn new(name: &str, ground: Ground, platform: Platform, bounds: LegBounds) -> Result<Self, GeometryError> {
        let legs = Legs::between(&ground, &platform)?;
        Ok(Rpr { name: name.to_string(), ground, platform, legs, bounds, sinks: Vec::new() })
    }

    pub fn from_parameters(parameters: &Parameters) -> Result<Self, GeometryError> {
        let ground = Ground::new(
            &[0.0, 0.0, 0.0],
            &[0.0, 0.0, parameters.ground_yaw],
            JointLayout::Radius(parameters.ground_radius),
            parameters.precision,
            parameters.scale,
        )?;
        let platform = Platform::new(
            &parameters.platform_position,
            &parameters.platform_orientation,
            JointLayout::Radius(parameters.platform_radius),
            parameters.precision,
            parameters.scale,
        )?;
        let bounds = LegBounds::new(parameters.min_length, parameters.max_length)?;
        Rpr::new(&parameters.name, ground, platform, bounds)
    }

    pub fn with_sink(mut self, sink: Box<dyn RecordSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn legs(&self) -> &Legs {
        &self.legs
    }

    pub fn bounds(&self) -> &LegBounds {
        &self.bounds
    }

    /// Proposes the move and checks reachability without changing anything.
    /// `Ok(None)` means some leg would leave `[Lmin, Lmax]`.
    pub fn plan(&self, position: Option<&[f64]>, orientation: Option<&[f64]>) -> Result<Option<Plan>, GeometryError> {
        let proposal = self.platform.propose(position, orientation)?;
        let legs = Legs::recompute(self.ground.joints(), &proposal.joints, self.platform.precision())?;
        if !is_valid(legs.lengths()) || !self.bounds.admits(&legs) {
            debug!("{} | UNREACHABLE | Coord: {} | Angle: {} | L: {}", self.name,
                format_fixed(proposal.position.as_slice()), format_fixed(proposal.orientation.as_slice()),
                format_fixed(legs.lengths()));
            return Ok(None);
        }
        Ok(Some(Plan { proposal, legs }))
    }

    /// Commits a plan made by [`Rpr::plan`], replaces the legs and exports a snapshot.
    /// A plan made from a pose the platform has since left is proposed again first and
    /// may turn out unreachable, in which case `Ok(None)` is returned.
    pub fn commit(&mut self, plan: Plan) -> Result<Option<PlatformTransition>, GeometryError> {
        let plan = if plan.proposal.is_based_on(&self.platform) {
            plan
        } else {
            let target = plan.target();
            match self.plan(Some(&target.position), Some(&target.orientation))? {
                Some(plan) => plan,
                None => return Ok(None),
            }
        };
        let transition = self.platform.commit(plan.proposal)?;
        self.legs = plan.legs;
        self.export()?;
        Ok(Some(transition))
    }

    /// The move transaction. Missing arguments keep the current values.
    pub fn move_to(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>) -> Result<MoveOutcome, GeometryError> {
        match self.plan(position, orientation)? {
            None => Ok(MoveOutcome::Unreachable),
            Some(plan) => Ok(match self.commit(plan)? {
                Some(_) => MoveOutcome::Committed,
                None => MoveOutcome::Unreachable,
            }),
        }
    }

    /// Flat snapshot: ground joints, platform state, then legs.
    pub fn record(&self) -> Record {
        let mut record = self.ground.record();
        record.extend(self.platform.record());
        record.extend(self.legs.record());
        record
    }

    /// Sends the current snapshot to every sink and logs the progress line.
    pub fn export(&mut self) -> Result<(), GeometryError> {
        let record = self.record();
        for sink in self.sinks.iter_mut() {
            sink.append(&record)?;
        }
        info!("{}", self.progress_line());
        Ok(())
    }

    pub fn progress_line(&self) -> String {
        let offset = self.platform.last_offset();
        format!(
            "{} | MOVE | Coord: {} | Angle: {} | Offsets: ({}, {}) | DJ: {} | AJ: {} | L: ({}, {})",
            self.name,
            format_fixed(self.platform.position().as_slice()),
            format_fixed(self.platform.orientation().as_slice()),
            format_fixed(offset.position.as_slice()),
            format_fixed(offset.orientation.as_slice()),
            format_fixed(self.platform.distance_to_joint()),
            format_fixed(self.platform.bearing_to_joint()),
            format_fixed(self.legs.lengths()),
            format_fixed(self.legs.bearings()),
        )
    }
}

impl Mover for Rpr {
    fn try_move(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>)
                -> Result<MoveOutcome, GeometryError> {
        self.move_to(position, orientation)
    }
}

/// Thread safe handle to a mechanism with a guarded commit and a queue of deferred requests.
#[derive(Debug)]
pub struct SharedRpr {
    rpr: Mutex<Rpr>,
    moving: AtomicBool,
    pending: Mutex<VecDeque<Target>>,
}

/// Clears the moving flag when dropped, also on early return with an error.
struct MovingGuard<'a>(&'a AtomicBool);

impl Drop for MovingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SharedRpr {
    pub fn new(rpr: Rpr) -> Self {
        SharedRpr { rpr: Mutex::new(rpr), moving: AtomicBool::new(false), pending: Mutex::new(VecDeque::new()) }
    }

    /// Same transaction as [`Rpr::move_to`]. A reachable request made while another thread
    /// is committing is queued and `Deferred` is returned. If that other thread finished in
    /// the meantime, the caller drains the queue itself before returning, so `Deferred` only
    /// says the request went through the queue.
    pub fn move_to(&self, position: Option<&[f64]>, orientation: Option<&[f64]>) -> Result<MoveOutcome, GeometryError> {
        let plan = match self.lock()?.plan(position, orientation)? {
            Some(plan) => plan,
            None => return Ok(MoveOutcome::Unreachable),
        };

        let Some(guard) = self.begin() else {
            let target = plan.target();
            debug!("Move to {:?} deferred, another move is in flight", target);
            self.defer(target)?;
            return Ok(MoveOutcome::Deferred);
        };

        let outcome = {
            let mut rpr = self.lock()?;
            match rpr.commit(plan)? {
                Some(_) => MoveOutcome::Committed,
                None => MoveOutcome::Unreachable,
            }
        };
        self.drain(guard)?;
        Ok(outcome)
    }

    /// Number of deferred requests not yet retried.
    pub fn pending_len(&self) -> Result<usize, GeometryError> {
        Ok(self.pending.lock().map_err(|_| GeometryError::LockPoisoned)?.len())
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::Acquire)
    }

    /// Runs `f` on the mechanism while holding its lock.
    pub fn with_rpr<R>(&self, f: impl FnOnce(&Rpr) -> R) -> Result<R, GeometryError> {
        Ok(f(&*self.lock()?))
    }

    pub fn into_inner(self) -> Result<Rpr, GeometryError> {
        self.rpr.into_inner().map_err(|_| GeometryError::LockPoisoned)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Rpr>, GeometryError> {
        self.rpr.lock().map_err(|_| GeometryError::LockPoisoned)
    }

    fn begin(&self) -> Option<MovingGuard<'_>> {
        self.moving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| MovingGuard(&self.moving))
    }

    /// Queues a target. If the mover released the guard before the target was queued,
    /// nobody would retry it, so the guard is taken here and the queue drained.
    fn defer(&self, target: Target) -> Result<(), GeometryError> {
        self.pending.lock().map_err(|_| GeometryError::LockPoisoned)?.push_back(target);
        if let Some(guard) = self.begin() {
            self.drain(guard)?;
        }
        Ok(())
    }

    fn pop_pending(&self) -> Result<Option<Target>, GeometryError> {
        Ok(self.pending.lock().map_err(|_| GeometryError::LockPoisoned)?.pop_front())
    }

    /// Retries queued requests against the current pose. Requests that became unreachable
    /// are dropped. A request queued after the last check here is drained by its own caller
    /// in [`SharedRpr::defer`].
    fn drain(&self, guard: MovingGuard<'_>) -> Result<(), GeometryError> {
        let mut guard = Some(guard);
        while guard.is_some() {
            while let Some(target) = self.pop_pending()? {
                let outcome = self.lock()?.move_to(Some(&target.position), Some(&target.orientation))?;
                debug!("Deferred move to {:?} retried: {:?}", target, outcome);
            }
            drop(guard.take());
            if self.pending_len()? > 0 {
                guard = self.begin();
            }
        }
        Ok(())
    }
}

impl Mover for SharedRpr {
    fn try_move(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>)
                -> Result<MoveOutcome, GeometryError> {
        self.move_to(position, orientation)
    }
}

impl Mover for &SharedRpr {
    fn try_move(&mut self, position: Option<&[f64]>, orientation: Option<&[f64]>)
                -> Result<MoveOutcome, GeometryError> {
        (**self).move_to(position, orientation)
    }
}
