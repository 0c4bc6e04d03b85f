//! Drives the integrator across uniform steps
//!
//! Two ways to consume a run:
//! - batch: [`TrajectoryRecorder::run`] collects every frame into a [`Trajectory`]
//! - stream: [`TrajectoryRecorder::stream`] hands out frames one at a time,
//!   carrying the last state forward, for consumers that render as they go
//!
//! Every new state is checked for finiteness. A non-finite state ends the run
//! early; the frames gathered so far are kept and the [`Outcome`] records where
//! it stopped.

use tracing::{debug, warn};

use super::error::{Result, SimError};
use super::forces::ForceModel;
use super::integrator::Integrator;
use super::params::validate_dt;
use super::states::{check_dim, StateVector};

/// One entry of a trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub state: StateVector,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// All requested steps were taken
    Completed,
    /// Step `step` (reaching `time`) produced a non-finite state, which was dropped
    NumericDivergence { step: usize, time: f64 },
    /// The caller's stop condition fired after the frame at `step`
    Interrupted { step: usize, time: f64 },
}

/// Ordered frames of one run plus how that run ended
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dt: f64,
    frames: Vec<Frame>,
    outcome: Outcome,
}

impl Trajectory {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    pub fn times(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }

    /// Position series of one body, one entry per frame, for plotting
    pub fn positions(&self, body: usize) -> Vec<Vec<f64>> {
        self.frames.iter().map(|f| f.state.position(body).to_vec()).collect()
    }

    /// Velocity series of one body, one entry per frame
    pub fn velocities(&self, body: usize) -> Vec<Vec<f64>> {
        self.frames.iter().map(|f| f.state.velocity(body).to_vec()).collect()
    }

    fn origin(&self) -> f64 {
        self.frames.first().map_or(0.0, |f| f.time)
    }
}

/// Lazy, forward-only frame sequence produced by [`TrajectoryRecorder::stream`]
///
/// Yields at most `steps + 1` frames. Once exhausted it stays exhausted; build
/// a new stream to start over.
pub struct Frames<'a> {
    integrator: &'a Integrator,
    dt: f64,
    origin: f64, // time of frame index 0 of the whole trajectory
    start: usize, // trajectory index of the first frame yielded
    steps: usize,
    emitted: usize,
    current: StateVector,
    outcome: Option<Outcome>,
}

impl<'a> Frames<'a> {
    fn new(integrator: &'a Integrator, initial: StateVector, dt: f64, steps: usize, origin: f64, start: usize) -> Self {
        Self {
            integrator,
            dt,
            origin,
            start,
            steps,
            emitted: 0,
            current: initial,
            outcome: None,
        }
    }

    /// `None` while frames remain, then how the stream ended
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// State of the last frame handed out (or the initial state before the first)
    pub fn current(&self) -> &StateVector {
        &self.current
    }

    fn time_at(&self, index: usize) -> f64 {
        self.origin + index as f64 * self.dt
    }
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.outcome.is_some() {
            return None;
        }

        let index = self.start + self.emitted;
        if self.emitted > 0 {
            let next = self.integrator.step(&self.current, self.dt);
            if !next.is_finite() {
                let time = self.time_at(index);
                warn!(step = index, time, "non-finite state, stopping run");
                self.outcome = Some(Outcome::NumericDivergence { step: index, time });
                return None;
            }
            self.current = next;
        }

        self.emitted += 1;
        if self.emitted > self.steps {
            self.outcome = Some(Outcome::Completed);
        }

        Some(Frame {
            time: self.time_at(index),
            state: self.current.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.outcome.is_some() {
            return (0, Some(0));
        }
        (0, Some(self.steps + 1 - self.emitted))
    }
}

/// Runs an [`Integrator`] over uniform steps
pub struct TrajectoryRecorder {
    integrator: Integrator,
}

impl TrajectoryRecorder {
    pub fn new(integrator: Integrator) -> Self {
        Self { integrator }
    }

    pub fn from_forces(forces: ForceModel) -> Self {
        Self::new(Integrator::new(forces))
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Lazy frames: `(0, initial)`, then one frame per step
    pub fn stream(&self, initial: StateVector, dt: f64, steps: usize) -> Result<Frames<'_>> {
        self.check_entry(&initial, dt, steps)?;
        debug!(bodies = initial.n_bodies(), dim = initial.dim(), dt, steps, "starting stream");
        Ok(Frames::new(&self.integrator, initial, dt, steps, 0.0, 0))
    }

    /// Full trajectory of `steps + 1` frames, shorter if the state diverged
    pub fn run(&self, initial: StateVector, dt: f64, steps: usize) -> Result<Trajectory> {
        self.run_until(initial, dt, steps, |_| false)
    }

    /// Like [`run`](Self::run), but `stop` is asked after every frame whether to end early
    pub fn run_until<F>(&self, initial: StateVector, dt: f64, steps: usize, stop: F) -> Result<Trajectory>
    where
        F: FnMut(&Frame) -> bool,
    {
        let frames = self.stream(initial, dt, steps)?;
        let (frames, outcome) = collect(frames, stop);
        Ok(Trajectory { dt, frames, outcome })
    }

    /// Continue a completed trajectory for `steps` more steps of its own `dt`
    pub fn extend(&self, trajectory: &mut Trajectory, steps: usize) -> Result<()> {
        if !trajectory.is_complete() {
            return Err(SimError::config(format!(
                "cannot extend a trajectory that ended with {:?}",
                trajectory.outcome
            )));
        }
        let Some(last) = trajectory.last() else {
            return Err(SimError::config("cannot extend an empty trajectory"));
        };

        let initial = last.state.clone();
        self.check_entry(&initial, trajectory.dt, steps)?;
        let start = trajectory.len() - 1;
        debug!(from = start, steps, "extending trajectory");

        let mut frames = Frames::new(&self.integrator, initial, trajectory.dt, steps, trajectory.origin(), start);
        // first frame duplicates the current last one
        frames.next();
        let (more, outcome) = collect(frames, |_| false);
        trajectory.frames.extend(more);
        trajectory.outcome = outcome;
        Ok(())
    }

    fn check_entry(&self, initial: &StateVector, dt: f64, steps: usize) -> Result<()> {
        validate_dt(dt)?;
        check_dim(initial.dim())?;
        if steps == usize::MAX {
            return Err(SimError::config("step count too large"));
        }
        let expected = self.integrator.forces().n_bodies();
        if initial.n_bodies() != expected {
            return Err(SimError::config(format!(
                "initial state has {} bodies, force model has {expected}",
                initial.n_bodies()
            )));
        }
        if !initial.is_finite() {
            return Err(SimError::config("initial state contains non-finite values"));
        }
        Ok(())
    }
}

fn collect<F>(mut frames: Frames<'_>, mut stop: F) -> (Vec<Frame>, Outcome)
where
    F: FnMut(&Frame) -> bool,
{
    let (_, upper) = frames.size_hint();
    let mut out = Vec::with_capacity(upper.unwrap_or(0));

    while let Some(frame) = frames.next() {
        let halt = stop(&frame);
        let time = frame.time;
        out.push(frame);
        if halt && frames.outcome().is_none() {
            let step = frames.start + frames.emitted - 1;
            return (out, Outcome::Interrupted { step, time });
        }
    }

    (out, frames.outcome().unwrap_or(Outcome::Completed))
}
