//! Build a ready-to-run simulation from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a [`Scenario`]:
//! - run parameters (`Parameters`)
//! - initial Cartesian state at t = 0 (polar input converted here)
//! - a recorder wrapping the RK4 integrator and the gravity force model
//!
//! All validation happens here, before any step is taken.

use tracing::debug;

use crate::configuration::config::{BodyConfig, CoordinatesConfig, ScenarioConfig};
use crate::configuration::polar;
use crate::simulation::diagnostics::EnergyModel;
use crate::simulation::error::{Result, SimError};
use crate::simulation::forces::ForceModel;
use crate::simulation::params::Parameters;
use crate::simulation::recorder::{Frames, Trajectory, TrajectoryRecorder};
use crate::simulation::states::StateVector;

/// Fully-initialized simulation: parameters, initial state and the recorder that drives it
pub struct Scenario {
    pub names: Vec<String>,
    pub parameters: Parameters,
    pub initial: StateVector,
    pub recorder: TrajectoryRecorder,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let dim = cfg.dim();
        if cfg.engine.coordinates == CoordinatesConfig::Polar && dim != 2 {
            return Err(SimError::config("polar coordinates are only supported for 2D scenarios"));
        }

        // Bodies: names default to their index
        let names: Vec<String> = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(i, bc)| bc.name.clone().unwrap_or_else(|| format!("body{i}")))
            .collect();
        let masses: Vec<f64> = cfg.bodies.iter().map(|bc| bc.m).collect();

        let (positions, velocities): (Vec<Vec<f64>>, Vec<Vec<f64>>) = match cfg.engine.coordinates {
            CoordinatesConfig::Cartesian => (
                cfg.bodies.iter().map(|bc| bc.x.clone()).collect(),
                cfg.bodies.iter().map(|bc| bc.v.clone()).collect(),
            ),
            CoordinatesConfig::Polar => polar_bodies(&cfg.bodies)?,
        };
        let initial = StateVector::from_bodies(dim, &positions, &velocities)?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            steps: p_cfg.steps,
            G: p_cfg.G,
            epsilon: p_cfg.epsilon,
            softening: p_cfg.softening,
        };
        parameters.validate()?;

        // Forces: gravity closed over the masses and constants
        let forces = ForceModel::gravity(&masses, parameters.G, parameters.epsilon, parameters.softening)?;

        debug!(bodies = masses.len(), dim, dt = parameters.dt, steps = parameters.steps, "scenario built");

        Ok(Self {
            names,
            parameters,
            initial,
            recorder: TrajectoryRecorder::from_forces(forces),
        })
    }

    pub fn forces(&self) -> &ForceModel {
        self.recorder.integrator().forces()
    }

    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel {
            G: self.parameters.G,
            epsilon: self.parameters.epsilon,
            softening: self.parameters.softening,
        }
    }

    /// Batch run over the configured steps
    pub fn run(&self) -> Result<Trajectory> {
        self.recorder.run(self.initial.clone(), self.parameters.dt, self.parameters.steps)
    }

    /// Frame-by-frame run over the configured steps
    pub fn stream(&self) -> Result<Frames<'_>> {
        self.recorder.stream(self.initial.clone(), self.parameters.dt, self.parameters.steps)
    }
}

fn polar_bodies(bodies: &[BodyConfig]) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let mut positions = Vec::with_capacity(bodies.len());
    let mut velocities = Vec::with_capacity(bodies.len());
    for (i, bc) in bodies.iter().enumerate() {
        let (&[r, theta], &[dr, dtheta]) = (bc.x.as_slice(), bc.v.as_slice()) else {
            return Err(SimError::config(format!(
                "body {i}: polar input needs [r, theta] and [dr/dt, dtheta/dt]"
            )));
        };
        positions.push(polar::position_to_cartesian(r, theta).to_vec());
        velocities.push(polar::velocity_to_cartesian(r, theta, dr, dtheta).to_vec());
    }
    Ok((positions, velocities))
}
