//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – dimension and the coordinate framing of the body list
//! - [`ParametersConfig`] – step settings and physical constants
//! - [`BodyConfig`]       – mass and initial state of each body
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   dimension: false        # false -> 2D, true -> 3D
//!   coordinates: cartesian  # or "polar" (2D only)
//!
//! parameters:
//!   dt: 0.01                # fixed step, negative runs backward
//!   steps: 1000
//!   G: 6.6743e-11
//!   epsilon: 1.0e-6         # distance floor, optional
//!   softening: floor        # floor | additive | plummer, optional
//!
//! bodies:
//!   - name: a               # optional, used for output columns
//!     m: 1.0e10
//!     x: [ 1.0, 0.0 ]
//!     v: [ 0.0, 0.0 ]
//! ```
//!
//! With `coordinates: polar`, `x` holds `[r, theta]` and `v` holds
//! `[dr/dt, dtheta/dt]`. [`Scenario`](crate::Scenario) converts them to
//! Cartesian once, before integration.

use std::io::Read;

use serde::Deserialize;

use crate::simulation::error::Result;
use crate::simulation::forces::Softening;

/// Framing of the positions and velocities in the body list
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatesConfig {
    #[default]
    Cartesian,
    Polar,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub dimension: bool, // `false` - 2D simulation, `true` - 3D simulation
    #[serde(default)]
    pub coordinates: CoordinatesConfig,
}

#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64,    // time step size
    pub steps: usize, // number of steps
    pub G: f64,     // gravitational constant
    #[serde(default = "default_epsilon")]
    pub epsilon: f64, // distance floor against near-zero separations
    #[serde(default)]
    pub softening: Softening,
}

fn default_epsilon() -> f64 {
    1.0e-6
}

/// Initial state of a single body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub m: f64,      // mass
    pub x: Vec<f64>, // initial position
    pub v: Vec<f64>, // initial velocity
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn dim(&self) -> usize {
        if self.engine.dimension { 3 } else { 2 }
    }
}
