//! Numerical and physical parameters for a run
//!
//! `Parameters` holds:
//! - the fixed step `dt` and the number of steps,
//! - gravitational constant `G`,
//! - the distance floor `epsilon` and how it is applied (`softening`)

use super::error::{Result, SimError};
use super::forces::Softening;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub dt: f64, // fixed step size, negative integrates backward
    pub steps: usize, // number of integrator steps
    pub G: f64, // gravitational constant
    pub epsilon: f64, // numerical distance floor, not a physical length
    pub softening: Softening, // how epsilon enters the pair distance
}

impl Parameters {
    /// Check the step settings. Force-law settings are checked by the force model.
    pub fn validate(&self) -> Result<()> {
        validate_dt(self.dt)
    }
}

pub(crate) fn validate_dt(dt: f64) -> Result<()> {
    if dt == 0.0 || !dt.is_finite() {
        return Err(SimError::config(format!("time step must be finite and non-zero, got {dt}")));
    }
    Ok(())
}
