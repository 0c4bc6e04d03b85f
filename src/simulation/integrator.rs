//! Fixed-step classical Runge–Kutta (RK4) integrator
//!
//! One step costs four force evaluations. There is no step-size control, no
//! error estimate and no rejection: non-finite values produced inside a step
//! flow straight into the returned state and are caught by the recorder.

use super::forces::ForceModel;
use super::states::StateVector;

/// Advance `state` by `dt` with classical RK4, returning the new state
/// A negative `dt` integrates backward in time.
pub fn rk4_step(state: &StateVector, forces: &ForceModel, dt: f64) -> StateVector {
    let half_dt = 0.5 * dt;

    // slope at the start of the interval
    let k1 = forces.derivative(state);
    // two midpoint slopes, each using the previous one
    let k2 = forces.derivative(&state.add_scaled(&k1, half_dt));
    let k3 = forces.derivative(&state.add_scaled(&k2, half_dt));
    // slope at the end of the interval
    let k4 = forces.derivative(&state.add_scaled(&k3, dt));

    // x_n+1 = x_n + dt/6 (k1 + 2 k2 + 2 k3 + k4)
    state.rk4_combine(&k1, &k2, &k3, &k4, dt)
}

/// RK4 stepper bound to one force model
pub struct Integrator {
    forces: ForceModel,
}

impl Integrator {
    pub fn new(forces: ForceModel) -> Self {
        Self { forces }
    }

    pub fn forces(&self) -> &ForceModel {
        &self.forces
    }

    /// Next state after one step of `dt`; `state` is left untouched
    pub fn step(&self, state: &StateVector, dt: f64) -> StateVector {
        rk4_step(state, &self.forces, dt)
    }
}
