//! Right-hand side of the equations of motion
//!
//! [`ForceModel`] turns a [`StateVector`] into its [`Derivative`]: velocities
//! are copied into the position slots and the accelerations from every
//! registered [`Acceleration`] term are summed into the velocity slots.
//! Newtonian gravity with a distance floor is the only term shipped.

use serde::Deserialize;

use super::error::{Result, SimError};
use super::states::{Body, Derivative, StateVector};

/// How the distance floor `epsilon` enters the pair separation `r`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Softening {
    /// `max(r, eps)^3`
    #[default]
    Floor,
    /// `(r + eps)^3`
    Additive,
    /// `(r^2 + eps^2)^(3/2)`
    Plummer,
}

impl Softening {
    /// Cube of the softened separation for raw distance `r`
    pub fn cubed(self, r: f64, eps: f64) -> f64 {
        match self {
            Softening::Floor => r.max(eps).powi(3),
            Softening::Additive => (r + eps).powi(3),
            Softening::Plummer => (r * r + eps * eps).powf(1.5),
        }
    }

    /// Softened separation, used for the matching potential energy
    pub fn distance(self, r: f64, eps: f64) -> f64 {
        match self {
            Softening::Floor => r.max(eps),
            Softening::Additive => r + eps,
            Softening::Plummer => (r * r + eps * eps).sqrt(),
        }
    }
}

/// Acceleration source acting on a full system state
/// Implementations add their contribution for body `i` into `out[i * dim .. (i + 1) * dim]`
pub trait Acceleration {
    fn acceleration(&self, state: &StateVector, out: &mut [f64]);
}

/// Pairwise Newtonian gravity
///
/// `epsilon` is a numerical safety floor so coincident or grazing bodies never
/// divide by zero. It is not a physical softening length.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub epsilon: f64, // distance floor
    pub softening: Softening,
    masses: Vec<f64>,
}

impl NewtonianGravity {
    #[allow(non_snake_case)]
    pub fn new(masses: Vec<f64>, G: f64, epsilon: f64, softening: Softening) -> Self {
        Self { G, epsilon, softening, masses }
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, state: &StateVector, out: &mut [f64]) {
        let n = state.n_bodies();
        let dim = state.dim();

        // each unordered pair once; i is pulled along +r, j along -r
        for i in 0..n {
            let xi = state.position(i);
            let mi = self.masses[i];

            for j in (i + 1)..n {
                let xj = state.position(j);
                let mj = self.masses[j];

                let mut r = [0.0; 3];
                let mut r2 = 0.0;
                for k in 0..dim {
                    r[k] = xj[k] - xi[k];
                    r2 += r[k] * r[k];
                }

                // coef = G / d^3 with d the softened separation
                let coef = self.G / self.softening.cubed(r2.sqrt(), self.epsilon);

                for k in 0..dim {
                    out[i * dim + k] += coef * mj * r[k];
                    out[j * dim + k] -= coef * mi * r[k];
                }
            }
        }
    }
}

/// Immutable force configuration for one run: body masses plus the set of
/// acceleration terms evaluated on every derivative call
pub struct ForceModel {
    bodies: Vec<Body>,
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl ForceModel {
    /// Validated model with no acceleration terms (free drift)
    pub fn new(masses: &[f64]) -> Result<Self> {
        if masses.is_empty() {
            return Err(SimError::config("at least one body is required"));
        }
        if let Some((i, m)) = masses.iter().enumerate().find(|(_, m)| !(m.is_finite() && **m > 0.0)) {
            return Err(SimError::config(format!("body {i}: mass must be positive, got {m}")));
        }

        let bodies = masses
            .iter()
            .enumerate()
            .map(|(index, &m)| Body { index, m })
            .collect();

        Ok(Self {
            bodies,
            terms: Vec::new(),
        })
    }

    /// Validated model with pairwise Newtonian gravity registered
    #[allow(non_snake_case)]
    pub fn gravity(masses: &[f64], G: f64, epsilon: f64, softening: Softening) -> Result<Self> {
        if !(G.is_finite() && G >= 0.0) {
            return Err(SimError::config(format!("gravitational constant must be finite and non-negative, got {G}")));
        }
        if !(epsilon.is_finite() && epsilon >= 0.0) {
            return Err(SimError::config(format!("epsilon must be finite and non-negative, got {epsilon}")));
        }
        let model = Self::new(masses)?;
        Ok(model.with(NewtonianGravity::new(masses.to_vec(), G, epsilon, softening)))
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn masses(&self) -> Vec<f64> {
        self.bodies.iter().map(|b| b.m).collect()
    }

    pub fn n_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Time-derivative of `state`
    /// A state that does not describe exactly [`n_bodies`](Self::n_bodies) bodies
    /// gets an all-NaN derivative, which the recorder reports as divergence.
    pub fn derivative(&self, state: &StateVector) -> Derivative {
        let n = state.n_bodies();
        let dim = state.dim();
        if n != self.bodies.len() {
            return StateVector::filled(n, dim, f64::NAN);
        }
        let mut accel = vec![0.0; n * dim];
        for term in &self.terms {
            term.acceleration(state, &mut accel);
        }

        let mut d = StateVector::zeros(n, dim);
        for i in 0..n {
            d.position_mut(i).copy_from_slice(state.velocity(i));
            d.velocity_mut(i).copy_from_slice(&accel[i * dim..(i + 1) * dim]);
        }
        d
    }
}
