//! Core state types for the N-body integrator.
//!
//! The whole system lives in one flat [`StateVector`]: for every body, its
//! position components followed by its velocity components. The same layout
//! doubles as the [`Derivative`] (velocity in the position slots, acceleration
//! in the velocity slots), which lets the integrator treat every slot
//! uniformly.

use nalgebra::{DVector, Vector3};

use super::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

/// A point mass taking part in the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub index: usize, // position in the state vector
    pub m: f64,       // mass
}

/// Positions and velocities of all bodies at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    dim: usize,           // 2 or 3 components per vector
    data: DVector<f64>,   // [x_0, v_0, x_1, v_1, ...], each block `dim` long
}

/// First time-derivative of a [`StateVector`], same shape
pub type Derivative = StateVector;

impl StateVector {
    /// All-zero state for `n` bodies in `dim` dimensions; `dim` must be 2 or 3
    pub(crate) fn zeros(n: usize, dim: usize) -> Self {
        Self {
            dim,
            data: DVector::zeros(n * 2 * dim),
        }
    }

    pub(crate) fn filled(n: usize, dim: usize, value: f64) -> Self {
        Self {
            dim,
            data: DVector::from_element(n * 2 * dim, value),
        }
    }

    /// Build a state from per-body positions and velocities
    pub fn from_bodies(dim: usize, positions: &[Vec<f64>], velocities: &[Vec<f64>]) -> Result<Self> {
        check_dim(dim)?;
        if positions.is_empty() {
            return Err(SimError::config("at least one body is required"));
        }
        if positions.len() != velocities.len() {
            return Err(SimError::config(format!(
                "{} positions but {} velocities",
                positions.len(),
                velocities.len()
            )));
        }

        let mut state = Self::zeros(positions.len(), dim);
        for (i, (x, v)) in positions.iter().zip(velocities).enumerate() {
            if x.len() != dim || v.len() != dim {
                return Err(SimError::config(format!(
                    "body {i}: expected {dim} position and velocity components, got {} and {}",
                    x.len(),
                    v.len()
                )));
            }
            state.position_mut(i).copy_from_slice(x);
            state.velocity_mut(i).copy_from_slice(v);
        }
        Ok(state)
    }

    /// Wrap an already-flat buffer laid out as `[x_0, v_0, x_1, v_1, ...]`
    pub fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self> {
        check_dim(dim)?;
        if data.is_empty() || data.len() % (2 * dim) != 0 {
            return Err(SimError::config(format!(
                "flat state of length {} does not hold whole {dim}D bodies",
                data.len()
            )));
        }
        Ok(Self {
            dim,
            data: DVector::from_vec(data),
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_bodies(&self) -> usize {
        self.data.len() / (2 * self.dim)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    /// Position of body `i` (velocity of body `i` when read from a [`Derivative`])
    pub fn position(&self, i: usize) -> &[f64] {
        let off = self.offset(i);
        &self.data.as_slice()[off..off + self.dim]
    }

    /// Velocity of body `i` (acceleration of body `i` when read from a [`Derivative`])
    pub fn velocity(&self, i: usize) -> &[f64] {
        let off = self.offset(i) + self.dim;
        &self.data.as_slice()[off..off + self.dim]
    }

    pub(crate) fn position_mut(&mut self, i: usize) -> &mut [f64] {
        let off = self.offset(i);
        let dim = self.dim;
        &mut self.data.as_mut_slice()[off..off + dim]
    }

    pub(crate) fn velocity_mut(&mut self, i: usize) -> &mut [f64] {
        let off = self.offset(i) + self.dim;
        let dim = self.dim;
        &mut self.data.as_mut_slice()[off..off + dim]
    }

    /// Position of body `i` lifted to 3D (z = 0 for planar systems)
    pub fn position3(&self, i: usize) -> NVec3 {
        lift(self.position(i))
    }

    /// Velocity of body `i` lifted to 3D (z = 0 for planar systems)
    pub fn velocity3(&self, i: usize) -> NVec3 {
        lift(self.velocity(i))
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }

    /// `self + h * k`, component-wise over the flat layout
    pub(crate) fn add_scaled(&self, k: &Derivative, h: f64) -> Self {
        Self {
            dim: self.dim,
            data: &self.data + &k.data * h,
        }
    }

    /// `self + h/6 * (k1 + 2 k2 + 2 k3 + k4)`
    pub(crate) fn rk4_combine(&self, k1: &Derivative, k2: &Derivative, k3: &Derivative, k4: &Derivative, h: f64) -> Self {
        let slope = &k1.data + &k2.data * 2.0 + &k3.data * 2.0 + &k4.data;
        Self {
            dim: self.dim,
            data: &self.data + slope * (h / 6.0),
        }
    }

    fn offset(&self, i: usize) -> usize {
        i * 2 * self.dim
    }
}

pub(crate) fn check_dim(dim: usize) -> Result<()> {
    if dim == 2 || dim == 3 {
        Ok(())
    } else {
        Err(SimError::config(format!("dimension must be 2 or 3, got {dim}")))
    }
}

fn lift(c: &[f64]) -> NVec3 {
    NVec3::new(c[0], c[1], c.get(2).copied().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_position_then_velocity_per_body() {
        let s = StateVector::from_bodies(
            2,
            &[vec![1.0, 2.0], vec![5.0, 6.0]],
            &[vec![3.0, 4.0], vec![7.0, 8.0]],
        )
        .unwrap();

        assert_eq!(s.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(s.n_bodies(), 2);
        assert_eq!(s.velocity(1), &[7.0, 8.0]);
        assert_eq!(s.position3(0), NVec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn rejects_mismatched_shapes() {
        assert!(StateVector::from_bodies(2, &[vec![1.0, 2.0, 3.0]], &[vec![0.0, 0.0]]).is_err());
        assert!(StateVector::from_bodies(4, &[vec![0.0; 4]], &[vec![0.0; 4]]).is_err());
        assert!(StateVector::from_bodies(3, &[], &[]).is_err());
        assert!(StateVector::from_flat(3, vec![0.0; 7]).is_err());
    }

    #[test]
    fn non_finite_component_is_detected() {
        let mut s = StateVector::zeros(3, 3);
        assert!(s.is_finite());
        s.velocity_mut(2)[1] = f64::NAN;
        assert!(!s.is_finite());
    }
}
