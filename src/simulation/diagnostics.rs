//! Conservation diagnostics for a run
//!
//! Total momentum, angular momentum and energy of a state, plus a baseline /
//! monitor pair that reports how far a trajectory drifted from its first
//! frame. RK4 is not symplectic, so energy drifts slowly; these numbers tell a
//! caller whether that drift is still acceptable.

use super::forces::{ForceModel, Softening};
use super::recorder::Trajectory;
use super::states::{NVec3, StateVector};

/// Total linear momentum: sum_i m_i v_i (z = 0 for planar systems)
pub fn total_momentum(masses: &[f64], state: &StateVector) -> NVec3 {
    (0..state.n_bodies()).fold(NVec3::zeros(), |p, i| p + masses[i] * state.velocity3(i))
}

/// Total angular momentum about the origin: sum_i m_i (x_i × v_i)
pub fn total_angular_momentum(masses: &[f64], state: &StateVector) -> NVec3 {
    (0..state.n_bodies()).fold(NVec3::zeros(), |l, i| {
        l + masses[i] * state.position3(i).cross(&state.velocity3(i))
    })
}

/// Centre of mass position
pub fn center_of_mass(masses: &[f64], state: &StateVector) -> NVec3 {
    let total: f64 = masses.iter().sum();
    let weighted = (0..state.n_bodies()).fold(NVec3::zeros(), |c, i| c + masses[i] * state.position3(i));
    weighted / total
}

pub fn kinetic_energy(masses: &[f64], state: &StateVector) -> f64 {
    (0..state.n_bodies())
        .map(|i| 0.5 * masses[i] * state.velocity3(i).norm_squared())
        .sum()
}

/// Pairwise gravitational potential, using the same softened separation as the force
#[allow(non_snake_case)]
pub fn potential_energy(masses: &[f64], state: &StateVector, G: f64, epsilon: f64, softening: Softening) -> f64 {
    let n = state.n_bodies();
    let mut u = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let r = (state.position3(j) - state.position3(i)).norm();
            u -= G * masses[i] * masses[j] / softening.distance(r, epsilon);
        }
    }
    u
}

/// Physical constants the energy computation needs
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct EnergyModel {
    pub G: f64,
    pub epsilon: f64,
    pub softening: Softening,
}

impl EnergyModel {
    pub fn total_energy(&self, masses: &[f64], state: &StateVector) -> f64 {
        kinetic_energy(masses, state) + potential_energy(masses, state, self.G, self.epsilon, self.softening)
    }
}

/// Baseline conserved quantities, taken from the first frame
#[derive(Debug, Clone)]
pub struct ConservationState {
    pub baseline_energy: f64,
    pub baseline_momentum: NVec3,
    pub baseline_angular_momentum: NVec3,
}

impl ConservationState {
    pub fn new(masses: &[f64], energy: &EnergyModel, state: &StateVector) -> Self {
        Self {
            baseline_energy: energy.total_energy(masses, state),
            baseline_momentum: total_momentum(masses, state),
            baseline_angular_momentum: total_angular_momentum(masses, state),
        }
    }
}

/// Drift of the conserved quantities relative to a [`ConservationState`]
#[derive(Debug, Clone)]
pub struct ConservationMonitor {
    /// |E - E0| / |E0|, or absolute when E0 is (near) zero
    pub energy_error: f64,
    /// p - p0
    pub momentum_error: NVec3,
    /// L - L0
    pub angular_momentum_error: NVec3,
}

impl ConservationMonitor {
    pub fn check(baseline: &ConservationState, masses: &[f64], energy: &EnergyModel, state: &StateVector) -> Self {
        let e = energy.total_energy(masses, state);
        let energy_error = if baseline.baseline_energy.abs() > 1e-12 {
            (e - baseline.baseline_energy).abs() / baseline.baseline_energy.abs()
        } else {
            (e - baseline.baseline_energy).abs()
        };

        Self {
            energy_error,
            momentum_error: total_momentum(masses, state) - baseline.baseline_momentum,
            angular_momentum_error: total_angular_momentum(masses, state) - baseline.baseline_angular_momentum,
        }
    }

    pub fn is_violated(&self, energy_tol: f64, momentum_tol: f64) -> bool {
        self.energy_error > energy_tol || self.momentum_error.norm() > momentum_tol
    }
}

/// Largest drift seen over a whole trajectory
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftReport {
    pub max_energy_error: f64,
    pub max_momentum_error: f64,
    pub max_angular_momentum_error: f64,
}

/// Scan every frame of `trajectory` against its first frame
pub fn drift(forces: &ForceModel, energy: &EnergyModel, trajectory: &Trajectory) -> DriftReport {
    let Some(first) = trajectory.first() else {
        return DriftReport::default();
    };
    let masses = forces.masses();
    let baseline = ConservationState::new(&masses, energy, &first.state);

    trajectory.frames().iter().fold(DriftReport::default(), |acc, frame| {
        let m = ConservationMonitor::check(&baseline, &masses, energy, &frame.state);
        DriftReport {
            max_energy_error: acc.max_energy_error.max(m.energy_error),
            max_momentum_error: acc.max_momentum_error.max(m.momentum_error.norm()),
            max_angular_momentum_error: acc.max_angular_momentum_error.max(m.angular_momentum_error.norm()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_and_energy_of_a_simple_pair() {
        let masses = [2.0, 1.0];
        let s = StateVector::from_bodies(
            2,
            &[vec![0.0, 0.0], vec![2.0, 0.0]],
            &[vec![1.0, 0.0], vec![0.0, 3.0]],
        )
        .unwrap();

        assert_eq!(total_momentum(&masses, &s), NVec3::new(2.0, 3.0, 0.0));
        assert_eq!(total_angular_momentum(&masses, &s), NVec3::new(0.0, 0.0, 6.0));
        assert_eq!(kinetic_energy(&masses, &s), 0.5 * 2.0 + 0.5 * 9.0);
        assert_eq!(potential_energy(&masses, &s, 1.0, 0.0, Softening::Floor), -1.0);
        assert_eq!(center_of_mass(&masses, &s), NVec3::new(2.0 / 3.0, 0.0, 0.0));
    }
}
