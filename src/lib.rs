pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use simulation::error::{Result, SimError};
pub use simulation::states::{Body, Derivative, NVec3, StateVector};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, ForceModel, NewtonianGravity, Softening};
pub use simulation::integrator::{rk4_step, Integrator};
pub use simulation::recorder::{Frame, Frames, Outcome, Trajectory, TrajectoryRecorder};
pub use simulation::diagnostics::{ConservationMonitor, ConservationState, DriftReport, EnergyModel};
pub use simulation::scenario::Scenario;

pub use configuration::config::{BodyConfig, CoordinatesConfig, EngineConfig, ParametersConfig, ScenarioConfig};

pub use output::csv::{save_trajectory, write_trajectory, Framing};

pub use benchmark::benchmark::{bench_gravity, bench_rk4};
