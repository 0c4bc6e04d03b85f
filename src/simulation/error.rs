//! Error type shared by the simulation core and its configuration edge

use thiserror::Error;

/// Failures that stop a simulation before it starts.
///
/// Numeric divergence mid-run is not an error: it is reported through
/// [`Outcome`](crate::simulation::recorder::Outcome) on the returned trajectory
/// so the partial result stays usable.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("scenario parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
