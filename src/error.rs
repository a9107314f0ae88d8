use thiserror::Error;

use crate::topology::AnchorId;

/// Top-level error type for the navigation graph.
#[derive(Debug, Error)]
pub enum NavGraphError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Trail(#[from] TrailError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading a persisted topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology references anchor {0:?} but no payload was supplied")]
    UnresolvedAnchor(AnchorId),
}

/// Errors related to trail generation.
#[derive(Debug, Error)]
pub enum TrailError {
    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),

    #[error("a path of length {length} at step size {step} needs more than {limit} poses")]
    TooManyPoses { length: f64, step: f64, limit: usize },
}

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`NavGraphError`].
pub type Result<T> = std::result::Result<T, NavGraphError>;
