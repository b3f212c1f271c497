use thiserror::Error;

use crate::model::Phase;

/// Invalid grid, population or parameter settings. Raised when a simulation is created and when a
/// parameter snapshot is handed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("agent count must be at least 1")]
    NoAgents,

    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid of {width}x{height} cells does not fit in memory")]
    GridTooLarge { width: usize, height: usize },

    #[error("{0} must be at least 1")]
    ZeroResolution(&'static str),

    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: f32 },

    #[error("agent {index} at ({x}, {y}) lies outside the grid")]
    AgentOutOfBounds { index: usize, x: f32, y: f32 },
}

/// Reasons a tick could not be performed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// A previous tick unwound while in the given phase. The buffers are in an unknown state and the
    /// simulation must not be advanced any further.
    #[error("a previous tick was interrupted during the {0:?} phase")]
    Interrupted(Phase),
}
