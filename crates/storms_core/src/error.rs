use thiserror::Error;

/// Rejected run configuration. Checked once before the first storm.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid threshold {0}: must be a positive finite number")]
    InvalidThreshold(f64),
    #[error("invalid number of workers {0}: must be at least 1")]
    InvalidWorkerCount(usize),
}

/// Errors raised while setting up a simulation.
///
/// Once a [`Simulation`](crate::Simulation) exists, storm processing cannot fail:
/// out-of-range particles and pruning overflow have defined fallbacks.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}
