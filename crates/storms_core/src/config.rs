use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use clap::Args;

use crate::error::ConfigError;

/// Default significance threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// Active regions shorter than this run on the calling thread.
pub const DEFAULT_MIN_PARALLEL_CELLS: usize = 1000;

/// Run-wide settings, immutable once the simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Args))]
pub struct SimulationConfig {
    /// Significance threshold; contributions below threshold / layer size are dropped
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_THRESHOLD))]
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Number of parallel workers
    #[cfg_attr(feature = "cli", arg(short = 't', long = "threads", default_value_t = default_workers()))]
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Active regions shorter than this are processed without the worker pool
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_MIN_PARALLEL_CELLS))]
    #[serde(default = "default_min_parallel_cells")]
    pub min_parallel_cells: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_min_parallel_cells() -> usize {
    DEFAULT_MIN_PARALLEL_CELLS
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            workers: default_workers(),
            min_parallel_cells: default_min_parallel_cells(),
        }
    }
}

impl SimulationConfig {
    pub fn new(threshold: f64, workers: usize) -> Self {
        Self {
            threshold,
            workers,
            ..Self::default()
        }
    }

    /// Builder-style override of [`SimulationConfig::min_parallel_cells`].
    pub fn with_min_parallel_cells(mut self, cells: usize) -> Self {
        self.min_parallel_cells = cells;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(self.workers));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for threshold in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = SimulationConfig::new(threshold, 1);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_workers() {
        let config = SimulationConfig::new(0.001, 0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidWorkerCount(0)));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"threshold": 0.5}"#).unwrap();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.min_parallel_cells, DEFAULT_MIN_PARALLEL_CELLS);
    }
}
