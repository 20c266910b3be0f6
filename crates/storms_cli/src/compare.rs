//! Single-worker versus parallel cross-check of the same input.

use storms_core::{Peak, Simulation, SimulationConfig, SimulationError, Storm};
use tracing::{info, warn};

/// Relative tolerance on peak energies between the two runs.
pub const ENERGY_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct StormComparison {
    pub storm: usize,
    pub sequential: Peak,
    pub parallel: Peak,
}

impl StormComparison {
    pub fn matches(&self) -> bool {
        self.sequential.position == self.parallel.position
            && energies_agree(self.sequential.energy, self.parallel.energy)
    }
}

pub fn energies_agree(a: f32, b: f32) -> bool {
    a == b || (a - b).abs() <= ENERGY_TOLERANCE * a.abs().max(b.abs())
}

/// Runs `storms` with one worker and with `config.workers` workers.
pub fn compare_runs(
    layer_size: usize,
    storms: &[Storm],
    config: &SimulationConfig,
) -> Result<Vec<StormComparison>, SimulationError> {
    let sequential_config = SimulationConfig {
        workers: 1,
        ..config.clone()
    };
    let mut sequential = Simulation::new(layer_size, sequential_config)?;
    let mut parallel = Simulation::new(layer_size, config.clone())?;

    sequential.run(storms.iter().cloned());
    parallel.run(storms.iter().cloned());

    let comparisons: Vec<StormComparison> = sequential
        .results()
        .iter()
        .zip(parallel.results())
        .enumerate()
        .map(|(storm, (&sequential, &parallel))| StormComparison {
            storm,
            sequential,
            parallel,
        })
        .collect();

    for c in comparisons.iter().filter(|c| !c.matches()) {
        warn!(
            storm = c.storm,
            sequential_position = c.sequential.position,
            sequential_energy = c.sequential.energy,
            parallel_position = c.parallel.position,
            parallel_energy = c.parallel.energy,
            "Result mismatch"
        );
    }
    info!(
        storms = comparisons.len(),
        workers = config.workers,
        mismatches = comparisons.iter().filter(|c| !c.matches()).count(),
        "Comparison complete"
    );
    Ok(comparisons)
}
