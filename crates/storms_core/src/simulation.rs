//! Storm orchestration.
//!
//! Each storm runs `Bombard -> Relax -> Reduce -> Done`. The coordinator
//! resolves particle reaches and the active region up front, then hands the
//! finalized plan to the workers, which run the three phases separated by
//! barriers. Storms never overlap: storm `i + 1` starts from the relaxed
//! layer left by storm `i`.

use std::fmt;

use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::impact::bombard_share;
use crate::layer::Layer;
use crate::peak::{reduce_share, resolve, Peak, PeakMerger};
use crate::pool::{Worker, WorkerPool};
use crate::range::{plan_storm, StormPlan};
use crate::relax::relax_share;
use crate::storm::Storm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bombard,
    Relax,
    Reduce,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Bombard => write!(f, "bombard"),
            Phase::Relax => write!(f, "relax"),
            Phase::Reduce => write!(f, "reduce"),
            Phase::Done => write!(f, "done"),
        }
    }
}

pub struct Simulation {
    config: SimulationConfig,
    layer: Layer,
    pool: WorkerPool,
    results: Vec<Peak>,
}

impl Simulation {
    /// Validates `config` and allocates a zeroed layer of `layer_size` cells.
    pub fn new(layer_size: usize, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers)?;
        info!(
            layer_size = layer_size,
            threshold = config.threshold,
            workers = config.workers,
            min_parallel_cells = config.min_parallel_cells,
            "Simulation initialized"
        );
        Ok(Self {
            config,
            layer: Layer::new(layer_size),
            pool,
            results: Vec::new(),
        })
    }

    /// Runs every storm in order and returns one peak per storm.
    pub fn run<I>(&mut self, storms: I) -> &[Peak]
    where
        I: IntoIterator<Item = Storm>,
    {
        for storm in storms {
            self.run_storm(storm);
        }
        &self.results
    }

    /// Processes one storm to completion. The storm is released on return.
    ///
    /// A storm that reaches no cell reports the default peak `(0, 0.0)`.
    pub fn run_storm(&mut self, storm: Storm) -> Peak {
        let index = self.results.len();
        let threshold = self.config.threshold;
        let plan = plan_storm(&storm, threshold, self.layer.len());
        let region = plan.region;

        debug!(
            storm = index,
            phase = %Phase::Bombard,
            particles = storm.len(),
            impacts = plan.impacts.len(),
            region_start = region.start(),
            region_end = region.end(),
            "Storm started"
        );

        let peak = if region.is_empty() {
            Peak::default()
        } else {
            let merger = PeakMerger::new();
            if region.len() < self.config.min_parallel_cells {
                WorkerPool::run_inline(|worker| self.storm_kernel(&plan, &worker, &merger));
            } else {
                self.pool
                    .broadcast(|worker| self.storm_kernel(&plan, &worker, &merger));
            }
            resolve(merger.into_inner(), &self.layer, &region)
        };

        debug!(
            storm = index,
            phase = %Phase::Done,
            position = peak.position,
            energy = peak.energy,
            "Storm finished"
        );
        self.results.push(peak);
        peak
    }

    /// The per-worker body of one storm.
    fn storm_kernel(&self, plan: &StormPlan, worker: &Worker<'_>, merger: &PeakMerger) {
        let layer = &self.layer;
        let region = &plan.region;

        bombard_share(
            layer,
            &plan.impacts,
            worker.share(region.range()),
            self.config.threshold,
        );
        worker.wait();

        if worker.index() == 0 {
            trace!(phase = %Phase::Relax, "Bombardment complete");
        }
        relax_share(layer, region, worker);
        worker.wait();

        if worker.index() == 0 {
            trace!(phase = %Phase::Reduce, "Relaxation complete");
        }
        reduce_share(layer, region, worker, merger);
    }

    pub fn layer_values(&self) -> Vec<f32> {
        self.layer.to_vec()
    }

    pub fn results(&self) -> &[Peak] {
        &self.results
    }

    /// Peak position of every processed storm, in storm order.
    pub fn positions(&self) -> Vec<usize> {
        self.results.iter().map(|p| p.position).collect()
    }

    /// Peak energy of every processed storm, in storm order.
    pub fn maxima(&self) -> Vec<f32> {
        self.results.iter().map(|p| p.energy).collect()
    }
}
