//! Peak extraction: the strongest strict local maximum of the active region.

use std::ops::Range;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layer::Layer;
use crate::pool::{Worker, WorkerPool};
use crate::range::ActiveRegion;

/// Position and energy of a storm's most significant peak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub position: usize,
    pub energy: f32,
}

impl Peak {
    pub fn new(position: usize, energy: f32) -> Self {
        Self { position, energy }
    }

    /// Higher energy wins; equal energies go to the lower position.
    pub fn beats(&self, other: &Peak) -> bool {
        self.energy > other.energy
            || (self.energy == other.energy && self.position < other.position)
    }
}

/// Strictly greater than both neighbors. `k` must have two neighbors in the layer.
#[inline]
pub fn is_local_maximum(layer: &Layer, k: usize) -> bool {
    let value = layer.get(k);
    value > layer.get(k - 1) && value > layer.get(k + 1)
}

/// Strongest strict local maximum among `cells`, first occurrence on ties.
pub fn local_best(layer: &Layer, cells: Range<usize>) -> Option<Peak> {
    let mut best: Option<Peak> = None;
    for k in cells {
        if !is_local_maximum(layer, k) {
            continue;
        }
        let energy = layer.get(k);
        if best.map_or(true, |b| energy > b.energy) {
            best = Some(Peak::new(k, energy));
        }
    }
    best
}

/// Fallback for monotonic regions: the larger of the two edge cells.
///
/// The right edge wins only when strictly larger.
pub fn boundary_peak(layer: &Layer, region: &ActiveRegion) -> Option<Peak> {
    if region.is_empty() {
        return None;
    }
    let left = region.start();
    let right = region.end() - 1;
    let position = if layer.get(right) > layer.get(left) {
        right
    } else {
        left
    };
    Some(Peak::new(position, layer.get(position)))
}

/// Storm-wide best candidate, merged from every worker under a lock.
#[derive(Debug, Default)]
pub struct PeakMerger {
    best: Mutex<Option<Peak>>,
}

impl PeakMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&self, candidate: Option<Peak>) {
        let Some(candidate) = candidate else {
            return;
        };
        let mut best = self.best.lock().unwrap_or_else(|poisoned| {
            warn!("Peak merger mutex was poisoned, recovering");
            poisoned.into_inner()
        });
        if best.map_or(true, |b| candidate.beats(&b)) {
            *best = Some(candidate);
        }
    }

    pub fn into_inner(self) -> Option<Peak> {
        self.best
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Scans this worker's share of the region interior and merges its local best.
pub fn reduce_share(
    layer: &Layer,
    region: &ActiveRegion,
    worker: &Worker<'_>,
    merger: &PeakMerger,
) {
    let share = worker.share(region.interior());
    merger.offer(local_best(layer, share));
}

/// Resolves a merged result: the interior maximum if any, else the boundary fallback.
///
/// The reported peak starts at `(0, 0.0)` and is only replaced by a candidate
/// with strictly greater energy, so a region with no positive value reports the
/// default.
pub fn resolve(merged: Option<Peak>, layer: &Layer, region: &ActiveRegion) -> Peak {
    let mut best = Peak::default();
    if let Some(candidate) = merged.or_else(|| boundary_peak(layer, region)) {
        if candidate.energy > best.energy {
            best = candidate;
        }
    }
    best
}

/// Single-threaded peak reduction over `region`.
pub fn find_peak(layer: &Layer, region: &ActiveRegion) -> Peak {
    let merger = PeakMerger::new();
    WorkerPool::run_inline(|worker| reduce_share(layer, region, &worker, &merger));
    resolve(merger.into_inner(), layer, region)
}
