//! Three-point relaxation over a storm's active region.
//!
//! Each cell of the interior becomes the mean of itself and its two neighbors
//! as they were before the pass. Instead of copying the region, a worker
//! carries the previous cell's pre-pass value through its sweep. The only
//! values it needs from other workers are the cells just outside its share,
//! which it captures before the barrier that opens the write sweep.

use std::ops::Range;

use crate::layer::Layer;
use crate::pool::{Worker, WorkerPool};
use crate::range::ActiveRegion;

/// Pre-pass values of the cells bordering a worker's share.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundarySnapshot {
    left: f32,
    right: f32,
}

impl BoundarySnapshot {
    fn capture(layer: &Layer, share: &Range<usize>) -> Option<Self> {
        if share.is_empty() {
            return None;
        }
        Some(Self {
            left: layer.get(share.start - 1),
            right: layer.get(share.end),
        })
    }
}

/// Relaxes this worker's share of the region interior.
///
/// Contains exactly one barrier wait, which every worker of the broadcast must reach.
pub fn relax_share(layer: &Layer, region: &ActiveRegion, worker: &Worker<'_>) {
    let share = worker.share(region.interior());
    let snapshot = BoundarySnapshot::capture(layer, &share);

    worker.wait();

    if let Some(snapshot) = snapshot {
        sweep(layer, share, snapshot);
    }
}

fn sweep(layer: &Layer, share: Range<usize>, snapshot: BoundarySnapshot) {
    let last = share.end - 1;
    let mut previous_old = snapshot.left;
    for k in share {
        let current_old = layer.get(k);
        let next_old = if k == last {
            snapshot.right
        } else {
            layer.get(k + 1)
        };
        layer.set(k, (previous_old + current_old + next_old) / 3.0);
        previous_old = current_old;
    }
}

/// Single-threaded relaxation of `region`.
pub fn relax(layer: &Layer, region: &ActiveRegion) {
    WorkerPool::run_inline(|worker| relax_share(layer, region, &worker));
}
