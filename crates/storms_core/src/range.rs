//! Influence range pruning and active region accumulation.
//!
//! An impact of energy `E` contributes at least `threshold / N` to a cell at
//! 1-based distance `d` iff `d <= (E / threshold)^2`, up to f32 rounding of the
//! contribution itself. Everything outside that radius can be skipped without
//! changing the result.

use std::ops::Range;

use crate::impact::{attenuated, is_significant, Impact};
use crate::storm::Storm;

/// Largest offset from the impact cell that can still receive a significant
/// contribution, or `None` when even the impact cell cannot.
///
/// A squared ratio too large for `u64` is unbounded influence: `u64::MAX`.
pub fn max_offset(energy: f32, threshold: f64, layer_len: usize) -> Option<u64> {
    if layer_len == 0 {
        return None;
    }
    let ratio = f64::from(energy).abs() / threshold;
    let squared = ratio * ratio;
    if !squared.is_finite() || squared >= u64::MAX as f64 {
        return Some(u64::MAX);
    }

    // The exact bound is floor(squared), but contributions are evaluated in f32
    // and may round up past it. Significance is monotone in distance, so grow
    // `last` to the farthest distance the update rule actually accepts.
    let significant =
        |distance: u64| is_significant(attenuated(layer_len, distance, energy), threshold, layer_len);
    let mut last = squared.floor() as u64;
    let mut beyond = last.saturating_add(1);
    let mut step = 1u64;
    while beyond < u64::MAX && significant(beyond) {
        last = beyond;
        step = step.saturating_mul(2);
        beyond = last.saturating_add(step);
    }
    if beyond == u64::MAX && significant(beyond) {
        return Some(u64::MAX);
    }
    while beyond - last > 1 {
        let mid = last + (beyond - last) / 2;
        if significant(mid) {
            last = mid;
        } else {
            beyond = mid;
        }
    }
    last.checked_sub(1)
}

/// Half-open range of cells within `offset` of `position`, clipped to `[0, layer_len)`.
pub fn influence_range(position: i64, offset: u64, layer_len: usize) -> Range<usize> {
    // Wide enough for any i64 position combined with any u64 offset.
    let (position, offset, len) = (position as i128, offset as i128, layer_len as i128);
    let start = (position - offset).clamp(0, len);
    let end = (position + offset + 1).clamp(0, len);
    start as usize..end as usize
}

/// Covering interval `[start, end)` of every range touched during one storm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveRegion {
    start: usize,
    end: usize,
}

impl ActiveRegion {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(range: Range<usize>) -> Self {
        let mut region = Self::empty();
        region.include(range);
        region
    }

    /// Grows the region to cover `range`. Empty ranges are ignored.
    pub fn include(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if self.is_empty() {
            self.start = range.start;
            self.end = range.end;
        } else {
            self.start = self.start.min(range.start);
            self.end = self.end.max(range.end);
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Cells with both neighbors inside the region. The two edge cells are excluded.
    pub fn interior(&self) -> Range<usize> {
        if self.len() < 2 {
            return self.start..self.start;
        }
        self.start + 1..self.end - 1
    }
}

/// A storm resolved against the layer: reachable impacts and the region they touch.
#[derive(Debug, Clone, Default)]
pub struct StormPlan {
    pub impacts: Vec<Impact>,
    pub region: ActiveRegion,
}

/// Resolves every particle's reach and accumulates the storm's active region.
///
/// Particles whose clipped reach is empty are dropped.
pub fn plan_storm(storm: &Storm, threshold: f64, layer_len: usize) -> StormPlan {
    let mut plan = StormPlan::default();
    for particle in &storm.particles {
        let Some(offset) = max_offset(particle.energy(), threshold, layer_len) else {
            continue;
        };
        let reach = influence_range(i64::from(particle.position), offset, layer_len);
        if reach.is_empty() {
            continue;
        }
        plan.region.include(reach.clone());
        plan.impacts.push(Impact::from_particle(particle, reach));
    }
    plan
}
