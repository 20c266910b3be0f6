//! Per-cell energy update rule.

use std::ops::Range;

use crate::layer::Layer;
use crate::storm::Particle;

/// A particle resolved against a layer: its energy and the cells it can reach.
#[derive(Debug, Clone, PartialEq)]
pub struct Impact {
    pub position: i64,
    pub energy: f32,
    /// Cells whose contribution can reach the significance threshold, clipped to the layer.
    pub reach: Range<usize>,
}

impl Impact {
    pub fn from_particle(particle: &Particle, reach: Range<usize>) -> Self {
        Self {
            position: i64::from(particle.position),
            energy: particle.energy(),
            reach,
        }
    }
}

/// Attenuated energy an impact at `position` deposits on cell `k`.
///
/// The impact cell itself sits at distance 1, so the attenuation never divides by zero.
#[inline]
pub fn contribution(layer_len: usize, k: usize, position: i64, energy: f32) -> f32 {
    let distance = (position - k as i64).unsigned_abs() + 1;
    attenuated(layer_len, distance, energy)
}

/// Energy deposited at 1-based `distance` from the impact cell.
#[inline]
pub fn attenuated(layer_len: usize, distance: u64, energy: f32) -> f32 {
    let attenuation = (distance as f32).sqrt();
    energy / layer_len as f32 / attenuation
}

/// Contributions below `threshold / layer_len` in magnitude are physically negligible.
#[inline]
pub fn is_significant(contribution: f32, threshold: f64, layer_len: usize) -> bool {
    f64::from(contribution).abs() >= threshold / layer_len as f64
}

/// Adds the contribution of one impact to cell `k`, unless it is negligible.
#[inline]
pub fn update(layer: &Layer, k: usize, position: i64, energy: f32, threshold: f64) {
    let len = layer.len();
    let energy_k = contribution(len, k, position, energy);
    if is_significant(energy_k, threshold, len) {
        layer.set(k, layer.get(k) + energy_k);
    }
}

/// Applies every impact to the cells of `share`, in particle order.
pub fn bombard_share(layer: &Layer, impacts: &[Impact], share: Range<usize>, threshold: f64) {
    for impact in impacts {
        let start = impact.reach.start.max(share.start);
        let end = impact.reach.end.min(share.end);
        for k in start..end {
            update(layer, k, impact.position, impact.energy, threshold);
        }
    }
}
