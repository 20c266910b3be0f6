//! The simulated medium.
//!
//! Cells are stored as `f32` bit patterns in `AtomicU32` so that every worker can
//! hold a shared reference to the whole layer. Workers only write cells inside
//! the partition they were assigned; all cross-worker visibility comes from the
//! barriers between phases, so relaxed loads and stores are sufficient.

use std::sync::atomic::{AtomicU32, Ordering};

pub struct Layer {
    cells: Box<[AtomicU32]>,
}

impl Layer {
    /// A layer of `len` cells, all at 0.0.
    pub fn new(len: usize) -> Self {
        // 0u32 is the bit pattern of +0.0f32
        Self {
            cells: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn from_values(values: &[f32]) -> Self {
        Self {
            cells: values
                .iter()
                .map(|v| AtomicU32::new(v.to_bits()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, k: usize) -> f32 {
        f32::from_bits(self.cells[k].load(Ordering::Relaxed))
    }

    /// Overwrite cell `k`. Callers must own `k` for the current phase.
    #[inline]
    pub(crate) fn set(&self, k: usize, value: f32) {
        self.cells[k].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Snapshot of every cell value.
    pub fn to_vec(&self) -> Vec<f32> {
        (0..self.len()).map(|k| self.get(k)).collect()
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_is_zeroed() {
        let layer = Layer::new(8);
        assert_eq!(layer.len(), 8);
        assert!(layer.to_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_set_and_get() {
        let layer = Layer::from_values(&[1.0, -2.5, 3.25]);
        layer.set(1, 7.5);
        assert_eq!(layer.to_vec(), vec![1.0, 7.5, 3.25]);
    }
}
