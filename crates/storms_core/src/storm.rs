use serde::{Deserialize, Serialize};

/// Raw particle values are expressed in thousandths of an energy unit.
pub const ENERGY_SCALE: f32 = 1000.0;

/// A single impact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    /// Impact cell. Not validated: may lie outside the layer.
    pub position: i32,
    pub raw_value: i32,
}

impl Particle {
    pub fn new(position: i32, raw_value: i32) -> Self {
        Self {
            position,
            raw_value,
        }
    }

    pub fn energy(&self) -> f32 {
        self.raw_value as f32 * ENERGY_SCALE
    }
}

/// An ordered batch of impacts applied before one relaxation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storm {
    pub particles: Vec<Particle>,
}

impl Storm {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl FromIterator<Particle> for Storm {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_scale() {
        assert_eq!(Particle::new(5, 1).energy(), 1000.0);
        assert_eq!(Particle::new(-3, -2).energy(), -2000.0);
    }

    #[test]
    fn test_collect_storm() {
        let storm: Storm = (0..3).map(|i| Particle::new(i, i + 1)).collect();
        assert_eq!(storm.len(), 3);
        assert_eq!(storm.particles[2], Particle::new(2, 3));
    }
}
