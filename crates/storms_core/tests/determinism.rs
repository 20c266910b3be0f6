//! Worker-count independence of the simulation results.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storms_core::{Particle, Peak, Simulation, SimulationConfig, Storm};

fn random_storms(seed: u64, layer_size: i32, storms: usize, particles: usize) -> Vec<Storm> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..storms)
        .map(|_| {
            (0..particles)
                .map(|_| {
                    let position = rng.gen_range(-layer_size / 10..layer_size + layer_size / 10);
                    let raw_value = rng.gen_range(-2..=9);
                    Particle::new(position, raw_value)
                })
                .collect()
        })
        .collect()
}

fn simulate(layer_size: usize, threshold: f64, workers: usize, storms: &[Storm]) -> Vec<Peak> {
    let config = SimulationConfig::new(threshold, workers).with_min_parallel_cells(0);
    let mut sim = Simulation::new(layer_size, config).unwrap();
    sim.run(storms.iter().cloned()).to_vec()
}

fn assert_close(reference: &[Peak], other: &[Peak], label: &str) {
    assert_eq!(reference.len(), other.len());
    for (i, (a, b)) in reference.iter().zip(other).enumerate() {
        assert_eq!(a.position, b.position, "{label}: storm {i} position");
        let tolerance = 1e-4 * a.energy.abs().max(1.0);
        assert!(
            (a.energy - b.energy).abs() <= tolerance,
            "{label}: storm {i} energy {} vs {}",
            a.energy,
            b.energy
        );
    }
}

#[test]
fn worker_counts_agree_with_pruning() {
    let storms = random_storms(7, 3000, 6, 40);
    let reference = simulate(3000, 100.0, 1, &storms);
    for workers in [2, 4, 7] {
        let peaks = simulate(3000, 100.0, workers, &storms);
        assert_close(&reference, &peaks, &format!("{workers} workers"));
    }
}

#[test]
fn worker_counts_agree_on_full_layer_storms() {
    let storms = random_storms(42, 500, 4, 25);
    let reference = simulate(500, 0.001, 1, &storms);
    let peaks = simulate(500, 0.001, 4, &storms);
    assert_close(&reference, &peaks, "4 workers");
}

#[test]
fn more_workers_than_active_cells() {
    let storms = vec![Storm::new(vec![Particle::new(3, 1)])];
    // (1000 / 400)^2 -> a handful of cells
    let reference = simulate(10, 400.0, 1, &storms);
    let peaks = simulate(10, 400.0, 8, &storms);
    assert_close(&reference, &peaks, "8 workers");
}
