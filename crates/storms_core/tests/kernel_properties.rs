//! Observable properties of the kernel on hand-checked inputs.

use storms_core::impact::contribution;
use storms_core::peak::find_peak;
use storms_core::relax::relax;
use storms_core::{ActiveRegion, Layer, Particle, Peak, Simulation, SimulationConfig, Storm};

fn sequential(threshold: f64) -> SimulationConfig {
    SimulationConfig::new(threshold, 1)
}

#[test]
fn single_particle_end_to_end() {
    let mut sim = Simulation::new(10, sequential(0.001)).unwrap();
    let peak = sim.run_storm(Storm::new(vec![Particle::new(5, 1)]));
    let layer = sim.layer_values();

    // (1000 / 0.001)^2 reaches far beyond the layer: every cell is hit,
    // and only the two edge cells keep their bombarded value.
    assert_eq!(layer[0], contribution(10, 0, 5, 1000.0));
    assert_eq!(layer[9], contribution(10, 9, 5, 1000.0));
    assert!(layer.iter().all(|&v| v > 0.0));

    assert_eq!(peak.position, 5);
    assert_eq!(peak.energy, layer[5]);
    let expected = (100.0 + 2.0 * 100.0 / 2f32.sqrt()) / 3.0;
    assert!((peak.energy - expected).abs() < 1e-3);
}

#[test]
fn pruned_storm_leaves_outside_cells_untouched() {
    // (1000 / 400)^2 = 6.25 -> offsets up to 5 -> cells 45..56
    let mut sim = Simulation::new(100, sequential(400.0)).unwrap();
    let peak = sim.run_storm(Storm::new(vec![Particle::new(50, 1)]));
    let layer = sim.layer_values();

    assert!(layer[..45].iter().all(|&v| v == 0.0));
    assert!(layer[56..].iter().all(|&v| v == 0.0));
    assert_eq!(layer[45], contribution(100, 45, 50, 1000.0));
    assert_eq!(layer[55], contribution(100, 55, 50, 1000.0));
    assert_eq!(peak.position, 50);
}

#[test]
fn sub_threshold_storm_changes_nothing() {
    let mut sim = Simulation::new(50, sequential(5000.0)).unwrap();
    let peak = sim.run_storm(Storm::new(vec![Particle::new(20, 2), Particle::new(30, -3)]));
    assert_eq!(peak, Peak::default());
    assert!(sim.layer_values().iter().all(|&v| v == 0.0));
}

#[test]
fn particles_outside_the_layer_still_reach_it() {
    let mut sim = Simulation::new(20, sequential(0.001)).unwrap();
    let peak = sim.run_storm(Storm::new(vec![Particle::new(-5, 1)]));
    let layer = sim.layer_values();
    assert!(layer.iter().all(|&v| v > 0.0));
    // energy falls off to the right: monotonic region, left edge wins
    assert_eq!(peak.position, 0);
}

#[test]
fn reach_includes_cells_that_round_up_to_significant() {
    // Exact bound covers offsets 0..=7, but the f32 contribution at offset 8
    // still clears threshold / N and must land on the layer.
    let mut sim = Simulation::new(12, sequential(1000.000_000_000_1)).unwrap();
    sim.run_storm(Storm::new(vec![Particle::new(0, 3)]));
    let layer = sim.layer_values();

    // Offset 8 is the right edge of the active region, so relaxation keeps it.
    assert_eq!(layer[8], contribution(12, 8, 0, 3000.0));
    assert!(layer[8] > 0.0);
    assert!(layer[9..].iter().all(|&v| v == 0.0));
}

#[test]
fn relaxation_is_idempotent_on_flat_region() {
    let layer = Layer::from_values(&[0.0, 3.0, 3.0, 3.0, 3.0, 3.0, 0.0]);
    let region = ActiveRegion::new(1..6);
    relax(&layer, &region);
    let once = layer.to_vec();
    relax(&layer, &region);
    assert_eq!(once, vec![0.0, 3.0, 3.0, 3.0, 3.0, 3.0, 0.0]);
    assert_eq!(layer.to_vec(), once);
}

#[test]
fn reduction_finds_interior_spike() {
    let layer = Layer::from_values(&[0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0]);
    let peak = find_peak(&layer, &ActiveRegion::new(0..7));
    assert_eq!(peak, Peak::new(3, 5.0));
}

#[test]
fn reduction_falls_back_to_right_edge_on_rising_region() {
    let layer = Layer::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let peak = find_peak(&layer, &ActiveRegion::new(0..5));
    assert_eq!(peak, Peak::new(4, 5.0));
}

#[test]
fn results_are_independent_per_storm() {
    // threshold / N = 10: the two storms touch disjoint regions
    let mut sim = Simulation::new(200, sequential(2000.0)).unwrap();
    let storms = vec![
        Storm::new(vec![Particle::new(40, 5)]),
        Storm::new(vec![Particle::new(160, 3)]),
    ];
    let peaks = sim.run(storms).to_vec();

    assert_eq!(peaks.len(), 2);
    assert_eq!(peaks[0].position, 40);
    // The second storm's region does not reach the first storm's peak.
    assert_eq!(peaks[1].position, 160);
    assert!(peaks[1].energy > 0.0 && peaks[1].energy < peaks[0].energy);
}
