//! Energy storms simulation kernel.
//!
//! A one-dimensional layer of energy cells is hit by successive storms of
//! particle impacts. After each storm the touched region is relaxed with a
//! three-point average and the strongest local maximum is reported.
//!
//! ```no_run
//! use storms_core::{Particle, Simulation, SimulationConfig, Storm};
//!
//! let mut sim = Simulation::new(1_000, SimulationConfig::new(0.001, 4))?;
//! let peaks = sim.run([Storm::new(vec![Particle::new(500, 3)])]);
//! println!("{} {}", peaks[0].position, peaks[0].energy);
//! # Ok::<(), storms_core::SimulationError>(())
//! ```

pub mod config;
pub mod error;
pub mod impact;
pub mod layer;
pub mod peak;
pub mod pool;
pub mod range;
pub mod relax;
pub mod simulation;
pub mod storm;

pub use config::SimulationConfig;
pub use error::{ConfigError, SimulationError};
pub use layer::Layer;
pub use peak::Peak;
pub use range::ActiveRegion;
pub use simulation::{Phase, Simulation};
pub use storm::{Particle, Storm, ENERGY_SCALE};
