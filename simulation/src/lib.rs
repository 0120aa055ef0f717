//! The simulation crate integrates massive test particles falling through
//! the equatorial plane of a Schwarzschild black hole and records their
//! positions for later rendering.
//!
//! A run is: build the initial [`Ensemble`] for a [`SimulationConfig`],
//! advance it `n_steps` times with a fixed-step RK4 integrator (in parallel
//! over particles), snapshot `(r, phi)` after every step, then hand the
//! [`Trajectory`] to [`write_outputs`].
//!
//! ```no_run
//! use simulation::{run_simulation, write_outputs, SimulationConfig};
//! use std::path::Path;
//!
//! let config = SimulationConfig::default();
//! let outcome = run_simulation(&config)?;
//! write_outputs(&config, &outcome.trajectory, Path::new("out.json"), Path::new("out.npz"))?;
//! # Ok::<(), simulation::SimulationError>(())
//! ```

pub mod config;
pub mod driver;
pub mod ensemble;
pub mod error;
pub mod geodesic;
pub mod integrator;
pub mod particle;
pub mod schwarzschild;
pub mod trajectory;
pub mod writer;

pub use config::{InitialConditions, SaveAccuracy, SimulationConfig};
pub use driver::{run_simulation, run_with_ensemble, SimulationOutcome};
pub use ensemble::step_ensemble;
pub use error::{Result, SimulationError};
pub use geodesic::{GeodesicField, PhaseState};
pub use integrator::{geodesic_step, rk4_step};
pub use particle::{initialize_particles, Ensemble, Particle};
pub use trajectory::{round_to_digits, Trajectory};
pub use writer::{write_metadata, write_outputs, write_trajectories, Metadata};
