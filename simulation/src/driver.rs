//! Sequential step loop that produces the trajectory history.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimulationConfig;
use crate::ensemble::step_ensemble;
use crate::error::{Result, SimulationError};
use crate::particle::{initialize_particles, Ensemble};
use crate::trajectory::Trajectory;

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// One `(r, phi)` snapshot per step
    pub trajectory: Trajectory,
    /// Wall-clock time spent in the step loop
    pub elapsed: Duration,
    /// Particles captured by the horizon by the end of the run
    pub captured: usize,
}

/// Validate `config`, build the initial ensemble and run every step.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationOutcome> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let ensemble = initialize_particles(config, &mut rng)?;
    run_with_ensemble(config, ensemble)
}

/// Run `config.n_steps` steps starting from a prepared ensemble.
///
/// Step `k + 1` always sees the fully committed state of step `k`; the
/// snapshot is taken after the parallel pass has joined.
pub fn run_with_ensemble(config: &SimulationConfig, mut ensemble: Ensemble) -> Result<SimulationOutcome> {
    config.validate()?;
    if ensemble.len() != config.n_particles {
        return Err(SimulationError::Config(format!(
            "ensemble has {} particles but n_particles is {}",
            ensemble.len(),
            config.n_particles
        )));
    }

    log::info!(
        "Simulating {} particles ({}) for {} steps, h = {}, M = {}",
        config.n_particles,
        config.initial_conditions,
        config.n_steps,
        config.step_size,
        config.mass
    );

    let mut trajectory = Trajectory::with_capacity(config.n_particles, config.n_steps);
    let start = Instant::now();

    for step in 0..config.n_steps {
        let captured = step_ensemble(&mut ensemble, config, step)?;
        if captured > 0 {
            log::debug!("step {step}: {captured} particle(s) crossed the horizon");
        }
        trajectory.push_snapshot(&ensemble);
    }

    let elapsed = start.elapsed();
    let captured = ensemble.dead_count();
    log::info!(
        "Simulation took {:.3} seconds, {}/{} particles captured",
        elapsed.as_secs_f64(),
        captured,
        config.n_particles
    );

    Ok(SimulationOutcome {
        trajectory,
        elapsed,
        captured,
    })
}
