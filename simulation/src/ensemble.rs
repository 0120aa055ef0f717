//! One parallel integration pass over the ensemble.

use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::geodesic::GeodesicField;
use crate::integrator::geodesic_step;
use crate::particle::{Ensemble, Particle};
use crate::schwarzschild;

/// Advance every live particle by one RK4 step of `config.step_size`.
///
/// Particles are independent, so the pass runs on the rayon pool with no
/// locking; the call returns only after every particle has been updated.
/// A particle whose candidate radius falls inside the horizon is marked
/// dead and keeps its pre-step `(r, phi, p)`.
///
/// Returns the number of particles captured during this step. `step` is
/// only used to label errors.
pub fn step_ensemble(ensemble: &mut Ensemble, config: &SimulationConfig, step: usize) -> Result<usize> {
    let field = GeodesicField::new(config.mass);
    let h = config.step_size;

    ensemble
        .particles_mut()
        .par_iter_mut()
        .enumerate()
        .filter(|(_, particle)| !particle.dead)
        .map(|(index, particle)| {
            advance_particle(particle, &field, h).map_err(|detail| SimulationError::NumericDomain {
                particle: index,
                step: Some(step),
                detail,
            })
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

/// Integrate one live particle. Returns 1 if it was captured.
fn advance_particle(particle: &mut Particle, field: &GeodesicField, h: f64) -> std::result::Result<usize, String> {
    let candidate = geodesic_step(field, particle.phase_state(), particle.l, h);

    if !candidate.is_finite() {
        return Err(format!(
            "non-finite state (r = {}, phi = {}, p = {}) after stepping from r = {}",
            candidate.r, candidate.phi, candidate.p, particle.r
        ));
    }

    if schwarzschild::is_inside_event_horizon(field.mass, candidate.r) {
        particle.dead = true;
        Ok(1)
    } else {
        particle.set_phase_state(candidate);
        Ok(0)
    }
}
