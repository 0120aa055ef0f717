//! Particles, the ensemble that holds them, and initial-condition layouts.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{InitialConditions, SimulationConfig};
use crate::error::{Result, SimulationError};
use crate::geodesic::PhaseState;
use crate::schwarzschild;

/// A single test particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Radial coordinate in units of M
    pub r: f64,
    /// Azimuthal angle in radians
    pub phi: f64,
    /// Radial momentum
    pub p: f64,
    /// Specific angular momentum, fixed for the particle's lifetime
    pub l: f64,
    /// Set once the particle has crossed the horizon
    pub dead: bool,
}

impl Particle {
    /// A live particle at rest radially.
    pub fn new(r: f64, phi: f64, l: f64) -> Self {
        Self {
            r,
            phi,
            p: 0.0,
            l,
            dead: false,
        }
    }

    /// The integrated `(r, phi, p)` part of the particle.
    pub fn phase_state(&self) -> PhaseState {
        PhaseState::new(self.r, self.phi, self.p)
    }

    /// Overwrite `(r, phi, p)`, leaving `l` and `dead` untouched.
    pub fn set_phase_state(&mut self, state: PhaseState) {
        self.r = state.r;
        self.phi = state.phi;
        self.p = state.p;
    }

    /// Cartesian position in the equatorial plane.
    pub fn cartesian(&self) -> (f64, f64) {
        (self.r * self.phi.cos(), self.r * self.phi.sin())
    }
}

/// Fixed-size, ordered particle collection. The index is the particle's
/// identity in every snapshot and output array.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    particles: Vec<Particle>,
}

impl Ensemble {
    /// Create an ensemble; particle `i` keeps index `i` for the whole run.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Number of particles, dead ones included.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the ensemble holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particles in index order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles; the length cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles captured by the horizon so far.
    pub fn dead_count(&self) -> usize {
        self.particles.iter().filter(|p| p.dead).count()
    }
}

/// Build the initial ensemble for `config.initial_conditions`.
pub fn initialize_particles<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Ensemble> {
    let particles = match config.initial_conditions {
        InitialConditions::Stream => generate_stream(config, rng)?,
        InitialConditions::Star => generate_star(config, rng)?,
    };
    Ok(Ensemble::from_particles(particles))
}

/// Particles spaced 0.2 apart from `r = 10 M` outward at random angles.
///
/// Every radius lies outside the photon sphere, so the angular momentum
/// radicand stays positive for any valid mass.
fn generate_stream<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Vec<Particle>> {
    let mass = config.mass;
    (0..config.n_particles)
        .map(|i| {
            let r = 10.0 * mass + i as f64 / 5.0;
            let l = schwarzschild::stream_angular_momentum(mass, r)
                .ok_or_else(|| angular_momentum_error(i, r, mass))?;
            let phi = rng.random::<f64>() * TAU;
            Ok(Particle::new(r, phi, l))
        })
        .collect()
}

/// Random points inside a disk around `(star_offset_x, star_offset_y)`.
///
/// The radius is drawn as `sqrt(U) * R` so the points are uniform over the
/// disk area instead of bunching at its center.
fn generate_star<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Vec<Particle>> {
    let mass = config.mass;
    (0..config.n_particles)
        .map(|i| {
            let local_r = rng.random::<f64>().sqrt() * config.star_radius;
            let theta = rng.random::<f64>() * TAU;

            let x = config.star_offset_x + local_r * theta.cos();
            let y = config.star_offset_y + local_r * theta.sin();

            let r = x.hypot(y);
            let phi = y.atan2(x);

            let l = schwarzschild::star_angular_momentum(mass, r)
                .ok_or_else(|| angular_momentum_error(i, r, mass))?;
            Ok(Particle::new(r, phi, l))
        })
        .collect()
}

fn angular_momentum_error(particle: usize, r: f64, mass: f64) -> SimulationError {
    SimulationError::NumericDomain {
        particle,
        step: None,
        detail: format!(
            "angular momentum undefined at r = {r} (photon sphere at {})",
            schwarzschild::photon_sphere_radius(mass)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stream_config(n_particles: usize) -> SimulationConfig {
        SimulationConfig {
            n_particles,
            initial_conditions: InitialConditions::Stream,
            ..Default::default()
        }
    }

    #[test]
    fn test_stream_layout() {
        let config = stream_config(50);
        let mut rng = StdRng::seed_from_u64(1);
        let ensemble = initialize_particles(&config, &mut rng).unwrap();

        assert_eq!(ensemble.len(), 50);
        for (i, particle) in ensemble.particles().iter().enumerate() {
            assert_abs_diff_eq!(particle.r, 40.0 + i as f64 / 5.0, epsilon = 1e-12);
            assert_eq!(particle.p, 0.0);
            assert!(!particle.dead);
            assert!((0.0..TAU).contains(&particle.phi));
            let expected_l = (4.0 * particle.r * particle.r / (particle.r - 12.0)).sqrt() - 1.0;
            assert_abs_diff_eq!(particle.l, expected_l, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_star_particles_stay_inside_disk() {
        let config = SimulationConfig {
            n_particles: 2000,
            star_radius: 30.0,
            star_offset_x: 70.0,
            star_offset_y: -20.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let ensemble = initialize_particles(&config, &mut rng).unwrap();

        assert_eq!(ensemble.len(), 2000);
        for particle in ensemble.particles() {
            let (x, y) = particle.cartesian();
            let local = (x - config.star_offset_x).hypot(y - config.star_offset_y);
            assert!(local <= config.star_radius * (1.0 + 1e-9) + 1e-9);
            assert_eq!(particle.p, 0.0);
            assert!(!particle.dead);
        }
    }

    #[test]
    fn test_star_sampling_is_area_uniform() {
        // Half of a uniform disk's area lies within R / sqrt(2) of its center.
        let config = SimulationConfig {
            n_particles: 20_000,
            star_radius: 10.0,
            star_offset_x: 100.0,
            star_offset_y: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let ensemble = initialize_particles(&config, &mut rng).unwrap();

        let inner = ensemble
            .particles()
            .iter()
            .filter(|p| {
                let (x, y) = p.cartesian();
                (x - 100.0).hypot(y) < 10.0 / 2.0_f64.sqrt()
            })
            .count();
        let fraction = inner as f64 / 20_000.0;
        assert!((fraction - 0.5).abs() < 0.02, "inner fraction {fraction}");
    }

    #[test]
    fn test_star_on_photon_sphere_is_domain_error() {
        // A zero-radius star sitting exactly on r = 3M.
        let config = SimulationConfig {
            n_particles: 3,
            star_radius: 0.0,
            star_offset_x: 12.0,
            star_offset_y: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let err = initialize_particles(&config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NumericDomain { particle: 0, step: None, .. }
        ));
    }

    #[test]
    fn test_star_just_off_photon_sphere_is_domain_error() {
        let config = SimulationConfig {
            n_particles: 1,
            star_radius: 0.0,
            star_offset_x: 12.0 + 1e-12,
            star_offset_y: 0.0,
            ..Default::default()
        };
        let err = initialize_particles(&config, &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NumericDomain { particle: 0, step: None, .. }
        ));
    }

    #[test]
    fn test_seeded_initialization_is_reproducible() {
        let config = SimulationConfig { n_particles: 100, ..Default::default() };
        let a = initialize_particles(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = initialize_particles(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dead_count() {
        let mut ensemble = Ensemble::from_particles(vec![Particle::new(10.0, 0.0, 1.0); 4]);
        assert_eq!(ensemble.dead_count(), 0);
        ensemble.particles_mut()[2].dead = true;
        assert_eq!(ensemble.dead_count(), 1);
    }
}
