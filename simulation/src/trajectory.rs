//! Append-only history of particle positions.

use crate::particle::Ensemble;

/// Positions of every particle at every recorded step.
///
/// `r` and `phi` are stored row-major: row `k` holds step `k`, column `i`
/// holds particle `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    n_particles: usize,
    r: Vec<f64>,
    phi: Vec<f64>,
}

impl Trajectory {
    /// Create an empty history for `n_particles` columns.
    pub fn new(n_particles: usize) -> Self {
        Self {
            n_particles,
            r: Vec::new(),
            phi: Vec::new(),
        }
    }

    /// Reserve room for `n_steps` snapshots up front.
    ///
    /// # Panics
    /// If the history would not fit in memory; `SimulationConfig::validate`
    /// rejects such sizes before a run starts.
    pub fn with_capacity(n_particles: usize, n_steps: usize) -> Self {
        Self {
            n_particles,
            r: Vec::with_capacity(n_particles * n_steps),
            phi: Vec::with_capacity(n_particles * n_steps),
        }
    }

    /// Record `(r, phi)` for every particle, dead ones included.
    ///
    /// # Panics
    /// If the ensemble size differs from the trajectory's column count.
    pub fn push_snapshot(&mut self, ensemble: &Ensemble) {
        assert_eq!(
            ensemble.len(),
            self.n_particles,
            "snapshot size does not match trajectory width"
        );
        self.r.extend(ensemble.particles().iter().map(|p| p.r));
        self.phi.extend(ensemble.particles().iter().map(|p| p.phi));
    }

    /// Number of columns, one per particle.
    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Number of snapshots recorded so far.
    pub fn n_steps(&self) -> usize {
        if self.n_particles == 0 {
            0
        } else {
            self.r.len() / self.n_particles
        }
    }

    /// Whether no snapshot has been recorded.
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Flat row-major radii.
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    /// Flat row-major angles.
    pub fn phi(&self) -> &[f64] {
        &self.phi
    }

    /// `(r, phi)` rows of one step.
    pub fn row(&self, step: usize) -> Option<(&[f64], &[f64])> {
        if step >= self.n_steps() {
            return None;
        }
        let range = step * self.n_particles..(step + 1) * self.n_particles;
        Some((&self.r[range.clone()], &self.phi[range]))
    }

    /// Copies of `r` and `phi` with every value rounded to `digits` decimals.
    pub fn rounded(&self, digits: u32) -> (Vec<f64>, Vec<f64>) {
        let round = |values: &[f64]| -> Vec<f64> {
            values.iter().map(|&v| round_to_digits(v, digits)).collect()
        };
        (round(&self.r), round(&self.phi))
    }
}

/// Round `value` to `digits` decimal places.
///
/// Rounding is done on the exact decimal expansion of `value`, so the
/// result never moves by more than half a unit in the last kept digit.
pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    format!("{value:.prec$}", prec = digits as usize)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    fn ensemble(rs: &[f64]) -> Ensemble {
        Ensemble::from_particles(rs.iter().map(|&r| Particle::new(r, r / 10.0, 1.0)).collect())
    }

    #[test]
    fn test_snapshots_are_row_major() {
        let mut trajectory = Trajectory::with_capacity(3, 2);
        assert!(trajectory.is_empty());

        trajectory.push_snapshot(&ensemble(&[10.0, 20.0, 30.0]));
        trajectory.push_snapshot(&ensemble(&[11.0, 21.0, 31.0]));

        assert_eq!(trajectory.n_steps(), 2);
        assert_eq!(trajectory.n_particles(), 3);
        assert_eq!(trajectory.r(), &[10.0, 20.0, 30.0, 11.0, 21.0, 31.0]);

        let (r, phi) = trajectory.row(1).unwrap();
        assert_eq!(r, &[11.0, 21.0, 31.0]);
        assert_eq!(phi, &[1.1, 2.1, 3.1]);
        assert!(trajectory.row(2).is_none());
    }

    #[test]
    #[should_panic(expected = "snapshot size")]
    fn test_mismatched_snapshot_panics() {
        let mut trajectory = Trajectory::new(2);
        trajectory.push_snapshot(&ensemble(&[1.0]));
    }

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to_digits(1.234_567, 4), 1.2346);
        assert_eq!(round_to_digits(-1.234_54, 4), -1.2345);
        assert_eq!(round_to_digits(40.123_456_789, 8), 40.123_456_79);
        assert_eq!(round_to_digits(3.0, 5), 3.0);
    }

    #[test]
    fn test_round_near_decimal_tie() {
        // 26.87285 is stored as 26.872849999..., just below the tie.
        assert_eq!(round_to_digits(26.872_85, 4), 26.8728);
        assert_eq!(round_to_digits(-26.872_85, 4), -26.8728);
        assert!((round_to_digits(26.872_85, 4) - 26.872_85).abs() <= 5e-5);
    }

    #[test]
    fn test_round_non_finite_passes_through() {
        assert!(round_to_digits(f64::NAN, 4).is_nan());
        assert_eq!(round_to_digits(f64::INFINITY, 4), f64::INFINITY);
    }

    #[test]
    fn test_low_accuracy_rounding_error_is_bounded() {
        let mut trajectory = Trajectory::new(4);
        trajectory.push_snapshot(&ensemble(&[12.345_678_9, 98.765_432_1, 26.872_85, 7.777_777_7]));
        let (r, phi) = trajectory.rounded(4);

        for (stored, original) in r.iter().chain(&phi).zip(trajectory.r().iter().chain(trajectory.phi())) {
            assert!((stored - original).abs() <= 5e-5);
            assert_eq!(*stored, round_to_digits(*stored, 4));
        }
    }
}
