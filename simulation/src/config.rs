//! Run configuration.
//!
//! A [`SimulationConfig`] is built once before a run and then only read.
//! It can be loaded from a JSON file whose keys match the field names of
//! the trajectory metadata:
//!
//! ```json
//! {
//!   "n_particles": 1000,
//!   "n_steps": 600,
//!   "step_size": 10.0,
//!   "M": 4.0,
//!   "save_accuracy": "low",
//!   "initial_conditions": "star",
//!   "star_radius": 50.0,
//!   "star_offset_x": 50.0,
//!   "star_offset_y": 50.0,
//!   "seed": 42
//! }
//! ```
//!
//! Keys that are left out take their default value.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::schwarzschild;

/// How the initial ensemble is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InitialConditions {
    /// Uniform disk of particles centered on `(star_offset_x, star_offset_y)`.
    Star,
    /// Particles fanned out radially from `10 M`, one every `0.2` units.
    Stream,
}

impl FromStr for InitialConditions {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "star" => Ok(Self::Star),
            "stream" => Ok(Self::Stream),
            other => Err(SimulationError::Config(format!(
                "unknown initial_conditions {other:?}, expected \"star\" or \"stream\""
            ))),
        }
    }
}

impl TryFrom<String> for InitialConditions {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<InitialConditions> for String {
    fn from(value: InitialConditions) -> Self {
        value.to_string()
    }
}

impl fmt::Display for InitialConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Star => "star",
            Self::Stream => "stream",
        })
    }
}

/// Rounding applied to stored trajectory values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SaveAccuracy {
    Low,
    Medium,
    High,
}

impl SaveAccuracy {
    /// Number of decimal digits kept per stored value.
    pub fn digits(self) -> u32 {
        match self {
            Self::Low => 4,
            Self::Medium => 5,
            Self::High => 8,
        }
    }
}

impl FromStr for SaveAccuracy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SimulationError::Config(format!(
                "unknown save_accuracy {other:?}, expected \"low\", \"medium\" or \"high\""
            ))),
        }
    }
}

impl TryFrom<String> for SaveAccuracy {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SaveAccuracy> for String {
    fn from(value: SaveAccuracy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SaveAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Immutable parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of particles in the ensemble
    pub n_particles: usize,
    /// Number of integration steps (and recorded snapshots)
    pub n_steps: usize,
    /// Fixed RK4 step size h
    pub step_size: f64,
    /// Mass of the black hole
    #[serde(rename = "M")]
    pub mass: f64,
    pub save_accuracy: SaveAccuracy,
    pub initial_conditions: InitialConditions,
    pub star_radius: f64,
    pub star_offset_x: f64,
    pub star_offset_y: f64,
    /// Seed for initial-condition sampling; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_particles: 1000,
            n_steps: 600,
            step_size: 10.0,
            mass: 4.0,
            save_accuracy: SaveAccuracy::Low,
            initial_conditions: InitialConditions::Star,
            star_radius: 50.0,
            star_offset_x: 50.0,
            star_offset_y: 50.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every value is inside the range the simulation can handle.
    pub fn validate(&self) -> Result<()> {
        if self.n_particles == 0 {
            return Err(invalid("n_particles must be positive"));
        }
        if self.n_steps == 0 {
            return Err(invalid("n_steps must be positive"));
        }
        // r and phi each hold n_steps * n_particles f64 values.
        let max_values = isize::MAX as usize / std::mem::size_of::<f64>();
        match self.n_steps.checked_mul(self.n_particles) {
            Some(values) if values <= max_values => {}
            _ => {
                return Err(invalid(format!(
                    "n_steps * n_particles ({} * {}) is too large to record",
                    self.n_steps, self.n_particles
                )))
            }
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(invalid(format!(
                "step_size must be a positive number, got {}",
                self.step_size
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid(format!(
                "M must be a positive number, got {}",
                self.mass
            )));
        }
        if !(self.star_radius.is_finite() && self.star_radius >= 0.0) {
            return Err(invalid(format!(
                "star_radius must be non-negative, got {}",
                self.star_radius
            )));
        }
        if !(self.star_offset_x.is_finite() && self.star_offset_y.is_finite()) {
            return Err(invalid("star offsets must be finite"));
        }
        Ok(())
    }

    /// Radius below which a particle is captured, `2 M`.
    pub fn horizon_radius(&self) -> f64 {
        schwarzschild::horizon_radius(self.mass)
    }

    /// Radius of the photon sphere, `3 M`.
    pub fn photon_sphere_radius(&self) -> f64 {
        schwarzschild::photon_sphere_radius(self.mass)
    }
}

fn invalid(message: impl Into<String>) -> SimulationError {
    SimulationError::Config(message.into())
}
