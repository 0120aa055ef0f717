//! Error types for the simulation crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// A configuration value was missing, malformed or out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A particle reached a state the equations of motion cannot handle.
    ///
    /// `step` is `None` when the failure happened while building the
    /// initial ensemble.
    #[error("Numeric domain error for particle {particle}{}: {detail}", step_suffix(.step))]
    NumericDomain {
        particle: usize,
        step: Option<usize>,
        detail: String,
    },

    /// Writing one of the output artifacts failed.
    #[error("Failed to write {artifact} to {}: {source}", .path.display())]
    Serialization {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn step_suffix(step: &Option<usize>) -> String {
    match step {
        Some(step) => format!(" at step {step}"),
        None => " during initialization".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
