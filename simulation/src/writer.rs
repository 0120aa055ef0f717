//! Output artifacts: run metadata as JSON and positions as a compressed
//! NumPy `.npz` bundle.
//!
//! The bundle holds two `f64` arrays, `r` and `phi`, each shaped
//! `(n_steps, n_particles)` in step order. Values are rounded according to
//! [`SaveAccuracy`](crate::config::SaveAccuracy) at write time only.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::NpzWriter;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::trajectory::Trajectory;

const METADATA: &str = "metadata";
const TRAJECTORIES: &str = "trajectories";

/// Contents of the metadata artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "M")]
    pub mass: f64,
    pub n_steps: usize,
    pub n_particles: usize,
}

impl Metadata {
    /// Create the metadata record for a run of `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            mass: config.mass,
            n_steps: config.n_steps,
            n_particles: config.n_particles,
        }
    }
}

/// Write both artifacts, or neither.
///
/// Each artifact is first written to a hidden `.<name>.partial` file next
/// to its destination. The staged files are renamed into place once both
/// writes have succeeded and are removed if anything fails.
pub fn write_outputs(
    config: &SimulationConfig,
    trajectory: &Trajectory,
    metadata_path: &Path,
    trajectory_path: &Path,
) -> Result<()> {
    if trajectory.n_steps() != config.n_steps || trajectory.n_particles() != config.n_particles {
        return Err(SimulationError::Config(format!(
            "trajectory is {}x{} but configuration expects {}x{}",
            trajectory.n_steps(),
            trajectory.n_particles(),
            config.n_steps,
            config.n_particles
        )));
    }

    let metadata_staging = staging_path(metadata_path, METADATA)?;
    let trajectory_staging = staging_path(trajectory_path, TRAJECTORIES)?;

    let result = write_metadata(&Metadata::new(config), &metadata_staging)
        .and_then(|()| write_trajectories(trajectory, config.save_accuracy.digits(), &trajectory_staging))
        .and_then(|()| commit(&trajectory_staging, trajectory_path, TRAJECTORIES))
        .and_then(|()| commit(&metadata_staging, metadata_path, METADATA));

    if result.is_err() {
        for staged in [&metadata_staging, &trajectory_staging] {
            if staged.exists() {
                if let Err(e) = fs::remove_file(staged) {
                    log::warn!("Could not remove {}: {}", staged.display(), e);
                }
            }
        }
        return result;
    }

    log::info!(
        "Wrote {} and {}",
        metadata_path.display(),
        trajectory_path.display()
    );
    Ok(())
}

/// Serialize `metadata` as JSON to `path`.
pub fn write_metadata(metadata: &Metadata, path: &Path) -> Result<()> {
    let wrap = |source: Box<dyn std::error::Error + Send + Sync>| SimulationError::Serialization {
        artifact: METADATA,
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| wrap(e.into()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, metadata).map_err(|e| wrap(e.into()))?;
    writer.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}

/// Write the rounded `r` and `phi` arrays of `trajectory` to a compressed `.npz`.
pub fn write_trajectories(trajectory: &Trajectory, digits: u32, path: &Path) -> Result<()> {
    let wrap = |source: Box<dyn std::error::Error + Send + Sync>| SimulationError::Serialization {
        artifact: TRAJECTORIES,
        path: path.to_path_buf(),
        source,
    };

    let shape = (trajectory.n_steps(), trajectory.n_particles());
    let (r, phi) = trajectory.rounded(digits);
    let r = Array2::from_shape_vec(shape, r).map_err(|e| wrap(e.into()))?;
    let phi = Array2::from_shape_vec(shape, phi).map_err(|e| wrap(e.into()))?;

    let file = File::create(path).map_err(|e| wrap(e.into()))?;
    let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
    npz.add_array("r", &r).map_err(|e| wrap(e.into()))?;
    npz.add_array("phi", &phi).map_err(|e| wrap(e.into()))?;
    let mut writer = npz.finish().map_err(|e| wrap(e.into()))?;
    writer.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}

fn staging_path(path: &Path, artifact: &'static str) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| SimulationError::Serialization {
        artifact,
        path: path.to_path_buf(),
        source: "output path has no file name".into(),
    })?;
    let mut staged = OsString::from(".");
    staged.push(name);
    staged.push(".partial");
    Ok(path.with_file_name(staged))
}

fn commit(staged: &Path, destination: &Path, artifact: &'static str) -> Result<()> {
    fs::rename(staged, destination).map_err(|e| SimulationError::Serialization {
        artifact,
        path: destination.to_path_buf(),
        source: e.into(),
    })
}
