//! # Dataset Loader
//!
//! Opens recorded sessions and builds the time-indexed sources the
//! replay core consumes.
//!
//! Responsibilities:
//! - Synthetic sessions: deterministic generated frames and sweeps
//! - Directory sessions: `index.json` manifest + PNG frames + raw
//!   little-endian float point clouds
//!
//! Loading failures surface as `DatasetUnavailable` before any core
//! operation is invoked; bag parsing and vendor calibration files stay
//! opaque to this crate.

mod directory;
mod synthetic;

pub use directory::DirectoryDataset;
pub use synthetic::SyntheticDataset;

use contracts::{
    DatasetKind, DatasetProvider, FrameSource, ReplayDataset, ReplayError, ScanSource,
    SessionManifest,
};
use tracing::info;

/// Open the dataset a manifest points at.
pub fn open_dataset(manifest: &SessionManifest) -> Result<ReplayDataset, ReplayError> {
    let dataset = match manifest.dataset.kind {
        DatasetKind::Synthetic => {
            SyntheticDataset::new(manifest.dataset.synthetic, manifest.camera_rig()).open()?
        }
        DatasetKind::Directory => {
            let path = manifest.dataset.path.clone().ok_or_else(|| {
                ReplayError::config_validation("dataset.path", "directory datasets require a path")
            })?;
            DirectoryDataset::new(path, manifest.lidar.point_stride, manifest.camera_rig()).open()?
        }
    };

    info!(
        frames = dataset.frames.len(),
        scans = dataset.scans.as_ref().map(|s| s.len()).unwrap_or(0),
        "dataset opened"
    );
    Ok(dataset)
}
