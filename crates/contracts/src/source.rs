//! FrameSource / ScanSource traits - Time-indexed data source abstractions
//!
//! Defines the unified read-only interface over a recorded session,
//! decoupling the replay pipeline from concrete dataset backends.

use std::sync::Arc;
use std::time::Duration;

use crate::{CameraFrame, CameraRig, PointCloud, ReplayError, Timestamp};

/// Ordered sequence of camera frames with random access by index.
///
/// Implementations are read-only for the session lifetime; timestamps
/// must be non-decreasing in index order. Sequential access (playback,
/// scrubbing) dominates, but random seeks must stay O(1) or O(log n).
pub trait FrameSource: Send + Sync {
    /// Number of frames in the session.
    fn len(&self) -> usize;

    /// True when the session holds no frames.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture timestamp of the frame at `index`.
    ///
    /// Cheap: never clones the pixel buffer. The pacing loop reads
    /// neighbouring timestamps every step.
    ///
    /// # Errors
    /// `OutOfRange` when `index >= len()`.
    fn timestamp_at(&self, index: usize) -> Result<Timestamp, ReplayError>;

    /// Full frame (timestamp + image) at `index`.
    ///
    /// # Errors
    /// `OutOfRange` when `index >= len()`.
    fn frame_at(&self, index: usize) -> Result<CameraFrame, ReplayError>;

    /// Time offset of `index` from the first frame of the session.
    fn elapsed_at(&self, index: usize) -> Result<Duration, ReplayError> {
        let first = self.timestamp_at(0)?;
        Ok(self.timestamp_at(index)? - first)
    }
}

/// Ordered sequence of LiDAR sweeps covering a bounded half-open
/// time interval `[start_time, stop_time)`.
pub trait ScanSource: Send + Sync {
    /// Number of scan records.
    fn len(&self) -> usize;

    /// True when the source holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First covered instant.
    fn start_time(&self) -> Timestamp;

    /// One-past-last covered instant.
    fn stop_time(&self) -> Timestamp;

    /// True iff `start_time() <= t < stop_time()`.
    fn contains(&self, t: Timestamp) -> bool {
        self.start_time() <= t && t < self.stop_time()
    }

    /// Capture timestamp of the record at `index`.
    ///
    /// # Errors
    /// `OutOfRange` when `index >= len()`.
    fn timestamp_at(&self, index: usize) -> Result<Timestamp, ReplayError>;

    /// Index of the most recent record at or before `t`
    /// (nearest-preceding, not nearest-by-absolute-difference).
    ///
    /// Runs in O(log n) over the strictly increasing timestamps.
    ///
    /// # Errors
    /// `TimeOutOfRange` when `contains(t)` is false; callers either
    /// check `contains` first or treat the error as "no overlay".
    fn index_at_time(&self, t: Timestamp) -> Result<usize, ReplayError>;

    /// Point cloud of the record at `index`.
    ///
    /// # Errors
    /// `OutOfRange` when `index >= len()`.
    fn cloud_at(&self, index: usize) -> Result<PointCloud, ReplayError>;
}

/// An opened session: sources plus calibration, built once per dataset.
#[derive(Clone)]
pub struct ReplayDataset {
    /// Camera stream
    pub frames: Arc<dyn FrameSource>,

    /// LiDAR stream; `None` when the session carries no scans
    pub scans: Option<Arc<dyn ScanSource>>,

    /// Calibration supplied by the dataset, never by the core
    pub rig: CameraRig,
}

/// Dataset loader abstraction.
///
/// Loading/parsing failures surface as `DatasetUnavailable` before any
/// core operation is invoked on the returned sources.
pub trait DatasetProvider {
    /// Open the dataset and build its sources.
    fn open(&self) -> Result<ReplayDataset, ReplayError>;
}
