//! Session directory loader.
//!
//! Layout: an `index.json` naming every frame and scan file relative to
//! the session root, PNG images, and raw little-endian float point
//! clouds at a fixed per-point stride.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use contracts::{
    CameraFrame, CameraRig, DatasetProvider, ImageData, ImageFormat, PointCloud, PointXyz,
    ReplayDataset, ReplayError, ScanRecord, Timestamp,
};
use serde::{Deserialize, Serialize};
use timeline::{FrameStore, ScanStore};
use tracing::debug;

/// On-disk session index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIndex {
    /// Camera frames in capture order
    pub frames: Vec<FrameEntry>,

    /// LiDAR sweeps in capture order
    #[serde(default)]
    pub scans: Vec<ScanEntry>,

    /// Explicit end of scan coverage (microseconds); defaults to the
    /// last scan's timestamp when absent
    #[serde(default)]
    pub stop_time_us: Option<u64>,
}

/// One frame reference in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    pub timestamp_us: u64,
    pub file: String,
}

/// One scan reference in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    pub timestamp_us: u64,
    pub file: String,
}

/// Loads a recorded session from a directory.
pub struct DirectoryDataset {
    root: PathBuf,
    point_stride: u32,
    rig: CameraRig,
}

impl DirectoryDataset {
    pub fn new(root: PathBuf, point_stride: u32, rig: CameraRig) -> Self {
        Self {
            root,
            point_stride,
            rig,
        }
    }

    fn unavailable(&self, message: impl Into<String>) -> ReplayError {
        ReplayError::dataset_unavailable(self.root.display().to_string(), message)
    }

    fn read_index(&self) -> Result<SessionIndex, ReplayError> {
        let index_path = self.root.join("index.json");
        let content = std::fs::read_to_string(&index_path)
            .map_err(|e| self.unavailable(format!("cannot read index.json: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| self.unavailable(format!("malformed index.json: {e}")))
    }

    fn load_image(&self, file: &str) -> Result<ImageData, ReplayError> {
        let path = self.root.join(file);
        let img = image::open(&path)
            .map_err(|e| self.unavailable(format!("cannot decode '{file}': {e}")))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        Ok(ImageData {
            width,
            height,
            format: ImageFormat::Rgb8,
            data: Bytes::from(img.into_raw()),
        })
    }

    fn load_cloud(&self, file: &str) -> Result<PointCloud, ReplayError> {
        let path = self.root.join(file);
        let raw = std::fs::read(&path)
            .map_err(|e| self.unavailable(format!("cannot read '{file}': {e}")))?;
        decode_point_cloud(&raw, self.point_stride as usize)
    }
}

impl DatasetProvider for DirectoryDataset {
    fn open(&self) -> Result<ReplayDataset, ReplayError> {
        let index = self.read_index()?;
        if index.frames.is_empty() {
            return Err(self.unavailable("index lists no frames"));
        }

        let mut frames = Vec::with_capacity(index.frames.len());
        for entry in &index.frames {
            frames.push(CameraFrame {
                timestamp: Timestamp::from_micros(entry.timestamp_us),
                image: self.load_image(&entry.file)?,
            });
        }

        let mut records = Vec::with_capacity(index.scans.len());
        for entry in &index.scans {
            records.push(ScanRecord {
                timestamp: Timestamp::from_micros(entry.timestamp_us),
                cloud: self.load_cloud(&entry.file)?,
            });
        }

        debug!(
            root = %self.root.display(),
            frames = frames.len(),
            scans = records.len(),
            "session directory loaded"
        );

        let scans = if records.is_empty() {
            None
        } else {
            let store = match index.stop_time_us {
                Some(stop) => ScanStore::with_stop_time(records, Timestamp::from_micros(stop))?,
                None => ScanStore::new(records)?,
            };
            Some(Arc::new(store) as Arc<dyn contracts::ScanSource>)
        };

        Ok(ReplayDataset {
            frames: Arc::new(FrameStore::new(frames)?),
            scans,
            rig: self.rig.clone(),
        })
    }
}

/// Decode a raw cloud file: consecutive little-endian records of
/// `stride` bytes each, the first 12 being x, y, z as f32.
///
/// Extra bytes per record (intensity, ring, padding) are ignored.
pub fn decode_point_cloud(data: &[u8], stride: usize) -> Result<PointCloud, ReplayError> {
    if stride < 12 {
        return Err(ReplayError::invalid_dataset(format!(
            "point stride {stride} too small for three f32 coordinates"
        )));
    }
    if data.len() % stride != 0 {
        return Err(ReplayError::invalid_dataset(format!(
            "cloud byte length {} is not a multiple of stride {stride}",
            data.len()
        )));
    }

    let mut points = Vec::with_capacity(data.len() / stride);
    for record in data.chunks_exact(stride) {
        // Unaligned read: the record boundary gives no alignment guarantee
        let [x, y, z]: [f32; 3] = bytemuck::pod_read_unaligned(&record[..12]);
        points.push(PointXyz::new(x, y, z));
    }
    Ok(PointCloud::new(points))
}
