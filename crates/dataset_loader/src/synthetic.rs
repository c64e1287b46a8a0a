//! Deterministic generated session.
//!
//! Used for demos and tests; no files required. Identical seeds yield
//! identical sessions.

use std::sync::Arc;

use bytes::Bytes;
use contracts::{
    CameraFrame, CameraRig, DatasetProvider, ImageData, ImageFormat, PointCloud, PointXyz,
    ReplayDataset, ReplayError, ScanRecord, SyntheticConfig, Timestamp,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use timeline::{FrameStore, ScanStore};
use tracing::debug;

/// Generates a camera stream plus an independently-rated LiDAR stream.
///
/// The two streams deliberately run at different rates and the scan
/// stream starts half an interval late, so nearest-preceding lookup has
/// real work to do.
pub struct SyntheticDataset {
    config: SyntheticConfig,
    rig: CameraRig,
}

impl SyntheticDataset {
    pub fn new(config: SyntheticConfig, rig: CameraRig) -> Self {
        Self { config, rig }
    }

    fn generate_image(&self, frame_index: usize) -> ImageData {
        let width = self.rig.intrinsics.width;
        let height = self.rig.intrinsics.height;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        let shift = (frame_index % 256) as u8;
        for y in 0..height {
            for x in 0..width {
                data.push((x % 256) as u8 ^ shift);
                data.push((y % 256) as u8);
                data.push(shift);
            }
        }
        ImageData {
            width,
            height,
            format: ImageFormat::Rgb8,
            data: Bytes::from(data),
        }
    }

    fn generate_cloud(&self, rng: &mut StdRng) -> PointCloud {
        let mut points = Vec::with_capacity(self.config.points_per_scan);
        for _ in 0..self.config.points_per_scan {
            // Fan of returns ahead of the sensor: lateral angle +-45deg,
            // range 2-40m, slight vertical spread.
            let angle: f64 = rng.random_range(-0.785..0.785);
            let range: f64 = rng.random_range(2.0..40.0);
            let height: f64 = rng.random_range(-1.5..0.5);
            points.push(PointXyz::new(
                (range * angle.sin()) as f32,
                height as f32,
                (range * angle.cos()) as f32,
            ));
        }
        PointCloud::new(points)
    }
}

impl DatasetProvider for SyntheticDataset {
    fn open(&self) -> Result<ReplayDataset, ReplayError> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let frame_interval = 1.0 / config.frame_rate_hz;
        let frames: Vec<CameraFrame> = (0..config.frame_count)
            .map(|i| CameraFrame {
                timestamp: Timestamp::from_secs_f64(i as f64 * frame_interval),
                image: self.generate_image(i),
            })
            .collect();

        let session_end = config.frame_count as f64 * frame_interval;
        let scan_interval = 1.0 / config.scan_rate_hz;
        let mut records = Vec::new();
        let mut t = scan_interval / 2.0;
        while t < session_end {
            records.push(ScanRecord {
                timestamp: Timestamp::from_secs_f64(t),
                cloud: self.generate_cloud(&mut rng),
            });
            t += scan_interval;
        }

        debug!(
            frames = frames.len(),
            scans = records.len(),
            seed = config.seed,
            "synthetic session generated"
        );

        let scans = if records.is_empty() {
            None
        } else {
            let store =
                ScanStore::with_stop_time(records, Timestamp::from_secs_f64(session_end))?;
            Some(Arc::new(store) as Arc<dyn contracts::ScanSource>)
        };

        Ok(ReplayDataset {
            frames: Arc::new(FrameStore::new(frames)?),
            scans,
            rig: self.rig.clone(),
        })
    }
}
