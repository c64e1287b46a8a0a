//! FileSink - persists overlays to disk with a per-run folder structure

use contracts::{ImageData, ImageFormat, OverlayFrame, RenderSink, ReplayError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Base output directory
    pub base_path: PathBuf,

    /// Write the frame image as PNG next to the point data
    pub write_images: bool,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));
        let write_images = params
            .get("write_images")
            .map(|v| v != "false")
            .unwrap_or(true);

        Self {
            base_path,
            write_images,
        }
    }
}

/// Projected-point record persisted per frame
#[derive(Debug, Serialize)]
struct OverlayRecord<'a> {
    frame_index: usize,
    timestamp_us: u64,
    elapsed_s: f64,
    scan_index: Option<usize>,
    in_bounds: usize,
    points: &'a [contracts::ProjectedPoint],
}

/// Sink that writes overlays to disk files
///
/// Each run gets its own timestamped directory under the base path so
/// repeated replays never overwrite each other.
pub struct FileSink {
    name: String,
    run_path: PathBuf,
    config: FileSinkConfig,
    created_dirs: HashSet<PathBuf>,
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        let run_path = config
            .base_path
            .join(chrono::Local::now().format("run-%Y%m%d-%H%M%S").to_string());
        fs::create_dir_all(&run_path)?;

        Ok(Self {
            name: name.into(),
            run_path,
            config,
            created_dirs: HashSet::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params);
        Self::new(name, config)
    }

    /// The directory this run writes into
    pub fn run_path(&self) -> &PathBuf {
        &self.run_path
    }

    fn subdir(&mut self, name: &str) -> std::io::Result<PathBuf> {
        let dir = self.run_path.join(name);
        if !self.created_dirs.contains(&dir) {
            fs::create_dir_all(&dir)?;
            self.created_dirs.insert(dir.clone());
        }
        Ok(dir)
    }

    fn write_overlay_to_disk(&mut self, overlay: &OverlayFrame) -> std::io::Result<()> {
        // 1. Projected points as JSON
        let points_dir = self.subdir("points")?;
        let record = OverlayRecord {
            frame_index: overlay.frame_index,
            timestamp_us: overlay.timestamp.as_micros(),
            elapsed_s: overlay.elapsed.as_secs_f64(),
            scan_index: overlay.scan_index,
            in_bounds: overlay.in_bounds_count(),
            points: &overlay.points,
        };
        let points_path = points_dir.join(format!("{:06}.json", overlay.frame_index));
        let points_file = File::create(points_path)?;
        serde_json::to_writer(points_file, &record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        // 2. Frame image as PNG
        if self.config.write_images {
            let frames_dir = self.subdir("frames")?;
            let path = frames_dir.join(format!("{:06}.png", overlay.frame_index));
            self.save_image(path, &overlay.image)?;
        }

        Ok(())
    }

    fn save_image(&self, path: PathBuf, image: &ImageData) -> std::io::Result<()> {
        match image.format {
            ImageFormat::Rgb8 => image::save_buffer(
                path,
                &image.data,
                image.width,
                image.height,
                image::ColorType::Rgb8,
            )
            .map_err(std::io::Error::other),

            ImageFormat::Rgba8 => image::save_buffer(
                path,
                &image.data,
                image.width,
                image.height,
                image::ColorType::Rgba8,
            )
            .map_err(std::io::Error::other),

            ImageFormat::Bgra8 => {
                // Convert BGRA to RGBA
                let mut rgba_data = image.data.to_vec();
                for chunk in rgba_data.chunks_exact_mut(4) {
                    chunk.swap(0, 2); // Swap B and R
                }
                image::save_buffer(
                    path,
                    &rgba_data,
                    image.width,
                    image.height,
                    image::ColorType::Rgba8,
                )
                .map_err(std::io::Error::other)
            }
        }
    }

    fn persist_overlay(&mut self, overlay: &OverlayFrame) -> Result<(), ReplayError> {
        self.write_overlay_to_disk(overlay).map_err(|e| {
            error!(sink = %self.name, frame_index = overlay.frame_index, error = %e, "Write failed");
            ReplayError::sink_write(&self.name, e.to_string())
        })
    }
}

impl RenderSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, overlay),
        fields(sink = %self.name, frame_index = overlay.frame_index)
    )]
    async fn write(&mut self, overlay: &OverlayFrame) -> Result<(), ReplayError> {
        self.persist_overlay(overlay)?;
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ReplayError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ReplayError> {
        debug!(sink = %self.name, run = %self.run_path.display(), "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{ProjectedPoint, Timestamp};
    use std::time::Duration;
    use tempfile::tempdir;

    fn make_overlay() -> OverlayFrame {
        OverlayFrame {
            frame_index: 3,
            timestamp: Timestamp::from_millis(250),
            elapsed: Duration::from_millis(250),
            image: ImageData {
                width: 2,
                height: 2,
                format: ImageFormat::Rgb8,
                data: Bytes::from(vec![9u8; 12]),
            },
            points: vec![ProjectedPoint {
                x: 1.0,
                y: 1.5,
                in_bounds: true,
            }],
            scan_index: Some(0),
        }
    }

    #[tokio::test]
    async fn test_file_sink_layout() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig {
            base_path: dir.path().to_path_buf(),
            write_images: true,
        };

        let mut sink = FileSink::new("test_file", config).unwrap();
        sink.write(&make_overlay()).await.unwrap();
        sink.flush().await.unwrap();

        let run = sink.run_path().clone();
        assert!(run.join("points/000003.json").exists());
        assert!(run.join("frames/000003.png").exists());

        // Point record round-trips through JSON
        let text = fs::read_to_string(run.join("points/000003.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["frame_index"], 3);
        assert_eq!(value["in_bounds"], 1);
    }

    #[tokio::test]
    async fn test_file_sink_images_disabled() {
        let dir = tempdir().unwrap();
        let mut params = HashMap::new();
        params.insert(
            "base_path".to_string(),
            dir.path().to_string_lossy().into_owned(),
        );
        params.insert("write_images".to_string(), "false".to_string());

        let mut sink = FileSink::from_params("no_images", &params).unwrap();
        sink.write(&make_overlay()).await.unwrap();

        let run = sink.run_path().clone();
        assert!(run.join("points/000003.json").exists());
        assert!(!run.join("frames").exists());
    }

    #[tokio::test]
    async fn test_bgra_conversion() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig {
            base_path: dir.path().to_path_buf(),
            write_images: true,
        };

        let mut overlay = make_overlay();
        overlay.image = ImageData {
            width: 1,
            height: 1,
            format: ImageFormat::Bgra8,
            data: Bytes::from(vec![10u8, 20, 30, 255]),
        };

        let mut sink = FileSink::new("bgra", config).unwrap();
        sink.write(&overlay).await.unwrap();

        let png = image::open(sink.run_path().join("frames/000003.png"))
            .unwrap()
            .to_rgba8();
        // B and R swapped on save
        assert_eq!(png.get_pixel(0, 0).0, [30, 20, 10, 255]);
    }
}
