//! SessionManifest - Config Loader output
//!
//! Describes everything needed to open and replay one recorded session:
//! dataset location, camera calibration, LiDAR extrinsics, playback
//! tuning, and overlay output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{CameraIntrinsics, CameraRig, PlaybackConfig, SensorPose};

/// Manifest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete session manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    /// Manifest version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Where the recorded session comes from
    pub dataset: DatasetConfig,

    /// Display-camera pinhole intrinsics
    pub camera: CameraIntrinsics,

    /// LiDAR mounting and decode parameters
    pub lidar: LidarConfig,

    /// Playback tuning
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Overlay output routing
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl SessionManifest {
    /// Bundle the calibration the projection context consumes.
    pub fn camera_rig(&self) -> CameraRig {
        CameraRig {
            intrinsics: self.camera,
            lidar_to_camera: self.lidar.pose,
            calibration_file: self.lidar.calibration_file.clone(),
        }
    }
}

/// Dataset backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Backend kind
    pub kind: DatasetKind,

    /// Session directory (directory datasets)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Generator tuning (synthetic datasets)
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Dataset backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Deterministic generated session (no files required)
    Synthetic,
    /// Session directory with an index manifest
    Directory,
}

/// Synthetic session generator tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of camera frames to generate
    pub frame_count: usize,

    /// Camera rate (Hz)
    pub frame_rate_hz: f64,

    /// LiDAR rate (Hz); independent of the camera rate
    pub scan_rate_hz: f64,

    /// Points per generated sweep
    pub points_per_scan: usize,

    /// Generator seed; identical seeds yield identical sessions
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            frame_count: 60,
            frame_rate_hz: 10.0,
            scan_rate_hz: 7.5,
            points_per_scan: 512,
            seed: 7,
        }
    }
}

/// LiDAR mounting and decode parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LidarConfig {
    /// Opaque vendor calibration file, carried through to the loader
    #[serde(default)]
    pub calibration_file: Option<PathBuf>,

    /// Bytes per stored point in raw cloud files (x,y,z f32 + padding)
    #[serde(default = "default_point_stride")]
    pub point_stride: u32,

    /// Fixed LiDAR-to-camera extrinsics
    #[serde(default)]
    pub pose: SensorPose,
}

fn default_point_stride() -> u32 {
    16
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink kind
    pub sink_type: SinkType,

    /// Worker queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Kind-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Structured-log summaries
    Log,
    /// PNG frames + projected-point JSON on disk
    File,
}
