//! Manifest validation
//!
//! Rules:
//! - camera intrinsics positive (focal lengths, dimensions)
//! - lidar pose finite, point_stride >= 12 (three f32 coordinates)
//! - directory datasets carry a path
//! - playback speed > 0 and finite
//! - sink names unique and non-empty

use std::collections::HashSet;

use contracts::{DatasetKind, ReplayError, SessionManifest};
use validator::Validate;

/// Validate a SessionManifest
///
/// Returns the first encountered error, or Ok(()).
pub fn validate(manifest: &SessionManifest) -> Result<(), ReplayError> {
    validate_camera(manifest)?;
    validate_lidar(manifest)?;
    validate_dataset(manifest)?;
    validate_playback(manifest)?;
    validate_sinks(manifest)?;
    Ok(())
}

/// Validate camera intrinsics via the derive rules
fn validate_camera(manifest: &SessionManifest) -> Result<(), ReplayError> {
    manifest.camera.validate().map_err(|e| {
        ReplayError::config_validation("camera", format!("invalid intrinsics: {e}"))
    })
}

/// Validate LiDAR mounting and decode parameters
fn validate_lidar(manifest: &SessionManifest) -> Result<(), ReplayError> {
    if !manifest.lidar.pose.is_finite() {
        return Err(ReplayError::config_validation(
            "lidar.pose",
            "pose components must be finite numbers",
        ));
    }
    if manifest.lidar.point_stride < 12 {
        return Err(ReplayError::config_validation(
            "lidar.point_stride",
            format!(
                "point_stride must be >= 12 (three f32 coordinates), got {}",
                manifest.lidar.point_stride
            ),
        ));
    }
    Ok(())
}

/// Validate dataset backend selection
fn validate_dataset(manifest: &SessionManifest) -> Result<(), ReplayError> {
    let dataset = &manifest.dataset;
    match dataset.kind {
        DatasetKind::Directory => {
            if dataset.path.is_none() {
                return Err(ReplayError::config_validation(
                    "dataset.path",
                    "directory datasets require a path",
                ));
            }
        }
        DatasetKind::Synthetic => {
            let synth = &dataset.synthetic;
            if synth.frame_count == 0 {
                return Err(ReplayError::config_validation(
                    "dataset.synthetic.frame_count",
                    "frame_count must be > 0",
                ));
            }
            if synth.frame_rate_hz <= 0.0 || synth.scan_rate_hz <= 0.0 {
                return Err(ReplayError::config_validation(
                    "dataset.synthetic",
                    format!(
                        "rates must be > 0, got frame_rate_hz={}, scan_rate_hz={}",
                        synth.frame_rate_hz, synth.scan_rate_hz
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Validate playback tuning
fn validate_playback(manifest: &SessionManifest) -> Result<(), ReplayError> {
    let speed = manifest.playback.speed;
    if !speed.is_finite() || speed <= 0.0 {
        return Err(ReplayError::config_validation(
            "playback.speed",
            format!("speed must be a positive finite number, got {speed}"),
        ));
    }
    Ok(())
}

/// Validate sink configuration
fn validate_sinks(manifest: &SessionManifest) -> Result<(), ReplayError> {
    let mut seen = HashSet::new();
    for (idx, sink) in manifest.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ReplayError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(ReplayError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        CameraIntrinsics, ConfigVersion, DatasetConfig, LidarConfig, PlaybackConfig, SensorPose,
        SinkConfig, SinkType, SyntheticConfig,
    };

    fn minimal_manifest() -> SessionManifest {
        SessionManifest {
            version: ConfigVersion::V1,
            dataset: DatasetConfig {
                kind: DatasetKind::Synthetic,
                path: None,
                synthetic: SyntheticConfig::default(),
            },
            camera: CameraIntrinsics {
                fx: 500.0,
                fy: 500.0,
                cx: 320.0,
                cy: 240.0,
                width: 640,
                height: 480,
            },
            lidar: LidarConfig {
                pose: SensorPose::default(),
                calibration_file: None,
                point_stride: 16,
            },
            playback: PlaybackConfig::default(),
            sinks: vec![SinkConfig {
                name: "log".into(),
                sink_type: SinkType::Log,
                queue_capacity: 100,
                params: Default::default(),
            }],
        }
    }

    #[test]
    fn test_valid_manifest() {
        let manifest = minimal_manifest();
        assert!(validate(&manifest).is_ok());
    }

    #[test]
    fn test_invalid_focal_length() {
        let mut manifest = minimal_manifest();
        manifest.camera.fx = 0.0;
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("camera"), "got: {err}");
    }

    #[test]
    fn test_non_finite_pose() {
        let mut manifest = minimal_manifest();
        manifest.lidar.pose.rotation.yaw = f64::INFINITY;
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("finite"), "got: {err}");
    }

    #[test]
    fn test_small_point_stride() {
        let mut manifest = minimal_manifest();
        manifest.lidar.point_stride = 8;
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("point_stride"), "got: {err}");
    }

    #[test]
    fn test_directory_without_path() {
        let mut manifest = minimal_manifest();
        manifest.dataset.kind = DatasetKind::Directory;
        manifest.dataset.path = None;
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("path"), "got: {err}");
    }

    #[test]
    fn test_zero_playback_speed() {
        let mut manifest = minimal_manifest();
        manifest.playback.speed = 0.0;
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("speed"), "got: {err}");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut manifest = minimal_manifest();
        manifest.sinks.push(manifest.sinks[0].clone());
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut manifest = minimal_manifest();
        manifest.sinks[0].name = String::new();
        let result = validate(&manifest);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }
}
