//! Camera and LiDAR calibration contracts
//!
//! Supplied once by the dataset manifest at open time, never re-estimated
//! and never hard-coded inside the core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Pinhole camera intrinsics (no distortion modeled)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct CameraIntrinsics {
    /// Focal length x (pixels)
    #[validate(range(min = 1e-6))]
    pub fx: f64,

    /// Focal length y (pixels)
    #[validate(range(min = 1e-6))]
    pub fy: f64,

    /// Principal point x (pixels)
    pub cx: f64,

    /// Principal point y (pixels)
    pub cy: f64,

    /// Image width (pixels)
    #[validate(range(min = 1))]
    pub width: u32,

    /// Image height (pixels)
    #[validate(range(min = 1))]
    pub height: u32,
}

/// Position of one sensor relative to another
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Orientation of one sensor relative to another, degrees
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Rigid pose of the LiDAR in the camera frame
///
/// Converted exactly once into a rigid transform when the projection
/// context is built; immutable for the session lifetime.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SensorPose {
    /// Translation (meters)
    pub location: Location,

    /// Rotation (degrees)
    pub rotation: Rotation,
}

impl SensorPose {
    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.location.x,
            self.location.y,
            self.location.z,
            self.rotation.pitch,
            self.rotation.yaw,
            self.rotation.roll,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Everything the projection context needs, bundled by the dataset loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    /// Opaque vendor calibration file carried through to loaders
    #[serde(default)]
    pub calibration_file: Option<PathBuf>,

    /// Pinhole intrinsics of the display camera
    pub intrinsics: CameraIntrinsics,

    /// Fixed LiDAR-to-camera extrinsics
    pub lidar_to_camera: SensorPose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics_validation() {
        let good = CameraIntrinsics {
            fx: 1150.9,
            fy: 1150.9,
            cx: 988.5,
            cy: 692.8,
            width: 1920,
            height: 1440,
        };
        assert!(good.validate().is_ok());

        let bad = CameraIntrinsics { fx: 0.0, ..good };
        assert!(bad.validate().is_err());

        let bad = CameraIntrinsics { width: 0, ..good };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_pose_finite_check() {
        let mut pose = SensorPose::default();
        assert!(pose.is_finite());
        pose.rotation.yaw = f64::NAN;
        assert!(!pose.is_finite());
    }
}
