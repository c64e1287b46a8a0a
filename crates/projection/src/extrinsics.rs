//! Rigid LiDAR-to-camera transform construction.

use contracts::SensorPose;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// Build the rigid transform for a manifest pose.
///
/// Rotation angles are degrees (roll about x, pitch about y, yaw about
/// z); translation is meters. Built once when the projection context is
/// created and never re-estimated.
pub fn isometry_from_pose(pose: &SensorPose) -> Isometry3<f64> {
    let translation = Translation3::new(pose.location.x, pose.location.y, pose.location.z);
    let rotation = UnitQuaternion::from_euler_angles(
        pose.rotation.roll.to_radians(),
        pose.rotation.pitch.to_radians(),
        pose.rotation.yaw.to_radians(),
    );
    Isometry3::from_parts(translation, rotation)
}
