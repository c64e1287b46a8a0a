//! Projection context: cloud-to-overlay mapping.

use contracts::{CameraRig, PointCloud, ProjectedPoint};
use nalgebra::{Isometry3, Point3};
use tracing::instrument;

use crate::camera::CameraModel;
use crate::extrinsics::isometry_from_pose;

/// Composes the fixed extrinsic transform with the camera model to map
/// full point clouds to pixel coordinates.
///
/// Pure function of (cloud, transform, intrinsics): identical inputs
/// yield bit-identical output.
#[derive(Debug, Clone)]
pub struct ProjectionContext {
    lidar_to_camera: Isometry3<f64>,
    camera: CameraModel,
}

impl ProjectionContext {
    /// Build the context from dataset calibration; done once at open time.
    pub fn new(rig: &CameraRig) -> Self {
        Self {
            lidar_to_camera: isometry_from_pose(&rig.lidar_to_camera),
            camera: CameraModel::new(rig.intrinsics),
        }
    }

    /// The camera model in use.
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    /// Project every point of a sweep onto the image plane.
    ///
    /// Eager because overlay rendering needs the whole set. The result
    /// has the same length and order as the input; each point carries
    /// `in_bounds = depth > 0 && inside the half-open image window`, so
    /// behind-camera points are filterable through the same flag.
    #[instrument(
        level = "trace",
        name = "project_cloud",
        skip(self, cloud),
        fields(points = cloud.len())
    )]
    pub fn project_cloud(&self, cloud: &PointCloud) -> Vec<ProjectedPoint> {
        let mut projected = Vec::with_capacity(cloud.len());
        let mut in_bounds_count: u64 = 0;

        for point in cloud {
            let sensor = Point3::new(point.x as f64, point.y as f64, point.z as f64);
            let cam = self.lidar_to_camera * sensor;
            let (x, y) = self.camera.project(&cam);
            let in_bounds = cam.z > 0.0 && self.camera.contains(x, y);
            if in_bounds {
                in_bounds_count += 1;
            }
            projected.push(ProjectedPoint {
                x: x as f32,
                y: y as f32,
                in_bounds,
            });
        }

        metrics::counter!("replay_projection_points_total").increment(cloud.len() as u64);
        metrics::counter!("replay_projection_points_in_bounds_total").increment(in_bounds_count);

        projected
    }
}
