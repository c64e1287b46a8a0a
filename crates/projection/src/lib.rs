//! # Projection
//!
//! Maps LiDAR sweeps onto the image plane of the display camera.
//!
//! Responsibilities:
//! - Pinhole camera model over manifest-supplied intrinsics
//! - Fixed LiDAR-to-camera rigid transform built once per session
//! - Eager full-cloud projection with half-open in-bounds tagging
//!
//! ## Usage example
//!
//! ```ignore
//! use projection::ProjectionContext;
//!
//! let context = ProjectionContext::new(&dataset.rig);
//! let points = context.project_cloud(&cloud);
//! for p in points.iter().filter(|p| p.in_bounds) {
//!     // draw p.x, p.y
//! }
//! ```

mod camera;
mod context;
mod extrinsics;

pub use camera::CameraModel;
pub use context::ProjectionContext;
pub use extrinsics::isometry_from_pose;

// Re-export contracts types
pub use contracts::{CameraIntrinsics, CameraRig, ProjectedPoint, SensorPose};
