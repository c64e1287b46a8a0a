//! Pinhole camera model.

use contracts::CameraIntrinsics;
use nalgebra::Point3;

/// Epsilon added to depth so a degenerate z never divides by zero.
///
/// Callers must still discard non-positive-depth results; the epsilon
/// only keeps the arithmetic finite.
const DEPTH_EPS: f64 = 1.0e-9;

/// Pinhole projection over fixed, externally calibrated intrinsics.
///
/// No distortion modeled. Pure arithmetic; malformed inputs (depth <= 0)
/// are never signaled as failures, they yield coordinates the caller
/// filters through [`CameraModel::contains`] and the depth flag.
#[derive(Debug, Clone, Copy)]
pub struct CameraModel {
    intrinsics: CameraIntrinsics,
}

impl CameraModel {
    /// Create a model from manifest-supplied intrinsics.
    pub fn new(intrinsics: CameraIntrinsics) -> Self {
        Self { intrinsics }
    }

    /// The intrinsics this model projects with.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Project a camera-space point to pixel coordinates.
    ///
    /// `(fx * x/z + cx, fy * y/z + cy)` with no side effects.
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> (f64, f64) {
        let k = &self.intrinsics;
        let z = p.z + DEPTH_EPS;
        (k.fx * p.x / z + k.cx, k.fy * p.y / z + k.cy)
    }

    /// Half-open window test: `0 <= x < width && 0 <= y < height`.
    ///
    /// A point exactly on the right or bottom edge is out of bounds.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0
            && x < self.intrinsics.width as f64
            && y >= 0.0
            && y < self.intrinsics.height as f64
    }
}
