//! OverlayFrame - Replay pipeline output
//!
//! A displayed frame plus the projected point overlay, handed to render sinks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ImageData, Timestamp};

/// One projected point in pixel coordinates.
///
/// Output order matches the input cloud. `in_bounds` is the half-open
/// window test `0 <= x < width && 0 <= y < height` and is additionally
/// false for points that were behind the camera; sinks draw only
/// in-bounds points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub in_bounds: bool,
}

/// One rendered step of the replay pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayFrame {
    /// Index of the displayed frame
    pub frame_index: usize,

    /// Capture timestamp of the displayed frame
    pub timestamp: Timestamp,

    /// Time offset from the first frame of the session
    pub elapsed: Duration,

    /// The displayed image
    pub image: ImageData,

    /// Projected overlay points; empty when no scan covers this frame
    pub points: Vec<ProjectedPoint>,

    /// Index of the scan the overlay came from, if any
    pub scan_index: Option<usize>,
}

impl OverlayFrame {
    /// Number of points that survive the in-bounds filter.
    pub fn in_bounds_count(&self) -> usize {
        self.points.iter().filter(|p| p.in_bounds).count()
    }

    /// True when there is no overlay to draw for this frame.
    pub fn is_overlay_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageFormat;
    use bytes::Bytes;

    fn sample_overlay(points: Vec<ProjectedPoint>) -> OverlayFrame {
        OverlayFrame {
            frame_index: 3,
            timestamp: Timestamp::from_millis(150),
            elapsed: Duration::from_millis(150),
            image: ImageData {
                width: 2,
                height: 2,
                format: ImageFormat::Rgb8,
                data: Bytes::from(vec![0u8; 12]),
            },
            points,
            scan_index: Some(1),
        }
    }

    #[test]
    fn test_in_bounds_count() {
        let overlay = sample_overlay(vec![
            ProjectedPoint { x: 1.0, y: 1.0, in_bounds: true },
            ProjectedPoint { x: -4.0, y: 1.0, in_bounds: false },
        ]);
        assert_eq!(overlay.in_bounds_count(), 1);
        assert!(!overlay.is_overlay_empty());
    }
}
