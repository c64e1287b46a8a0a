//! CameraFrame - Frame Source output
//!
//! One decoded camera image plus its capture timestamp.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Decoded image buffer
///
/// The core never inspects pixels; it only carries the buffer to sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel layout
    pub format: ImageFormat,

    /// Raw pixel data (zero-copy)
    pub data: Bytes,
}

impl ImageData {
    /// Expected byte length for the declared dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// Pixel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Rgb8,
    Rgba8,
    Bgra8,
}

impl ImageFormat {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ImageFormat::Rgb8 => 3,
            ImageFormat::Rgba8 | ImageFormat::Bgra8 => 4,
        }
    }
}

/// One camera frame of the recorded session
///
/// Immutable once produced by a frame source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Capture timestamp on the recording clock
    pub timestamp: Timestamp,

    /// Decoded image
    pub image: ImageData,
}
