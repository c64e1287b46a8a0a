//! # Timeline
//!
//! Time-indexed in-memory stores over a recorded session.
//!
//! Responsibilities:
//! - O(1) frame access by index with monotonic-timestamp enforcement
//! - O(log n) nearest-preceding scan lookup over a half-open interval
//!
//! Both stores are built once when a dataset is opened and are
//! read-only for the session lifetime.

mod frames;
mod scans;

pub use frames::FrameStore;
pub use scans::ScanStore;

// Re-export contracts types
pub use contracts::{CameraFrame, FrameSource, PointCloud, ScanRecord, ScanSource, Timestamp};
