//! Camera frame store with index-based access.

use contracts::{CameraFrame, FrameSource, ReplayError, Timestamp};

/// Ordered camera frames of one session.
///
/// Construction enforces the monotonic timestamp invariant; access is
/// O(1) by index. Frames are returned by clone (pixel buffers are
/// `Bytes`, so cloning is reference-counted, not a copy).
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: Vec<CameraFrame>,
}

impl FrameStore {
    /// Build a store from frames already in capture order.
    ///
    /// # Errors
    /// `InvalidDataset` when any timestamp decreases relative to its
    /// predecessor.
    pub fn new(frames: Vec<CameraFrame>) -> Result<Self, ReplayError> {
        for window in frames.windows(2) {
            if window[1].timestamp < window[0].timestamp {
                return Err(ReplayError::invalid_dataset(format!(
                    "frame timestamps decrease at {} -> {}",
                    window[0].timestamp, window[1].timestamp
                )));
            }
        }
        Ok(Self { frames })
    }

    fn check_index(&self, index: usize) -> Result<(), ReplayError> {
        if index >= self.frames.len() {
            return Err(ReplayError::out_of_range("frame", index, self.frames.len()));
        }
        Ok(())
    }
}

impl FrameSource for FrameStore {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn timestamp_at(&self, index: usize) -> Result<Timestamp, ReplayError> {
        self.check_index(index)?;
        Ok(self.frames[index].timestamp)
    }

    fn frame_at(&self, index: usize) -> Result<CameraFrame, ReplayError> {
        self.check_index(index)?;
        Ok(self.frames[index].clone())
    }
}
