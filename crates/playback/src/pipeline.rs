//! Single-frame render pipeline.

use std::sync::Arc;

use contracts::{FrameSource, OverlayFrame, ReplayDataset, ReplayError, ScanSource};
use projection::ProjectionContext;
use tracing::instrument;

/// The per-frame data flow: frame lookup, nearest-preceding scan
/// selection, projection, overlay assembly.
///
/// Shared read-only between the controller thread (single-frame seeks)
/// and the play loop; holds no mutable state.
pub struct ReplayPipeline {
    frames: Arc<dyn FrameSource>,
    scans: Option<Arc<dyn ScanSource>>,
    projector: ProjectionContext,
}

impl ReplayPipeline {
    /// Build a pipeline over explicit sources.
    pub fn new(
        frames: Arc<dyn FrameSource>,
        scans: Option<Arc<dyn ScanSource>>,
        projector: ProjectionContext,
    ) -> Self {
        Self {
            frames,
            scans,
            projector,
        }
    }

    /// Build a pipeline straight from an opened dataset.
    pub fn from_dataset(dataset: &ReplayDataset) -> Self {
        Self::new(
            dataset.frames.clone(),
            dataset.scans.clone(),
            ProjectionContext::new(&dataset.rig),
        )
    }

    /// Number of frames available for replay.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The underlying frame source (pacing reads timestamps through it).
    pub fn frames(&self) -> &Arc<dyn FrameSource> {
        &self.frames
    }

    /// Render one frame index into an overlay.
    ///
    /// A frame whose timestamp falls outside the scan coverage gets an
    /// empty overlay; that is a normal branch, not an error. Errors are
    /// real range violations or source failures only.
    #[instrument(level = "debug", name = "render_frame", skip(self))]
    pub fn render_frame(&self, index: usize) -> Result<OverlayFrame, ReplayError> {
        let frame = self.frames.frame_at(index)?;
        let elapsed = self.frames.elapsed_at(index)?;

        let (points, scan_index) = match &self.scans {
            Some(scans) if scans.contains(frame.timestamp) => {
                let scan_index = scans.index_at_time(frame.timestamp)?;
                let cloud = scans.cloud_at(scan_index)?;
                (self.projector.project_cloud(&cloud), Some(scan_index))
            }
            _ => (Vec::new(), None),
        };

        metrics::counter!("replay_frames_rendered_total").increment(1);
        if scan_index.is_none() {
            metrics::counter!("replay_frames_without_overlay_total").increment(1);
        }

        Ok(OverlayFrame {
            frame_index: index,
            timestamp: frame.timestamp,
            elapsed,
            image: frame.image,
            points,
            scan_index,
        })
    }
}
