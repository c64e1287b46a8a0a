//! Playback contracts shared between the scheduler and its controller.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::OverlayFrame;

/// Playback tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Speed multiplier applied to the recorded cadence (1.0 = original speed)
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

/// Why a play loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last frame index was reached
    Completed,
    /// The controller requested a stop
    Cancelled,
}

/// One delivery from the play loop to its controller.
///
/// Frames arrive strictly in increasing index order; exactly one
/// `Finished` closes every run so the controller can restore whatever
/// it disabled while playing.
#[derive(Debug, Clone)]
pub enum PlaybackUpdate {
    /// A rendered step of the pipeline
    Overlay(OverlayFrame),
    /// The loop terminated
    Finished(StopReason),
}

/// Playback delivery callback type
///
/// The play loop invokes this synchronously inside each step; its cost
/// counts toward the measured processing overhead that pacing
/// compensates for. Uses `Arc` to allow sharing across contexts.
pub type PlaybackCallback = Arc<dyn Fn(PlaybackUpdate) + Send + Sync>;
