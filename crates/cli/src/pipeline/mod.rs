//! Playback orchestration: wiring dataset, scheduler, and sinks.

mod orchestrator;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use stats::PlaybackStats;
