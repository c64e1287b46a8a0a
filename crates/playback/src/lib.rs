//! # Playback
//!
//! Replay pipeline and real-time-paced playback scheduler.
//!
//! Responsibilities:
//! - Compose frame source, scan source and projection into one render step
//! - Drive the play loop on a dedicated thread at the recorded cadence,
//!   compensating measured per-step overhead
//! - Cooperative cancellation from the controller thread, joined on stop
//!
//! ## Usage example
//!
//! ```ignore
//! use playback::{PlaybackController, ReplayPipeline};
//! use std::sync::Arc;
//!
//! let pipeline = Arc::new(ReplayPipeline::from_dataset(&dataset));
//! let mut controller = PlaybackController::new(pipeline, config);
//!
//! let (callback, updates) = playback::update_channel();
//! controller.start(0, callback)?;
//! // ... consume updates ...
//! controller.stop(); // blocks until the loop has fully terminated
//! ```

mod controller;
mod events;
mod pipeline;

pub use controller::{PlaybackController, PlaybackState};
pub use events::update_channel;
pub use pipeline::ReplayPipeline;

// Re-export contracts types
pub use contracts::{OverlayFrame, PlaybackCallback, PlaybackConfig, PlaybackUpdate, StopReason};
