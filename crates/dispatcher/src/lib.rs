//! # Dispatcher
//!
//! Overlay fan-out module.
//!
//! Responsibilities:
//! - Consume `PlaybackUpdate`s from the play loop's channel
//! - Fan out overlays to multiple render sinks
//! - Isolate slow sinks behind bounded queues so they never stall pacing

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{OverlayFrame, PlaybackUpdate, RenderSink};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, LogSink};
