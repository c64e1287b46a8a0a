//! RenderSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for overlay consumers.

use crate::{OverlayFrame, ReplayError};

/// Overlay output trait
///
/// All sink implementations must implement this trait. A sink receives
/// the decoded image plus the projected points (each tagged in/out of
/// bounds) and is responsible for actual display or persistence; the
/// core performs no pixel I/O beyond producing the coordinates.
#[trait_variant::make(RenderSink: Send)]
pub trait LocalRenderSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Consume one overlay frame
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, overlay: &OverlayFrame) -> Result<(), ReplayError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ReplayError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ReplayError>;
}
