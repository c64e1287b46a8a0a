//! LogSink - logs overlay summary via tracing

use contracts::{OverlayFrame, RenderSink, ReplayError};
use tracing::{info, instrument};

/// Sink that logs overlay summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_overlay_summary(&self, overlay: &OverlayFrame) {
        info!(
            sink = %self.name,
            frame_index = overlay.frame_index,
            timestamp = %overlay.timestamp,
            elapsed_s = format!("{:.2}", overlay.elapsed.as_secs_f64()),
            points = overlay.points.len(),
            in_bounds = overlay.in_bounds_count(),
            scan_index = ?overlay.scan_index,
            "Overlay received"
        );
    }
}

impl RenderSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, overlay),
        fields(sink = %self.name, frame_index = overlay.frame_index)
    )]
    async fn write(&mut self, overlay: &OverlayFrame) -> Result<(), ReplayError> {
        self.log_overlay_summary(overlay);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ReplayError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ReplayError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
